// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every prompt that writes about the candidate.
pub const HONESTY_INSTRUCTION: &str = "\
    CRITICAL: Never fabricate or exaggerate. Every claim about the candidate must be \
    supported by the CV or the candidate profile provided. If information is missing, \
    say what is missing and ask for it instead of inventing it.";

/// Instruction for free-text answers that will be shown verbatim to the user.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond with the requested text only. Do not add a preamble such as \
    'Here is' or 'Sure', and do not wrap the answer in code fences.";

/// Fills `{name}` placeholders from `vars` in a single pass.
///
/// Inserted values are never rescanned, so user or model text containing
/// `{...}` is kept literally. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
