// All LLM prompt constants for the Letter module.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const LETTER_SYSTEM: &str = "You are an expert motivation letter writer specializing in \
    bold, authentic and compelling letters that sound like a real person wrote them.";

/// Initial letter prompt. Replace every `{placeholder}` before sending.
pub const LETTER_PROMPT_TEMPLATE: &str = r#"Write a motivation letter for the application below.

CONTEXT:
- Target Company: {company_name}
- Target Role: based on the job profile

JOB PROFILE:
{job_profile}

COMPANY RESEARCH:
{research}

CANDIDATE PROFILE:
{candidate_profile}

FINALIZED CV SECTIONS:
{cv_sections}

WRITING STYLE:
- Bold and risky (80% bold, 20% safe), warm, natural, genuine
- Show personality, excitement and a true voice
- Avoid generic, ambiguous, cringe or overly technical text
- Simple, clear, skimmable language
- No contractions (write "I am", not "I'm")
- Write "percent" as "%"
- Use the em-dash only when absolutely necessary

STRUCTURE:

PARAGRAPH 1 - OPENING HOOK:
- The best possible hook showing genuine human interest
- Explain the reasoning behind the candidate's career direction
- No cringy or overly safe openings

PARAGRAPH 2 - WHY THIS COMPANY:
- Grounded in the company research and the job profile
- Connect the candidate's values with the company's values

PARAGRAPH 3 - WHY CHOOSE ME:
- Solid facts from the CV sections, STAR approach applied abstractly
- Transferable skills, leadership, bias to action, international teamwork
- Quantify achievements where the CV supports it

PARAGRAPH 4 - WHAT I WANT TO LEARN:
- Based on what the role involves
- Turn potential weaknesses into curiosities to learn
- Connect the learning to the candidate's ambitions

CLOSING:
- End with a strong handshake line of about 15 words
{closing_requirement}

{honesty}

WORD COUNT: between {min_words} and {max_words} words
FORMAT: no "Dear" opening, no "Best regards" closing
TONE: subtly confident, highly excited, warm, grounded, very human

{plain_text}"#;

/// Appended to the closing requirements when the profile yields a closing statement.
pub const CLOSING_STATEMENT_TEMPLATE: &str = "- Include these sentences verbatim: \"{closing}\"";

pub const REVISION_SYSTEM: &str = "You are an editor who adjusts the length of motivation \
    letters without changing their voice.";

/// Expansion prompt. Replace `{words}`, `{min_words}`, `{max_words}` and `{letter}`.
pub const EXPAND_PROMPT_TEMPLATE: &str = r#"Expand this motivation letter by approximately {words} words while keeping:
- The same tone and style
- Authenticity and genuineness
- All key messages
- A final length between {min_words} and {max_words} words

Add meaningful content, not filler words.

{plain_text}

CURRENT LETTER:
{letter}"#;

/// Compression prompt. Replace `{words}`, `{min_words}`, `{max_words}` and `{letter}`.
pub const COMPRESS_PROMPT_TEMPLATE: &str = r#"Compress this motivation letter by approximately {words} words while keeping:
- All key messages and their impact
- The same tone and authenticity
- A logical flow
- A final length between {min_words} and {max_words} words

Remove redundancy and unnecessary words, not core content.

{plain_text}

CURRENT LETTER:
{letter}"#;

pub const HUMANIZE_SYSTEM: &str = "You polish motivation letters so they read as if a warm, \
    articulate person wrote them by hand.";

/// Humanization prompt. Replace `{letter}`.
pub const HUMANIZE_PROMPT_TEMPLATE: &str = r#"Humanize this motivation letter so it sounds natural, engaging and warm while staying professional.

GUIDELINES:
- Conversational but professional
- Remove robotic or overly formal phrasing
- Keep the meaning and the length intact
- Avoid typical LLM patterns and cliches

{plain_text}

CURRENT LETTER:
{letter}"#;
