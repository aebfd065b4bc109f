// All LLM prompt constants for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const CRITIQUE_SYSTEM: &str = "You are a brutal but constructive CV optimization expert. \
    You give specific, actionable feedback tied to the target role and never generic advice.";

/// Section critique prompt. Replace every `{placeholder}` before sending.
pub const CRITIQUE_PROMPT_TEMPLATE: &str = r#"Critique one section of a {language} CV for a specific job application.

ANALYSIS CONTEXT:
- Target Role: based on the job profile below
- Company: {company_name}
- Section: {section}
- Language: {language}

JOB PROFILE:
{job_profile}

COMPANY RESEARCH:
{research}

CANDIDATE PROFILE:
{user_profile}

CURRENT CV SECTION - {section}:
{section_content}

CORE PRINCIPLES:
- Honest, bold, non-generic, no cliches
- ATS compliant with keyword alignment to the job profile
- Highest impact first
- Short, crisp, skimmable content
- STAR pattern for bullet points (Situation, Task, Action, Result)
- A coherent career narrative that explains the candidate's transition

STRICT RULES:
- {honesty}
- Measure every suggestion against the space the section has
- If the section is missing, explain whether and how to add it

SPECIFIC INSTRUCTIONS FOR {section}:
{section_instructions}

Provide specific, actionable and honest suggestions for this {section} section, covering:
1. ATS optimization and keyword alignment
2. Relevance to the job requirements
3. Space efficiency and formatting
4. Impact and readability
5. Concrete rewrites, with before/after examples where useful

Write the suggestions in {language}."#;

pub const PROFESSIONAL_PROFILE_INSTRUCTIONS: &str = "\
- Keep it to about {target_words} words
- Spell out \"and\" instead of using \"&\"
- Show a clear career direction and value proposition
- Include two or three key strengths relevant to the role
- Mention the career transition if it is relevant to the role";

pub const EXPERIENCE_INSTRUCTIONS: &str = "\
- Use reverse chronological order
- Every bullet point follows the STAR pattern
- Quantify achievements with numbers or percentages where the CV supports them
- Show progression and increasing responsibility
- Highlight leadership, stakeholder management and cross-functional collaboration
- Connect past responsibilities to the skills the target role asks for";

pub const EDUCATION_INSTRUCTIONS: &str = "\
- Start with the most recent or most relevant degree
- Include relevant coursework only if it matches the job requirements
- Mention the thesis topic if it is relevant to the role
- Include grades only if they are impressive";

pub const SKILLS_INSTRUCTIONS: &str = "\
- Group skills logically (technical, management, languages)
- Prioritize skills named in the job profile, using its exact keywords
- Show skill levels where appropriate
- Remove outdated or irrelevant skills";

pub const PROJECTS_INSTRUCTIONS: &str = "\
- Focus on the projects most relevant to the target role
- Use the format Challenge, Action, Result and quantify the outcome
- Show leadership and initiative";

pub const CERTIFICATIONS_INSTRUCTIONS: &str = "\
- List the most relevant certifications first
- Include completion dates
- Remove expired or irrelevant certifications
- Group by category if there are many";

pub const MODIFY_SYSTEM: &str = "You are a CV optimization expert who revises your own \
    suggestions according to the candidate's feedback.";

/// Suggestion rewrite prompt. Replace `{section}`, `{suggestions}` and `{request}`.
pub const MODIFY_PROMPT_TEMPLATE: &str = r#"Modify the suggestions for the {section} section based on the candidate's request.

ORIGINAL SUGGESTIONS:
{suggestions}

CANDIDATE'S MODIFICATION REQUEST:
{request}

Provide updated suggestions that incorporate the feedback while keeping:
- Professional quality and impact
- ATS optimization
- Relevance to the target role
- An honest and constructive tone

{plain_text}"#;

pub const ASK_SYSTEM: &str = "You are a helpful CV expert who explains the reasoning behind \
    CV suggestions.";

/// Question prompt. Replace `{section}`, `{suggestions}` and `{question}`.
pub const ASK_PROMPT_TEMPLATE: &str = r#"Answer the candidate's question about the {section} section suggestions.

SECTION SUGGESTIONS:
{suggestions}

CANDIDATE'S QUESTION:
{question}

Give a clear, specific and actionable answer that explains the reasoning behind the suggestions or clears up the confusion.

{plain_text}"#;
