// All LLM prompt constants for the Research module.

/// Company name extraction prompt. Replace `{job_profile}` before sending.
pub const COMPANY_NAME_PROMPT_TEMPLATE: &str = r#"Extract the name of the hiring company from this job profile.

Return a JSON object with this EXACT schema:
{"company_name": "Deutsche Bahn AG"}

If the company is not named anywhere, return {"company_name": ""}.

JOB PROFILE:
{job_profile}"#;

pub const RESEARCH_SYSTEM: &str = "You are an expert company researcher preparing a candidate \
    for a job application. Be specific and factual. When you are not certain about a fact, \
    say so plainly instead of guessing.";

/// Company research prompt. Replace `{company_name}` and `{job_profile}` before sending.
pub const RESEARCH_PROMPT_TEMPLATE: &str = r#"Research {company_name} comprehensively for a job application context.

JOB PROFILE CONTEXT:
{job_profile}

Provide detailed research covering:

1. COMPANY OVERVIEW:
   - Industry and market position
   - Company size and global presence
   - Core business areas and services

2. CULTURE & VALUES:
   - Company mission and vision
   - Core values and principles
   - Work culture and environment
   - Employee value proposition

3. RECENT DEVELOPMENTS (last 6 months):
   - Major news and announcements
   - New initiatives or projects
   - Strategic partnerships
   - Market expansions or changes

4. HIRING PREFERENCES:
   - What they typically look for in candidates
   - Preferred backgrounds and experiences
   - Skills they value most
   - Career development opportunities

5. COMMUNICATION STYLE:
   - Company tone and personality
   - How they present themselves
   - Brand voice characteristics

6. COMPETITIVE ADVANTAGES:
   - What sets them apart from competitors
   - Unique selling propositions
   - Innovation areas

Focus on information relevant for tailoring a CV and motivation letter.
Avoid generic corporate speak - provide actionable insights."#;
