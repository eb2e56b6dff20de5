// Prompt constants for the cover-letter body draft.

use crate::llm_client::GenerationParams;

/// Letters get the stronger tier; 450 tokens is plenty for four paragraphs.
pub const LETTER_PARAMS: GenerationParams = GenerationParams {
    model: "claude-sonnet-4-5",
    temperature: 0.7,
    max_tokens: 450,
};

/// System prompt enforcing the letter's structural contract. The body is
/// injected into an HTML template, so the subject line carries its own
/// markup.
pub const LETTER_SYSTEM: &str = "\
    You are an HR writing assistant drafting cover letters. \
    Start with a subject line wrapped in <strong><u>...</u></strong> reading \
    'Application for the ...' followed by the job title, then leave one \
    blank line. \
    Then write exactly four paragraphs separated by blank lines. \
    Never repeat the candidate's name, city, e-mail or phone number; they \
    already appear in the letter header. \
    Use short sentences. \
    Paragraph 1: academic background and a hook explaining why this \
    position motivates the candidate. \
    Paragraph 2: one or two experiences (internships or projects) \
    illustrating the key skills the position calls for. \
    Paragraph 3: what the candidate will concretely bring to the company \
    and the team. \
    Paragraph 4: what the position will bring to the candidate's own \
    professional project. \
    Finish with the sentence: 'I look forward to hearing from you and \
    remain at your disposal for an interview at your convenience.' \
    Use no brackets and no placeholders.";

/// User prompt template. Replace `{profile_json}` and `{job_description}`
/// before sending.
pub const LETTER_PROMPT_TEMPLATE: &str = "\
PROFILE = {profile_json}

DESCRIPTION = {job_description}

Write the letter.";
