// Prompt constants for the résumé summary draft.

use crate::llm_client::GenerationParams;

/// Cheap tier is plenty for a 40-word header blurb.
pub const SUMMARY_PARAMS: GenerationParams = GenerationParams {
    model: "claude-3-5-haiku-latest",
    temperature: 0.6,
    max_tokens: 120,
};

/// System prompt for the professional-summary draft placed in the résumé
/// header.
pub const SUMMARY_SYSTEM: &str = "\
    You write the professional summary at the top of a resume. \
    Write in the first person, in a neutral tone, about 40 words in two or \
    three sentences. \
    Do NOT mention age or any contact details. \
    Highlight the candidate's key skills, education and motivation, keeping \
    in mind that their only experience so far comes from internships. \
    End with the sentence 'Seeking a first permanent position in ...' \
    completed with the candidate's field.";

/// User prompt template. Replace `{profile_json}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = "\
Here is the candidate profile:
{profile_json}

Write the summary.";
