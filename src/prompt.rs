use crate::styles::{ShotMode, StyleCatalog};

const QUALITY_PHRASES: [&str; 3] = ["高质量照片", "自然光线", "细节丰富"];
const PROMPT_DELIMITER: &str = "，";

// The generation endpoint rejects multi-line prompts.
pub fn single_line(prompt: &str) -> String {
    prompt.replace('\n', " ").trim().to_string()
}

pub fn build_full_prompt(
    catalog: &StyleCatalog,
    character_description: &str,
    style: &str,
    mode: ShotMode,
    additional_context: &str,
) -> String {
    let enhancement = catalog.enhancement_for(style, mode);

    let mut parts = vec![character_description, enhancement, additional_context];
    parts.extend(QUALITY_PHRASES);

    let joined = parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(PROMPT_DELIMITER);

    single_line(&joined)
}
