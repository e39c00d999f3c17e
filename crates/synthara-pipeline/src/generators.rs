//! Derived text produced by the language model
//!
//! Model output is a loose text contract. Only the category list is
//! post-processed.

use synthara_llm::LanguageModel;

use crate::{Result, prompts};

/// Produce comma-separated style tags for a description
pub async fn generate_prompt(llm: &dyn LanguageModel, description: &str) -> Result<String> {
    Ok(llm.generate(&prompts::tag_instruction(description)).await?)
}

/// Produce lyrics for a description
pub async fn generate_lyrics(llm: &dyn LanguageModel, description: &str) -> Result<String> {
    Ok(llm.generate(&prompts::lyrics_instruction(description)).await?)
}

/// Produce a list of genres or categories for a description
pub async fn generate_categories(llm: &dyn LanguageModel, description: &str) -> Result<Vec<String>> {
    let raw = llm.generate(&prompts::categories_instruction(description)).await?;
    Ok(split_categories(&raw))
}

/// Split a comma-separated model answer into trimmed, non-empty entries
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
