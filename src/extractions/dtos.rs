use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    ai::{LanguageLevel, WordExtraction},
    selection::WordSelection,
    validation::{ValidationResult, WordCount},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateTextResponse {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub word_count: WordCount,
}

impl ValidateTextResponse {
    pub fn new(result: &ValidationResult, count: WordCount) -> Self {
        Self {
            is_valid: result.is_valid(),
            errors: result.messages(),
            word_count: count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtractionRequest {
    pub text: String,
    pub language_level: Option<LanguageLevel>,
}

impl ExtractionRequest {
    /// The level must be chosen before any dispatch.
    pub fn level(&self) -> Result<LanguageLevel, String> {
        self.language_level
            .ok_or_else(|| "Language level is required".to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExtractionResponse {
    pub extraction: WordExtraction,
    pub selections: Vec<WordSelection>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePhraseRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LevelResponse {
    pub code: LanguageLevel,
    pub label: String,
}

impl From<LanguageLevel> for LevelResponse {
    fn from(level: LanguageLevel) -> Self {
        Self {
            code: level,
            label: level.label().to_string(),
        }
    }
}
