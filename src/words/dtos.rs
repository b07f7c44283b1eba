use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::Word;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the word or its translation.
    pub q: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WordListResponse {
    pub rows: Vec<Word>,
    pub total_count: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveWordsRequest {
    pub words: Vec<String>,
}

impl SaveWordsRequest {
    /// Trimmed, non-blank entries in request order.
    pub fn cleaned(&self) -> Vec<String> {
        self.words
            .iter()
            .map(|word| word.trim())
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveWordsResponse {
    pub saved: Vec<Word>,
    /// Submitted words that were already in the vocabulary.
    pub skipped: Vec<String>,
}
