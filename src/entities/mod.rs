use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// --- Tables ---

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Word {
    pub id: Uuid,
    pub word: String,
    pub language_code: String,
    pub translated_word: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert tuple for the `words` table; id and timestamp come from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
    pub word: String,
    pub language_code: String,
    pub translated_word: Option<String>,
}

impl NewWord {
    pub fn untranslated(word: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            language_code: language_code.into(),
            translated_word: None,
        }
    }
}
