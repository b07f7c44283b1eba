use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;

/// CEFR proficiency tiers used to bucket extracted vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LanguageLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown language level: {0}")]
pub struct UnknownLevel(pub String);

impl LanguageLevel {
    pub const ALL: [LanguageLevel; 6] = [
        LanguageLevel::A1,
        LanguageLevel::A2,
        LanguageLevel::B1,
        LanguageLevel::B2,
        LanguageLevel::C1,
        LanguageLevel::C2,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LanguageLevel::A1 => "A1",
            LanguageLevel::A2 => "A2",
            LanguageLevel::B1 => "B1",
            LanguageLevel::B2 => "B2",
            LanguageLevel::C1 => "C1",
            LanguageLevel::C2 => "C2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LanguageLevel::A1 => "Beginner",
            LanguageLevel::A2 => "Elementary",
            LanguageLevel::B1 => "Intermediate",
            LanguageLevel::B2 => "Upper Intermediate",
            LanguageLevel::C1 => "Advanced",
            LanguageLevel::C2 => "Proficient",
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        LanguageLevel::ALL
            .into_iter()
            .find(|level| level.code() == code)
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractWordsRequest<'a> {
    pub text: &'a str,
    pub language_level: LanguageLevel,
}

/// Successful response of `POST /api/extract-words`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WordExtraction {
    pub words: Vec<String>,
    pub total_words: u32,
    pub language_level: String,
    pub analysis: String,
}

#[derive(Debug, Serialize)]
pub struct RandomPhraseRequest<'a> {
    pub words: &'a [String],
}

/// Successful response of `POST /api/random-phrase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RandomPhrase {
    pub phrase: String,
    pub words_used: Vec<String>,
}

/// Error body returned by the AI service on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
