pub mod client;
pub mod errors;
pub mod types;

pub use client::{AiClient, VocabularyAi, build_http_client};
pub use errors::AiError;
pub use types::{LanguageLevel, RandomPhrase, UnknownLevel, WordExtraction};

#[cfg(test)]
pub use client::MockVocabularyAi;
