use crate::{
    ai::{
        errors::AiError,
        types::{
            ErrorBody, ExtractWordsRequest, LanguageLevel, RandomPhrase, RandomPhraseRequest,
            WordExtraction,
        },
    },
    auth::Session,
    config::Config,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

const USER_AGENT: &str = "slowka/0.1";
const EXTRACT_WORDS_PATH: &str = "api/extract-words";
const RANDOM_PHRASE_PATH: &str = "api/random-phrase";

/// Build the shared HTTP client. Call once at startup and inject it.
pub fn build_http_client() -> reqwest::Result<Client> {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        // Model calls are slow; keep a generous overall budget.
        .timeout(Duration::from_secs(120))
        .user_agent(USER_AGENT)
        .build()
}

/// Operations backed by the remote AI service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VocabularyAi: Send + Sync {
    async fn extract_words(
        &self,
        session: Option<Session>,
        text: &str,
        level: LanguageLevel,
    ) -> Result<WordExtraction, AiError>;

    async fn generate_phrase(
        &self,
        session: Option<Session>,
        words: &[String],
    ) -> Result<RandomPhrase, AiError>;
}

/// HTTP client for the AI service. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct AiClient {
    http: Client,
    base_url: Url,
}

impl AiClient {
    pub fn new(http: Client, mut base_url: Url) -> Self {
        // Url::join drops the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn from_config(config: &Config) -> Result<Self, AiError> {
        let http = build_http_client().map_err(AiError::from_reqwest_error)?;
        Ok(Self::new(http, config.ai_service_url().clone()))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[instrument(skip_all, fields(level = %level, chars = text.chars().count()))]
    pub async fn extract_words(
        &self,
        session: Option<&Session>,
        text: &str,
        level: LanguageLevel,
    ) -> Result<WordExtraction, AiError> {
        const ACTION: &str = "extract words";
        let token = bearer_token(session, ACTION)?;

        let request = ExtractWordsRequest {
            text,
            language_level: level,
        };
        let extraction: WordExtraction = self
            .post_json(EXTRACT_WORDS_PATH, token, &request, ACTION)
            .await?;

        info!(
            words = extraction.words.len(),
            total_words = extraction.total_words,
            "Extracted words"
        );
        Ok(extraction)
    }

    #[instrument(skip_all, fields(words = words.len()))]
    pub async fn generate_phrase(
        &self,
        session: Option<&Session>,
        words: &[String],
    ) -> Result<RandomPhrase, AiError> {
        const ACTION: &str = "generate phrase";
        let token = bearer_token(session, ACTION)?;

        let request = RandomPhraseRequest { words };
        self.post_json(RANDOM_PHRASE_PATH, token, &request, ACTION)
            .await
    }

    async fn post_json<B, R>(
        &self,
        path: &str,
        token: &str,
        body: &B,
        action: &'static str,
    ) -> Result<R, AiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(AiError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let error = remote_error(response, action).await;
            warn!(%status, "AI service rejected request: {}", error);
            return Err(error);
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VocabularyAi for AiClient {
    async fn extract_words(
        &self,
        session: Option<Session>,
        text: &str,
        level: LanguageLevel,
    ) -> Result<WordExtraction, AiError> {
        AiClient::extract_words(self, session.as_ref(), text, level).await
    }

    async fn generate_phrase(
        &self,
        session: Option<Session>,
        words: &[String],
    ) -> Result<RandomPhrase, AiError> {
        AiClient::generate_phrase(self, session.as_ref(), words).await
    }
}

/// The credential must be present before any network I/O happens.
fn bearer_token<'a>(
    session: Option<&'a Session>,
    action: &'static str,
) -> Result<&'a str, AiError> {
    session
        .map(Session::access_token)
        .filter(|token| !token.is_empty())
        .ok_or(AiError::Unauthenticated { action })
}

async fn remote_error(response: reqwest::Response, action: &'static str) -> AiError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            error: Some(message),
        }) if !message.is_empty() => message,
        Ok(_) => format!(
            "Failed to {action}: {}",
            status.canonical_reason().unwrap_or("unknown status")
        ),
        Err(_) => "Unknown error".to_string(),
    };
    AiError::Remote { status, message }
}
