use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("user must be authenticated to {action}")]
    Unauthenticated { action: &'static str },

    #[error("{message}")]
    Remote {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request timeout")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl AiError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Remote {
                status,
                message: err.to_string(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}
