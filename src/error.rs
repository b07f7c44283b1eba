use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::{ai::AiError, repositories::StoreError, selection::SelectionError};

/// Errors surfaced at the extraction and save boundaries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VocabError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("user must be authenticated to {action}")]
    Unauthenticated { action: &'static str },

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("AI service unavailable: {0}")]
    Transport(String),

    #[error("no words to add")]
    EmptyBatch,

    #[error("{0}")]
    Selection(String),

    #[error("{0}")]
    Storage(String),
}

impl From<AiError> for VocabError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Unauthenticated { action } => Self::Unauthenticated { action },
            AiError::Remote { status, message } => Self::Remote {
                status: status.as_u16(),
                message,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<StoreError> for VocabError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyBatch => Self::EmptyBatch,
            StoreError::Database(e) => Self::Storage(e.to_string()),
        }
    }
}

impl From<SelectionError> for VocabError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::EmptyBatch => Self::EmptyBatch,
            other => Self::Selection(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl VocabError {
    pub fn status(&self) -> StatusCode {
        match self {
            VocabError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            VocabError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            VocabError::Remote { .. } | VocabError::Transport(_) => StatusCode::BAD_GATEWAY,
            VocabError::EmptyBatch | VocabError::Selection(_) => StatusCode::BAD_REQUEST,
            VocabError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for VocabError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = match self {
            VocabError::Validation(messages) => ErrorResponse {
                error: "Text failed validation".to_string(),
                details: messages,
            },
            other => ErrorResponse {
                error: other.to_string(),
                details: Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}
