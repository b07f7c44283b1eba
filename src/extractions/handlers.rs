use axum::{Json, extract::State};
use tracing::{info, instrument};

use crate::{
    ai::{LanguageLevel, RandomPhrase},
    app_state::AppState,
    auth::BearerSession,
    error::{ErrorResponse, VocabError},
    extractions::dtos::{
        ExtractionRequest, ExtractionResponse, GeneratePhraseRequest, LevelResponse,
        ValidateTextRequest, ValidateTextResponse,
    },
    validation,
};

#[utoipa::path(
    post,
    path = "/v1/text/validate",
    tag = "extractions",
    request_body = ValidateTextRequest,
    responses(
        (status = 200, description = "Validation report", body = ValidateTextResponse)
    )
)]
pub async fn validate_text(Json(payload): Json<ValidateTextRequest>) -> Json<ValidateTextResponse> {
    let result = validation::validate(&payload.text);
    let count = validation::word_count(&payload.text);
    Json(ValidateTextResponse::new(&result, count))
}

#[utoipa::path(
    post,
    path = "/v1/extractions",
    tag = "extractions",
    request_body = ExtractionRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Extracted words reconciled against the vocabulary", body = ExtractionResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 422, description = "Text or level rejected", body = ErrorResponse),
        (status = 502, description = "AI service failure", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn extract_words(
    BearerSession(session): BearerSession,
    State(state): State<AppState>,
    Json(payload): Json<ExtractionRequest>,
) -> Result<Json<ExtractionResponse>, VocabError> {
    let level = payload
        .level()
        .map_err(|message| VocabError::Validation(vec![message]))?;

    let report = validation::validate(&payload.text);
    if !report.is_valid() {
        return Err(VocabError::Validation(report.messages()));
    }

    let extraction = state
        .ai
        .extract_words(session, &payload.text, level)
        .await?;
    let selections = state.word_bank.reconcile(extraction.words.as_slice()).await;
    info!(
        extracted = selections.len(),
        known = selections.items().iter().filter(|s| s.exists_in_db).count(),
        "Extraction reconciled"
    );

    Ok(Json(ExtractionResponse {
        extraction,
        selections: selections.items().to_vec(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/phrases",
    tag = "extractions",
    request_body = GeneratePhraseRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Generated phrase", body = RandomPhrase),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 502, description = "AI service failure", body = ErrorResponse)
    )
)]
pub async fn generate_phrase(
    BearerSession(session): BearerSession,
    State(state): State<AppState>,
    Json(payload): Json<GeneratePhraseRequest>,
) -> Result<Json<RandomPhrase>, VocabError> {
    let phrase = state.ai.generate_phrase(session, &payload.words).await?;
    Ok(Json(phrase))
}

#[utoipa::path(
    get,
    path = "/v1/levels",
    tag = "extractions",
    responses(
        (status = 200, description = "CEFR levels", body = [LevelResponse])
    )
)]
pub async fn list_levels() -> Json<Vec<LevelResponse>> {
    Json(LanguageLevel::ALL.into_iter().map(LevelResponse::from).collect())
}
