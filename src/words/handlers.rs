use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::{info, instrument};

use crate::{
    app_state::AppState,
    error::{ErrorResponse, VocabError},
    vocabulary::{PAGE_SIZE, total_pages},
    words::dtos::{SaveWordsRequest, SaveWordsResponse, SearchParams, WordListResponse},
};

#[utoipa::path(
    get,
    path = "/v1/words",
    tag = "words",
    params(SearchParams),
    responses(
        (status = 200, description = "One page of stored words, newest first", body = WordListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn search_words(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<WordListResponse>, VocabError> {
    let page = params.page.unwrap_or(1).max(1);
    let query = params.q.unwrap_or_default();

    let result = state.word_bank.search(&query, page).await?;

    Ok(Json(WordListResponse {
        total_pages: total_pages(result.total_count, PAGE_SIZE),
        total_count: result.total_count,
        rows: result.rows,
        page,
        page_size: PAGE_SIZE,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/words",
    tag = "words",
    request_body = SaveWordsRequest,
    responses(
        (status = 201, description = "Words saved", body = SaveWordsResponse),
        (status = 400, description = "Nothing new to save", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn save_words(
    State(state): State<AppState>,
    Json(payload): Json<SaveWordsRequest>,
) -> Result<(StatusCode, Json<SaveWordsResponse>), VocabError> {
    let words = payload.cleaned();
    let mut selections = state.word_bank.reconcile(words.as_slice()).await;
    selections.select_all_new();

    let skipped: Vec<String> = selections
        .items()
        .iter()
        .filter(|s| s.exists_in_db)
        .map(|s| s.word.clone())
        .collect();

    let saved = state.word_bank.save_selected(&selections).await?;
    info!(
        submitted = payload.words.len(),
        saved = saved.len(),
        skipped = skipped.len(),
        "Words saved"
    );

    Ok((StatusCode::CREATED, Json(SaveWordsResponse { saved, skipped })))
}
