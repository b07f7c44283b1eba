use axum::{
    Router,
    http::HeaderName,
    routing::{get, post},
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    ai::{LanguageLevel, RandomPhrase, WordExtraction},
    app_state::AppState,
    entities::Word,
    error::ErrorResponse,
    extractions::{self, dtos as extraction_dtos},
    health,
    selection::WordSelection,
    validation::WordCount,
    words::{self, dtos as word_dtos},
};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        extractions::handlers::validate_text,
        extractions::handlers::extract_words,
        extractions::handlers::generate_phrase,
        extractions::handlers::list_levels,
        words::handlers::search_words,
        words::handlers::save_words,
    ),
    components(schemas(
        ErrorResponse,
        health::HealthResponse,
        LanguageLevel,
        WordExtraction,
        RandomPhrase,
        WordSelection,
        WordCount,
        Word,
        extraction_dtos::ValidateTextRequest,
        extraction_dtos::ValidateTextResponse,
        extraction_dtos::ExtractionRequest,
        extraction_dtos::ExtractionResponse,
        extraction_dtos::GeneratePhraseRequest,
        extraction_dtos::LevelResponse,
        word_dtos::WordListResponse,
        word_dtos::SaveWordsRequest,
        word_dtos::SaveWordsResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Service health"),
        (name = "extractions", description = "Text validation and AI-assisted word extraction"),
        (name = "words", description = "Stored vocabulary")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Full HTTP surface: API routes, Swagger UI, tracing and request ids.
pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route(
            "/v1/text/validate",
            post(extractions::handlers::validate_text),
        )
        .route("/v1/extractions", post(extractions::handlers::extract_words))
        .route("/v1/phrases", post(extractions::handlers::generate_phrase))
        .route("/v1/levels", get(extractions::handlers::list_levels))
        .route(
            "/v1/words",
            get(words::handlers::search_words).post(words::handlers::save_words),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
