mod helpers;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use helpers::{TEST_JWT_SECRET, setup_test_db, test_app, unique_word};
use slowka::{
    auth::JwtService,
    repositories::{WordRepository, WordStore},
    vocabulary::WordBank,
};

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn bearer() -> String {
    let token = JwtService::new(TEST_JWT_SECRET)
        .generate_token(Uuid::new_v4())
        .expect("Failed to generate token");
    format!("Bearer {}", token)
}

/// Saving refreshes the known-words cache used by reconciliation.
#[tokio::test]
async fn test_bank_refreshes_after_insert() {
    let Some(pool) = setup_test_db().await else {
        return; // Skip test if database not available
    };
    let bank = WordBank::load(Arc::new(WordRepository::new(pool.clone())))
        .await
        .expect("Failed to load bank");
    let word = unique_word("słowo");

    let selections = bank.reconcile(&[word.as_str()]).await;
    assert!(!selections.items()[0].exists_in_db);

    bank.insert_words(&[word.clone()])
        .await
        .expect("Failed to insert words");

    let selections = bank.reconcile(&[word.to_uppercase().as_str()]).await;
    assert!(selections.items()[0].exists_in_db);

    let repo = WordRepository::new(pool);
    let page = repo
        .search(&slowka::repositories::WordQuery::new(word.clone(), 1, 20))
        .await
        .expect("Failed to search");
    assert_eq!(page.total_count, 1);
    assert_eq!(page.rows[0].language_code, "pl");
    assert_eq!(page.rows[0].translated_word, None);
}

#[tokio::test]
async fn test_extract_then_save_flow() {
    let Some(pool) = setup_test_db().await else {
        return; // Skip test if database not available
    };
    let new_word = unique_word("kot");
    let ai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/extract-words"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "words": [new_word],
            "total_words": 5,
            "language_level": "A1",
            "analysis": ""
        })))
        .mount(&ai)
        .await;

    let app = test_app(pool, &ai.uri()).await;

    // Extraction flags the word as new.
    let request = Request::builder()
        .method("POST")
        .uri("/v1/extractions")
        .header(AUTHORIZATION, bearer())
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "text": "Kot śpi na oknie w domu", "language_level": "A1" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["selections"][0]["exists_in_db"], false);

    // Save it.
    let request = Request::builder()
        .method("POST")
        .uri("/v1/words")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "words": [new_word] }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Saving again has nothing left to add.
    let request = Request::builder()
        .method("POST")
        .uri("/v1/words")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "words": [new_word] }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Search finds it.
    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/words?q={}", new_word))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["rows"][0]["word"], Value::String(new_word));
}

#[tokio::test]
async fn test_health_check_reports_database() {
    let Some(pool) = setup_test_db().await else {
        return; // Skip test if database not available
    };
    let app = test_app(pool, "http://localhost:1").await;

    let request = Request::builder()
        .method("GET")
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["database"], "healthy");
}
