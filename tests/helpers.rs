#![allow(dead_code)]

use axum::Router;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use slowka::{
    ai::{AiClient, build_http_client},
    app_state::AppState,
    repositories::WordRepository,
    routes,
    vocabulary::WordBank,
};
use url::Url;

pub const TEST_JWT_SECRET: &str = "integration-secret";

/// Connect and migrate, or `None` when `TEST_DATABASE_URL` is not set.
pub async fn setup_test_db() -> Option<Pool<Postgres>> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping database tests: TEST_DATABASE_URL not set");
            return None;
        }
    };

    let pool = Pool::<Postgres>::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

pub async fn test_app(pool: Pool<Postgres>, ai_base_url: &str) -> Router {
    let word_bank = WordBank::load(Arc::new(WordRepository::new(pool.clone())))
        .await
        .expect("Failed to load known words");
    let ai = AiClient::new(
        build_http_client().expect("Failed to build HTTP client"),
        Url::parse(ai_base_url).expect("Invalid AI base URL"),
    );

    routes::router(AppState::new(pool, word_bank, Arc::new(ai), TEST_JWT_SECRET))
}

/// Word unique to one test run so concurrent runs don't collide.
pub fn unique_word(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple())
}
