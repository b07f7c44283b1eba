use crate::{ai::VocabularyAi, auth::JwtService, vocabulary::WordBank};
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub word_bank: Arc<WordBank>,
    pub ai: Arc<dyn VocabularyAi>,
    pub jwt: Arc<JwtService>,
    pub db_pool: Pool<Postgres>,
}

impl AppState {
    pub fn new(
        pool: Pool<Postgres>,
        word_bank: WordBank,
        ai: Arc<dyn VocabularyAi>,
        jwt_secret: &str,
    ) -> Self {
        Self {
            word_bank: Arc::new(word_bank),
            ai,
            jwt: Arc::new(JwtService::new(jwt_secret)),
            db_pool: pool,
        }
    }
}
