use crate::{
    entities::{NewWord, Word},
    selection::KnownWords,
};
use async_trait::async_trait;
use regex::Regex;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, instrument};

static LIKE_METACHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\%_]").expect("Failed to compile LIKE escape regex"));

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no words to add")]
    EmptyBatch,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Filter and window for a page of stored words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordQuery {
    pub search: String,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl WordQuery {
    pub fn new(search: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            search: search.into(),
            page,
            page_size,
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// ILIKE pattern for the search text, or `None` when every row matches.
    pub fn pattern(&self) -> Option<String> {
        let search = self.search.trim();
        if search.is_empty() {
            return None;
        }
        let escaped = LIKE_METACHARACTERS.replace_all(search, r"\$0");
        Some(format!("%{}%", escaped))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPage {
    pub rows: Vec<Word>,
    pub total_count: i64,
}

/// Persistence seam for the `words` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Lower-cased words stored for `language_code`.
    async fn load_known_words(&self, language_code: &str) -> Result<KnownWords, StoreError>;

    /// Case-insensitive substring search over word and translation, newest first.
    async fn search(&self, query: &WordQuery) -> Result<WordPage, StoreError>;

    /// Batch insert. An empty batch is rejected before touching the database.
    async fn insert_words(&self, words: &[NewWord]) -> Result<Vec<Word>, StoreError>;
}

#[derive(Clone)]
pub struct WordRepository {
    pool: PgPool,
}

impl WordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WordStore for WordRepository {
    #[instrument(skip(self))]
    async fn load_known_words(&self, language_code: &str) -> Result<KnownWords, StoreError> {
        let words: Vec<String> =
            sqlx::query_scalar("SELECT word FROM words WHERE language_code = $1")
                .bind(language_code)
                .fetch_all(&self.pool)
                .await?;

        debug!("Loaded {} stored words", words.len());
        Ok(words.into_iter().collect())
    }

    #[instrument(skip(self), fields(search = %query.search, page = query.page))]
    async fn search(&self, query: &WordQuery) -> Result<WordPage, StoreError> {
        let pattern = query.pattern();

        let total_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM words
            WHERE $1::text IS NULL
               OR word ILIKE $1
               OR translated_word ILIKE $1
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, Word>(
            r#"
            SELECT id, word, language_code, translated_word, created_at
            FROM words
            WHERE $1::text IS NULL
               OR word ILIKE $1
               OR translated_word ILIKE $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(WordPage { rows, total_count })
    }

    #[instrument(skip_all, fields(count = words.len()))]
    async fn insert_words(&self, words: &[NewWord]) -> Result<Vec<Word>, StoreError> {
        if words.is_empty() {
            return Err(StoreError::EmptyBatch);
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO words (word, language_code, translated_word) ");
        builder.push_values(words, |mut row, word| {
            row.push_bind(word.word.clone())
                .push_bind(word.language_code.clone())
                .push_bind(word.translated_word.clone());
        });
        builder.push(" RETURNING id, word, language_code, translated_word, created_at");

        let inserted = builder
            .build_query_as::<Word>()
            .fetch_all(&self.pool)
            .await?;

        Ok(inserted)
    }
}
