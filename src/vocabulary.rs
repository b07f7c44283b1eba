//! The stored vocabulary and its in-memory known-words cache.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};

use crate::{
    entities::{NewWord, Word},
    error::VocabError,
    repositories::{WordPage, WordQuery, WordStore},
    selection::{KnownWords, SelectionSet},
};

/// Language code stamped on every saved word.
pub const LANGUAGE_CODE: &str = "pl";
/// Rows per page when browsing the vocabulary.
pub const PAGE_SIZE: u32 = 20;

/// Pages needed to show `total` rows; zero rows means zero pages.
pub fn total_pages(total: i64, page_size: u32) -> u32 {
    if total <= 0 || page_size == 0 {
        return 0;
    }
    let pages = (total + i64::from(page_size) - 1) / i64::from(page_size);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Shared handle to the word store.
///
/// Holds the known-words set used to flag extracted words, and refreshes it
/// after each successful insert.
pub struct WordBank {
    store: Arc<dyn WordStore>,
    known: RwLock<KnownWords>,
    // Held across load and assign so the newest snapshot is written last.
    reload: Mutex<()>,
}

impl WordBank {
    pub fn new(store: Arc<dyn WordStore>) -> Self {
        Self {
            store,
            known: RwLock::new(KnownWords::new()),
            reload: Mutex::new(()),
        }
    }

    /// Build a bank and fill the cache from storage.
    pub async fn load(store: Arc<dyn WordStore>) -> Result<Self, VocabError> {
        let bank = Self::new(store);
        bank.refresh().await?;
        Ok(bank)
    }

    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize, VocabError> {
        let _reload = self.reload.lock().await;
        let known = self.store.load_known_words(LANGUAGE_CODE).await?;
        let count = known.len();
        *self.known.write().await = known;
        info!("Known words refreshed: {}", count);
        Ok(count)
    }

    pub async fn known_words(&self) -> KnownWords {
        self.known.read().await.clone()
    }

    pub async fn contains(&self, word: &str) -> bool {
        self.known.read().await.contains(word)
    }

    /// Flag each extracted word against the cached vocabulary.
    pub async fn reconcile<S: AsRef<str>>(&self, words: &[S]) -> SelectionSet {
        let known = self.known.read().await;
        SelectionSet::from_extracted(words, &known)
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<WordPage, VocabError> {
        let query = WordQuery::new(query, page.max(1), PAGE_SIZE);
        Ok(self.store.search(&query).await?)
    }

    /// Insert `words` as untranslated Polish entries, then refresh the cache.
    ///
    /// An empty batch fails without reaching storage.
    #[instrument(skip_all, fields(count = words.len()))]
    pub async fn insert_words(&self, words: &[String]) -> Result<Vec<Word>, VocabError> {
        if words.is_empty() {
            return Err(VocabError::EmptyBatch);
        }

        let batch: Vec<NewWord> = words
            .iter()
            .map(|word| NewWord::untranslated(word.as_str(), LANGUAGE_CODE))
            .collect();
        let inserted = self.store.insert_words(&batch).await?;
        info!("Saved {} words", inserted.len());

        self.refresh().await?;
        Ok(inserted)
    }

    /// Save the selected, not-yet-stored entries of `selections`.
    pub async fn save_selected(&self, selections: &SelectionSet) -> Result<Vec<Word>, VocabError> {
        let words = selections.savable()?;
        self.insert_words(&words).await
    }
}
