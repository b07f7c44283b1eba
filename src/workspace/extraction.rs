use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    ai::{LanguageLevel, VocabularyAi, WordExtraction},
    auth::Session,
    error::VocabError,
    selection::SelectionSet,
    validation::{self, ValidationResult, WordCount},
    vocabulary::WordBank,
};

/// Raises a flag for the lifetime of an operation, including when the
/// operation's future is dropped mid-flight.
struct BusyFlag<'a>(&'a mut bool);

impl<'a> BusyFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// State behind the extraction screen: the text being edited, its live
/// validation, the chosen level, and the selectable words of the last
/// extraction.
pub struct ExtractionWorkspace {
    ai: Arc<dyn VocabularyAi>,
    bank: Arc<WordBank>,
    session: Option<Session>,
    text: String,
    validation: ValidationResult,
    word_count: WordCount,
    level: Option<LanguageLevel>,
    extraction: Option<WordExtraction>,
    selections: SelectionSet,
    loading: bool,
    saving: bool,
    last_error: Option<VocabError>,
    save_succeeded: bool,
}

impl ExtractionWorkspace {
    pub fn new(ai: Arc<dyn VocabularyAi>, bank: Arc<WordBank>, session: Option<Session>) -> Self {
        Self {
            ai,
            bank,
            session,
            validation: validation::validate(""),
            word_count: validation::word_count(""),
            text: String::new(),
            level: None,
            extraction: None,
            selections: SelectionSet::default(),
            loading: false,
            saving: false,
            last_error: None,
            save_succeeded: false,
        }
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    /// Replace the text and revalidate it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.validation = validation::validate(&self.text);
        self.word_count = validation::word_count(&self.text);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn word_count(&self) -> WordCount {
        self.word_count
    }

    pub fn set_level(&mut self, level: LanguageLevel) {
        self.level = Some(level);
    }

    pub fn level(&self) -> Option<LanguageLevel> {
        self.level
    }

    pub fn can_extract(&self) -> bool {
        self.level.is_some() && self.validation.is_valid() && !self.loading
    }

    pub fn extraction(&self) -> Option<&WordExtraction> {
        self.extraction.as_ref()
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn last_error(&self) -> Option<&VocabError> {
        self.last_error.as_ref()
    }

    pub fn save_succeeded(&self) -> bool {
        self.save_succeeded
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, VocabError> {
        self.save_succeeded = false;
        Ok(self.selections.toggle(index)?)
    }

    pub fn select_all_new(&mut self) -> usize {
        self.save_succeeded = false;
        self.selections.select_all_new()
    }

    pub fn can_save(&self) -> bool {
        self.selections.can_save() && !self.saving
    }

    /// Validate, extract with the AI service, and reconcile the result.
    ///
    /// Nothing is sent when the level is missing or the text is invalid.
    #[instrument(skip(self), fields(level = ?self.level))]
    pub async fn extract(&mut self) -> Result<&SelectionSet, VocabError> {
        self.last_error = None;
        self.save_succeeded = false;

        let Some(level) = self.level else {
            let err = VocabError::Validation(vec!["Language level is required".to_string()]);
            self.last_error = Some(err.clone());
            return Err(err);
        };
        if !self.validation.is_valid() {
            let err = VocabError::Validation(self.validation.messages());
            self.last_error = Some(err.clone());
            return Err(err);
        }

        let _busy = BusyFlag::raise(&mut self.loading);
        let result = self
            .ai
            .extract_words(self.session.clone(), &self.text, level)
            .await;

        match result {
            Ok(extraction) => {
                self.selections = self.bank.reconcile(extraction.words.as_slice()).await;
                info!(words = self.selections.len(), "Extraction ready");
                self.extraction = Some(extraction);
                Ok(&self.selections)
            }
            Err(e) => {
                let err = VocabError::from(e);
                warn!("Extraction failed: {}", err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Persist the selected new words. On success every selection is cleared
    /// and the list is re-flagged against the refreshed vocabulary.
    #[instrument(skip(self), fields(selected = self.selections.selected_count()))]
    pub async fn save(&mut self) -> Result<usize, VocabError> {
        self.last_error = None;
        self.save_succeeded = false;

        let _busy = BusyFlag::raise(&mut self.saving);
        match self.bank.save_selected(&self.selections).await {
            Ok(saved) => {
                self.selections = match &self.extraction {
                    Some(extraction) => self.bank.reconcile(extraction.words.as_slice()).await,
                    None => SelectionSet::default(),
                };
                self.selections.reset();
                self.save_succeeded = true;
                info!(saved = saved.len(), "Selection saved");
                Ok(saved.len())
            }
            Err(err) => {
                warn!("Save failed: {}", err);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ai::{AiError, MockVocabularyAi, RandomPhrase},
        entities::Word,
        repositories::MockWordStore,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;
    use uuid::Uuid;

    const POLISH_TEXT: &str = "Kot śpi na oknie, a pies je obiad";

    fn extraction(words: &[&str]) -> WordExtraction {
        WordExtraction {
            words: words.iter().map(|w| w.to_string()).collect(),
            total_words: 8,
            language_level: "A2".to_string(),
            analysis: String::new(),
        }
    }

    fn stored(word: &str) -> Word {
        Word {
            id: Uuid::new_v4(),
            word: word.to_string(),
            language_code: "pl".to_string(),
            translated_word: None,
            created_at: Utc::now(),
        }
    }

    async fn bank_with(store: MockWordStore) -> Arc<WordBank> {
        Arc::new(WordBank::load(Arc::new(store)).await.unwrap())
    }

    fn known_store(words: &'static [&'static str]) -> MockWordStore {
        let mut store = MockWordStore::new();
        store
            .expect_load_known_words()
            .times(1)
            .returning(move |_| Ok(words.iter().collect()));
        store
    }

    fn session() -> Option<Session> {
        Some(Session::new("token-123"))
    }

    #[tokio::test]
    async fn test_set_text_revalidates() {
        let bank = bank_with(known_store(&[])).await;
        let mut ws = ExtractionWorkspace::new(Arc::new(MockVocabularyAi::new()), bank, session());

        assert!(!ws.validation().is_valid());
        ws.set_text(POLISH_TEXT);
        assert!(ws.validation().is_valid());
        assert_eq!(ws.word_count().current, 8);
        assert!(!ws.can_extract());

        ws.set_level(LanguageLevel::A2);
        assert!(ws.can_extract());
    }

    #[tokio::test]
    async fn test_extract_requires_level_and_valid_text() {
        let mut ai = MockVocabularyAi::new();
        ai.expect_extract_words().times(0);
        let bank = bank_with(known_store(&[])).await;
        let mut ws = ExtractionWorkspace::new(Arc::new(ai), bank, session());

        ws.set_text(POLISH_TEXT);
        assert!(matches!(ws.extract().await, Err(VocabError::Validation(_))));

        ws.set_level(LanguageLevel::B1);
        ws.set_text("Hello there my friend");
        let err = ws.extract().await.unwrap_err();
        assert_eq!(err, VocabError::Validation(vec!["Text must be in Polish".to_string()]));
        assert_eq!(ws.last_error(), Some(&err));
    }

    #[tokio::test]
    async fn test_extract_flags_known_words() {
        let mut ai = MockVocabularyAi::new();
        ai.expect_extract_words()
            .times(1)
            .returning(|_, _, _| Ok(extraction(&["kot", "pies", "obiad"])));
        let bank = bank_with(known_store(&["Pies"])).await;
        let mut ws = ExtractionWorkspace::new(Arc::new(ai), bank, session());
        ws.set_text(POLISH_TEXT);
        ws.set_level(LanguageLevel::A2);

        let selections = ws.extract().await.unwrap();
        let flags: Vec<_> = selections.items().iter().map(|s| s.exists_in_db).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert!(!ws.is_loading());
        assert!(!ws.can_save());
    }

    #[tokio::test]
    async fn test_extract_records_unauthenticated() {
        let mut ai = MockVocabularyAi::new();
        ai.expect_extract_words().returning(|_, _, _| {
            Err(AiError::Unauthenticated {
                action: "extract words",
            })
        });
        let bank = bank_with(known_store(&[])).await;
        let mut ws = ExtractionWorkspace::new(Arc::new(ai), bank, None);
        ws.set_text(POLISH_TEXT);
        ws.set_level(LanguageLevel::A1);

        assert!(ws.extract().await.is_err());
        assert_eq!(
            ws.last_error(),
            Some(&VocabError::Unauthenticated {
                action: "extract words"
            })
        );
        assert!(!ws.is_loading());
    }

    #[tokio::test]
    async fn test_save_persists_and_resets() {
        let mut ai = MockVocabularyAi::new();
        ai.expect_extract_words()
            .returning(|_, _, _| Ok(extraction(&["kot", "pies", "obiad"])));

        let mut store = known_store(&["pies"]);
        store
            .expect_insert_words()
            .withf(|batch| batch.iter().map(|w| w.word.as_str()).eq(["kot", "obiad"]))
            .times(1)
            .returning(|batch| Ok(batch.iter().map(|w| stored(&w.word)).collect()));
        store
            .expect_load_known_words()
            .times(1)
            .returning(|_| Ok(["pies", "kot", "obiad"].iter().collect()));

        let bank = bank_with(store).await;
        let mut ws = ExtractionWorkspace::new(Arc::new(ai), bank, session());
        ws.set_text(POLISH_TEXT);
        ws.set_level(LanguageLevel::A2);
        ws.extract().await.unwrap();

        assert_eq!(ws.select_all_new(), 2);
        assert!(ws.can_save());
        assert_eq!(ws.save().await.unwrap(), 2);

        assert!(ws.save_succeeded());
        assert!(!ws.is_saving());
        assert_eq!(ws.selections().selected_count(), 0);
        assert!(ws.selections().items().iter().all(|s| s.exists_in_db));
    }

    #[tokio::test]
    async fn test_save_without_selection_is_empty_batch() {
        let mut store = known_store(&[]);
        store.expect_insert_words().times(0);
        let bank = bank_with(store).await;
        let mut ws = ExtractionWorkspace::new(Arc::new(MockVocabularyAi::new()), bank, session());

        assert_eq!(ws.save().await, Err(VocabError::EmptyBatch));
        assert_eq!(ws.last_error(), Some(&VocabError::EmptyBatch));
        assert!(!ws.save_succeeded());
    }

    struct HangingAi;

    #[async_trait]
    impl VocabularyAi for HangingAi {
        async fn extract_words(
            &self,
            _session: Option<Session>,
            _text: &str,
            _level: LanguageLevel,
        ) -> Result<WordExtraction, AiError> {
            std::future::pending().await
        }

        async fn generate_phrase(
            &self,
            _session: Option<Session>,
            _words: &[String],
        ) -> Result<RandomPhrase, AiError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_extract_clears_loading() {
        let bank = bank_with(known_store(&[])).await;
        let mut ws = ExtractionWorkspace::new(Arc::new(HangingAi), bank, session());
        ws.set_text(POLISH_TEXT);
        ws.set_level(LanguageLevel::C2);

        let outcome = tokio::time::timeout(Duration::from_secs(5), ws.extract()).await;
        assert!(outcome.is_err());
        assert!(!ws.is_loading());
        assert!(ws.can_extract());
    }
}
