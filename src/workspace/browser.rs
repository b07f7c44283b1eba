//! Paginated, debounced browsing of the stored vocabulary.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::{
    entities::Word,
    vocabulary::{PAGE_SIZE, WordBank, total_pages},
    workspace::{
        debounce::{Debouncer, SEARCH_DEBOUNCE},
        sequence::RequestSequence,
    },
};

/// Snapshot published to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserState {
    pub query: String,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub rows: Vec<Word>,
    pub total_count: i64,
    pub total_pages: u32,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size: PAGE_SIZE,
            rows: Vec::new(),
            total_count: 0,
            total_pages: 0,
            loading: false,
            last_error: None,
        }
    }
}

struct BrowserInner {
    bank: Arc<WordBank>,
    state: watch::Sender<BrowserState>,
    sequence: RequestSequence,
}

impl BrowserInner {
    #[instrument(skip(self))]
    async fn fetch(&self) {
        let ticket = self.sequence.issue();
        let (query, page) = {
            let state = self.state.borrow();
            (state.query.clone(), state.page)
        };
        self.state.send_modify(|state| state.loading = true);

        let result = self.bank.search(&query, page).await;
        if !self.sequence.is_latest(ticket) {
            debug!(query = %query, page, "Discarding stale search result");
            return;
        }

        match result {
            Ok(found) => self.state.send_modify(|state| {
                state.total_pages = total_pages(found.total_count, state.page_size);
                state.total_count = found.total_count;
                state.rows = found.rows;
                state.loading = false;
                state.last_error = None;
            }),
            Err(e) => {
                warn!("Failed to load words: {}", e);
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.last_error = Some(e.to_string());
                });
            }
        }
    }
}

/// Vocabulary list controller.
///
/// Typing is debounced; page navigation and clearing fetch immediately. Only
/// the response to the most recent request is applied.
pub struct WordBrowser {
    inner: Arc<BrowserInner>,
    debouncer: Mutex<Debouncer>,
}

impl WordBrowser {
    pub fn new(bank: Arc<WordBank>) -> Self {
        Self::with_debounce(bank, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(bank: Arc<WordBank>, delay: Duration) -> Self {
        let (state, _) = watch::channel(BrowserState::default());
        Self {
            inner: Arc::new(BrowserInner {
                bank,
                state,
                sequence: RequestSequence::new(),
            }),
            debouncer: Mutex::new(Debouncer::new(delay)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowserState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> BrowserState {
        self.inner.state.borrow().clone()
    }

    /// Update the search text and schedule a fetch of page 1.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.inner.state.send_modify(|state| {
            state.query = query;
            state.page = 1;
        });

        let inner = self.inner.clone();
        self.debouncer().schedule(async move { inner.fetch().await });
    }

    /// Reset the search and fetch page 1 right away.
    pub async fn clear_search(&self) {
        self.debouncer().cancel();
        self.inner.state.send_modify(|state| {
            state.query.clear();
            state.page = 1;
        });
        self.inner.fetch().await;
    }

    pub async fn next_page(&self) -> u32 {
        let page = self.inner.state.borrow().page.saturating_add(1);
        self.go_to_page(page).await
    }

    pub async fn previous_page(&self) -> u32 {
        let page = self.inner.state.borrow().page.saturating_sub(1);
        self.go_to_page(page).await
    }

    /// Jump to `page`, clamped to the known range. Returns the page shown.
    pub async fn go_to_page(&self, page: u32) -> u32 {
        let (current, last) = {
            let state = self.inner.state.borrow();
            (state.page, state.total_pages.max(1))
        };
        let target = page.clamp(1, last);
        if target == current {
            return current;
        }

        self.inner.state.send_modify(|state| state.page = target);
        self.inner.fetch().await;
        target
    }

    /// Fetch the current query and page now.
    pub async fn refresh(&self) {
        self.inner.fetch().await;
    }

    fn debouncer(&self) -> MutexGuard<'_, Debouncer> {
        self.debouncer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
