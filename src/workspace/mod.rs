//! Client-side controllers shared by the terminal studio.

pub mod browser;
pub mod debounce;
pub mod extraction;
pub mod sequence;

pub use browser::{BrowserState, WordBrowser};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use extraction::ExtractionWorkspace;
pub use sequence::{RequestSequence, Ticket};
