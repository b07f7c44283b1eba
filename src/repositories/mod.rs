pub mod words;

pub use words::{StoreError, WordPage, WordQuery, WordRepository, WordStore};

#[cfg(test)]
pub use words::MockWordStore;
