//! Reconciles freshly extracted words against the vocabulary already stored.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no words selected for saving")]
    EmptyBatch,

    #[error("\"{0}\" is already in the vocabulary")]
    AlreadyStored(String),

    #[error("no word at position {0}")]
    OutOfRange(usize),
}

/// Lower-cased membership set of stored words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownWords(HashSet<String>);

impl KnownWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(&word.to_lowercase())
    }

    pub fn insert(&mut self, word: &str) -> bool {
        self.0.insert(word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KnownWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WordSelection {
    pub word: String,
    pub selected: bool,
    pub exists_in_db: bool,
}

impl WordSelection {
    fn is_savable(&self) -> bool {
        self.selected && !self.exists_in_db
    }
}

/// One unselected entry per extracted word. Order and duplicates are kept.
pub fn create_selections<S: AsRef<str>>(words: &[S], known: &KnownWords) -> Vec<WordSelection> {
    words
        .iter()
        .map(|word| {
            let word = word.as_ref();
            WordSelection {
                word: word.to_string(),
                selected: false,
                exists_in_db: known.contains(word),
            }
        })
        .collect()
}

/// Words that are selected and not yet stored.
pub fn filter_savable(selections: &[WordSelection]) -> Result<Vec<String>, SelectionError> {
    let words: Vec<String> = selections
        .iter()
        .filter(|selection| selection.is_savable())
        .map(|selection| selection.word.clone())
        .collect();

    if words.is_empty() {
        return Err(SelectionError::EmptyBatch);
    }

    Ok(words)
}

/// The interactive list shown after an extraction.
///
/// Entries already stored can never become selected through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    items: Vec<WordSelection>,
}

impl SelectionSet {
    pub fn from_extracted<S: AsRef<str>>(words: &[S], known: &KnownWords) -> Self {
        Self {
            items: create_selections(words, known),
        }
    }

    pub fn items(&self) -> &[WordSelection] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Flip the entry at `index`, returning its new state.
    pub fn toggle(&mut self, index: usize) -> Result<bool, SelectionError> {
        let selected = !self.get(index)?.selected;
        self.set_selected(index, selected)?;
        Ok(selected)
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<(), SelectionError> {
        let item = self
            .items
            .get_mut(index)
            .ok_or(SelectionError::OutOfRange(index))?;

        if selected && item.exists_in_db {
            return Err(SelectionError::AlreadyStored(item.word.clone()));
        }

        item.selected = selected;
        Ok(())
    }

    /// Select every entry that is not stored yet; returns how many are selected.
    pub fn select_all_new(&mut self) -> usize {
        for item in self.items.iter_mut().filter(|item| !item.exists_in_db) {
            item.selected = true;
        }
        self.selected_count()
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|item| item.selected).count()
    }

    pub fn can_save(&self) -> bool {
        self.selected_count() > 0
    }

    pub fn savable(&self) -> Result<Vec<String>, SelectionError> {
        filter_savable(&self.items)
    }

    /// Clear every selection; called after a successful save.
    pub fn reset(&mut self) {
        for item in &mut self.items {
            item.selected = false;
        }
    }

    fn get(&self, index: usize) -> Result<&WordSelection, SelectionError> {
        self.items
            .get(index)
            .ok_or(SelectionError::OutOfRange(index))
    }
}
