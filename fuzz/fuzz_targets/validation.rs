#![no_main]

use libfuzzer_sys::fuzz_target;

use slowka::selection::{KnownWords, create_selections, filter_savable};
use slowka::validation::{self, MAX_WORDS};

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let text = String::from_utf8_lossy(data);

    // The validator should never panic regardless of input
    let report = validation::validate(&text);
    let count = validation::word_count(&text);
    assert_eq!(count.max, MAX_WORDS);
    if count.current > MAX_WORDS {
        assert!(!report.is_valid());
    }

    // Reconcile the tokens against a set built from half of them
    let words: Vec<&str> = validation::words(&text).collect();
    let known: KnownWords = words.iter().step_by(2).collect();
    let selections = create_selections(words.as_slice(), &known);
    assert_eq!(selections.len(), words.len());
    assert!(filter_savable(&selections).is_err());
});
