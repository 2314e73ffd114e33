// Stopword set: words that carry no signal for similarity.
//
// Entries are lowercased on the way in, and lookups lowercase the probe,
// so membership is case-insensitive no matter how the source list was
// written. The set is filled once (from a file, the built-in English list,
// or explicit additions) and then handed to a Tokenizer, which only reads it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};
use tracing::debug;

/// A case-insensitive set of words to drop during tokenization.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// An empty set. Filters nothing until words are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The English list shipped with the `stop-words` crate.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words)
    }

    /// Build a set from any list of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for word in words {
            set.add(word.as_ref());
        }
        set
    }

    /// Load a stopword file: one word per line.
    ///
    /// Lines are trimmed; blank lines and lines starting with `#` are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Error reading stopword file {}", path.display()))?;

        let set = Self::from_words(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        );

        debug!(
            path = %path.display(),
            words = set.len(),
            "Loaded stopword list"
        );

        Ok(set)
    }

    /// Add one word. It is visible to `contains` immediately.
    pub fn add(&mut self, word: &str) {
        let word = word.trim();
        if word.is_empty() {
            return;
        }
        self.words.insert(word.to_lowercase());
    }

    /// Check whether `word` is a stopword. The empty string never is.
    pub fn contains(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
