//! Dictionary spell checker
//!
//! Known words come from a word list with optional frequencies. Unknown words
//! are corrected to the most frequent known word at the smallest edit
//! distance (at most two), found through a SymSpell delete index.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use symspell::{SymSpell, UnicodeStringStrategy, Verbosity};

use super::tokens::tokenize;
use super::DictionaryError;

/// Must not exceed the index's dictionary edit distance (2 by default)
const MAX_EDIT_DISTANCE: i64 = 2;

/// A distinct misspelled word and how often it occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Misspelling {
    pub word: String,
    pub count: usize,
    pub suggestion: Option<String>,
}

/// Frequency-ranked word dictionary
pub struct SpellChecker {
    words: HashMap<String, u64>,
    index: SymSpell<UnicodeStringStrategy>,
}

impl fmt::Debug for SpellChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpellChecker")
            .field("words", &self.words.len())
            .finish()
    }
}

impl SpellChecker {
    /// Load a word list from disk
    pub async fn load(path: &Path) -> Result<Self, DictionaryError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DictionaryError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        // Building the delete index is CPU-bound
        let checker = tokio::task::spawn_blocking(move || Self::parse(&contents))
            .await
            .map_err(|e| DictionaryError::Index(e.to_string()))??;

        tracing::info!(
            "Loaded {} dictionary words from {}",
            checker.len(),
            path.display()
        );
        Ok(checker)
    }

    /// Parse a word list: one `word` or `word count` per line, `#` comments.
    pub fn parse(contents: &str) -> Result<Self, DictionaryError> {
        let mut words: HashMap<String, u64> = HashMap::new();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let word = match fields.next() {
                Some(word) => normalize(word),
                None => continue,
            };
            let count = match fields.next() {
                Some(raw) => raw.parse::<u64>().map_err(|_| DictionaryError::InvalidLine {
                    line: index + 1,
                    content: line.to_string(),
                })?,
                None => 1,
            };

            let entry = words.entry(word).or_insert(0);
            *entry = entry.saturating_add(count);
        }

        if words.is_empty() {
            return Err(DictionaryError::Empty);
        }

        Ok(Self::with_words(words))
    }

    /// Build a dictionary where every word has frequency 1
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_counts(words.into_iter().map(|w| (w, 1)))
    }

    /// Build a dictionary from `(word, frequency)` pairs. Blank entries and
    /// entries with inner whitespace are ignored.
    pub fn from_counts<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut words = HashMap::new();
        for (word, count) in entries {
            let word = word.as_ref().trim();
            if word.is_empty() || word.contains(char::is_whitespace) {
                continue;
            }
            let entry = words.entry(normalize(word)).or_insert(0u64);
            *entry = entry.saturating_add(count);
        }
        Self::with_words(words)
    }

    fn with_words(words: HashMap<String, u64>) -> Self {
        let mut index: SymSpell<UnicodeStringStrategy> = SymSpell::default();
        for (word, count) in &words {
            if *count == 0 {
                continue;
            }
            let count = (*count).min(i64::MAX as u64);
            index.load_dictionary_line(&format!("{} {}", word, count), 0, 1, " ");
        }
        Self { words, index }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Case-insensitive dictionary lookup
    pub fn is_known(&self, word: &str) -> bool {
        self.words.contains_key(&normalize(word))
    }

    /// Best dictionary replacement for a word, lowercased.
    ///
    /// Known words suggest themselves. `None` when nothing is within two edits.
    pub fn suggest(&self, word: &str) -> Option<String> {
        let word = normalize(word);
        if self.words.contains_key(&word) {
            return Some(word);
        }

        self.index
            .lookup(&word, Verbosity::Top, MAX_EDIT_DISTANCE)
            .into_iter()
            .next()
            .map(|suggestion| suggestion.term)
    }

    /// Correct a single token, keeping its capitalisation pattern
    pub fn correct_word(&self, token: &str) -> String {
        if self.is_known(token) {
            return token.to_string();
        }
        match self.suggest(token) {
            Some(suggestion) => match_case(token, &suggestion),
            None => token.to_string(),
        }
    }

    /// Correct every word of `text`, leaving everything between words intact
    pub fn correct_text(&self, text: &str) -> String {
        let mut corrected = String::with_capacity(text.len());
        let mut last = 0;

        for token in tokenize(text) {
            corrected.push_str(&text[last..token.start]);
            if token.has_digit() {
                corrected.push_str(token.text);
            } else {
                corrected.push_str(&self.correct_word(token.text));
            }
            last = token.end;
        }
        corrected.push_str(&text[last..]);

        corrected
    }

    /// Distinct unknown words of `text`, most frequent first.
    ///
    /// Ties keep the order in which the words first appear.
    pub fn misspellings(&self, text: &str) -> Vec<Misspelling> {
        let mut first_seen: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for token in tokenize(text) {
            if token.has_digit() {
                continue;
            }
            let word = normalize(token.text);
            if self.words.contains_key(&word) {
                continue;
            }

            let count = counts.entry(word.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(word);
            }
            *count += 1;
        }

        let mut ranked: Vec<Misspelling> = first_seen
            .into_iter()
            .map(|word| Misspelling {
                count: counts[&word],
                suggestion: self.suggest(&word),
                word,
            })
            .collect();

        // Stable sort
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

/// Dictionary key for a token: lowercase, typographic apostrophes folded
fn normalize(word: &str) -> String {
    word.to_lowercase().replace('\u{2019}', "'")
}

/// Apply the capitalisation of `template` to the lowercase `word`
fn match_case(template: &str, word: &str) -> String {
    let letters = template.chars().filter(|c| c.is_alphabetic()).count();
    let all_upper = letters > 1 && template.chars().all(|c| !c.is_lowercase());
    let first_upper = template.chars().next().is_some_and(char::is_uppercase);

    if all_upper {
        word.to_uppercase()
    } else if first_upper {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        word.to_string()
    }
}
