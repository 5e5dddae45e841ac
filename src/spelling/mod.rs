//! Spelling Module
//!
//! Dictionary-backed spell checking used by the `dictionary` correction
//! engine and by essay analysis.

mod checker;
mod tokens;

use std::path::PathBuf;

use thiserror::Error;

pub use checker::{Misspelling, SpellChecker};
pub use tokens::{tokenize, Token};

/// Dictionary loading errors
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dictionary line {line}: {content}")]
    InvalidLine { line: usize, content: String },

    #[error("Dictionary contains no words")]
    Empty,

    #[error("Failed to build dictionary index: {0}")]
    Index(String),
}
