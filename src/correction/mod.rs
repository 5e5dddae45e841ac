//! Correction Module
//!
//! Maps raw essay text to a corrected version through one of several
//! interchangeable engines:
//! - `dictionary`: embedded spellchecker built on a word list
//! - `ollama`: neural corrector served by a local Ollama runtime
//! - `languagetool`: networked grammar checking service (API key required)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use essay_desk::correction::CorrectionService;
//!
//! let service = CorrectionService::start(&config.correction, checker).await?;
//! let corrected = service.correct("Me and him goes to market.").await?;
//! service.shutdown().await;
//! ```

mod provider;
mod service;
mod types;

pub use provider::{
    apply_matches, CorrectionProvider, DictionaryProvider, LanguageToolProvider, OllamaProvider,
    Replacement, RuleMatch,
};
pub use service::CorrectionService;
pub use types::{CorrectionEngine, CorrectionError};
