//! Correction Types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Correction engine selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionEngine {
    /// Embedded dictionary spellchecker
    Dictionary,
    /// Neural corrector served by a local Ollama runtime
    Ollama,
    /// Networked LanguageTool-compatible service
    LanguageTool,
}

impl Default for CorrectionEngine {
    fn default() -> Self {
        Self::Dictionary
    }
}

impl CorrectionEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Ollama => "ollama",
            Self::LanguageTool => "languagetool",
        }
    }

    /// Embedded engines must be ready before the server accepts requests;
    /// networked engines fail per request instead.
    pub fn is_embedded(&self) -> bool {
        !matches!(self, Self::LanguageTool)
    }
}

impl fmt::Display for CorrectionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dictionary" | "spellchecker" => Ok(Self::Dictionary),
            "ollama" => Ok(Self::Ollama),
            "languagetool" => Ok(Self::LanguageTool),
            other => Err(format!("unknown correction engine: {}", other)),
        }
    }
}

/// Correction errors. All of them mean the engine could not produce a result.
#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("Correction engine not ready: {0}")]
    NotReady(String),

    #[error("Correction request failed: {0}")]
    Request(String),

    #[error("Invalid response from correction engine: {0}")]
    InvalidResponse(String),

    #[error("Correction timed out after {0} seconds")]
    Timeout(u64),

    #[error("Correction task failed: {0}")]
    Task(String),

    #[error("Dictionary error: {0}")]
    Dictionary(#[from] crate::spelling::DictionaryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_names_round_trip() {
        for engine in [
            CorrectionEngine::Dictionary,
            CorrectionEngine::Ollama,
            CorrectionEngine::LanguageTool,
        ] {
            assert_eq!(engine.as_str().parse::<CorrectionEngine>(), Ok(engine));
        }
        assert_eq!(" LanguageTool ".parse(), Ok(CorrectionEngine::LanguageTool));
        assert!("gramformer".parse::<CorrectionEngine>().is_err());
    }

    #[test]
    fn test_only_networked_engine_is_not_embedded() {
        assert!(CorrectionEngine::Dictionary.is_embedded());
        assert!(CorrectionEngine::Ollama.is_embedded());
        assert!(!CorrectionEngine::LanguageTool.is_embedded());
    }
}
