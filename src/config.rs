//! Configuration management for Essay Desk

use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::correction::CorrectionEngine;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Unknown correction engine: {0}")]
    UnknownEngine(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub correction: CorrectionConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct CorrectionConfig {
    pub engine: CorrectionEngine,
    pub timeout_secs: u64,
    pub dictionary_path: PathBuf,
    pub ollama: OllamaConfig,
    pub languagetool: LanguageToolConfig,
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

#[derive(Clone)]
pub struct LanguageToolConfig {
    pub url: String,
    pub username: Option<String>,
    pub api_key: Option<String>,
    pub language: String,
}

// Keeps the API key out of startup logs.
impl fmt::Debug for LanguageToolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageToolConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("language", &self.language)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub render_timeout_secs: u64,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite:./essays.db";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DICTIONARY_PATH: &str = "data/words.txt";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_LANGUAGETOOL_URL: &str = "https://api.languagetoolplus.com/v2";
const DEFAULT_LANGUAGETOOL_LANGUAGE: &str = "en-US";

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
            },
            correction: CorrectionConfig {
                engine: CorrectionEngine::Dictionary,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                dictionary_path: PathBuf::from(DEFAULT_DICTIONARY_PATH),
                ollama: OllamaConfig {
                    url: DEFAULT_OLLAMA_URL.to_string(),
                    model: DEFAULT_OLLAMA_MODEL.to_string(),
                },
                languagetool: LanguageToolConfig {
                    url: DEFAULT_LANGUAGETOOL_URL.to_string(),
                    username: None,
                    api_key: None,
                    language: DEFAULT_LANGUAGETOOL_LANGUAGE.to_string(),
                },
            },
            export: ExportConfig {
                render_timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// Fails when the selected engine needs a key that is not present, so a
    /// misconfigured process never starts serving.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let engine = match lookup("CORRECTION_ENGINE") {
            Some(name) => name
                .parse::<CorrectionEngine>()
                .map_err(|_| ConfigError::UnknownEngine(name))?,
            None => CorrectionEngine::Dictionary,
        };

        let api_key = lookup("LANGUAGETOOL_API_KEY").filter(|key| !key.trim().is_empty());
        if engine == CorrectionEngine::LanguageTool && api_key.is_none() {
            return Err(ConfigError::MissingVar("LANGUAGETOOL_API_KEY"));
        }

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST", DEFAULT_HOST),
                port: parse_number(&lookup, "SERVER_PORT", DEFAULT_PORT)?,
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL", DEFAULT_DATABASE_URL),
            },
            correction: CorrectionConfig {
                engine,
                timeout_secs: parse_number(&lookup, "CORRECTION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
                dictionary_path: PathBuf::from(var("DICTIONARY_PATH", DEFAULT_DICTIONARY_PATH)),
                ollama: OllamaConfig {
                    url: var("OLLAMA_URL", DEFAULT_OLLAMA_URL),
                    model: var("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
                },
                languagetool: LanguageToolConfig {
                    url: var("LANGUAGETOOL_URL", DEFAULT_LANGUAGETOOL_URL),
                    username: lookup("LANGUAGETOOL_USERNAME"),
                    api_key,
                    language: var("LANGUAGETOOL_LANGUAGE", DEFAULT_LANGUAGETOOL_LANGUAGE),
                },
            },
            export: ExportConfig {
                render_timeout_secs: parse_number(&lookup, "PDF_RENDER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
        })
    }
}

fn parse_number<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}
