//! Correction Providers
//!
//! Defines the provider trait and implementations for the correction engines.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::types::{CorrectionEngine, CorrectionError};
use crate::config::{LanguageToolConfig, OllamaConfig};
use crate::spelling::SpellChecker;

/// Correction provider trait
#[async_trait]
pub trait CorrectionProvider: Send + Sync {
    /// Get the engine type
    fn engine(&self) -> CorrectionEngine;

    /// Whether `correct` may run concurrently with itself
    fn is_reentrant(&self) -> bool {
        true
    }

    /// Check if the engine can serve requests
    async fn is_available(&self) -> bool;

    /// Correct grammar and spelling of `text`
    async fn correct(&self, text: &str) -> Result<String, CorrectionError>;
}

/// Run CPU-bound correction work on the blocking pool.
///
/// Keeps async workers free and lets the service's timeout fire while the
/// work is still running.
pub(crate) async fn run_blocking<F, T>(work: F) -> Result<T, CorrectionError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CorrectionError::Task(e.to_string()))
}

/// Embedded dictionary spellchecker
pub struct DictionaryProvider {
    checker: Arc<SpellChecker>,
}

impl DictionaryProvider {
    pub fn new(checker: Arc<SpellChecker>) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl CorrectionProvider for DictionaryProvider {
    fn engine(&self) -> CorrectionEngine {
        CorrectionEngine::Dictionary
    }

    async fn is_available(&self) -> bool {
        !self.checker.is_empty()
    }

    async fn correct(&self, text: &str) -> Result<String, CorrectionError> {
        let checker = Arc::clone(&self.checker);
        let text = text.to_string();
        run_blocking(move || checker.correct_text(&text)).await
    }
}

const OLLAMA_PROMPT: &str = "Correct the grammar and spelling of the following text. \
Keep its meaning, wording and paragraph breaks wherever they are already correct. \
Return only the corrected text, nothing else.";

/// Neural corrector served by an Ollama runtime
pub struct OllamaProvider {
    client: reqwest::Client,
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llama3", "mistral")
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(&config.url, &config.model)
    }

    fn has_model(&self, tags: &serde_json::Value) -> bool {
        let tagged = format!("{}:", self.model);
        tags["models"]
            .as_array()
            .map(|models| {
                models.iter().filter_map(|m| m["name"].as_str()).any(|name| {
                    name == self.model || name.starts_with(&tagged)
                })
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl CorrectionProvider for OllamaProvider {
    fn engine(&self) -> CorrectionEngine {
        CorrectionEngine::Ollama
    }

    // One local model; generations are queued one at a time.
    fn is_reentrant(&self) -> bool {
        false
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            _ => return false,
        };

        match response.json::<serde_json::Value>().await {
            Ok(tags) => self.has_model(&tags),
            Err(_) => false,
        }
    }

    async fn correct(&self, text: &str) -> Result<String, CorrectionError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = serde_json::json!({
            "model": self.model,
            "system": OLLAMA_PROMPT,
            "prompt": text,
            "stream": false,
            "options": { "temperature": 0 }
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CorrectionError::Request(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CorrectionError::Request(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CorrectionError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        result["response"]
            .as_str()
            .map(|corrected| corrected.trim().to_string())
            .ok_or_else(|| CorrectionError::InvalidResponse("missing `response` field".to_string()))
    }
}

/// Networked LanguageTool-compatible checking service
pub struct LanguageToolProvider {
    client: reqwest::Client,
    base_url: String,
    username: Option<String>,
    api_key: String,
    language: String,
}

/// Response of the `/check` endpoint
#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RuleMatch>,
}

/// A single reported problem. Offsets count UTF-16 code units.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleMatch {
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Replacement {
    pub value: String,
}

impl LanguageToolProvider {
    pub fn from_config(config: &LanguageToolConfig) -> Result<Self, CorrectionError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| CorrectionError::NotReady("LanguageTool API key is not configured".to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            api_key,
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl CorrectionProvider for LanguageToolProvider {
    fn engine(&self) -> CorrectionEngine {
        CorrectionEngine::LanguageTool
    }

    /// Checked once at startup. An unreachable service is only logged; requests
    /// report the service as unavailable while it stays unreachable.
    async fn is_available(&self) -> bool {
        let url = format!("{}/languages", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn correct(&self, text: &str) -> Result<String, CorrectionError> {
        let url = format!("{}/check", self.base_url);

        let mut form = vec![
            ("text", text),
            ("language", self.language.as_str()),
            ("apiKey", self.api_key.as_str()),
        ];
        if let Some(username) = &self.username {
            form.push(("username", username.as_str()));
        }

        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| CorrectionError::Request(format!("Failed to call LanguageTool: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CorrectionError::Request(format!(
                "LanguageTool returned {}: {}",
                status, body
            )));
        }

        let result: CheckResponse = response
            .json()
            .await
            .map_err(|e| CorrectionError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(apply_matches(text, &result.matches))
    }
}

/// Apply the first replacement of every match to `text`.
///
/// Matches without replacements are ignored; a match overlapping an earlier
/// accepted one, or reaching past the end of the text, is skipped.
pub fn apply_matches(text: &str, matches: &[RuleMatch]) -> String {
    let mut units: Vec<u16> = text.encode_utf16().collect();

    let mut candidates: Vec<&RuleMatch> = matches
        .iter()
        .filter(|m| !m.replacements.is_empty())
        .collect();
    candidates.sort_by_key(|m| m.offset);

    let mut accepted: Vec<(usize, usize, &str)> = Vec::new();
    let mut covered_to = 0;
    for m in candidates {
        let end = match m.offset.checked_add(m.length) {
            Some(end) if m.offset >= covered_to && end <= units.len() => end,
            _ => continue,
        };
        accepted.push((m.offset, end, m.replacements[0].value.as_str()));
        covered_to = end;
    }

    for (start, end, value) in accepted.into_iter().rev() {
        units.splice(start..end, value.encode_utf16());
    }

    String::from_utf16_lossy(&units)
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub prefix: String,
    pub available: bool,
    pub reentrant: bool,
    pub delay: std::time::Duration,
}

#[cfg(test)]
#[async_trait]
impl CorrectionProvider for MockProvider {
    fn engine(&self) -> CorrectionEngine {
        CorrectionEngine::Ollama
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn correct(&self, text: &str) -> Result<String, CorrectionError> {
        tokio::time::sleep(self.delay).await;
        Ok(format!("{}{}", self.prefix, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(offset: usize, length: usize, replacements: &[&str]) -> RuleMatch {
        RuleMatch {
            offset,
            length,
            replacements: replacements
                .iter()
                .map(|value| Replacement { value: value.to_string() })
                .collect(),
        }
    }

    #[test]
    fn test_apply_matches_uses_first_replacement() {
        let text = "Me and him goes to market.";
        let matches = vec![
            rule(0, 10, &["He and I", "Him and me"]),
            rule(11, 4, &["go"]),
        ];
        assert_eq!(apply_matches(text, &matches), "He and I go to market.");
    }

    #[test]
    fn test_apply_matches_is_order_independent() {
        let text = "teh cat sat";
        let forward = vec![rule(0, 3, &["the"]), rule(8, 3, &["sits"])];
        let backward = vec![rule(8, 3, &["sits"]), rule(0, 3, &["the"])];
        assert_eq!(apply_matches(text, &forward), "the cat sits");
        assert_eq!(apply_matches(text, &backward), "the cat sits");
    }

    #[test]
    fn test_apply_matches_skips_overlaps_and_empty_suggestions() {
        let text = "a b c";
        let matches = vec![
            rule(0, 3, &["x"]),
            rule(2, 3, &["y"]),
            rule(4, 1, &[]),
            rule(4, 10, &["out of range"]),
        ];
        assert_eq!(apply_matches(text, &matches), "x c");
    }

    #[test]
    fn test_apply_matches_skips_overflowing_offsets() {
        let text = "teh end";
        let matches = vec![rule(usize::MAX, 2, &["boom"]), rule(0, 3, &["the"])];
        assert_eq!(apply_matches(text, &matches), "the end");
    }

    #[test]
    fn test_apply_matches_counts_utf16_units() {
        // The emoji is two UTF-16 units
        let text = "\u{1F600} teh end";
        let matches = vec![rule(3, 3, &["the"])];
        assert_eq!(apply_matches(text, &matches), "\u{1F600} the end");
    }

    #[test]
    fn test_ollama_model_matching() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama3");
        assert_eq!(provider.base_url, "http://localhost:11434");

        let tags = serde_json::json!({
            "models": [{ "name": "mistral:latest" }, { "name": "llama3:8b" }]
        });
        assert!(provider.has_model(&tags));
        assert!(!provider.has_model(&serde_json::json!({ "models": [{ "name": "llama3.1:8b" }] })));
        assert!(!provider.has_model(&serde_json::json!({})));
    }

    #[tokio::test]
    async fn test_dictionary_provider_corrects_with_checker() {
        let checker = Arc::new(SpellChecker::from_words(["the", "cat", "sat"]));
        let provider = DictionaryProvider::new(checker);
        assert!(provider.is_available().await);
        assert!(provider.is_reentrant());
        assert_eq!(provider.correct("Teh cat sat.").await.unwrap(), "The cat sat.");
    }

    #[tokio::test]
    async fn test_run_blocking_returns_work_result() {
        let value = run_blocking(|| 6 * 7).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_run_blocking_reports_panicked_work() {
        let result = run_blocking::<_, ()>(|| panic!("checker crashed")).await;
        assert!(matches!(result, Err(CorrectionError::Task(_))));
    }

    #[test]
    fn test_languagetool_requires_key() {
        let config = LanguageToolConfig {
            url: "https://api.languagetoolplus.com/v2".to_string(),
            username: None,
            api_key: None,
            language: "en-US".to_string(),
        };
        assert!(matches!(
            LanguageToolProvider::from_config(&config),
            Err(CorrectionError::NotReady(_))
        ));
    }
}
