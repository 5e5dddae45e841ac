//! Correction Service
//!
//! Owns the selected correction provider for the lifetime of the process.
//!
//! # Lifecycle
//!
//! 1. [`CorrectionService::start`] builds the configured provider and checks
//!    its availability once. A failed check aborts startup for embedded engines and is
//!    logged as a warning for networked ones.
//! 2. The service is stored in application state and shared by reference.
//! 3. [`CorrectionService::shutdown`] runs during graceful shutdown.
//!
//! Calls to providers that are not re-entrant are serialized behind an async
//! mutex, and every call is bounded by the configured timeout.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

use super::provider::{CorrectionProvider, DictionaryProvider, LanguageToolProvider, OllamaProvider};
use super::types::{CorrectionEngine, CorrectionError};
use crate::config::CorrectionConfig;
use crate::spelling::SpellChecker;

pub struct CorrectionService {
    provider: Arc<dyn CorrectionProvider>,
    /// Present only for providers that are not re-entrant
    gate: Option<Mutex<()>>,
    timeout_secs: u64,
}

impl CorrectionService {
    /// Build and initialise the configured engine
    pub async fn start(
        config: &CorrectionConfig,
        checker: Arc<SpellChecker>,
    ) -> Result<Self, CorrectionError> {
        let provider: Arc<dyn CorrectionProvider> = match config.engine {
            CorrectionEngine::Dictionary => Arc::new(DictionaryProvider::new(checker)),
            CorrectionEngine::Ollama => Arc::new(OllamaProvider::from_config(&config.ollama)),
            CorrectionEngine::LanguageTool => {
                Arc::new(LanguageToolProvider::from_config(&config.languagetool)?)
            }
        };

        tracing::info!("Initializing {} correction engine...", config.engine);

        let available = timeout(
            Duration::from_secs(config.timeout_secs),
            provider.is_available(),
        )
        .await
        .unwrap_or(false);

        if config.engine.is_embedded() {
            if !available {
                return Err(CorrectionError::NotReady(format!(
                    "{} engine failed to initialize",
                    config.engine
                )));
            }
            tracing::info!("{} correction engine loaded successfully", config.engine);
        } else if available {
            tracing::info!("{} correction engine is reachable", config.engine);
        } else {
            tracing::warn!(
                "{} correction engine is not reachable; corrections will fail until it is",
                config.engine
            );
        }

        Ok(Self::with_provider(provider, config.timeout_secs))
    }

    /// Wrap an already constructed provider
    pub fn with_provider(provider: Arc<dyn CorrectionProvider>, timeout_secs: u64) -> Self {
        let gate = if provider.is_reentrant() {
            None
        } else {
            Some(Mutex::new(()))
        };

        Self {
            provider,
            gate,
            timeout_secs,
        }
    }

    pub fn engine(&self) -> CorrectionEngine {
        self.provider.engine()
    }

    /// Correct `text` with the configured engine.
    ///
    /// Callers reject empty input before calling. An empty engine result means
    /// "no change" and yields the input text.
    pub async fn correct(&self, text: &str) -> Result<String, CorrectionError> {
        let call = async {
            let _guard = match &self.gate {
                Some(gate) => Some(gate.lock().await),
                None => None,
            };
            self.provider.correct(text).await
        };

        let corrected = timeout(Duration::from_secs(self.timeout_secs), call)
            .await
            .map_err(|_| CorrectionError::Timeout(self.timeout_secs))??;

        if corrected.trim().is_empty() {
            tracing::warn!(
                "{} engine returned empty output; keeping original text",
                self.engine()
            );
            return Ok(text.to_string());
        }

        Ok(corrected)
    }

    /// Tear the service down. Waits for an in-flight serialized call to finish.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down {} correction engine...", self.engine());
        if let Some(gate) = &self.gate {
            let _guard = gate.lock().await;
        }
        tracing::info!("Correction engine stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::correction::provider::{run_blocking, MockProvider};
    use async_trait::async_trait;
    use std::time::Instant;

    /// Synchronous CPU-bound engine that never yields while it works
    struct BusyProvider {
        work: std::time::Duration,
    }

    #[async_trait]
    impl CorrectionProvider for BusyProvider {
        fn engine(&self) -> CorrectionEngine {
            CorrectionEngine::Dictionary
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn correct(&self, text: &str) -> Result<String, CorrectionError> {
            let work = self.work;
            let text = text.to_string();
            run_blocking(move || {
                std::thread::sleep(work);
                text
            })
            .await
        }
    }

    fn mock(delay_ms: u64, reentrant: bool) -> Arc<MockProvider> {
        Arc::new(MockProvider {
            prefix: "fixed: ".to_string(),
            available: true,
            reentrant,
            delay: Duration::from_millis(delay_ms),
        })
    }

    #[tokio::test]
    async fn test_correct_delegates_to_provider() {
        let service = CorrectionService::with_provider(mock(0, true), 5);
        assert_eq!(service.correct("hello").await.unwrap(), "fixed: hello");
    }

    #[tokio::test]
    async fn test_correct_times_out() {
        let service = CorrectionService::with_provider(mock(2_000, true), 1);
        let result = service.correct("slow").await;
        assert!(matches!(result, Err(CorrectionError::Timeout(1))));
    }

    // Single-threaded runtime: the timeout only fires if the work is off the
    // async worker.
    #[tokio::test(flavor = "current_thread")]
    async fn test_blocking_engine_work_times_out() {
        let provider = Arc::new(BusyProvider {
            work: Duration::from_secs(3),
        });
        let service = CorrectionService::with_provider(provider, 1);

        let started = Instant::now();
        let result = service.correct("a very long essay").await;

        assert!(matches!(result, Err(CorrectionError::Timeout(1))));
        assert!(started.elapsed() < Duration::from_millis(2_500));
    }

    #[tokio::test]
    async fn test_empty_output_keeps_original() {
        let provider = Arc::new(MockProvider {
            prefix: String::new(),
            available: true,
            reentrant: true,
            delay: Duration::ZERO,
        });
        let service = CorrectionService::with_provider(provider, 5);
        assert_eq!(service.correct("   ").await.unwrap(), "   ");
    }

    #[tokio::test]
    async fn test_non_reentrant_calls_are_serialized() {
        let service = Arc::new(CorrectionService::with_provider(mock(200, false), 5));
        assert!(service.gate.is_some());

        let started = Instant::now();
        let a = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.correct("a").await }
        });
        let b = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.correct("b").await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_reentrant_provider_has_no_gate() {
        let service = CorrectionService::with_provider(mock(0, true), 5);
        assert!(service.gate.is_none());
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_dictionary_engine() {
        let config = Config::default();
        let checker = Arc::new(SpellChecker::from_words(["the", "end"]));
        let service = CorrectionService::start(&config.correction, checker).await.unwrap();
        assert_eq!(service.engine(), CorrectionEngine::Dictionary);
        assert_eq!(service.correct("teh end").await.unwrap(), "the end");
    }

    #[tokio::test]
    async fn test_start_fails_when_embedded_engine_unreachable() {
        let mut config = Config::default();
        config.correction.engine = CorrectionEngine::Ollama;
        // Nothing listens on the discard port
        config.correction.ollama.url = "http://127.0.0.1:9".to_string();

        let checker = Arc::new(SpellChecker::from_words(["the"]));
        let result = CorrectionService::start(&config.correction, checker).await;
        assert!(matches!(result, Err(CorrectionError::NotReady(_))));
    }

    #[tokio::test]
    async fn test_start_tolerates_unreachable_networked_engine() {
        let mut config = Config::default();
        config.correction.engine = CorrectionEngine::LanguageTool;
        config.correction.timeout_secs = 2;
        config.correction.languagetool.url = "http://127.0.0.1:9/v2".to_string();
        config.correction.languagetool.api_key = Some("test-key".to_string());

        let checker = Arc::new(SpellChecker::from_words(["the"]));
        let service = CorrectionService::start(&config.correction, checker)
            .await
            .unwrap();

        assert_eq!(service.engine(), CorrectionEngine::LanguageTool);
        assert!(matches!(
            service.correct("teh").await,
            Err(CorrectionError::Request(_))
        ));
    }
}
