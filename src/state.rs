//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::correction::{CorrectionError, CorrectionService};
use crate::export::PdfExporter;
use crate::spelling::{DictionaryError, SpellChecker};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to load dictionary: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Failed to initialize correction engine: {0}")]
    Correction(#[from] CorrectionError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    corrector: CorrectionService,
    spell_checker: Arc<SpellChecker>,
    exporter: PdfExporter,
}

impl AppState {
    /// Create the application state from configuration
    ///
    /// Loads the dictionary and starts the configured correction engine.
    /// Returns an error if an embedded engine cannot be initialized.
    pub async fn start(config: Config, db: SqlitePool) -> Result<Self, StateError> {
        let spell_checker = Arc::new(SpellChecker::load(&config.correction.dictionary_path).await?);
        let corrector = CorrectionService::start(&config.correction, Arc::clone(&spell_checker)).await?;
        let exporter = PdfExporter::mupdf(config.export.render_timeout_secs);

        Ok(Self::new(config, db, corrector, spell_checker, exporter))
    }

    /// Assemble state from already constructed services
    pub fn new(
        config: Config,
        db: SqlitePool,
        corrector: CorrectionService,
        spell_checker: Arc<SpellChecker>,
        exporter: PdfExporter,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                corrector,
                spell_checker,
                exporter,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the correction service
    pub fn corrector(&self) -> &CorrectionService {
        &self.inner.corrector
    }

    /// Get the spell checker
    pub fn spell_checker(&self) -> &Arc<SpellChecker> {
        &self.inner.spell_checker
    }

    /// Get the PDF exporter
    pub fn exporter(&self) -> &PdfExporter {
        &self.inner.exporter
    }

    /// Shutdown services gracefully
    ///
    /// Stops the correction engine and closes the database pool.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down application state...");
        self.inner.corrector.shutdown().await;
        self.inner.db.close().await;
    }
}
