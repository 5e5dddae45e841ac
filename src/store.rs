//! Essay store
//!
//! Saving runs the correction engine exactly once and persists its output
//! unchanged next to the submitted text.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::correction::CorrectionService;
use crate::db::{Essay, EssayRepository, NewEssay, WritingStats};
use crate::error::{AppError, Result};
use crate::history::HistoryWindow;

pub struct EssayStore<'a> {
    repo: EssayRepository<'a>,
    corrector: &'a CorrectionService,
}

impl<'a> EssayStore<'a> {
    pub fn new(pool: &'a SqlitePool, corrector: &'a CorrectionService) -> Self {
        Self {
            repo: EssayRepository::new(pool),
            corrector,
        }
    }

    /// Correct and persist a submitted essay
    pub async fn save(&self, original_text: &str, stats: WritingStats) -> Result<Essay> {
        if original_text.trim().is_empty() {
            return Err(AppError::Validation("No text provided".to_string()));
        }

        let corrected_text = self.corrector.correct(original_text).await?;

        let essay = self
            .repo
            .insert(
                &NewEssay {
                    original_text,
                    corrected_text: &corrected_text,
                    stats,
                },
                Utc::now(),
            )
            .await?;

        tracing::info!(
            essay_id = essay.id,
            word_count = essay.word_count,
            "Essay saved"
        );
        Ok(essay)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Essay> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Essay not found: {}", id)))
    }

    /// Essays inside `window`, newest first
    pub async fn list_since(&self, window: HistoryWindow) -> Result<Vec<Essay>> {
        self.repo.list_window(window, Utc::now()).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await
    }
}
