//! Essay database operations

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};
use crate::history::HistoryWindow;

/// Essay record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Essay {
    pub id: i64,
    pub original_text: String,
    pub corrected_text: String,
    pub timestamp: String,
    pub word_count: i64,
    pub paragraph_count: i64,
    pub backspace_count: i64,
}

/// Authoring session statistics supplied by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingStats {
    pub word_count: u32,
    pub paragraph_count: u32,
    pub backspace_count: u32,
}

/// Essay ready to be written
#[derive(Debug, Clone)]
pub struct NewEssay<'a> {
    pub original_text: &'a str,
    pub corrected_text: &'a str,
    pub stats: WritingStats,
}

/// Canonical timestamp text: lexical order matches chronological order
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Essay repository
pub struct EssayRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EssayRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an essay stamped with `at`.
    ///
    /// Runs in its own transaction and drains the `RETURNING` rows before
    /// committing, so the row is visible to every pooled connection once
    /// this returns.
    pub async fn insert(&self, essay: &NewEssay<'_>, at: DateTime<Utc>) -> Result<Essay> {
        let mut tx = self.pool.begin().await.map_err(AppError::SaveFailed)?;

        let mut rows = sqlx::query_as::<_, Essay>(
            r#"
            INSERT INTO essays (original_text, corrected_text, timestamp,
                                word_count, paragraph_count, backspace_count)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, original_text, corrected_text, timestamp,
                      word_count, paragraph_count, backspace_count
            "#,
        )
        .bind(essay.original_text)
        .bind(essay.corrected_text)
        .bind(format_timestamp(at))
        .bind(essay.stats.word_count)
        .bind(essay.stats.paragraph_count)
        .bind(essay.stats.backspace_count)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::SaveFailed)?;

        // Dropping the transaction rolls the insert back
        let inserted = rows
            .pop()
            .ok_or_else(|| AppError::Internal("Insert returned no row".to_string()))?;

        tx.commit().await.map_err(AppError::SaveFailed)?;
        Ok(inserted)
    }

    /// Get a specific essay
    pub async fn get(&self, id: i64) -> Result<Option<Essay>> {
        let essay = sqlx::query_as::<_, Essay>(
            r#"
            SELECT id, original_text, corrected_text, timestamp,
                   word_count, paragraph_count, backspace_count
            FROM essays
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(essay)
    }

    /// List essays inside `window`, newest first
    pub async fn list_window(&self, window: HistoryWindow, now: DateTime<Utc>) -> Result<Vec<Essay>> {
        let cutoff = format_timestamp(window.cutoff(now));

        let query = match window {
            HistoryWindow::Since { .. } => {
                r#"
                SELECT id, original_text, corrected_text, timestamp,
                       word_count, paragraph_count, backspace_count
                FROM essays
                WHERE timestamp >= ?
                ORDER BY timestamp DESC, id DESC
                "#
            }
            HistoryWindow::Archive => {
                r#"
                SELECT id, original_text, corrected_text, timestamp,
                       word_count, paragraph_count, backspace_count
                FROM essays
                WHERE timestamp < ?
                ORDER BY timestamp DESC, id DESC
                "#
            }
        };

        let essays = sqlx::query_as::<_, Essay>(query)
            .bind(cutoff)
            .fetch_all(self.pool)
            .await?;

        Ok(essays)
    }

    /// Count stored essays
    pub async fn count(&self) -> Result<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM essays")
            .fetch_one(self.pool)
            .await?;

        Ok(result.0)
    }
}
