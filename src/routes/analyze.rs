//! Spelling analysis route

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tokio::time::{timeout, Duration};

use super::parse_essay_id;
use crate::error::{AppError, Result};
use crate::spelling::{Misspelling, SpellChecker};
use crate::state::AppState;
use crate::store::EssayStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub essay_id: i64,
    /// Misspelled occurrences, counting repeats
    pub total_errors: usize,
    /// Distinct misspelled words, most frequent first
    pub errors: Vec<Misspelling>,
}

/// Re-check the original text of a stored essay for misspellings
pub async fn analyze_essay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>> {
    let id = parse_essay_id(&id)?;
    let store = EssayStore::new(state.db(), state.corrector());
    let essay = store.get_by_id(id).await?;

    let errors = find_misspellings(
        Arc::clone(state.spell_checker()),
        essay.original_text,
        state.config().correction.timeout_secs,
    )
    .await?;
    let total_errors: usize = errors.iter().map(|e| e.count).sum();

    Ok(Json(AnalysisResponse {
        essay_id: essay.id,
        total_errors,
        errors,
    }))
}

async fn find_misspellings(
    checker: Arc<SpellChecker>,
    text: String,
    timeout_secs: u64,
) -> Result<Vec<Misspelling>> {
    run_bounded(timeout_secs, move || checker.misspellings(&text)).await
}

/// Run CPU-bound work on the blocking pool, giving up after `timeout_secs`
async fn run_bounded<F, T>(timeout_secs: u64, work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match timeout(
        Duration::from_secs(timeout_secs),
        tokio::task::spawn_blocking(work),
    )
    .await
    {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AppError::Internal(format!("Spelling analysis failed: {}", e))),
        Err(_) => Err(AppError::Internal(format!(
            "Spelling analysis timed out after {} seconds",
            timeout_secs
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_find_misspellings_counts_repeats() {
        let checker = Arc::new(SpellChecker::from_words(["the", "cat", "sat"]));
        let found = find_misspellings(checker, "Teh cat sat, teh end.".to_string(), 5)
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].word, "teh");
        assert_eq!(found[0].count, 2);
        assert_eq!(found[1].word, "end");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_slow_analysis_is_bounded() {
        let started = Instant::now();
        let result = run_bounded(1, || {
            std::thread::sleep(std::time::Duration::from_secs(3));
            Vec::<Misspelling>::new()
        })
        .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(started.elapsed() < std::time::Duration::from_millis(2_500));
    }
}
