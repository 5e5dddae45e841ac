//! Essay history route

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::db::Essay;
use crate::error::Result;
use crate::history::HistoryWindow;
use crate::state::AppState;
use crate::store::EssayStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub selected_minutes: i64,
    pub essays: Vec<Essay>,
}

/// List essays in a time window, newest first
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<HistoryResponse>> {
    let window = HistoryWindow::from_param(minutes_param(&params));

    let store = EssayStore::new(state.db(), state.corrector());
    let essays = store.list_since(window).await?;

    Ok(Json(HistoryResponse {
        selected_minutes: window.selected_minutes(),
        essays,
    }))
}

/// First `minutes` value of the query string; later repeats are ignored
fn minutes_param(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "minutes")
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_minutes_param_takes_first_value() {
        assert_eq!(minutes_param(&params(&[("minutes", "5"), ("minutes", "x")])), Some("5"));
        assert_eq!(minutes_param(&params(&[("page", "2"), ("minutes", "-1")])), Some("-1"));
        assert_eq!(minutes_param(&params(&[("page", "2")])), None);
    }

    #[test]
    fn test_repeated_minutes_selects_first_window() {
        let window = HistoryWindow::from_param(minutes_param(&params(&[
            ("minutes", "x"),
            ("minutes", "5"),
        ])));
        assert_eq!(window, HistoryWindow::default());
    }
}
