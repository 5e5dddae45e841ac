//! PDF download route

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::parse_essay_id;
use crate::error::Result;
use crate::export::file_name;
use crate::state::AppState;
use crate::store::EssayStore;

/// Export a stored essay as a PDF attachment
pub async fn download_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_essay_id(&id)?;
    let store = EssayStore::new(state.db(), state.corrector());
    let essay = store.get_by_id(id).await?;

    let pdf = state.exporter().render_pdf(&essay).await?;
    tracing::debug!(essay_id = essay.id, bytes = pdf.len(), "Rendered essay PDF");

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name(essay.id)),
        ),
    ];

    Ok((headers, pdf).into_response())
}
