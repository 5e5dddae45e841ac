//! Submission routes: the form page, one-off correction and saving

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::db::WritingStats;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::EssayStore;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Submitted form fields
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayForm {
    pub text: Option<String>,
    pub word_count: Option<String>,
    pub paragraph_count: Option<String>,
    pub backspace_count: Option<String>,
}

impl EssayForm {
    /// Accept a parsed form, treating an unreadable body as a form without text
    fn from_extractor(form: std::result::Result<Form<EssayForm>, FormRejection>) -> Self {
        match form {
            Ok(Form(form)) => form,
            Err(rejection) => {
                tracing::debug!("Unreadable form submission: {}", rejection);
                Self::default()
            }
        }
    }

    fn text(&self) -> Result<&str> {
        match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AppError::Validation("No text provided".to_string())),
        }
    }

    /// Missing, malformed or negative counters become 0
    fn stats(&self) -> WritingStats {
        WritingStats {
            word_count: parse_count(self.word_count.as_deref()),
            paragraph_count: parse_count(self.paragraph_count.as_deref()),
            backspace_count: parse_count(self.backspace_count.as_deref()),
        }
    }
}

fn parse_count(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionResponse {
    pub original_text: String,
    pub corrected_text: String,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub message: &'static str,
    pub id: i64,
}

/// Empty submission form
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Correct submitted text without storing it
pub async fn check(
    State(state): State<AppState>,
    form: std::result::Result<Form<EssayForm>, FormRejection>,
) -> Result<Json<CorrectionResponse>> {
    let form = EssayForm::from_extractor(form);
    let original_text = form.text()?;

    let corrected_text = state.corrector().correct(original_text).await?;

    Ok(Json(CorrectionResponse {
        original_text: original_text.to_string(),
        corrected_text,
    }))
}

/// Correct and persist an essay
pub async fn save(
    State(state): State<AppState>,
    form: std::result::Result<Form<EssayForm>, FormRejection>,
) -> Result<Json<SaveResponse>> {
    let form = EssayForm::from_extractor(form);
    let original_text = form.text()?;

    let store = EssayStore::new(state.db(), state.corrector());
    let essay = store.save(original_text, form.stats()).await?;

    Ok(Json(SaveResponse {
        message: "Essay saved successfully",
        id: essay.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_is_permissive() {
        assert_eq!(parse_count(Some("6")), 6);
        assert_eq!(parse_count(Some(" 12 ")), 12);
        assert_eq!(parse_count(Some("")), 0);
        assert_eq!(parse_count(Some("six")), 0);
        assert_eq!(parse_count(Some("-3")), 0);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn test_form_text_validation() {
        let mut form = EssayForm::default();
        assert!(matches!(form.text(), Err(AppError::Validation(_))));

        form.text = Some("   \n".to_string());
        assert!(matches!(form.text(), Err(AppError::Validation(_))));

        form.text = Some("An essay.".to_string());
        assert_eq!(form.text().unwrap(), "An essay.");
    }
}
