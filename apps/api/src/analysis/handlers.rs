//! Axum route handlers for the Analysis API.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;

use crate::analysis::models::{AnalyzeResponse, CandidateFile, JobDescription};
use crate::analysis::pipeline::run_analysis;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Multipart form: `jd` (plain text) or `jdFile` (PDF/DOCX) for the job
/// description, plus one or more `cvs` documents. Returns the ranked
/// `CandidateResult` list. The credential check runs before any field is read
/// so a misconfigured deployment fails fast and cheap.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if state.config.anthropic_api_key.is_empty() {
        return Err(AppError::Configuration(
            "ANTHROPIC_API_KEY is not configured. Add it to your environment or .env file."
                .to_string(),
        ));
    }

    let mut jd_text = String::new();
    let mut jd_file: Option<CandidateFile> = None;
    let mut cvs: Vec<CandidateFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Invalid form data.".to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "jd" => {
                jd_text = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Invalid form data.".to_string()))?;
            }
            "jdFile" => {
                if let Some(file) = read_file_field(field, "jd").await? {
                    jd_file = Some(file);
                }
            }
            "cvs" => {
                if let Some(file) = read_file_field(field, "cv").await? {
                    cvs.push(file);
                }
            }
            // Unknown fields are ignored, matching lenient form handling.
            _ => {}
        }
    }

    // A non-empty JD file takes priority over pasted text.
    let jd = match jd_file {
        Some(file) => JobDescription::File(file),
        None => JobDescription::Text(jd_text),
    };

    let results = run_analysis(state.llm.as_ref(), jd, cvs).await?;

    Ok(Json(AnalyzeResponse { results }))
}

/// Reads one uploaded file field. Empty uploads (a file input submitted with
/// no selection) are treated as absent rather than as zero-byte documents.
async fn read_file_field(
    field: axum::extract::multipart::Field<'_>,
    fallback_name: &str,
) -> Result<Option<CandidateFile>, AppError> {
    let name = field.file_name().unwrap_or(fallback_name).to_string();
    let content: Bytes = field
        .bytes()
        .await
        .map_err(|_| AppError::Validation("Invalid form data.".to_string()))?;
    if content.is_empty() {
        return Ok(None);
    }
    Ok(Some(CandidateFile { name, content }))
}
