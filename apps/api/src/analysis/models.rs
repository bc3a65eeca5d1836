//! Data model for one analysis batch. Request objects are transient — built
//! per HTTP call, discarded after the response is sent.

use bytes::Bytes;
use serde::Serialize;

use crate::analysis::parser::Analysis;

/// One uploaded document: original filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub content: Bytes,
}

/// The job description source. A file must be extracted before use; raw text
/// is used as-is. When both are submitted, the file takes priority.
#[derive(Debug, Clone)]
pub enum JobDescription {
    Text(String),
    File(CandidateFile),
}

/// Per-candidate outcome. A tagged success/failure in spirit: either the
/// scored fields are meaningful, or `error` is set and they are zero/empty.
/// Serialized flat (with `error` omitted on success) to keep the wire shape
/// a plain result card per document.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateResult {
    pub filename: String,
    pub score: u32,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CandidateResult {
    /// Success variant: carries the validated analysis.
    pub fn scored(filename: impl Into<String>, analysis: Analysis) -> Self {
        Self {
            filename: filename.into(),
            score: analysis.score,
            strengths: analysis.strengths,
            gaps: analysis.gaps,
            summary: analysis.summary,
            error: None,
        }
    }

    /// Error variant: score 0, empty fields, diagnostic message set.
    pub fn failed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            score: 0,
            strengths: Vec::new(),
            gaps: Vec::new(),
            summary: String::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Response body for POST /api/v1/analyze.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub results: Vec<CandidateResult>,
}
