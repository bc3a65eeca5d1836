//! Batch orchestrator — runs the per-candidate pipeline concurrently and
//! produces the ranked result list.
//!
//! Failure isolation is the central contract here: batch-level input problems
//! abort before any model call, but once candidates are in flight, every
//! per-candidate failure is converted into that candidate's error variant and
//! never unwinds sibling work.

use futures::future::join_all;
use tracing::{info, warn};

use crate::analysis::models::{CandidateFile, CandidateResult, JobDescription};
use crate::analysis::parser::parse_analysis;
use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::llm_client::CompletionClient;

/// Plausibility floor for extracted CV text. Anything shorter is treated as
/// unreadable (e.g. a scanned image) and never sent to the model.
pub const MIN_CV_TEXT_LEN: usize = 50;

/// Fixed diagnostic for unreadable/too-short candidate documents.
pub const UNREADABLE_TEXT_ERROR: &str =
    "Could not extract readable text from this file. Ensure it is not a scanned image.";

/// Runs the full batch: resolve JD → fan out per-candidate pipelines → sort.
///
/// Candidates run concurrently with no concurrency cap (fire-and-collect);
/// the call suspends until every pipeline has finished.
pub async fn run_analysis(
    llm: &dyn CompletionClient,
    jd: JobDescription,
    candidates: Vec<CandidateFile>,
) -> Result<Vec<CandidateResult>, AppError> {
    let jd_text = resolve_job_description(jd)?;

    if jd_text.is_empty() {
        return Err(AppError::Validation("Job description is required.".to_string()));
    }
    if candidates.is_empty() {
        return Err(AppError::Validation(
            "At least one CV file is required.".to_string(),
        ));
    }

    info!("Analyzing batch of {} CV(s)", candidates.len());

    let pipelines = candidates
        .iter()
        .map(|candidate| analyze_candidate(llm, &jd_text, candidate));
    let mut results = join_all(pipelines).await;

    sort_results(&mut results);
    Ok(results)
}

/// Resolves the JD to plain text. A JD file that cannot be extracted aborts
/// the whole batch — no per-candidate ranking is possible without a JD.
fn resolve_job_description(jd: JobDescription) -> Result<String, AppError> {
    match jd {
        JobDescription::Text(text) => Ok(text.trim().to_string()),
        JobDescription::File(file) => extract_text(&file.content, &file.name)
            .map_err(|e| AppError::Validation(format!("Could not extract text from JD file: {e}"))),
    }
}

/// One candidate's straight-line pipeline: extract → prompt → call → parse.
/// Infallible by construction — every failure becomes the error variant.
async fn analyze_candidate(
    llm: &dyn CompletionClient,
    jd_text: &str,
    candidate: &CandidateFile,
) -> CandidateResult {
    let cv_text = match extract_text(&candidate.content, &candidate.name) {
        Ok(text) => text,
        Err(e) => {
            warn!("Extraction failed for {}: {e}", candidate.name);
            return CandidateResult::failed(&candidate.name, e.to_string());
        }
    };

    // Short-circuit before spending a model call on unreadable input.
    // The floor counts characters, not bytes, so non-ASCII text is not
    // over-credited.
    let cv_chars = cv_text.chars().count();
    if cv_chars < MIN_CV_TEXT_LEN {
        warn!(
            "Extracted text for {} too short ({cv_chars} chars), skipping model call",
            candidate.name
        );
        return CandidateResult::failed(&candidate.name, UNREADABLE_TEXT_ERROR);
    }

    let prompt = build_analysis_prompt(jd_text, &cv_text);

    let raw = match llm.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("LLM call failed for {}: {e}", candidate.name);
            return CandidateResult::failed(&candidate.name, e.to_string());
        }
    };

    match parse_analysis(&raw) {
        Ok(analysis) => CandidateResult::scored(&candidate.name, analysis),
        Err(e) => {
            warn!("Unparseable model reply for {}: {e}", candidate.name);
            CandidateResult::failed(&candidate.name, e.to_string())
        }
    }
}

/// Ranking rule: successes before errors, successes descending by score.
/// The sort is stable, so equal scores (and all error results) keep their
/// original submission order — the documented tie-break.
fn sort_results(results: &mut [CandidateResult]) {
    results.sort_by(|a, b| match (a.is_error(), b.is_error()) {
        (false, false) => b.score.cmp(&a.score),
        (a_err, b_err) => a_err.cmp(&b_err),
    });
}
