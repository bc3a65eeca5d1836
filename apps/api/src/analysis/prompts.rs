// LLM prompt constants for the Analysis module.

/// CV analysis prompt template. Replace `{jd_text}` and `{cv_text}` before sending.
/// The output contract demands bare JSON — any fences the model adds anyway are
/// stripped by `analysis::parser`.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"You are an expert HR recruiter. Carefully analyze the following CV against the job description and provide an objective assessment.

JOB DESCRIPTION:
{jd_text}

---

CANDIDATE CV:
{cv_text}

---

Respond ONLY with valid JSON (no markdown, no explanation) using this exact structure:
{
  "score": <integer 0-100 representing overall match percentage>,
  "strengths": [<up to 4 specific matching strengths as short strings>],
  "gaps": [<up to 4 specific missing skills or requirements as short strings>],
  "summary": "<one concise sentence summarising the candidate's fit>"
}"#;

/// Builds the analysis prompt for one candidate. Pure string formatting.
pub fn build_analysis_prompt(jd_text: &str, cv_text: &str) -> String {
    ANALYZE_PROMPT_TEMPLATE
        .replace("{jd_text}", jd_text)
        .replace("{cv_text}", cv_text)
}
