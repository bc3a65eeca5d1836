//! Response parsing and validation for model replies.
//!
//! The upstream output format is usually correct but not guaranteed-schema, so
//! this module coerces rather than rejects: score is rounded and clamped,
//! strengths/gaps fall back to empty lists, summary falls back to "". Only an
//! undecodable body or a missing/non-numeric score is a hard failure.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Cap on strengths/gaps entries kept per candidate.
const MAX_LIST_ITEMS: usize = 4;

/// Raised when the model reply cannot be decoded at all.
/// Never retried — it surfaces as the affected candidate's error variant.
#[derive(Debug, Error)]
#[error("The model returned an unexpected response format.")]
pub struct MalformedResponse;

/// A validated per-candidate assessment. All invariants hold after parsing:
/// score in [0,100], at most four strengths and four gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub score: u32,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub summary: String,
}

/// The loose shape the model is asked for. `score` is required and numeric;
/// everything else is repaired to a default when absent or mistyped.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    score: f64,
    #[serde(default)]
    strengths: Value,
    #[serde(default)]
    gaps: Value,
    #[serde(default)]
    summary: Value,
}

/// Parses a raw model completion into a validated `Analysis`.
pub fn parse_analysis(raw: &str) -> Result<Analysis, MalformedResponse> {
    let cleaned = strip_json_fences(raw);
    let parsed: RawAnalysis = serde_json::from_str(cleaned).map_err(|_| MalformedResponse)?;

    Ok(Analysis {
        score: parsed.score.round().clamp(0.0, 100.0) as u32,
        strengths: string_list(&parsed.strengths),
        gaps: string_list(&parsed.gaps),
        summary: parsed
            .summary
            .as_str()
            .map(String::from)
            .unwrap_or_default(),
    })
}

/// Accepts a field only if it is an array, keeping the first four string
/// elements in their original order. Anything else becomes an empty list.
fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .take(MAX_LIST_ITEMS)
                .collect()
        })
        .unwrap_or_default()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// The language tag is matched case-insensitively.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let has_json_tag = text
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("```json"));
    let stripped = if has_json_tag {
        &text[7..]
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        return text;
    };
    stripped
        .trim_start()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or_else(|| stripped.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_reply_parses_cleanly() {
        let raw = "```json\n{\"score\": 87, \"strengths\": [\"X\"], \"gaps\": [], \"summary\": \"Good fit\"}\n```";
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.score, 87);
        assert_eq!(analysis.strengths, vec!["X"]);
        assert!(analysis.gaps.is_empty());
        assert_eq!(analysis.summary, "Good fit");
    }

    #[test]
    fn test_fence_tag_is_case_insensitive() {
        let raw = "```JSON\n{\"score\": 50}\n```";
        assert_eq!(parse_analysis(raw).unwrap().score, 50);
    }

    #[test]
    fn test_plain_fences_without_tag() {
        let raw = "```\n{\"score\": 42}\n```";
        assert_eq!(parse_analysis(raw).unwrap().score, 42);
    }

    #[test]
    fn test_score_is_rounded_to_nearest_integer() {
        let analysis = parse_analysis(r#"{"score": 87.6}"#).unwrap();
        assert_eq!(analysis.score, 88);
    }

    #[test]
    fn test_score_above_100_clamps_to_100() {
        let analysis = parse_analysis(r#"{"score": 150}"#).unwrap();
        assert_eq!(analysis.score, 100);
    }

    #[test]
    fn test_negative_score_clamps_to_zero() {
        let analysis = parse_analysis(r#"{"score": -12}"#).unwrap();
        assert_eq!(analysis.score, 0);
    }

    #[test]
    fn test_non_numeric_score_is_malformed() {
        assert!(parse_analysis(r#"{"score": "excellent"}"#).is_err());
    }

    #[test]
    fn test_missing_score_is_malformed() {
        assert!(parse_analysis(r#"{"strengths": ["Rust"]}"#).is_err());
    }

    #[test]
    fn test_unparseable_body_is_malformed() {
        let err = parse_analysis("I'd rate this candidate an 8/10.").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The model returned an unexpected response format."
        );
    }

    #[test]
    fn test_long_lists_truncate_to_first_four() {
        let raw = r#"{"score": 70, "strengths": ["a", "b", "c", "d", "e", "f"], "gaps": ["1", "2", "3", "4", "5"]}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.strengths, vec!["a", "b", "c", "d"]);
        assert_eq!(analysis.gaps, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_non_array_lists_default_to_empty() {
        let raw = r#"{"score": 70, "strengths": "strong Rust background", "gaps": 3}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert!(analysis.strengths.is_empty());
        assert!(analysis.gaps.is_empty());
    }

    #[test]
    fn test_missing_summary_defaults_to_empty_string() {
        let analysis = parse_analysis(r#"{"score": 70}"#).unwrap();
        assert_eq!(analysis.summary, "");
    }

    #[test]
    fn test_non_string_summary_defaults_to_empty_string() {
        let analysis = parse_analysis(r#"{"score": 70, "summary": 5}"#).unwrap();
        assert_eq!(analysis.summary, "");
        assert_eq!(analysis.score, 70);
    }

    #[test]
    fn test_non_string_list_elements_are_dropped() {
        let raw = r#"{"score": 70, "strengths": ["Rust", 5, null, "Go"]}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.strengths, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_strip_fences_leaves_plain_json_untouched() {
        assert_eq!(
            strip_json_fences("{\"key\": \"value\"}"),
            "{\"key\": \"value\"}"
        );
    }

    #[test]
    fn test_strip_fences_handles_missing_closing_fence() {
        assert_eq!(strip_json_fences("```json\n{\"score\": 1}"), "{\"score\": 1}");
    }
}
