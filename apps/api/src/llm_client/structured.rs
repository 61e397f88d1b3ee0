//! Structured output parsing: raw model text into typed values.
//!
//! Schema-constrained generation is treated as best-effort: even when the
//! backend promises valid JSON, the text is re-validated here. Models also
//! like to wrap JSON in markdown fences, so those are stripped first.

use serde::de::DeserializeOwned;

use crate::llm_client::LlmError;

/// Parses a model response as JSON after stripping fences and whitespace.
/// Failure is `LlmError::Malformed`; callers in the grading loops catch it
/// and degrade that one result instead of aborting the batch.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, LlmError> {
    let cleaned = strip_json_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| LlmError::Malformed(e.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let body = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let body = body.trim_start();
    body.strip_suffix("```").map(str::trim_end).unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        key: String,
    }

    #[test]
    fn test_parse_unfenced_json() {
        let parsed: Payload = parse_structured(r#"{"key": "value"}"#).unwrap();
        assert_eq!(parsed.key, "value");
    }

    #[test]
    fn test_parse_json_fenced_with_tag() {
        let raw = "```json\n{\"key\": \"value\"}\n```";
        let parsed: Payload = parse_structured(raw).unwrap();
        assert_eq!(parsed.key, "value");
    }

    #[test]
    fn test_parse_json_fenced_without_tag() {
        let raw = "```\n{\"key\": \"value\"}\n```";
        let parsed: Payload = parse_structured(raw).unwrap();
        assert_eq!(parsed.key, "value");
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced: Payload = parse_structured("```json\n{\"key\": \"same\"}\n```").unwrap();
        let plain: Payload = parse_structured("{\"key\": \"same\"}").unwrap();
        assert_eq!(fenced, plain);
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let parsed: Payload = parse_structured("  \n {\"key\": \"value\"} \n ").unwrap();
        assert_eq!(parsed.key, "value");
    }

    #[test]
    fn test_invalid_json_is_malformed_error() {
        let err = parse_structured::<Payload>("I think the candidate did well!").unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }
}
