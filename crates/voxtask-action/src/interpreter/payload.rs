//! Extraction and parsing of the interpreter's structured payload.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::warn;
use voxtask_core::TaskId;

/// Matches a fenced block, optionally tagged `json`.
static FENCED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap());

/// One raw action descriptor as emitted by the interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionDescriptor {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub due_string: Option<String>,
    #[serde(default)]
    pub due_lang: Option<String>,
}

/// Pull the payload out of a response that may wrap it in prose and code
/// fences. Unfenced responses are returned as-is.
pub fn extract_payload(message: &str) -> &str {
    FENCED_RE
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(message)
}

/// Parse the interpreter's response into descriptors.
///
/// Never fails: an unparseable payload yields no descriptors, and a single
/// malformed entry is skipped.
pub fn parse_descriptors(message: &str) -> Vec<ActionDescriptor> {
    let payload = extract_payload(message).trim();

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Error parsing interpreter JSON; no actions proposed");
            return Vec::new();
        }
    };

    let entries = match value {
        serde_json::Value::Array(items) => items,
        obj @ serde_json::Value::Object(_) => vec![obj],
        other => {
            warn!(payload = %other, "Interpreter payload is not an action list");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ActionDescriptor>(entry) {
            Ok(d) => Some(d),
            Err(e) => {
                warn!(error = %e, "Skipping malformed action descriptor");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRAY: &str = r#"[{"action":"create","content":"Call Bob","due_string":"tomorrow"}]"#;

    #[test]
    fn test_extract_unfenced_passthrough() {
        assert_eq!(extract_payload(ARRAY), ARRAY);
    }

    #[test]
    fn test_extract_json_fence_with_prose() {
        let message = format!("Sure! Here you go:\n```json\n{}\n```\nLet me know.", ARRAY);
        assert_eq!(extract_payload(&message), ARRAY);
    }

    #[test]
    fn test_extract_bare_fence() {
        let message = format!("```\n{}\n```", ARRAY);
        assert_eq!(extract_payload(&message), ARRAY);
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced = format!("```json\n{}\n```", ARRAY);
        assert_eq!(parse_descriptors(&fenced), parse_descriptors(ARRAY));
        assert_eq!(parse_descriptors(ARRAY).len(), 1);
    }

    #[test]
    fn test_parse_fields() {
        let d = &parse_descriptors(
            r#"[{"action":"update","task_id":42,"content":"Buy oat milk","due_string":"friday","due_lang":"en"}]"#,
        )[0];
        assert_eq!(d.action, "update");
        assert_eq!(d.task_id, Some(TaskId::from("42")));
        assert_eq!(d.content.as_deref(), Some("Buy oat milk"));
        assert_eq!(d.due_string.as_deref(), Some("friday"));
        assert_eq!(d.due_lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_parse_string_task_id_and_nulls() {
        let d = &parse_descriptors(
            r#"[{"action":"close","task_id":"8123","content":null,"due_string":null}]"#,
        )[0];
        assert_eq!(d.task_id, Some(TaskId::from("8123")));
        assert!(d.content.is_none());
    }

    #[test]
    fn test_unparseable_is_empty() {
        assert!(parse_descriptors("I could not understand that.").is_empty());
        assert!(parse_descriptors("```json\n[{\"action\": \n```").is_empty());
        assert!(parse_descriptors("").is_empty());
    }

    #[test]
    fn test_scalar_payload_is_empty() {
        assert!(parse_descriptors("42").is_empty());
    }

    #[test]
    fn test_single_object_is_one_descriptor() {
        let ds = parse_descriptors(r#"{"action":"create","content":"x"}"#);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_malformed_entry_skipped() {
        let ds = parse_descriptors(
            r#"[{"action":"create","content":"x"}, "oops", {"action":"close","task_id":{"nested":1}}]"#,
        );
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].content.as_deref(), Some("x"));
    }
}
