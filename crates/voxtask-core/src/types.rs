use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a task in the remote task store.
///
/// The store hands out string identifiers, while the command interpreter
/// often emits bare JSON numbers, so deserialization accepts both.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => TaskId::from(n),
            RawId::Text(s) => TaskId(s),
        })
    }
}

// =============================================================================
// Task records
// =============================================================================

/// Due information attached to a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    /// Natural-language due expression as the user phrased it ("tomorrow").
    pub string: String,
    /// Resolved calendar date, when the store reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Locale the expression was parsed with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Due {
    pub fn new(string: impl Into<String>) -> Self {
        Self {
            string: string.into(),
            date: None,
            lang: None,
        }
    }
}

/// A task record as held by the remote task store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    #[serde(default)]
    pub due: Option<Due>,
}

impl Task {
    /// The task's due expression, if it has a due date.
    pub fn due_string(&self) -> Option<&str> {
        self.due.as_ref().map(|d| d.string.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_from_json_number_and_string() {
        let from_number: TaskId = serde_json::from_str("42").unwrap();
        let from_string: TaskId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "42");
    }

    #[test]
    fn test_task_id_serializes_as_string() {
        let id = TaskId::from(7u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_task_deserialize_with_due() {
        let json = r#"{
            "id": "2995104339",
            "content": "Buy milk",
            "due": {"string": "today", "date": "2026-10-19", "is_recurring": false}
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::from("2995104339"));
        assert_eq!(task.content, "Buy milk");
        assert_eq!(task.due_string(), Some("today"));
        assert_eq!(task.due.unwrap().date.as_deref(), Some("2026-10-19"));
    }

    #[test]
    fn test_task_deserialize_null_due() {
        let json = r#"{"id": "1", "content": "Someday", "due": null}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.due.is_none());
        assert_eq!(task.due_string(), None);
    }

    #[test]
    fn test_task_deserialize_missing_due() {
        let task: Task = serde_json::from_str(r#"{"id": 9, "content": "x"}"#).unwrap();
        assert_eq!(task.id.as_str(), "9");
        assert!(task.due.is_none());
    }
}
