//! Error types for the action engine.

use crate::types::{ActionKind, ActionState};
use voxtask_core::TaskId;

/// Errors from the remote task store.
///
/// Every variant is recoverable: callers log it against the action that
/// triggered it and carry on with the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),
    #[error("Task store returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Task store request failed: {0}")]
    Transport(String),
    #[error("Task store response could not be decoded: {0}")]
    Decode(String),
}

/// Errors from a single action's lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: ActionState, to: ActionState },
    #[error("Unsupported action kind: {0}")]
    UnsupportedKind(String),
    #[error("{0} action requires a task id")]
    MissingTaskId(ActionKind),
    #[error("{0} action requires content")]
    MissingContent(ActionKind),
    #[error("No preliminary task was staged for this create action")]
    NotStaged,
    #[error("Original state of task {0} was never captured")]
    OriginalsUnknown(TaskId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ActionError {
    /// Whether this error is a caller bug rather than a remote failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ActionError::InvalidStateTransition { .. })
    }
}

/// Errors from the command interpreter service.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    #[error("Interpreter request failed: {0}")]
    Request(String),
    #[error("Interpreter returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Interpreter response had no AIResponse field")]
    MissingResponse,
}

/// Errors from the diagnostics log sink.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
    #[error("Diagnostics request failed: {0}")]
    Request(String),
    #[error("Diagnostics sink returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound(TaskId::from("42"));
        assert_eq!(err.to_string(), "Task not found: 42");

        let err = StoreError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Task store returned HTTP 503: unavailable");
    }

    #[test]
    fn test_action_error_display() {
        let err = ActionError::InvalidStateTransition {
            from: ActionState::Proposed,
            to: ActionState::Finalized,
        };
        assert_eq!(err.to_string(), "Invalid state transition: proposed -> finalized");

        let err = ActionError::UnsupportedKind("delete".to_string());
        assert_eq!(err.to_string(), "Unsupported action kind: delete");

        let err = ActionError::MissingTaskId(ActionKind::Close);
        assert_eq!(err.to_string(), "close action requires a task id");
    }

    #[test]
    fn test_store_error_is_transparent_in_action_error() {
        let err: ActionError = StoreError::Transport("connection reset".to_string()).into();
        assert_eq!(err.to_string(), "Task store request failed: connection reset");
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_contract_violation_classification() {
        let err = ActionError::InvalidStateTransition {
            from: ActionState::Reverted,
            to: ActionState::Reverted,
        };
        assert!(err.is_contract_violation());
        assert!(!ActionError::NotStaged.is_contract_violation());
        assert!(!ActionError::UnsupportedKind("x".into()).is_contract_violation());
    }

    #[test]
    fn test_interpreter_error_display() {
        let err = InterpreterError::Http {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Interpreter returned HTTP 500: boom");
        assert_eq!(
            InterpreterError::MissingResponse.to_string(),
            "Interpreter response had no AIResponse field"
        );
    }
}
