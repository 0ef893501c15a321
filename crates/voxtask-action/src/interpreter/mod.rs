//! Command interpreter boundary.
//!
//! The interpreter is a remote service that maps a transcript plus a task
//! listing to a list of action descriptors. Its answer is untrusted text:
//! the payload is extracted, parsed leniently and converted into actions.

pub mod build;
pub mod payload;

pub use build::{build_actions, format_task_context};
pub use payload::{extract_payload, parse_descriptors, ActionDescriptor};

use async_trait::async_trait;
use tracing::{info, warn};
use voxtask_core::Task;

use crate::error::InterpreterError;
use crate::lifecycle::Action;

/// Remote service turning free-form text into action descriptors.
#[async_trait]
pub trait CommandInterpreter: Send + Sync {
    /// Send the transcript and flattened task listing; return the raw
    /// response text, which may wrap the payload in prose or fences.
    async fn interpret(
        &self,
        transcript: &str,
        task_context: &str,
    ) -> Result<String, InterpreterError>;
}

/// Outcome of interpreting one transcript.
#[derive(Debug, Clone)]
pub struct Interpretation {
    /// Task listing that was sent as context.
    pub task_context: String,
    /// Extracted payload text, kept for diagnostics.
    pub payload: String,
    pub actions: Vec<Action>,
}

/// Ask the interpreter for actions against the given snapshot.
///
/// An unreachable interpreter or unparseable answer yields no actions.
pub async fn interpret_transcript(
    interpreter: &dyn CommandInterpreter,
    transcript: &str,
    snapshot: &[Task],
    default_lang: Option<&str>,
) -> Interpretation {
    let task_context = format_task_context(snapshot);

    let response = match interpreter.interpret(transcript, &task_context).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Interpreter unavailable; no actions proposed");
            return Interpretation {
                task_context,
                payload: String::new(),
                actions: Vec::new(),
            };
        }
    };

    let payload = extract_payload(&response).to_string();
    let actions = build_actions(parse_descriptors(&response), snapshot, default_lang);
    info!(count = actions.len(), "Interpreter proposed actions");

    Interpretation {
        task_context,
        payload,
        actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxtask_core::{Due, TaskId};

    struct FixedInterpreter(Result<&'static str, ()>);

    #[async_trait]
    impl CommandInterpreter for FixedInterpreter {
        async fn interpret(&self, _: &str, _: &str) -> Result<String, InterpreterError> {
            self.0
                .map(str::to_string)
                .map_err(|_| InterpreterError::Request("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_interpret_fenced_response() {
        let interpreter = FixedInterpreter(Ok(
            "Here are the actions:\n```json\n[{\"action\":\"create\",\"content\":\"Call Bob\",\"due_string\":\"tomorrow\"}]\n```",
        ));
        let result =
            interpret_transcript(&interpreter, "remind me to call Bob tomorrow", &[], None).await;
        assert_eq!(result.actions.len(), 1);
        assert_eq!(result.task_context, "");
        assert!(result.payload.starts_with('['));
    }

    #[tokio::test]
    async fn test_interpreter_failure_yields_no_actions() {
        let interpreter = FixedInterpreter(Err(()));
        let snapshot = vec![Task {
            id: TaskId::from("1"),
            content: "a".into(),
            due: Some(Due::new("today")),
        }];
        let result = interpret_transcript(&interpreter, "close a", &snapshot, None).await;
        assert!(result.actions.is_empty());
        assert_eq!(result.task_context, "Task ID: 1, Content: 'a'\n");
    }

    #[tokio::test]
    async fn test_garbage_response_yields_no_actions() {
        let interpreter = FixedInterpreter(Ok("Sorry, I can't help with that."));
        let result = interpret_transcript(&interpreter, "??", &[], None).await;
        assert!(result.actions.is_empty());
        assert_eq!(result.payload, "Sorry, I can't help with that.");
    }
}
