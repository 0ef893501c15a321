//! User confirmation for a previewed batch.
//!
//! The whole batch is put to the user as one yes/no decision. This is the
//! only point where a run can be called off.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::lifecycle::Action;

/// The user's answer to a previewed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Decline,
}

/// Asks the user to accept or reject a previewed batch.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Present the previewed batch and wait for a decision.
    async fn confirm(&self, batch: &[Action]) -> Decision;

    /// Optionally collect free-text feedback after a decline.
    async fn feedback(&self) -> Option<String>;
}

/// Gate that answers from a queue of preset decisions.
///
/// Records the descriptions it was shown so callers can check what the
/// user would have seen. Runs out to `Decline`.
pub struct ScriptedGate {
    decisions: Mutex<VecDeque<Decision>>,
    feedback: Option<String>,
    shown: Mutex<Vec<Vec<String>>>,
}

impl ScriptedGate {
    /// Gate that answers with the given decisions, in order.
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into_iter().collect()),
            feedback: None,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn confirming() -> Self {
        Self::new([Decision::Confirm])
    }

    pub fn declining() -> Self {
        Self::new([Decision::Decline])
    }

    /// Feedback to hand back after a decline.
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// Batches presented so far, one entry per prompt.
    pub fn prompts(&self) -> Vec<Vec<String>> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ConfirmationGate for ScriptedGate {
    async fn confirm(&self, batch: &[Action]) -> Decision {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(batch.iter().map(Action::describe).collect());
        }
        self.decisions
            .lock()
            .ok()
            .and_then(|mut d| d.pop_front())
            .unwrap_or(Decision::Decline)
    }

    async fn feedback(&self) -> Option<String> {
        self.feedback.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_decisions_in_order() {
        let gate = ScriptedGate::new([Decision::Confirm, Decision::Decline]);
        assert_eq!(gate.confirm(&[]).await, Decision::Confirm);
        assert_eq!(gate.confirm(&[]).await, Decision::Decline);
    }

    #[tokio::test]
    async fn test_exhausted_gate_declines() {
        let gate = ScriptedGate::new(Vec::<Decision>::new());
        assert_eq!(gate.confirm(&[]).await, Decision::Decline);
    }

    #[tokio::test]
    async fn test_records_prompted_batch() {
        let gate = ScriptedGate::confirming();
        let batch = vec![
            Action::create("Call Bob", Some("tomorrow")),
            Action::create("Pay rent", None),
        ];
        gate.confirm(&batch).await;
        let prompts = gate.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0],
            vec!["create 'Call Bob' due tomorrow", "create 'Pay rent' due today"]
        );
    }

    #[tokio::test]
    async fn test_feedback() {
        assert_eq!(ScriptedGate::declining().feedback().await, None);
        let gate = ScriptedGate::declining().with_feedback("wrong task");
        assert_eq!(gate.feedback().await.as_deref(), Some("wrong task"));
    }
}
