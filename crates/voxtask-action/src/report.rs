//! Per-action outcomes and the batch report.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;
use voxtask_core::TaskId;

use crate::error::ActionError;
use crate::types::{ActionKind, Phase};

/// Overall result of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The user accepted; every action was finalized.
    Confirmed,
    /// The user declined; every action was reverted.
    Canceled,
    /// There was nothing to propose.
    Empty,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Confirmed => write!(f, "confirmed"),
            BatchStatus::Canceled => write!(f, "canceled"),
            BatchStatus::Empty => write!(f, "empty"),
        }
    }
}

/// Result of running one phase on one action.
#[derive(Debug)]
pub struct ActionOutcome {
    /// Position of the action in the batch.
    pub index: usize,
    pub kind: ActionKind,
    pub task_id: Option<TaskId>,
    pub phase: Phase,
    pub error: Option<ActionError>,
}

impl ActionOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything that happened during one batch run.
#[derive(Debug)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub status: BatchStatus,
    /// One outcome per action from the preview phase.
    pub previews: Vec<ActionOutcome>,
    /// One outcome per action from finalize (confirmed) or revert (canceled).
    pub resolutions: Vec<ActionOutcome>,
    /// Free-text feedback given after a decline.
    pub feedback: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    /// Outcomes that failed, in phase order.
    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.previews
            .iter()
            .chain(self.resolutions.iter())
            .filter(|o| !o.is_ok())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Whether a finalize or revert failed, leaving the store only partly
    /// committed or partly restored.
    pub fn is_partial(&self) -> bool {
        self.resolutions.iter().any(|o| !o.is_ok())
    }

    /// One line per failed outcome, for display to the user.
    pub fn failure_lines(&self) -> Vec<String> {
        self.failures()
            .map(|o| {
                let target = o
                    .task_id
                    .as_ref()
                    .map(|id| format!(" task {}", id))
                    .unwrap_or_default();
                let error = o
                    .error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                format!("#{} {}{} ({}): {}", o.index + 1, o.kind, target, o.phase, error)
            })
            .collect()
    }
}
