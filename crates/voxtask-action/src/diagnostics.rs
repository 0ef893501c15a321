//! Interaction logging for diagnosing interpreter mistakes.
//!
//! Sending is best effort: a failing sink is logged locally and otherwise
//! ignored.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DiagnosticsError;
use crate::report::BatchStatus;

/// One user interaction, as sent to the diagnostics sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionLog {
    pub user_input: String,
    pub task_list: String,
    pub json_response: String,
    pub action_status: String,
    pub user_feedback: String,
    pub prompt_version: String,
}

impl InteractionLog {
    pub fn new(
        user_input: &str,
        task_list: &str,
        json_response: &str,
        status: BatchStatus,
        user_feedback: Option<&str>,
        prompt_version: &str,
    ) -> Self {
        Self {
            user_input: user_input.to_string(),
            task_list: task_list.to_string(),
            json_response: json_response.to_string(),
            action_status: status.to_string(),
            user_feedback: user_feedback.unwrap_or_default().to_string(),
            prompt_version: prompt_version.to_string(),
        }
    }
}

/// Destination for interaction logs.
#[async_trait]
pub trait DiagnosticsSink: Send + Sync {
    async fn send(&self, log: &InteractionLog) -> Result<(), DiagnosticsError>;
}

/// Send a log, swallowing and logging any failure.
///
/// Returns whether the sink accepted the record.
pub async fn send_best_effort(sink: &dyn DiagnosticsSink, log: &InteractionLog) -> bool {
    match sink.send(log).await {
        Ok(()) => {
            info!(action_status = %log.action_status, "Log data sent successfully");
            true
        }
        Err(e) => {
            warn!(error = %e, "An error occurred while sending log data");
            false
        }
    }
}
