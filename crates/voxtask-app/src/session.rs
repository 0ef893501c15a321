//! One interaction cycle: snapshot, interpret, run the batch, log.

use std::sync::Arc;

use tracing::{error, info, warn};
use voxtask_action::{
    interpret_transcript, send_best_effort, BatchReport, BatchRunner, BatchStatus,
    CommandInterpreter, ConfirmationGate, DiagnosticsSink, InteractionLog, StoreError, TaskStore,
};
use voxtask_core::VoxtaskConfig;

/// Per-session knobs resolved from config and CLI.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub filter: String,
    pub due_lang: Option<String>,
    pub prompt_version: String,
    pub send_on_confirm: bool,
}

impl SessionSettings {
    pub fn from_config(config: &VoxtaskConfig, filter: String) -> Self {
        Self {
            filter,
            due_lang: config.session.due_lang.clone(),
            prompt_version: config.diagnostics.prompt_version.clone(),
            send_on_confirm: config.diagnostics.send_on_confirm,
        }
    }
}

/// Wires the task store, interpreter and diagnostics sink together.
pub struct Session {
    store: Arc<dyn TaskStore>,
    interpreter: Arc<dyn CommandInterpreter>,
    diagnostics: Option<Arc<dyn DiagnosticsSink>>,
    runner: BatchRunner,
    settings: SessionSettings,
}

impl Session {
    pub fn new(
        store: Arc<dyn TaskStore>,
        interpreter: Arc<dyn CommandInterpreter>,
        diagnostics: Option<Arc<dyn DiagnosticsSink>>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            runner: BatchRunner::new(Arc::clone(&store)),
            store,
            interpreter,
            diagnostics,
            settings,
        }
    }

    /// Run one transcript through the whole pipeline.
    ///
    /// Failing to list tasks ends the cycle before anything is proposed.
    pub async fn run_cycle(
        &self,
        transcript: &str,
        gate: &dyn ConfirmationGate,
    ) -> Result<BatchReport, StoreError> {
        let snapshot = self
            .store
            .list_tasks(&self.settings.filter)
            .await
            .map_err(|e| {
                error!(filter = %self.settings.filter, error = %e, "Failed to list tasks");
                e
            })?;
        info!(count = snapshot.len(), "Task snapshot loaded");

        let interpretation = interpret_transcript(
            self.interpreter.as_ref(),
            transcript,
            &snapshot,
            self.settings.due_lang.as_deref(),
        )
        .await;

        let mut actions = interpretation.actions;
        let report = self.runner.run(&mut actions, gate).await;

        if report.has_failures() {
            warn!(
                batch_id = %report.batch_id,
                failures = report.failures().count(),
                "Batch finished with failures"
            );
        }

        if self.should_log(report.status) {
            if let Some(sink) = &self.diagnostics {
                let log = InteractionLog::new(
                    transcript,
                    &interpretation.task_context,
                    &interpretation.payload,
                    report.status,
                    report.feedback.as_deref(),
                    &self.settings.prompt_version,
                );
                send_best_effort(sink.as_ref(), &log).await;
            }
        }

        Ok(report)
    }

    fn should_log(&self, status: BatchStatus) -> bool {
        match status {
            BatchStatus::Canceled => true,
            BatchStatus::Confirmed => self.settings.send_on_confirm,
            BatchStatus::Empty => false,
        }
    }
}

/// Lines to show the user once a batch is done.
pub fn summarize(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![match report.status {
        BatchStatus::Confirmed if report.is_partial() => {
            "Actions were confirmed, but some could not be applied:".to_string()
        }
        BatchStatus::Canceled if report.is_partial() => {
            "Actions were canceled, but some could not be undone:".to_string()
        }
        BatchStatus::Confirmed => "Actions have been confirmed and executed.".to_string(),
        BatchStatus::Canceled => "Actions have been canceled.".to_string(),
        BatchStatus::Empty => "No actions proposed.".to_string(),
    }];
    lines.extend(report.failure_lines().into_iter().map(|l| format!("  {l}")));
    lines
}
