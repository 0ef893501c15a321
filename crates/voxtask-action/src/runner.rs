//! Batch runner.
//!
//! Runs a batch of actions through preview, one user decision, and then
//! finalize-all or revert-all. The task store has no transactions, so the
//! all-or-nothing behaviour the user sees is built from per-action
//! compensating writes. Actions are processed strictly in batch order and a
//! failing action never stops the others.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::confirmation::{ConfirmationGate, Decision};
use crate::lifecycle::Action;
use crate::report::{ActionOutcome, BatchReport, BatchStatus};
use crate::store::TaskStore;
use crate::types::Phase;

/// Drives batches of actions against one task store.
pub struct BatchRunner {
    store: Arc<dyn TaskStore>,
}

impl BatchRunner {
    /// Create a runner over the given store.
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Preview every action, ask the gate once, then finalize or revert
    /// every action.
    ///
    /// An empty batch returns [`BatchStatus::Empty`] without prompting.
    pub async fn run(&self, actions: &mut [Action], gate: &dyn ConfirmationGate) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let span = info_span!("batch", %batch_id, size = actions.len());
        self.run_batch(batch_id, actions, gate).instrument(span).await
    }

    async fn run_batch(
        &self,
        batch_id: Uuid,
        actions: &mut [Action],
        gate: &dyn ConfirmationGate,
    ) -> BatchReport {
        let started_at = Utc::now();

        if actions.is_empty() {
            info!("No actions proposed");
            return BatchReport {
                batch_id,
                status: BatchStatus::Empty,
                previews: Vec::new(),
                resolutions: Vec::new(),
                feedback: None,
                started_at,
                finished_at: Utc::now(),
            };
        }

        let previews = self.apply_phase(actions, Phase::Preview).await;

        let (status, resolutions, feedback) = match gate.confirm(actions).await {
            Decision::Confirm => {
                let resolutions = self.apply_phase(actions, Phase::Finalize).await;
                info!("Actions have been confirmed and executed");
                (BatchStatus::Confirmed, resolutions, None)
            }
            Decision::Decline => {
                let resolutions = self.apply_phase(actions, Phase::Revert).await;
                info!("Actions have been canceled");
                let feedback = gate.feedback().await.filter(|f| !f.trim().is_empty());
                (BatchStatus::Canceled, resolutions, feedback)
            }
        };

        BatchReport {
            batch_id,
            status,
            previews,
            resolutions,
            feedback,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Run one phase over every action in order, collecting an outcome per
    /// action.
    async fn apply_phase(&self, actions: &mut [Action], phase: Phase) -> Vec<ActionOutcome> {
        let store = self.store.as_ref();
        let mut outcomes = Vec::with_capacity(actions.len());

        for (index, action) in actions.iter_mut().enumerate() {
            let result = match phase {
                Phase::Preview => action.preview(store).await,
                Phase::Finalize => action.finalize(store).await,
                Phase::Revert => action.revert(store).await,
            };

            if let Err(e) = &result {
                let task_id = action.effective_task_id().map(ToString::to_string);
                if e.is_contract_violation() {
                    error!(index, kind = %action.kind(), error = %e, "Action lifecycle violated");
                } else if phase == Phase::Finalize {
                    error!(
                        index,
                        task_id = task_id.as_deref().unwrap_or("-"),
                        kind = %action.kind(),
                        content = action.content().unwrap_or("-"),
                        due_string = action.effective_due().unwrap_or("-"),
                        due_lang = action.due_lang().unwrap_or("-"),
                        error = %e,
                        "An error occurred during finalization"
                    );
                } else {
                    warn!(
                        index,
                        task_id = task_id.as_deref().unwrap_or("-"),
                        kind = %action.kind(),
                        error = %e,
                        "An error occurred during {}",
                        phase
                    );
                }
            }

            outcomes.push(ActionOutcome {
                index,
                kind: action.kind(),
                task_id: action.effective_task_id().cloned(),
                phase,
                error: result.err(),
            });
        }

        outcomes
    }
}
