//! Action engine for voxtask.
//!
//! Turns interpreter output into staged task-store mutations and drives
//! them through the preview, confirm and finalize-or-revert protocol.

pub mod confirmation;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod lifecycle;
pub mod report;
pub mod runner;
pub mod store;
pub mod types;

pub use confirmation::{ConfirmationGate, Decision, ScriptedGate};
pub use diagnostics::{send_best_effort, DiagnosticsSink, InteractionLog};
pub use error::{ActionError, DiagnosticsError, InterpreterError, StoreError};
pub use interpreter::{
    build_actions, format_task_context, interpret_transcript, parse_descriptors, CommandInterpreter,
    Interpretation,
};
pub use lifecycle::Action;
pub use report::{ActionOutcome, BatchReport, BatchStatus};
pub use runner::BatchRunner;
pub use store::{DueUpdate, InMemoryTaskStore, StoreCall, StoreOp, TaskPatch, TaskStore};
pub use types::{ActionKind, ActionState, Phase, Recorded};
