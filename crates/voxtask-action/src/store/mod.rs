//! Task store port.
//!
//! The remote to-do service is the system of record. The action engine only
//! talks to it through [`TaskStore`]; live adapters live in `voxtask-remote`.

pub mod memory;

pub use memory::{InMemoryTaskStore, StoreCall, StoreOp};

use async_trait::async_trait;
use voxtask_core::{Task, TaskId};

use crate::error::StoreError;

/// How an update treats the task's due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueUpdate {
    /// Leave the current due date untouched.
    Keep,
    /// Remove the due date.
    Clear,
    /// Set a natural-language due expression.
    Set {
        string: String,
        lang: Option<String>,
    },
}

impl DueUpdate {
    pub fn set(string: impl Into<String>, lang: Option<&str>) -> Self {
        DueUpdate::Set {
            string: string.into(),
            lang: lang.map(str::to_string),
        }
    }
}

/// Full overwrite of a task's content plus a due-date change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    pub content: String,
    pub due: DueUpdate,
}

impl TaskPatch {
    pub fn new(content: impl Into<String>, due: DueUpdate) -> Self {
        Self {
            content: content.into(),
            due,
        }
    }
}

/// Capability interface over the remote task service.
///
/// Every call may fail with a [`StoreError`]; none of them is fatal to a
/// batch.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// List open tasks matching a filter query.
    async fn list_tasks(&self, filter: &str) -> Result<Vec<Task>, StoreError>;

    /// Fetch a single task.
    async fn get_task(&self, id: &TaskId) -> Result<Task, StoreError>;

    /// Create a task and return it with its store-assigned id.
    async fn add_task(
        &self,
        content: &str,
        due_string: Option<&str>,
        due_lang: Option<&str>,
    ) -> Result<Task, StoreError>;

    /// Overwrite a task's content and apply a due-date change.
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError>;

    /// Complete a task.
    async fn close_task(&self, id: &TaskId) -> Result<(), StoreError>;

    /// Permanently remove a task.
    async fn delete_task(&self, id: &TaskId) -> Result<(), StoreError>;
}
