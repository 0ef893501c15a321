//! Action entity and its lifecycle.
//!
//! An [`Action`] is one proposed mutation against the task store. It is
//! previewed as a visible, reversible write and then either finalized or
//! reverted. Each step is guarded by the state machine in
//! [`state_machine`].

pub mod label;
pub mod state_machine;

use tracing::{debug, info};
use voxtask_core::TaskId;

use crate::error::ActionError;
use crate::lifecycle::label::DEFAULT_DUE;
use crate::lifecycle::state_machine::validate_transition;
use crate::store::{DueUpdate, TaskPatch, TaskStore};
use crate::types::{ActionKind, ActionState, Recorded};

/// A proposed create, update or close against the task store.
///
/// Only the captured originals and the preliminary task id change after
/// construction, apart from the lifecycle state itself.
#[derive(Debug, Clone)]
pub struct Action {
    kind: ActionKind,
    task_id: Option<TaskId>,
    content: Option<String>,
    due_expression: Option<String>,
    due_lang: Option<String>,
    original_content: Recorded<String>,
    original_due: Recorded<Option<String>>,
    preliminary_task_id: Option<TaskId>,
    state: ActionState,
}

impl Action {
    /// Build an action, checking the fields its kind requires.
    ///
    /// Update and Close need a target task id; Create needs content.
    pub fn new(
        kind: ActionKind,
        task_id: Option<TaskId>,
        content: Option<String>,
        due_expression: Option<String>,
        due_lang: Option<String>,
    ) -> Result<Self, ActionError> {
        match kind {
            ActionKind::Create if content.is_none() => {
                return Err(ActionError::MissingContent(kind))
            }
            ActionKind::Update | ActionKind::Close if task_id.is_none() => {
                return Err(ActionError::MissingTaskId(kind))
            }
            _ => {}
        }

        Ok(Self {
            kind,
            // A create has no target until its preliminary task exists.
            task_id: if kind == ActionKind::Create { None } else { task_id },
            content,
            due_expression,
            due_lang,
            original_content: Recorded::Unfetched,
            original_due: Recorded::Unfetched,
            preliminary_task_id: None,
            state: ActionState::Proposed,
        })
    }

    /// Create a new task.
    pub fn create(content: impl Into<String>, due_expression: Option<&str>) -> Self {
        Self {
            kind: ActionKind::Create,
            task_id: None,
            content: Some(content.into()),
            due_expression: due_expression.map(str::to_string),
            due_lang: None,
            original_content: Recorded::Unfetched,
            original_due: Recorded::Unfetched,
            preliminary_task_id: None,
            state: ActionState::Proposed,
        }
    }

    /// Rewrite an existing task. `None` fields keep the task's current value.
    pub fn update(task_id: TaskId, content: Option<&str>, due_expression: Option<&str>) -> Self {
        Self {
            kind: ActionKind::Update,
            task_id: Some(task_id),
            content: content.map(str::to_string),
            due_expression: due_expression.map(str::to_string),
            due_lang: None,
            original_content: Recorded::Unfetched,
            original_due: Recorded::Unfetched,
            preliminary_task_id: None,
            state: ActionState::Proposed,
        }
    }

    /// Complete an existing task. `label` is only used for display.
    pub fn close(task_id: TaskId, label: Option<&str>) -> Self {
        Self {
            kind: ActionKind::Close,
            task_id: Some(task_id),
            content: label.map(str::to_string),
            due_expression: None,
            due_lang: None,
            original_content: Recorded::Unfetched,
            original_due: Recorded::Unfetched,
            preliminary_task_id: None,
            state: ActionState::Proposed,
        }
    }

    /// Set the locale due expressions are parsed with.
    pub fn with_due_lang(mut self, lang: Option<&str>) -> Self {
        self.due_lang = lang.map(str::to_string);
        self
    }

    /// Supply the target task's pre-action values so preview need not
    /// fetch them.
    pub fn with_originals(mut self, content: impl Into<String>, due: Option<&str>) -> Self {
        if self.kind != ActionKind::Create {
            self.original_content = Recorded::Known(content.into());
            self.original_due = Recorded::Known(due.map(str::to_string));
        }
        self
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn due_expression(&self) -> Option<&str> {
        self.due_expression.as_deref()
    }

    pub fn due_lang(&self) -> Option<&str> {
        self.due_lang.as_deref()
    }

    pub fn original_content(&self) -> &Recorded<String> {
        &self.original_content
    }

    pub fn original_due(&self) -> &Recorded<Option<String>> {
        &self.original_due
    }

    pub fn preliminary_task_id(&self) -> Option<&TaskId> {
        self.preliminary_task_id.as_ref()
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Task the action currently points at: the target for update/close,
    /// the preliminary task for a staged create.
    pub fn effective_task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref().or(self.preliminary_task_id.as_ref())
    }

    /// Due expression a create is written with, defaulting to `today`.
    pub fn effective_due(&self) -> Option<&str> {
        match self.kind {
            ActionKind::Create => Some(self.due_expression.as_deref().unwrap_or(DEFAULT_DUE)),
            _ => self.due_expression.as_deref(),
        }
    }

    /// Short human-readable summary for prompts and logs.
    pub fn describe(&self) -> String {
        let subject = self
            .content
            .as_deref()
            .or_else(|| self.original_content.known().map(String::as_str))
            .unwrap_or("<untitled>");
        let target = self
            .task_id
            .as_ref()
            .map(|id| format!(" #{}", id))
            .unwrap_or_default();
        match (self.kind, self.effective_due()) {
            (ActionKind::Close, _) | (_, None) => {
                format!("{}{} '{}'", self.kind, target, subject)
            }
            (_, Some(due)) => format!("{}{} '{}' due {}", self.kind, target, subject, due),
        }
    }

    fn advance(&mut self, to: ActionState) -> Result<(), ActionError> {
        validate_transition(self.state, to)?;
        self.state = to;
        Ok(())
    }

    fn target(&self) -> Result<&TaskId, ActionError> {
        self.task_id
            .as_ref()
            .ok_or(ActionError::MissingTaskId(self.kind))
    }

    /// Fetch the target's current content and due expression, at most once.
    async fn ensure_originals(
        &mut self,
        store: &dyn TaskStore,
    ) -> Result<(String, Option<String>), ActionError> {
        if let (Recorded::Known(content), Recorded::Known(due)) =
            (&self.original_content, &self.original_due)
        {
            return Ok((content.clone(), due.clone()));
        }

        let id = self.target()?.clone();
        let task = store.get_task(&id).await?;
        debug!(task_id = %id, "Captured original task state");
        if !self.original_content.is_known() {
            self.original_content = Recorded::Known(task.content.clone());
        }
        if !self.original_due.is_known() {
            self.original_due = Recorded::Known(task.due_string().map(str::to_string));
        }
        Ok((
            self.original_content.known().cloned().unwrap_or(task.content),
            self.original_due.known().cloned().flatten(),
        ))
    }

    // =========================================================================
    // Preview
    // =========================================================================

    /// Apply the speculative, visibly annotated write.
    ///
    /// The action counts as previewed even if the write fails, so the batch
    /// can still finalize or revert it.
    pub async fn preview(&mut self, store: &dyn TaskStore) -> Result<(), ActionError> {
        self.advance(ActionState::Previewed)?;
        match self.kind {
            ActionKind::Create => self.preview_create(store).await,
            ActionKind::Update => self.preview_update(store).await,
            ActionKind::Close => self.preview_close(store).await,
        }
    }

    async fn preview_create(&mut self, store: &dyn TaskStore) -> Result<(), ActionError> {
        let content = self
            .content
            .as_deref()
            .ok_or(ActionError::MissingContent(self.kind))?;
        let due_defaulted = self.due_expression.is_none();
        let due = self.effective_due().unwrap_or(DEFAULT_DUE);
        info!(content, due, "Preview: creating task");

        let staged = store
            .add_task(
                &label::create_preview(content, due_defaulted),
                Some(due),
                self.due_lang.as_deref(),
            )
            .await?;
        self.preliminary_task_id = Some(staged.id);
        Ok(())
    }

    async fn preview_update(&mut self, store: &dyn TaskStore) -> Result<(), ActionError> {
        let (original_content, original_due) = self.ensure_originals(store).await?;
        let id = self.target()?;
        let content = self.content.as_deref().unwrap_or(&original_content);
        let due = self.due_expression.as_deref().or(original_due.as_deref());
        info!(task_id = %id, content, due, "Preview: updating task");

        let patch = TaskPatch::new(
            label::update_preview(content, &original_content, due, original_due.as_deref()),
            self.due_write(),
        );
        store.update_task(id, &patch).await?;
        Ok(())
    }

    async fn preview_close(&mut self, store: &dyn TaskStore) -> Result<(), ActionError> {
        let (original_content, _) = self.ensure_originals(store).await?;
        let id = self.target()?;
        let shown = self.content.as_deref().unwrap_or(&original_content);
        info!(task_id = %id, content = shown, "Preview: marking task as will-be-closed");

        let patch = TaskPatch::new(label::close_preview(shown), DueUpdate::Keep);
        store.update_task(id, &patch).await?;
        Ok(())
    }

    /// Whether preview writes a new due date. Only an update carrying a due
    /// expression does; everything else leaves the stored due alone.
    fn previews_due_change(&self) -> bool {
        self.kind == ActionKind::Update && self.due_expression.is_some()
    }

    fn due_write(&self) -> DueUpdate {
        match self.effective_due() {
            Some(due) => DueUpdate::set(due, self.due_lang.as_deref()),
            None => DueUpdate::Keep,
        }
    }

    // =========================================================================
    // Finalize
    // =========================================================================

    /// Commit the real effect of a previewed action.
    pub async fn finalize(&mut self, store: &dyn TaskStore) -> Result<(), ActionError> {
        self.advance(ActionState::Finalized)?;
        match self.kind {
            ActionKind::Create => {
                let id = self
                    .preliminary_task_id
                    .as_ref()
                    .ok_or(ActionError::NotStaged)?;
                let content = self
                    .content
                    .as_deref()
                    .ok_or(ActionError::MissingContent(self.kind))?;
                info!(task_id = %id, content, "Finalizing: creating task");
                store
                    .update_task(id, &TaskPatch::new(content, self.due_write()))
                    .await?;
            }
            ActionKind::Update => {
                let id = self.target()?;
                let content = match (&self.content, &self.original_content) {
                    (Some(content), _) => content.clone(),
                    (None, Recorded::Known(original)) => original.clone(),
                    (None, Recorded::Unfetched) => {
                        return Err(ActionError::OriginalsUnknown(id.clone()))
                    }
                };
                info!(task_id = %id, content = %content, "Finalizing: updating task");
                store
                    .update_task(id, &TaskPatch::new(content, self.due_write()))
                    .await?;
            }
            ActionKind::Close => {
                let id = self.target()?;
                info!(task_id = %id, "Finalizing: closing task");
                store.close_task(id).await?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Revert
    // =========================================================================

    /// Undo the speculative write of a previewed action.
    ///
    /// When preview never got as far as writing (no preliminary task, or the
    /// originals were never captured) there is nothing to undo.
    pub async fn revert(&mut self, store: &dyn TaskStore) -> Result<(), ActionError> {
        self.advance(ActionState::Reverted)?;
        match self.kind {
            ActionKind::Create => {
                let Some(id) = self.preliminary_task_id.as_ref() else {
                    debug!("Reverting: no preliminary task was staged");
                    return Ok(());
                };
                info!(task_id = %id, "Reverting: deleting preliminary task");
                store.delete_task(id).await?;
            }
            ActionKind::Update | ActionKind::Close => {
                let id = self.target()?;
                let (Recorded::Known(content), Recorded::Known(due)) =
                    (&self.original_content, &self.original_due)
                else {
                    debug!(task_id = %id, "Reverting: preview never wrote to this task");
                    return Ok(());
                };
                info!(task_id = %id, "Reverting: restoring original task state");
                let due = match due {
                    _ if !self.previews_due_change() => DueUpdate::Keep,
                    Some(due) => DueUpdate::set(due.clone(), self.due_lang.as_deref()),
                    None => DueUpdate::Clear,
                };
                store
                    .update_task(id, &TaskPatch::new(content.clone(), due))
                    .await?;
            }
        }
        Ok(())
    }
}
