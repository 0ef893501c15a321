//! In-memory task store.
//!
//! Keeps tasks in a `Mutex<Vec<_>>`, records every call it receives and can
//! be told to fail specific operations. Used for tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use voxtask_core::{Due, Task, TaskId};

use super::{DueUpdate, TaskPatch, TaskStore};
use crate::error::StoreError;

/// Store operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    List,
    Get,
    Add,
    Update,
    Close,
    Delete,
}

/// A call received by the in-memory store, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List(String),
    Get(TaskId),
    Add(String),
    Update(TaskId, TaskPatch),
    Close(TaskId),
    Delete(TaskId),
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::List(_) => StoreOp::List,
            StoreCall::Get(_) => StoreOp::Get,
            StoreCall::Add(_) => StoreOp::Add,
            StoreCall::Update(..) => StoreOp::Update,
            StoreCall::Close(_) => StoreOp::Close,
            StoreCall::Delete(_) => StoreOp::Delete,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredTask {
    task: Task,
    closed: bool,
}

#[derive(Default)]
struct State {
    tasks: Vec<StoredTask>,
    next_id: u64,
    calls: Vec<StoreCall>,
    failures: Vec<(StoreOp, Option<TaskId>)>,
}

/// In-memory [`TaskStore`] with call log and failure injection.
pub struct InMemoryTaskStore {
    state: Mutex<State>,
}

impl InMemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                ..State::default()
            }),
        }
    }

    /// Create a store seeded with existing open tasks.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::new();
        for task in tasks {
            store.insert(task);
        }
        store
    }

    /// Insert or replace a task.
    pub fn insert(&self, task: Task) {
        let mut state = self.lock_state();
        state.tasks.retain(|t| t.task.id != task.id);
        if let Ok(n) = task.id.as_str().parse::<u64>() {
            state.next_id = state.next_id.max(n + 1);
        }
        state.tasks.push(StoredTask {
            task,
            closed: false,
        });
    }

    /// Current record of a task, open or closed.
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.lock_state()
            .tasks
            .iter()
            .find(|t| &t.task.id == id)
            .map(|t| t.task.clone())
    }

    /// Whether a task has been closed.
    pub fn is_closed(&self, id: &TaskId) -> bool {
        self.lock_state()
            .tasks
            .iter()
            .any(|t| &t.task.id == id && t.closed)
    }

    /// Number of tasks held, open or closed.
    pub fn len(&self) -> usize {
        self.lock_state().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock_state().calls.clone()
    }

    /// Number of calls received for one operation.
    pub fn call_count(&self, op: StoreOp) -> usize {
        self.lock_state()
            .calls
            .iter()
            .filter(|c| c.op() == op)
            .count()
    }

    /// Make every call of `op` fail.
    pub fn fail_on(&self, op: StoreOp) {
        self.lock_state().failures.push((op, None));
    }

    /// Make calls of `op` against one task fail.
    pub fn fail_on_task(&self, op: StoreOp, id: TaskId) {
        self.lock_state().failures.push((op, Some(id)));
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave `State` half-written.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a call and apply any injected failure for it.
    fn enter(
        &self,
        call: StoreCall,
        target: Option<&TaskId>,
    ) -> Result<MutexGuard<'_, State>, StoreError> {
        let mut state = self.lock_state();
        let op = call.op();
        state.calls.push(call);
        let injected = state
            .failures
            .iter()
            .any(|(f_op, f_id)| *f_op == op && (f_id.is_none() || f_id.as_ref() == target));
        if injected {
            return Err(StoreError::Transport(format!("injected {:?} failure", op)));
        }
        Ok(state)
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

fn find_mut<'a>(state: &'a mut State, id: &TaskId) -> Result<&'a mut StoredTask, StoreError> {
    state
        .tasks
        .iter_mut()
        .find(|t| &t.task.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_tasks(&self, filter: &str) -> Result<Vec<Task>, StoreError> {
        let state = self.enter(StoreCall::List(filter.to_string()), None)?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| !t.closed)
            .map(|t| t.task.clone())
            .collect())
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task, StoreError> {
        let mut state = self.enter(StoreCall::Get(id.clone()), Some(id))?;
        Ok(find_mut(&mut state, id)?.task.clone())
    }

    async fn add_task(
        &self,
        content: &str,
        due_string: Option<&str>,
        due_lang: Option<&str>,
    ) -> Result<Task, StoreError> {
        let mut state = self.enter(StoreCall::Add(content.to_string()), None)?;
        let id = loop {
            let candidate = TaskId::from(state.next_id);
            state.next_id += 1;
            if !state.tasks.iter().any(|t| t.task.id == candidate) {
                break candidate;
            }
        };
        let task = Task {
            id,
            content: content.to_string(),
            due: due_string.map(|s| Due {
                string: s.to_string(),
                date: None,
                lang: due_lang.map(str::to_string),
            }),
        };
        state.tasks.push(StoredTask {
            task: task.clone(),
            closed: false,
        });
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let mut state = self.enter(StoreCall::Update(id.clone(), patch.clone()), Some(id))?;
        let stored = find_mut(&mut state, id)?;
        stored.task.content = patch.content.clone();
        match &patch.due {
            DueUpdate::Keep => {}
            DueUpdate::Clear => stored.task.due = None,
            DueUpdate::Set { string, lang } => {
                stored.task.due = Some(Due {
                    string: string.clone(),
                    date: None,
                    lang: lang.clone(),
                })
            }
        }
        Ok(())
    }

    async fn close_task(&self, id: &TaskId) -> Result<(), StoreError> {
        let mut state = self.enter(StoreCall::Close(id.clone()), Some(id))?;
        find_mut(&mut state, id)?.closed = true;
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), StoreError> {
        let mut state = self.enter(StoreCall::Delete(id.clone()), Some(id))?;
        let index = state
            .tasks
            .iter()
            .position(|t| &t.task.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        state.tasks.remove(index);
        Ok(())
    }
}
