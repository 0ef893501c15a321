//! Conversion of descriptors into actions, plus the task context the
//! interpreter is given.

use tracing::warn;
use voxtask_core::Task;

use super::payload::ActionDescriptor;
use crate::lifecycle::Action;
use crate::types::ActionKind;

/// Flatten a task snapshot into the listing the interpreter reads.
pub fn format_task_context(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| format!("Task ID: {}, Content: '{}'\n", t.id, t.content))
        .collect()
}

/// Turn descriptors into actions, in order.
///
/// Descriptors with an unknown kind or missing required fields are logged
/// and skipped. Update and close targets found in `snapshot` get their
/// originals seeded from it; the rest are fetched lazily on preview.
pub fn build_actions(
    descriptors: Vec<ActionDescriptor>,
    snapshot: &[Task],
    default_lang: Option<&str>,
) -> Vec<Action> {
    let mut actions = Vec::with_capacity(descriptors.len());

    for (index, d) in descriptors.into_iter().enumerate() {
        let kind = match d.action.parse::<ActionKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(index, error = %e, "Skipping descriptor");
                continue;
            }
        };

        let due_lang = d.due_lang.or_else(|| default_lang.map(str::to_string));
        let action = match Action::new(kind, d.task_id, d.content, d.due_string, due_lang) {
            Ok(action) => action,
            Err(e) => {
                warn!(index, error = %e, "Skipping descriptor");
                continue;
            }
        };

        let known = action
            .task_id()
            .and_then(|id| snapshot.iter().find(|t| &t.id == id));
        actions.push(match known {
            Some(task) => action.with_originals(task.content.clone(), task.due_string()),
            None => action,
        });
    }

    actions
}
