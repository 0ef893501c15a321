//! Preview annotations written into task content while a batch awaits
//! confirmation.

/// Due expression applied to creates that arrive without one.
pub const DEFAULT_DUE: &str = "today";

/// Warning appended to creates whose due date was defaulted.
pub const MISSING_DUE_WARNING: &str = "⚠️ Warning: No due date specified";

/// Marker every preview label ends with.
pub const AWAITING: &str = "awaiting confirmation";

/// Content of a staged create.
pub fn create_preview(content: &str, due_defaulted: bool) -> String {
    let warning = if due_defaulted {
        format!(" {}", MISSING_DUE_WARNING)
    } else {
        String::new()
    };
    format!("{} {} (🎉 created, {})", content, warning, AWAITING)
}

/// Content of a staged update, mentioning only the fields that change.
pub fn update_preview(
    content: &str,
    original_content: &str,
    due: Option<&str>,
    original_due: Option<&str>,
) -> String {
    let content_changed = content != original_content;
    let due_changed = due != original_due;
    let old_due = original_due.unwrap_or("no due date");

    match (content_changed, due_changed) {
        (true, true) => format!(
            "{} (🛠️ modified, from {} and due date from {}, {})",
            content, original_content, old_due, AWAITING
        ),
        (true, false) => format!(
            "{} (🛠️ modified, from {}, {})",
            content, original_content, AWAITING
        ),
        (false, true) => format!(
            "{} (🛠️ due date modified, from {}, {})",
            content, old_due, AWAITING
        ),
        (false, false) => format!("{} ({})", content, AWAITING),
    }
}

/// Content of a task staged for closing.
pub fn close_preview(label: &str) -> String {
    format!("~~{}~~ ( ❌, {})", label, AWAITING)
}
