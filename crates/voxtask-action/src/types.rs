//! Core enumerations for the action engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ActionError;

// =============================================================================
// Enums
// =============================================================================

/// Kind of mutation an action applies to the task store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Update,
    Close,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Create => write!(f, "create"),
            ActionKind::Update => write!(f, "update"),
            ActionKind::Close => write!(f, "close"),
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = ActionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ActionKind::Create),
            "update" => Ok(ActionKind::Update),
            "close" => Ok(ActionKind::Close),
            _ => Err(ActionError::UnsupportedKind(s.to_string())),
        }
    }
}

/// Lifecycle states of a single action.
///
/// `Proposed -> Previewed -> Finalized | Reverted`. Both terminal states
/// are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Proposed,
    Previewed,
    Finalized,
    Reverted,
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionState::Proposed => write!(f, "proposed"),
            ActionState::Previewed => write!(f, "previewed"),
            ActionState::Finalized => write!(f, "finalized"),
            ActionState::Reverted => write!(f, "reverted"),
        }
    }
}

/// Step of the batch protocol an outcome was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Preview,
    Finalize,
    Revert,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Preview => write!(f, "preview"),
            Phase::Finalize => write!(f, "finalize"),
            Phase::Revert => write!(f, "revert"),
        }
    }
}

// =============================================================================
// Lazily captured values
// =============================================================================

/// A value captured from the store at most once.
///
/// `Unfetched` is distinct from a known-empty value: `Known(None)` for a due
/// expression means "the task had no due date".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Recorded<T> {
    #[default]
    Unfetched,
    Known(T),
}

impl<T> Recorded<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Recorded::Known(_))
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Recorded::Known(v) => Some(v),
            Recorded::Unfetched => None,
        }
    }
}
