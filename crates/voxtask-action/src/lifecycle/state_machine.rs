//! Action state machine with validated transitions.
//!
//! Proposed -> Previewed -> Finalized | Reverted

use crate::error::ActionError;
use crate::types::ActionState;

/// Validate that a lifecycle transition is allowed.
///
/// Valid transitions:
/// - Proposed -> Previewed
/// - Previewed -> Finalized
/// - Previewed -> Reverted
pub fn validate_transition(from: ActionState, to: ActionState) -> Result<(), ActionError> {
    let valid = matches!(
        (from, to),
        (ActionState::Proposed, ActionState::Previewed)
            | (ActionState::Previewed, ActionState::Finalized)
            | (ActionState::Previewed, ActionState::Reverted)
    );

    if valid {
        Ok(())
    } else {
        Err(ActionError::InvalidStateTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [ActionState; 4] = [
        ActionState::Proposed,
        ActionState::Previewed,
        ActionState::Finalized,
        ActionState::Reverted,
    ];

    #[test]
    fn test_proposed_to_previewed() {
        assert!(validate_transition(ActionState::Proposed, ActionState::Previewed).is_ok());
    }

    #[test]
    fn test_previewed_to_terminal_states() {
        assert!(validate_transition(ActionState::Previewed, ActionState::Finalized).is_ok());
        assert!(validate_transition(ActionState::Previewed, ActionState::Reverted).is_ok());
    }

    #[test]
    fn test_terminal_without_preview_invalid() {
        assert!(validate_transition(ActionState::Proposed, ActionState::Finalized).is_err());
        assert!(validate_transition(ActionState::Proposed, ActionState::Reverted).is_err());
    }

    #[test]
    fn test_preview_twice_invalid() {
        assert!(validate_transition(ActionState::Previewed, ActionState::Previewed).is_err());
    }

    #[test]
    fn test_no_exit_from_terminal_states() {
        for from in [ActionState::Finalized, ActionState::Reverted] {
            for to in ALL_STATES {
                assert!(
                    validate_transition(from, to).is_err(),
                    "{} -> {} should be rejected",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_all_valid_transitions_count() {
        let mut valid_count = 0;
        for from in ALL_STATES {
            for to in ALL_STATES {
                if validate_transition(from, to).is_ok() {
                    valid_count += 1;
                }
            }
        }
        assert_eq!(valid_count, 3, "Expected exactly 3 valid transitions");
    }

    #[test]
    fn test_invalid_transition_error_names_both_states() {
        let err = validate_transition(ActionState::Finalized, ActionState::Reverted).unwrap_err();
        assert!(err.is_contract_violation());
        let msg = err.to_string();
        assert!(msg.contains("finalized"));
        assert!(msg.contains("reverted"));
    }
}
