//! State machine trait for status enums.
//!
//! Lifecycle enums (order-line fulfillment today) implement this so every
//! transition goes through one validated entry point.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list their edges; `transition_to` and `is_terminal`
/// are derived from them.
///
/// ```ignore
/// let next = FulfillmentStatus::Pending.transition_to(FulfillmentStatus::Fulfilled)?;
/// assert!(next.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
