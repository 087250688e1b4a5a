//! Identifier and state types for the animation engine.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an animation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Current state of an animation.
///
/// The machine is `Idle → Running → {Completed, Cancelled}`; the terminal
/// states are absorbing. `Idle` exists only between construction and
/// admission inside `Layer::animate`, which always promotes to `Running`
/// before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Created but not yet admitted to a layer.
    Idle,
    /// Actively advancing each tick.
    Running,
    /// Reached progress 1.0 and retired.
    Completed,
    /// Cancelled before completion (explicitly or by supersession).
    Cancelled,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::Idle
    }
}

impl AnimationState {
    /// Check if this state is terminal (no further transitions occur).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_ids_are_unique() {
        let a = AnimationId::next();
        let b = AnimationId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AnimationState::Idle.is_terminal());
        assert!(!AnimationState::Running.is_terminal());
        assert!(AnimationState::Completed.is_terminal());
        assert!(AnimationState::Cancelled.is_terminal());
    }

    #[test]
    fn test_default_state() {
        assert_eq!(AnimationState::default(), AnimationState::Idle);
    }
}
