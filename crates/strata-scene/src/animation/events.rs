//! Animation lifecycle events.
//!
//! Every animation emits `Start` when admitted, `Stop` when it stops running
//! for any reason, and `End` only on natural completion. A completed
//! animation therefore observes `Start, Stop, End` in that order; a cancelled
//! one observes `Start, Stop`. Layer-level aggregate listeners receive the
//! same events immediately after the per-animation listeners.

use serde::{Deserialize, Serialize};

use super::types::AnimationId;
use crate::layer::LayerId;

/// The lifecycle event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationEventKind {
    /// The animation was admitted and is running.
    Start,
    /// The animation stopped running (completion or cancellation).
    Stop,
    /// The animation completed naturally. Never fired on cancellation.
    End,
}

/// Event payload delivered to lifecycle listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    /// Which lifecycle transition occurred.
    pub kind: AnimationEventKind,
    /// The animation this event belongs to.
    pub animation: AnimationId,
    /// The layer owning the animation.
    pub layer: LayerId,
}

impl AnimationEvent {
    /// Check if this is a start event.
    pub fn is_start(&self) -> bool {
        self.kind == AnimationEventKind::Start
    }

    /// Check if this is a stop event.
    pub fn is_stop(&self) -> bool {
        self.kind == AnimationEventKind::Stop
    }

    /// Check if this is an end event.
    pub fn is_end(&self) -> bool {
        self.kind == AnimationEventKind::End
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        let event = AnimationEvent {
            kind: AnimationEventKind::Stop,
            animation: AnimationId(7),
            layer: LayerId(3),
        };
        assert!(!event.is_start());
        assert!(event.is_stop());
        assert!(!event.is_end());
    }

    #[test]
    fn test_event_serialization() {
        let event = AnimationEvent {
            kind: AnimationEventKind::End,
            animation: AnimationId(42),
            layer: LayerId(9),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("end"));
        assert!(json.contains("42"));

        let parsed: AnimationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
