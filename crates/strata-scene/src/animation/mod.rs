//! Curve-driven property animation.
//!
//! This module provides:
//! - **Curves**: duration + easing timing functions
//! - **Animations**: in-flight transitions of layer properties with a
//!   `Start`/`Stop`/`End` lifecycle
//! - **Scheduler**: per-frame advancement bound to a renderer loop
//!
//! # Architecture
//!
//! ```text
//! RendererLoop (tick: delta seconds)
//!   └── Scheduler
//!         ├── Animation (elapsed clock → Curve → interpolated values)
//!         │     └── writes through the owning Layer's PropertyStore
//!         └── retires completed/cancelled animations
//! ```

pub mod animation;
pub mod curve;
pub mod easing;
pub mod events;
pub mod interpolate;
pub mod scheduler;
pub mod types;

pub use animation::Animation;
pub use curve::Curve;
pub use easing::EasingFunction;
pub use events::{AnimationEvent, AnimationEventKind};
pub use interpolate::Interpolate;
pub use scheduler::Scheduler;
pub use types::{AnimationId, AnimationState};
