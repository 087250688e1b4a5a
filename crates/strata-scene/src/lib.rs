//! strata-scene: reactive layers with curve-driven property animation.
//!
//! A [`Layer`] is a scene-graph node whose properties can be set directly or
//! animated over time. Property writes are diffed, so change listeners fire
//! only on real changes; animations interpolate along timing curves, are
//! advanced once per renderer-loop tick, and emit an ordered
//! `Start → Stop → End` lifecycle (`End` only on natural completion).
//! Starting an animation over properties already being animated cancels the
//! overlapping animation first; disjoint animations run concurrently.
//!
//! The engine is single-threaded and frame-driven: an injected
//! [`RendererLoop`] supplies ticks, and every listener runs synchronously on
//! the driving thread.
//!
//! ```
//! use strata_scene::{Curve, Layer, LayerProperty, ManualLoop, Scheduler};
//!
//! let frame_loop = ManualLoop::new();
//! let scheduler = Scheduler::new(frame_loop.clone());
//! let layer = Layer::with_properties(&scheduler, [(LayerProperty::X, 100.0.into())]);
//!
//! let animation = layer
//!     .animate(&[(LayerProperty::X, 200.0.into())], Curve::linear(1.0))
//!     .unwrap();
//! assert!(animation.running());
//!
//! frame_loop.run(64, 1.0 / 64.0);
//! assert_eq!(layer.x(), 200.0);
//! assert!(!animation.running());
//! ```

pub mod animation;
pub mod error;
pub mod events;
pub mod layer;
pub mod property;
pub mod render_loop;

pub use animation::{
    Animation, AnimationEvent, AnimationEventKind, AnimationId, AnimationState, Curve,
    EasingFunction, Interpolate, Scheduler,
};
pub use error::{Result, SceneError};
pub use events::{Listener, ListenerId, ListenerSet};
pub use layer::{Layer, LayerId};
pub use property::{ChangeEvent, LayerProperty, PropertyStore, PropertyValue, ValueKind};
pub use render_loop::{ManualLoop, RendererLoop, SubscriptionId, TickHandler};

// Value and timing types cross threads freely; the handle types are
// deliberately single-threaded.
static_assertions::assert_impl_all!(PropertyValue: Send, Sync);
static_assertions::assert_impl_all!(Curve: Send, Sync);
static_assertions::assert_not_impl_any!(Layer: Send);
static_assertions::assert_not_impl_any!(Animation: Send);
