//! Error types for the scene engine.

use thiserror::Error;

use crate::property::{LayerProperty, ValueKind};

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors raised by the animation engine.
///
/// All of these are contract violations surfaced synchronously at the call
/// that violates the contract; no partial state change has occurred when one
/// is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// `animate` was called with no target properties.
    #[error("animation target set is empty")]
    EmptyTargetSet,

    /// The supplied curve has a non-positive duration.
    #[error("animation duration must be positive, got {0}s")]
    NonPositiveDuration(f64),

    /// A property name did not resolve to a known layer property.
    #[error("unknown layer property: {0}")]
    UnknownProperty(String),

    /// A target value cannot be interpolated from the property's current value.
    #[error("property {property} cannot animate from {from} to {to}")]
    MismatchedValueKinds {
        property: LayerProperty,
        from: ValueKind,
        to: ValueKind,
    },
}
