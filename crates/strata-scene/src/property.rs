//! Layer properties: names, values, and the change-tracking store.
//!
//! A [`PropertyStore`] maps property names to their current values and holds
//! per-property change listeners. Writes are diffed against the stored value
//! (value equality, not identity): a write that does not change the value is
//! a no-op and fires nothing, while a changed write stores the new value and
//! notifies every listener for that property in registration order.
//!
//! Both direct sets and animated per-frame writes go through the same store,
//! so change events fire identically regardless of origin.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::events::{Listener, ListenerId, ListenerSet};
use crate::layer::LayerId;

/// The animatable properties of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerProperty {
    X,
    Y,
    Width,
    Height,
    Opacity,
    Rotation,
    ScaleX,
    ScaleY,
    BackgroundColor,
}

impl LayerProperty {
    /// Every animatable property, in declaration order.
    pub const ALL: [LayerProperty; 9] = [
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Opacity,
        Self::Rotation,
        Self::ScaleX,
        Self::ScaleY,
        Self::BackgroundColor,
    ];

    /// The canonical name of this property.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::Rotation => "rotation",
            Self::ScaleX => "scale_x",
            Self::ScaleY => "scale_y",
            Self::BackgroundColor => "background_color",
        }
    }

    /// Resolve a property from its canonical name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|property| property.as_str() == name)
            .ok_or_else(|| SceneError::UnknownProperty(name.to_string()))
    }

    /// The value a layer reports for this property before anything was stored.
    pub fn default_value(&self) -> PropertyValue {
        match self {
            Self::Opacity | Self::ScaleX | Self::ScaleY => PropertyValue::Number { value: 1.0 },
            Self::BackgroundColor => PropertyValue::Color {
                rgba: [0.0, 0.0, 0.0, 0.0],
            },
            _ => PropertyValue::Number { value: 0.0 },
        }
    }
}

impl fmt::Display for LayerProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayerProperty {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// A property value.
///
/// Numeric in the primary case; colors are carried as a second kind so the
/// engine does not preclude non-scalar values. Equality is value equality,
/// which is what the store diffs against on every write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Numeric value (position, size, opacity, rotation, scale).
    Number { value: f64 },
    /// RGBA color components.
    Color { rgba: [f32; 4] },
}

impl PropertyValue {
    /// Create a numeric value.
    pub fn number(value: f64) -> Self {
        Self::Number { value }
    }

    /// Create a color value.
    pub fn color(rgba: [f32; 4]) -> Self {
        Self::Color { rgba }
    }

    /// Get the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value } => Some(*value),
            _ => None,
        }
    }

    /// Get the color components, if this is a color.
    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color { rgba } => Some(*rgba),
            _ => None,
        }
    }

    /// The kind of this value, for interpolation compatibility checks.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number { .. } => ValueKind::Number,
            Self::Color { .. } => ValueKind::Color,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number { value }
    }
}

impl From<[f32; 4]> for PropertyValue {
    fn from(rgba: [f32; 4]) -> Self {
        Self::Color { rgba }
    }
}

/// The kind of a [`PropertyValue`]. Values interpolate only within a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    Color,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => f.write_str("number"),
            Self::Color => f.write_str("color"),
        }
    }
}

/// Event delivered to change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The layer whose property changed.
    pub layer: LayerId,
    /// The property that changed.
    pub property: LayerProperty,
    /// The newly stored value.
    pub value: PropertyValue,
}

/// Per-layer property storage with change detection and listeners.
#[derive(Debug)]
pub struct PropertyStore {
    layer: LayerId,
    values: HashMap<LayerProperty, PropertyValue>,
    listeners: HashMap<LayerProperty, ListenerSet<ChangeEvent>>,
}

impl PropertyStore {
    /// Create an empty store owned by the given layer.
    pub fn new(layer: LayerId) -> Self {
        Self {
            layer,
            values: HashMap::new(),
            listeners: HashMap::new(),
        }
    }

    /// Get the current value of a property, or `None` if never written.
    pub fn get(&self, property: LayerProperty) -> Option<PropertyValue> {
        self.values.get(&property).copied()
    }

    /// The current value of a property, falling back to its natural default.
    pub fn get_or_default(&self, property: LayerProperty) -> PropertyValue {
        self.get(property).unwrap_or(property.default_value())
    }

    /// Store a value and synchronously notify change listeners.
    ///
    /// Returns `true` if the value changed. A write equal to the stored value
    /// is a no-op: nothing is mutated and no listener fires.
    pub fn set(&mut self, property: LayerProperty, value: PropertyValue) -> bool {
        if !self.write(property, value) {
            return false;
        }
        let event = ChangeEvent {
            layer: self.layer,
            property,
            value,
        };
        for listener in self.change_listeners(property) {
            listener(&event);
        }
        true
    }

    /// Store a value without notifying listeners.
    ///
    /// Returns `true` if the value changed. Used to seed initial values (an
    /// initial value is not a "change") and by the layer, which snapshots
    /// listeners and emits after releasing its interior borrow.
    pub(crate) fn write(&mut self, property: LayerProperty, value: PropertyValue) -> bool {
        if self.values.get(&property) == Some(&value) {
            return false;
        }
        self.values.insert(property, value);
        true
    }

    /// Register a change listener for one property.
    pub fn on_change(
        &mut self,
        property: LayerProperty,
        callback: impl Fn(&ChangeEvent) + 'static,
    ) -> ListenerId {
        self.listeners
            .entry(property)
            .or_default()
            .register(callback)
    }

    /// Remove a change listener by handle. Returns `true` if it was present.
    pub fn remove_change_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.values_mut().any(|set| set.remove(id))
    }

    /// Drop every change listener.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Snapshot the change listeners for a property, in registration order.
    pub(crate) fn change_listeners(&self, property: LayerProperty) -> Vec<Listener<ChangeEvent>> {
        self.listeners
            .get(&property)
            .map(ListenerSet::snapshot)
            .unwrap_or_default()
    }

    /// The layer this store belongs to.
    pub fn layer(&self) -> LayerId {
        self.layer
    }
}
