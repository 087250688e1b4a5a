//! The layer: an animatable scene-graph node.
//!
//! A [`Layer`] composes a property store with animation management. Properties
//! can be set directly (`layer.set_x(500.0)`) or driven over time by
//! animations (`layer.animate(...)`); both paths write through the same store,
//! so change listeners fire identically regardless of origin.
//!
//! `Layer` is a cheap-clone handle; clones share the node. Everything is
//! single-threaded and synchronous: listeners run on the calling thread, and
//! interior borrows are released before any listener is invoked, so listeners
//! may freely re-enter the layer.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::animation::{Animation, LifecycleListeners, Track};
use crate::animation::events::{AnimationEvent, AnimationEventKind};
use crate::animation::{AnimationId, Curve, Scheduler};
use crate::error::{Result, SceneError};
use crate::events::ListenerId;
use crate::property::{ChangeEvent, LayerProperty, PropertyStore, PropertyValue};

/// Unique identifier for a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u64);

impl LayerId {
    /// Generate a new unique layer ID.
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

pub(crate) struct LayerInner {
    id: LayerId,
    store: PropertyStore,
    animations: Vec<Animation>,
    lifecycle: LifecycleListeners,
    scheduler: Scheduler,
}

/// An animatable node owning properties and active animations.
#[derive(Clone)]
pub struct Layer {
    inner: Rc<RefCell<LayerInner>>,
}

impl Layer {
    /// Create an empty layer registered against the given scheduler.
    pub fn new(scheduler: &Scheduler) -> Self {
        Self::with_properties(scheduler, [])
    }

    /// Create a layer seeded with initial property values.
    ///
    /// Initial values are not "changes": no change event fires for them.
    pub fn with_properties(
        scheduler: &Scheduler,
        initial: impl IntoIterator<Item = (LayerProperty, PropertyValue)>,
    ) -> Self {
        let id = LayerId::next();
        let mut store = PropertyStore::new(id);
        for (property, value) in initial {
            store.write(property, value);
        }
        Self {
            inner: Rc::new(RefCell::new(LayerInner {
                id,
                store,
                animations: Vec::new(),
                lifecycle: LifecycleListeners::default(),
                scheduler: scheduler.clone(),
            })),
        }
    }

    pub(crate) fn from_inner(inner: Rc<RefCell<LayerInner>>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> std::rc::Weak<RefCell<LayerInner>> {
        Rc::downgrade(&self.inner)
    }

    /// This layer's unique id.
    pub fn id(&self) -> LayerId {
        self.inner.borrow().id
    }

    /// Get the current value of a property, or `None` if never written.
    pub fn get(&self, property: LayerProperty) -> Option<PropertyValue> {
        self.inner.borrow().store.get(property)
    }

    /// Store a property value, firing change listeners if it changed.
    ///
    /// Writes equal to the stored value are no-ops. Returns `true` if the
    /// value changed.
    pub fn set(&self, property: LayerProperty, value: impl Into<PropertyValue>) -> bool {
        let value = value.into();
        let listeners = {
            let mut inner = self.inner.borrow_mut();
            if !inner.store.write(property, value) {
                return false;
            }
            inner.store.change_listeners(property)
        };
        let event = ChangeEvent {
            layer: self.id(),
            property,
            value,
        };
        for listener in listeners {
            listener(&event);
        }
        true
    }

    fn number(&self, property: LayerProperty) -> f64 {
        self.inner
            .borrow()
            .store
            .get_or_default(property)
            .as_number()
            .unwrap_or(0.0)
    }

    /// Horizontal position.
    pub fn x(&self) -> f64 {
        self.number(LayerProperty::X)
    }

    pub fn set_x(&self, value: f64) {
        self.set(LayerProperty::X, value);
    }

    /// Vertical position.
    pub fn y(&self) -> f64 {
        self.number(LayerProperty::Y)
    }

    pub fn set_y(&self, value: f64) {
        self.set(LayerProperty::Y, value);
    }

    pub fn width(&self) -> f64 {
        self.number(LayerProperty::Width)
    }

    pub fn set_width(&self, value: f64) {
        self.set(LayerProperty::Width, value);
    }

    pub fn height(&self) -> f64 {
        self.number(LayerProperty::Height)
    }

    pub fn set_height(&self, value: f64) {
        self.set(LayerProperty::Height, value);
    }

    /// Opacity, defaulting to 1.0.
    pub fn opacity(&self) -> f64 {
        self.number(LayerProperty::Opacity)
    }

    pub fn set_opacity(&self, value: f64) {
        self.set(LayerProperty::Opacity, value);
    }

    /// Rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.number(LayerProperty::Rotation)
    }

    pub fn set_rotation(&self, value: f64) {
        self.set(LayerProperty::Rotation, value);
    }

    pub fn scale_x(&self) -> f64 {
        self.number(LayerProperty::ScaleX)
    }

    pub fn set_scale_x(&self, value: f64) {
        self.set(LayerProperty::ScaleX, value);
    }

    pub fn scale_y(&self) -> f64 {
        self.number(LayerProperty::ScaleY)
    }

    pub fn set_scale_y(&self, value: f64) {
        self.set(LayerProperty::ScaleY, value);
    }

    /// Background color as RGBA components, defaulting to transparent.
    pub fn background_color(&self) -> [f32; 4] {
        self.inner
            .borrow()
            .store
            .get_or_default(LayerProperty::BackgroundColor)
            .as_color()
            .unwrap_or([0.0, 0.0, 0.0, 0.0])
    }

    pub fn set_background_color(&self, rgba: [f32; 4]) {
        self.set(LayerProperty::BackgroundColor, rgba);
    }

    /// Register a change listener for one property.
    pub fn on_change(
        &self,
        property: LayerProperty,
        callback: impl Fn(&ChangeEvent) + 'static,
    ) -> ListenerId {
        self.inner.borrow_mut().store.on_change(property, callback)
    }

    /// Remove a change listener by handle. Returns `true` if present.
    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().store.remove_change_listener(id)
    }

    /// Animate properties towards target values along a curve.
    ///
    /// Any running animation on this layer whose property set overlaps the
    /// targets is cancelled first (its `Stop` fires before the new
    /// animation's `Start`); animations on disjoint properties continue
    /// untouched. The new animation captures each property's current value
    /// (post-cancellation) as its start value and fires `Start` before this
    /// call returns.
    ///
    /// # Errors
    /// Rejected without any state change: an empty target set, a curve with
    /// non-positive duration, or a target value whose kind cannot be
    /// interpolated from the property's current value.
    pub fn animate(
        &self,
        targets: &[(LayerProperty, PropertyValue)],
        curve: Curve,
    ) -> Result<Animation> {
        if targets.is_empty() {
            return Err(SceneError::EmptyTargetSet);
        }
        if curve.duration() <= 0.0 {
            return Err(SceneError::NonPositiveDuration(curve.duration()));
        }

        // Duplicate targets: last occurrence wins, first position kept.
        let mut deduped: Vec<(LayerProperty, PropertyValue)> = Vec::new();
        for (property, value) in targets.iter().copied() {
            match deduped.iter_mut().find(|(existing, _)| *existing == property) {
                Some(entry) => entry.1 = value,
                None => deduped.push((property, value)),
            }
        }

        {
            let inner = self.inner.borrow();
            for (property, value) in &deduped {
                let from = inner.store.get_or_default(*property);
                if from.kind() != value.kind() {
                    return Err(SceneError::MismatchedValueKinds {
                        property: *property,
                        from: from.kind(),
                        to: value.kind(),
                    });
                }
            }
        }

        // Supersession: cancel running animations on overlapping properties
        // before the new animation exists.
        let properties: Vec<LayerProperty> = deduped.iter().map(|(property, _)| *property).collect();
        let overlapping: Vec<Animation> = {
            let inner = self.inner.borrow();
            inner
                .animations
                .iter()
                .filter(|animation| animation.targets_any(&properties))
                .cloned()
                .collect()
        };
        for animation in overlapping {
            debug!(superseded = animation.id().0, "animation superseded");
            animation.cancel();
        }

        // Capture start values after cancellation settled them.
        let tracks: Vec<Track> = {
            let inner = self.inner.borrow();
            deduped
                .iter()
                .map(|(property, target)| Track {
                    property: *property,
                    start: inner.store.get_or_default(*property),
                    target: *target,
                })
                .collect()
        };

        let scheduler = self.inner.borrow().scheduler.clone();
        let animation = Animation::new(
            self.id(),
            self.downgrade(),
            scheduler.downgrade(),
            tracks,
            curve,
        );
        animation.set_running();
        self.inner.borrow_mut().animations.push(animation.clone());
        scheduler.register(animation.clone());
        animation.emit(AnimationEventKind::Start, Some(self));

        Ok(animation)
    }

    /// Snapshot of the active animations, in creation order.
    ///
    /// The returned list is a copy; mutating it does not affect the layer.
    pub fn animations(&self) -> Vec<Animation> {
        self.inner.borrow().animations.clone()
    }

    /// Register an aggregate listener fired when any of this layer's
    /// animations starts.
    pub fn on_animation_start(&self, callback: impl Fn(&AnimationEvent) + 'static) -> ListenerId {
        self.add_animation_listener(AnimationEventKind::Start, callback)
    }

    /// Register an aggregate listener fired when any of this layer's
    /// animations stops (completion or cancellation).
    pub fn on_animation_stop(&self, callback: impl Fn(&AnimationEvent) + 'static) -> ListenerId {
        self.add_animation_listener(AnimationEventKind::Stop, callback)
    }

    /// Register an aggregate listener fired when any of this layer's
    /// animations completes naturally.
    pub fn on_animation_end(&self, callback: impl Fn(&AnimationEvent) + 'static) -> ListenerId {
        self.add_animation_listener(AnimationEventKind::End, callback)
    }

    fn add_animation_listener(
        &self,
        kind: AnimationEventKind,
        callback: impl Fn(&AnimationEvent) + 'static,
    ) -> ListenerId {
        self.inner
            .borrow_mut()
            .lifecycle
            .set_for(kind)
            .register(callback)
    }

    /// Remove an aggregate lifecycle listener by handle.
    pub fn remove_animation_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().lifecycle.remove(id)
    }

    /// Cancel all active animations and release every listener.
    ///
    /// Cancellations fire `Stop` (never `End`) exactly as explicit
    /// cancellation does, then the listener registries are cleared and the
    /// layer holds no scheduler registrations.
    pub fn destroy(&self) {
        let active = self.animations();
        for animation in active {
            animation.cancel();
        }
        let mut inner = self.inner.borrow_mut();
        inner.store.clear_listeners();
        inner.lifecycle.clear();
    }

    /// Deliver one animation event to the layer's aggregate listeners.
    pub(crate) fn emit_animation_event(&self, event: &AnimationEvent) {
        let listeners = self.inner.borrow().lifecycle.snapshot_for(event.kind);
        for listener in listeners {
            listener(event);
        }
    }

    /// Drop one animation from the active list.
    pub(crate) fn remove_from_active(&self, id: AnimationId) {
        self.inner
            .borrow_mut()
            .animations
            .retain(|animation| animation.id() != id);
    }
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Layer")
                .field("id", &inner.id)
                .field("animations", &inner.animations.len())
                .finish(),
            Err(_) => f.write_str("Layer { <borrowed> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_loop::ManualLoop;
    use std::cell::Cell;

    fn rig() -> (Rc<ManualLoop>, Scheduler) {
        let frame_loop = ManualLoop::new();
        let scheduler = Scheduler::new(frame_loop.clone());
        (frame_loop, scheduler)
    }

    #[test]
    fn test_initial_properties_do_not_fire_changes() {
        let (_frame_loop, scheduler) = rig();
        let layer = Layer::with_properties(&scheduler, [(LayerProperty::X, 500.0.into())]);
        assert_eq!(layer.x(), 500.0);
        assert_eq!(layer.get(LayerProperty::Y), None);
    }

    #[test]
    fn test_set_after_create() {
        let (_frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);
        layer.set_x(500.0);
        assert_eq!(layer.x(), 500.0);
    }

    #[test]
    fn test_numeric_defaults() {
        let (_frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);
        assert_eq!(layer.x(), 0.0);
        assert_eq!(layer.opacity(), 1.0);
        assert_eq!(layer.scale_x(), 1.0);
        assert_eq!(layer.background_color(), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_change_listener_observes_new_value() {
        let (_frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);
        let seen = Rc::new(Cell::new(0.0));

        let layer_ref = layer.clone();
        let s = Rc::clone(&seen);
        layer.on_change(LayerProperty::X, move |event| {
            // The store already holds the new value when listeners run.
            assert_eq!(layer_ref.x(), event.value.as_number().unwrap());
            s.set(layer_ref.x());
        });

        layer.set_x(500.0);
        assert_eq!(seen.get(), 500.0);
    }

    #[test]
    fn test_repeated_identical_sets_fire_once() {
        let (_frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        layer.on_change(LayerProperty::X, move |_| c.set(c.get() + 1));

        for _ in 0..4 {
            layer.set_x(500.0);
        }

        assert_eq!(layer.x(), 500.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_animate_rejects_empty_target_set() {
        let (_frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);
        assert_eq!(
            layer.animate(&[], Curve::linear(0.1)),
            Err(SceneError::EmptyTargetSet)
        );
        assert!(layer.animations().is_empty());
    }

    #[test]
    fn test_animate_rejects_non_positive_duration() {
        let (_frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);
        assert_eq!(
            layer.animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.0)),
            Err(SceneError::NonPositiveDuration(0.0))
        );
        assert_eq!(
            layer.animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(-1.0)),
            Err(SceneError::NonPositiveDuration(-1.0))
        );
        assert!(layer.animations().is_empty());
    }

    #[test]
    fn test_animate_rejects_mismatched_kinds_without_state_change() {
        let (_frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);

        let running = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap();

        // X currently holds a number; a color target cannot interpolate.
        let result = layer.animate(
            &[(LayerProperty::X, [1.0, 0.0, 0.0, 1.0].into())],
            Curve::linear(0.5),
        );
        assert!(matches!(
            result,
            Err(SceneError::MismatchedValueKinds { .. })
        ));

        // The rejected call superseded nothing.
        assert!(running.running());
        assert_eq!(layer.animations(), vec![running]);
    }

    #[test]
    fn test_duplicate_targets_last_wins() {
        let (frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);

        let animation = layer
            .animate(
                &[
                    (LayerProperty::X, 100.0.into()),
                    (LayerProperty::X, 300.0.into()),
                ],
                Curve::linear(1.0),
            )
            .unwrap();
        assert_eq!(animation.properties(), vec![LayerProperty::X]);

        frame_loop.tick(2.0);
        assert_eq!(layer.x(), 300.0);
    }

    #[test]
    fn test_destroy_cancels_and_releases() {
        let (frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);
        let stops = Rc::new(Cell::new(0));

        let s = Rc::clone(&stops);
        layer.on_animation_stop(move |_| s.set(s.get() + 1));

        let a = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap();
        let b = layer
            .animate(&[(LayerProperty::Y, 100.0.into())], Curve::linear(0.5))
            .unwrap();

        layer.destroy();

        assert!(!a.running());
        assert!(!b.running());
        assert_eq!(stops.get(), 2);
        assert!(layer.animations().is_empty());
        assert_eq!(scheduler.animation_count(), 0);
        assert_eq!(frame_loop.subscriber_count(), 0);
    }

    #[test]
    fn test_scheduler_retires_animations_of_dropped_layer() {
        let (frame_loop, scheduler) = rig();
        let layer = Layer::new(&scheduler);
        let animation = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap();

        drop(layer);
        assert!(animation.running());

        frame_loop.tick(0.1);
        assert!(!animation.running());
        assert_eq!(scheduler.animation_count(), 0);
        assert_eq!(frame_loop.subscriber_count(), 0);
    }
}
