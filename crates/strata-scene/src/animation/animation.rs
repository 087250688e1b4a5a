//! One in-flight transition of layer properties.
//!
//! An [`Animation`] is created by `Layer::animate` and advanced by the
//! scheduler. It owns the tracked property spans (captured start value →
//! target value), the timing curve, a progress clock, and the per-animation
//! lifecycle listeners. The handle is cheap to clone; clones share state and
//! compare equal by animation id.
//!
//! State machine: `Idle → Running → {Completed, Cancelled}`. Terminal states
//! are absorbing — once an animation has stopped, no further transition or
//! event delivery occurs.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use super::curve::Curve;
use super::events::{AnimationEvent, AnimationEventKind};
use super::interpolate::Interpolate;
use super::scheduler::{Scheduler, SchedulerInner};
use super::types::{AnimationId, AnimationState};
use crate::events::{Listener, ListenerId, ListenerSet};
use crate::layer::{Layer, LayerId, LayerInner};
use crate::property::{LayerProperty, PropertyValue};

/// One tracked property span.
#[derive(Debug, Clone)]
pub(crate) struct Track {
    pub(crate) property: LayerProperty,
    pub(crate) start: PropertyValue,
    pub(crate) target: PropertyValue,
}

/// Ordered listener sets for the three lifecycle kinds plus an any-event set.
///
/// Snapshots deliver the kind-specific listeners first, then the any-event
/// listeners, each in registration order.
#[derive(Debug, Default)]
pub(crate) struct LifecycleListeners {
    start: ListenerSet<AnimationEvent>,
    stop: ListenerSet<AnimationEvent>,
    end: ListenerSet<AnimationEvent>,
    any: ListenerSet<AnimationEvent>,
}

impl LifecycleListeners {
    pub(crate) fn set_for(&mut self, kind: AnimationEventKind) -> &mut ListenerSet<AnimationEvent> {
        match kind {
            AnimationEventKind::Start => &mut self.start,
            AnimationEventKind::Stop => &mut self.stop,
            AnimationEventKind::End => &mut self.end,
        }
    }

    pub(crate) fn any_mut(&mut self) -> &mut ListenerSet<AnimationEvent> {
        &mut self.any
    }

    pub(crate) fn snapshot_for(&self, kind: AnimationEventKind) -> Vec<Listener<AnimationEvent>> {
        let mut listeners = match kind {
            AnimationEventKind::Start => self.start.snapshot(),
            AnimationEventKind::Stop => self.stop.snapshot(),
            AnimationEventKind::End => self.end.snapshot(),
        };
        listeners.extend(self.any.snapshot());
        listeners
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        self.start.remove(id) || self.stop.remove(id) || self.end.remove(id) || self.any.remove(id)
    }

    pub(crate) fn clear(&mut self) {
        self.start.clear();
        self.stop.clear();
        self.end.clear();
        self.any.clear();
    }
}

pub(crate) struct AnimationInner {
    id: AnimationId,
    layer_id: LayerId,
    layer: Weak<RefCell<LayerInner>>,
    scheduler: Weak<RefCell<SchedulerInner>>,
    tracks: Vec<Track>,
    curve: Curve,
    elapsed: f64,
    state: AnimationState,
    listeners: LifecycleListeners,
}

/// The interpolated writes and completion flag produced by one tick.
pub(crate) struct TickOutcome {
    pub(crate) writes: Vec<(LayerProperty, PropertyValue)>,
    pub(crate) completed: bool,
}

/// Handle to an in-flight (or finished) animation.
#[derive(Clone)]
pub struct Animation {
    inner: Rc<RefCell<AnimationInner>>,
}

impl Animation {
    pub(crate) fn new(
        layer_id: LayerId,
        layer: Weak<RefCell<LayerInner>>,
        scheduler: Weak<RefCell<SchedulerInner>>,
        tracks: Vec<Track>,
        curve: Curve,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AnimationInner {
                id: AnimationId::next(),
                layer_id,
                layer,
                scheduler,
                tracks,
                curve,
                elapsed: 0.0,
                state: AnimationState::Idle,
                listeners: LifecycleListeners::default(),
            })),
        }
    }

    /// This animation's unique id.
    pub fn id(&self) -> AnimationId {
        self.inner.borrow().id
    }

    /// The layer this animation belongs to.
    pub fn layer_id(&self) -> LayerId {
        self.inner.borrow().layer_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnimationState {
        self.inner.borrow().state
    }

    /// `true` only while the animation is in the `Running` state.
    pub fn running(&self) -> bool {
        self.state() == AnimationState::Running
    }

    /// The timing curve driving this animation.
    pub fn curve(&self) -> Curve {
        self.inner.borrow().curve
    }

    /// Eased progress at the current clock, in [0, 1].
    pub fn progress(&self) -> f64 {
        let inner = self.inner.borrow();
        inner.curve.evaluate(inner.elapsed)
    }

    /// The properties this animation drives, in target order.
    pub fn properties(&self) -> Vec<LayerProperty> {
        self.inner
            .borrow()
            .tracks
            .iter()
            .map(|track| track.property)
            .collect()
    }

    /// Register a start listener. Chainable.
    pub fn on_start(self, callback: impl Fn(&AnimationEvent) + 'static) -> Self {
        self.add_listener(AnimationEventKind::Start, callback);
        self
    }

    /// Register a stop listener. Chainable.
    ///
    /// Stop fires on both completion and cancellation.
    pub fn on_stop(self, callback: impl Fn(&AnimationEvent) + 'static) -> Self {
        self.add_listener(AnimationEventKind::Stop, callback);
        self
    }

    /// Register an end listener. Chainable.
    ///
    /// End fires only on natural completion, after Stop.
    pub fn on_end(self, callback: impl Fn(&AnimationEvent) + 'static) -> Self {
        self.add_listener(AnimationEventKind::End, callback);
        self
    }

    /// Register a listener for every lifecycle event. Chainable.
    pub fn on_any(self, callback: impl Fn(&AnimationEvent) + 'static) -> Self {
        self.add_any_listener(callback);
        self
    }

    /// Register a listener for one event kind, returning its handle.
    pub fn add_listener(
        &self,
        kind: AnimationEventKind,
        callback: impl Fn(&AnimationEvent) + 'static,
    ) -> ListenerId {
        self.inner
            .borrow_mut()
            .listeners
            .set_for(kind)
            .register(callback)
    }

    /// Register an any-event listener, returning its handle.
    pub fn add_any_listener(&self, callback: impl Fn(&AnimationEvent) + 'static) -> ListenerId {
        self.inner.borrow_mut().listeners.any_mut().register(callback)
    }

    /// Remove a lifecycle listener by handle. Returns `true` if present.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id)
    }

    /// Cancel the animation.
    ///
    /// Transitions `Running → Cancelled`, detaches from the layer and the
    /// scheduler, and fires `Stop` (never `End`). Returns `false` if the
    /// animation was not running.
    pub fn cancel(&self) -> bool {
        if !self.mark_terminal(AnimationState::Cancelled) {
            return false;
        }
        debug!(animation = self.id().0, "animation cancelled");
        let layer = self.layer_handle();
        self.detach(layer.as_ref());
        self.emit(AnimationEventKind::Stop, layer.as_ref());
        true
    }

    /// Complete the animation after its final writes.
    ///
    /// Transitions `Running → Completed`, detaches, and fires `Stop` then
    /// `End` within the current tick. Returns `false` if the animation was
    /// no longer running (e.g. cancelled by a change listener mid-tick).
    pub(crate) fn complete(&self) -> bool {
        if !self.mark_terminal(AnimationState::Completed) {
            return false;
        }
        debug!(animation = self.id().0, "animation completed");
        let layer = self.layer_handle();
        self.detach(layer.as_ref());
        self.emit(AnimationEventKind::Stop, layer.as_ref());
        self.emit(AnimationEventKind::End, layer.as_ref());
        true
    }

    /// Promote `Idle → Running` at admission.
    pub(crate) fn set_running(&self) {
        let mut inner = self.inner.borrow_mut();
        debug_assert_eq!(inner.state, AnimationState::Idle);
        inner.state = AnimationState::Running;
    }

    /// Transition to a terminal state. Returns `false` unless currently running.
    pub(crate) fn mark_terminal(&self, state: AnimationState) -> bool {
        debug_assert!(state.is_terminal());
        let mut inner = self.inner.borrow_mut();
        if inner.state != AnimationState::Running {
            return false;
        }
        inner.state = state;
        true
    }

    /// Check if this animation drives any of the given properties.
    pub(crate) fn targets_any(&self, properties: &[LayerProperty]) -> bool {
        let inner = self.inner.borrow();
        inner
            .tracks
            .iter()
            .any(|track| properties.contains(&track.property))
    }

    /// Advance the clock by `delta` seconds and compute this tick's writes.
    pub(crate) fn advance_clock(&self, delta: f64) -> TickOutcome {
        let mut inner = self.inner.borrow_mut();
        inner.elapsed += delta;
        let progress = inner.curve.evaluate(inner.elapsed);
        let writes = inner
            .tracks
            .iter()
            .map(|track| (track.property, track.start.interpolate(&track.target, progress)))
            .collect();
        TickOutcome {
            writes,
            completed: progress >= 1.0,
        }
    }

    /// The owning layer, if it is still alive.
    pub(crate) fn layer_handle(&self) -> Option<Layer> {
        self.inner.borrow().layer.upgrade().map(Layer::from_inner)
    }

    /// Remove this animation from its layer's active list and the scheduler.
    fn detach(&self, layer: Option<&Layer>) {
        if let Some(layer) = layer {
            layer.remove_from_active(self.id());
        }
        let scheduler = self.inner.borrow().scheduler.upgrade();
        if let Some(scheduler) = scheduler {
            Scheduler::from_inner(scheduler).unregister(self.id());
        }
    }

    /// Deliver one lifecycle event: per-animation listeners first, then the
    /// layer's aggregate listeners. Snapshots are taken before invocation so
    /// listeners may re-enter the engine.
    pub(crate) fn emit(&self, kind: AnimationEventKind, layer: Option<&Layer>) {
        let event = AnimationEvent {
            kind,
            animation: self.id(),
            layer: self.layer_id(),
        };
        let listeners = self.inner.borrow().listeners.snapshot_for(kind);
        for listener in listeners {
            listener(&event);
        }
        if let Some(layer) = layer {
            layer.emit_animation_event(&event);
        }
    }
}

impl PartialEq for Animation {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Animation {}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Animation")
                .field("id", &inner.id)
                .field("state", &inner.state)
                .field("elapsed", &inner.elapsed)
                .finish(),
            Err(_) => f.write_str("Animation { <borrowed> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use crate::render_loop::ManualLoop;
    use std::cell::Cell;

    fn rig() -> (Rc<ManualLoop>, Scheduler, Layer) {
        let frame_loop = ManualLoop::new();
        let scheduler = Scheduler::new(frame_loop.clone());
        let layer = Layer::new(&scheduler);
        (frame_loop, scheduler, layer)
    }

    #[test]
    fn test_running_flag_through_lifecycle() {
        let (frame_loop, _scheduler, layer) = rig();
        let animation = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap();

        assert_eq!(animation.state(), AnimationState::Running);
        assert!(animation.running());

        frame_loop.tick(0.25);
        assert!(animation.running());

        frame_loop.tick(0.5);
        assert_eq!(animation.state(), AnimationState::Completed);
        assert!(!animation.running());
    }

    #[test]
    fn test_cancel_fires_stop_only() {
        let (_frame_loop, _scheduler, layer) = rig();
        let stops = Rc::new(Cell::new(0));
        let ends = Rc::new(Cell::new(0));

        let s = Rc::clone(&stops);
        let e = Rc::clone(&ends);
        let animation = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap()
            .on_stop(move |_| s.set(s.get() + 1))
            .on_end(move |_| e.set(e.get() + 1));

        assert!(animation.cancel());
        assert_eq!(animation.state(), AnimationState::Cancelled);
        assert_eq!(stops.get(), 1);
        assert_eq!(ends.get(), 0);

        // Terminal: a second cancel is a no-op and delivers nothing.
        assert!(!animation.cancel());
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_multiple_listeners_fire_in_registration_order() {
        let (_frame_loop, _scheduler, layer) = rig();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o1 = Rc::clone(&order);
        let o2 = Rc::clone(&order);
        let animation = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap()
            .on_stop(move |_| o1.borrow_mut().push("first"))
            .on_stop(move |_| o2.borrow_mut().push("second"));

        animation.cancel();
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_any_listener_sees_every_event() {
        let (frame_loop, _scheduler, layer) = rig();
        let kinds = Rc::new(RefCell::new(Vec::new()));

        // Start fires inside animate(), before the handle exists to chain
        // on, so an any-listener attached here sees the stop/end tail.
        let k = Rc::clone(&kinds);
        let _animation = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap()
            .on_any(move |event| k.borrow_mut().push(event.kind));

        frame_loop.tick(1.0);
        assert_eq!(
            *kinds.borrow(),
            vec![AnimationEventKind::Stop, AnimationEventKind::End]
        );
    }

    #[test]
    fn test_remove_listener() {
        let (_frame_loop, _scheduler, layer) = rig();
        let count = Rc::new(Cell::new(0));

        let animation = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap();

        let c = Rc::clone(&count);
        let id = animation.add_listener(AnimationEventKind::Stop, move |_| c.set(c.get() + 1));
        assert!(animation.remove_listener(id));
        assert!(!animation.remove_listener(id));

        animation.cancel();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_progress_and_properties() {
        let (frame_loop, _scheduler, layer) = rig();
        let animation = layer
            .animate(
                &[
                    (LayerProperty::X, 100.0.into()),
                    (LayerProperty::Y, 50.0.into()),
                ],
                Curve::linear(1.0),
            )
            .unwrap();

        assert_eq!(animation.progress(), 0.0);
        assert_eq!(
            animation.properties(),
            vec![LayerProperty::X, LayerProperty::Y]
        );

        frame_loop.tick(0.5);
        assert!((animation.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_handles_compare_by_id() {
        let (_frame_loop, _scheduler, layer) = rig();
        let animation = layer
            .animate(&[(LayerProperty::X, 100.0.into())], Curve::linear(0.5))
            .unwrap();
        let clone = animation.clone();
        assert_eq!(animation, clone);

        let other = layer
            .animate(&[(LayerProperty::Y, 100.0.into())], Curve::linear(0.5))
            .unwrap();
        assert_ne!(animation, other);
    }
}
