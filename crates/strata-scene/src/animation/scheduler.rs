//! Frame-driven advancement of registered animations.
//!
//! The [`Scheduler`] holds every in-flight animation in registration order
//! and advances each exactly once per renderer-loop tick: clock forward,
//! interpolated values written through the owning layer's property store
//! (firing change events like any direct set), then completion bookkeeping.
//!
//! The scheduler subscribes to its renderer loop only while at least one
//! animation is registered and unsubscribes when the count returns to zero.
//! Ticks advance a snapshot of the registration list, so animations admitted
//! from listener callbacks mid-tick first advance on the following tick, and
//! animations cancelled mid-tick are skipped.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use super::animation::Animation;
use super::types::{AnimationId, AnimationState};
use crate::render_loop::{RendererLoop, SubscriptionId, TickHandler};

pub(crate) struct SchedulerInner {
    animations: Vec<Animation>,
    driver: Rc<dyn RendererLoop>,
    subscription: Option<SubscriptionId>,
    max_delta: Option<f64>,
}

/// Drives all registered animations from an injected renderer loop.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    /// Create a scheduler bound to the given renderer loop.
    pub fn new(driver: Rc<dyn RendererLoop>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                animations: Vec::new(),
                driver,
                subscription: None,
                max_delta: None,
            })),
        }
    }

    /// Create a scheduler honoring the configured `max_frame_delta` clamp.
    pub fn with_config(
        driver: Rc<dyn RendererLoop>,
        config: &strata_config::AnimationConfig,
    ) -> Self {
        let scheduler = Self::new(driver);
        scheduler.inner.borrow_mut().max_delta = config.max_frame_delta;
        scheduler
    }

    pub(crate) fn from_inner(inner: Rc<RefCell<SchedulerInner>>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> std::rc::Weak<RefCell<SchedulerInner>> {
        Rc::downgrade(&self.inner)
    }

    /// The number of registered animations.
    pub fn animation_count(&self) -> usize {
        self.inner.borrow().animations.len()
    }

    /// Check if any animation is registered.
    pub fn has_active_animations(&self) -> bool {
        !self.inner.borrow().animations.is_empty()
    }

    /// Advance every animation registered at the start of this tick.
    ///
    /// This is the explicit, deterministic entry point; the renderer-loop
    /// subscription forwards each tick's delta here.
    pub fn advance(&self, delta: f64) {
        let (snapshot, delta) = {
            let inner = self.inner.borrow();
            let delta = match inner.max_delta {
                Some(max) => delta.min(max),
                None => delta,
            };
            (inner.animations.clone(), delta.max(0.0))
        };

        for animation in snapshot {
            // Skipped: cancelled earlier in this tick by a listener.
            if !animation.running() {
                continue;
            }

            let outcome = animation.advance_clock(delta);

            let Some(layer) = animation.layer_handle() else {
                // Owning layer is gone; retire without events.
                debug!(animation = animation.id().0, "layer dropped, retiring animation");
                animation.mark_terminal(AnimationState::Cancelled);
                self.unregister(animation.id());
                continue;
            };

            for (property, value) in outcome.writes {
                // A change listener may have cancelled this animation.
                if !animation.running() {
                    break;
                }
                layer.set(property, value);
            }

            if outcome.completed {
                // No-op if a listener already stopped it; an animation never
                // sees two Stop/End deliveries in one tick.
                animation.complete();
            }
        }
    }

    /// Register an admitted animation, subscribing to the loop on 0 → 1.
    pub(crate) fn register(&self, animation: Animation) {
        let needs_subscribe = {
            let mut inner = self.inner.borrow_mut();
            inner.animations.push(animation);
            inner.animations.len() == 1 && inner.subscription.is_none()
        };

        if needs_subscribe {
            let driver = self.inner.borrow().driver.clone();
            let weak = self.downgrade();
            let handler: TickHandler = Rc::new(move |delta| {
                if let Some(inner) = weak.upgrade() {
                    Scheduler::from_inner(inner).advance(delta);
                }
            });
            let subscription = driver.subscribe(handler);
            self.inner.borrow_mut().subscription = Some(subscription);
            debug!("scheduler subscribed to renderer loop");
        }
    }

    /// Drop a retired animation, unsubscribing from the loop on 1 → 0.
    pub(crate) fn unregister(&self, id: AnimationId) {
        let release = {
            let mut inner = self.inner.borrow_mut();
            inner.animations.retain(|animation| animation.id() != id);
            if inner.animations.is_empty() {
                inner
                    .subscription
                    .take()
                    .map(|subscription| (inner.driver.clone(), subscription))
            } else {
                None
            }
        };

        if let Some((driver, subscription)) = release {
            driver.unsubscribe(subscription);
            debug!("scheduler idle, unsubscribed from renderer loop");
        }
    }
}
