//! Renderer loop binding: the per-frame tick source the scheduler consumes.
//!
//! The engine does not own a clock. An external loop delivers per-frame tick
//! signals carrying the elapsed delta in seconds; the scheduler subscribes
//! while animations are in flight and unsubscribes when idle. The
//! [`RendererLoop`] trait is the whole of that contract.
//!
//! [`ManualLoop`] is the deterministic in-repo implementation: tests and
//! headless demos call `tick` with explicit deltas instead of waiting on real
//! time, and observe loop completion through the `finish` signal. Each test
//! constructs its own loop — there is no process-wide instance.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::events::ListenerId;

/// Handle identifying one tick subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Callback receiving one frame's elapsed delta in seconds.
pub type TickHandler = Rc<dyn Fn(f64)>;

/// A per-frame tick source.
pub trait RendererLoop {
    /// Register a tick callback; it receives every subsequent frame's delta.
    fn subscribe(&self, on_tick: TickHandler) -> SubscriptionId;

    /// Remove a previously registered callback.
    fn unsubscribe(&self, subscription: SubscriptionId);
}

#[derive(Default)]
struct ManualLoopInner {
    running: bool,
    finished: bool,
    subscribers: Vec<(SubscriptionId, TickHandler)>,
    finish_listeners: Vec<(ListenerId, Rc<dyn Fn()>)>,
}

/// Deterministic renderer loop driven by explicit `tick` calls.
pub struct ManualLoop {
    inner: RefCell<ManualLoopInner>,
}

impl ManualLoop {
    /// Create a started loop.
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            inner: RefCell::new(ManualLoopInner {
                running: true,
                ..ManualLoopInner::default()
            }),
        })
    }

    /// Deliver one frame with the given delta seconds.
    ///
    /// Subscribers present at the start of the frame are invoked in
    /// subscription order; subscriptions added during the frame first fire on
    /// the next one. Ignored while the loop is stopped.
    pub fn tick(&self, delta: f64) {
        let handlers: Vec<TickHandler> = {
            let inner = self.inner.borrow();
            if !inner.running {
                return;
            }
            inner
                .subscribers
                .iter()
                .map(|(_, handler)| Rc::clone(handler))
                .collect()
        };
        for handler in handlers {
            handler(delta);
        }
    }

    /// Deliver `frames` ticks of `delta` seconds each.
    pub fn run(&self, frames: usize, delta: f64) {
        for _ in 0..frames {
            self.tick(delta);
        }
    }

    /// Mark the loop complete and notify finish listeners. Idempotent.
    pub fn finish(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = {
            let mut inner = self.inner.borrow_mut();
            if inner.finished {
                return;
            }
            inner.finished = true;
            inner
                .finish_listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener();
        }
    }

    /// Observe loop completion.
    pub fn on_finish(&self, callback: impl Fn() + 'static) -> ListenerId {
        let id = ListenerId::next();
        self.inner
            .borrow_mut()
            .finish_listeners
            .push((id, Rc::new(callback)));
        id
    }

    /// Resume delivering ticks.
    pub fn start(&self) {
        self.inner.borrow_mut().running = true;
    }

    /// Pause the loop; ticks are ignored until `start`.
    pub fn stop(&self) {
        self.inner.borrow_mut().running = false;
    }

    /// Check if the loop is delivering ticks.
    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Check if `finish` was signalled.
    pub fn is_finished(&self) -> bool {
        self.inner.borrow().finished
    }

    /// The number of live tick subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl RendererLoop for ManualLoop {
    fn subscribe(&self, on_tick: TickHandler) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.inner.borrow_mut().subscribers.push((id, on_tick));
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|(id, _)| *id != subscription);
    }
}
