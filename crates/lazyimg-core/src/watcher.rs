//! One-shot viewport observation.
//!
//! [`watch`] starts observing an element and returns an [`ObservationHandle`]
//! that owns the subscription. The subscription ends on the first qualifying
//! intersection or when the handle is released, whichever comes first. The
//! handle keeps its own phase so late callbacks from the primitive (which
//! may still arrive after a disconnect was requested) are dropped here rather
//! than trusting the primitive to be strictly one-shot.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    DeliveryOutcome, IgnoreReason, IntersectionCallback, IntersectionEntry, LazyLoadError,
    ObserverConnection, ObserverHost, ReleaseOutcome, WatchOptions,
};

/// Lifecycle of one observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchPhase {
    Observing,
    /// `on_enter` ran and the subscription was torn down.
    Fired,
    /// Cancelled before firing.
    Released,
}

type Disconnect = Box<dyn FnOnce()>;

struct WatchState {
    phase: Cell<WatchPhase>,
    threshold: f64,
    disconnect: RefCell<Option<Disconnect>>,
    on_enter: RefCell<Option<Box<dyn FnOnce()>>>,
    last_delivery: Cell<Option<DeliveryOutcome>>,
}

impl WatchState {
    fn deliver(&self, entries: &[IntersectionEntry]) -> DeliveryOutcome {
        let outcome = self.apply(entries);
        self.last_delivery.set(Some(outcome));
        outcome
    }

    fn apply(&self, entries: &[IntersectionEntry]) -> DeliveryOutcome {
        if self.phase.get() != WatchPhase::Observing {
            log::trace!("dropping stale intersection callback");
            return DeliveryOutcome::Ignored(IgnoreReason::Stale);
        }
        if !entries.iter().any(|entry| entry.crosses(self.threshold)) {
            return DeliveryOutcome::Ignored(IgnoreReason::BelowThreshold);
        }

        self.phase.set(WatchPhase::Fired);
        self.disconnect();
        // Take the callback out before running it so it may re-enter freely.
        let on_enter = self.on_enter.borrow_mut().take();
        if let Some(on_enter) = on_enter {
            on_enter();
        }
        DeliveryOutcome::Fired
    }

    fn release(&self) -> ReleaseOutcome {
        match self.phase.get() {
            WatchPhase::Fired => ReleaseOutcome::AlreadyFired,
            WatchPhase::Released => ReleaseOutcome::AlreadyReleased,
            WatchPhase::Observing => {
                self.phase.set(WatchPhase::Released);
                self.disconnect();
                self.on_enter.borrow_mut().take();
                ReleaseOutcome::Released
            }
        }
    }

    fn disconnect(&self) {
        let disconnect = self.disconnect.borrow_mut().take();
        if let Some(disconnect) = disconnect {
            disconnect();
        }
    }
}

/// Owns one live viewport subscription.
///
/// Dropping the handle releases it, so every exit path of the owner tears
/// the subscription down.
pub struct ObservationHandle {
    state: Rc<WatchState>,
}

impl ObservationHandle {
    /// Cancels observation. Idempotent; a no-op once the watcher fired.
    pub fn release(&self) -> ReleaseOutcome {
        let outcome = self.state.release();
        if outcome == ReleaseOutcome::Released {
            log::trace!("observation released before intersection");
        }
        outcome
    }

    pub fn phase(&self) -> WatchPhase {
        self.state.phase.get()
    }

    /// True while the element is still being observed.
    pub fn is_active(&self) -> bool {
        self.phase() == WatchPhase::Observing
    }

    pub fn threshold(&self) -> f64 {
        self.state.threshold
    }

    /// How the most recent callback batch was handled, `None` before the
    /// first one.
    pub fn last_delivery(&self) -> Option<DeliveryOutcome> {
        self.state.last_delivery.get()
    }
}

impl Drop for ObservationHandle {
    fn drop(&mut self) {
        self.state.release();
    }
}

impl std::fmt::Debug for ObservationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationHandle")
            .field("phase", &self.phase())
            .field("threshold", &self.state.threshold)
            .field("last_delivery", &self.last_delivery())
            .finish()
    }
}

/// Starts watching `element`; `on_enter` runs at most once, when the element
/// first intersects with a ratio of at least `options.threshold`.
///
/// Fails with [`LazyLoadError::UnsupportedEnvironment`] if the host cannot
/// construct an observer.
pub fn watch<H: ObserverHost>(
    host: &H,
    element: H::Element,
    options: &WatchOptions,
    on_enter: impl FnOnce() + 'static,
) -> Result<ObservationHandle, LazyLoadError> {
    let state = Rc::new(WatchState {
        phase: Cell::new(WatchPhase::Observing),
        threshold: options.threshold,
        disconnect: RefCell::new(None),
        on_enter: RefCell::new(Some(Box::new(on_enter))),
        last_delivery: Cell::new(None),
    });

    let weak = Rc::downgrade(&state);
    let callback: IntersectionCallback = Rc::new(move |entries: &[IntersectionEntry]| {
        match weak.upgrade() {
            Some(state) => {
                state.deliver(entries);
            }
            None => log::trace!("intersection callback after handle drop"),
        }
    });

    let observer = host.create_observer(options, callback)?;
    observer.observe(&element);

    let disconnect: Disconnect = Box::new(move || {
        observer.unobserve(&element);
        observer.disconnect();
    });

    if state.phase.get() == WatchPhase::Observing {
        *state.disconnect.borrow_mut() = Some(disconnect);
    } else {
        // The host reported synchronously from `observe` and we already fired.
        disconnect();
    }

    log::debug!(
        "watching element (root_margin={:?}, threshold={})",
        options.root_margin,
        options.threshold
    );
    Ok(ObservationHandle { state })
}
