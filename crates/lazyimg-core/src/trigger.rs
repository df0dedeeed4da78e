//! Per-image load state machine.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use web_time::{Duration, Instant};

use crate::{
    watch, CapabilityFlag, ImageDescriptor, ObservationHandle, ObserverHost, SlotRenderer,
    SlotView, WatchOptions,
};

/// Load state of one image. `Pending -> Visible` is the only transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadState {
    #[default]
    Pending,
    Visible,
}

impl LoadState {
    pub fn is_visible(self) -> bool {
        self == LoadState::Visible
    }
}

struct TriggerShared {
    descriptor: ImageDescriptor,
    state: Cell<LoadState>,
    torn_down: Cell<bool>,
    deferred_natively: bool,
    renderer: Box<dyn SlotRenderer>,
    created_at: Instant,
    visible_at: Cell<Option<Instant>>,
}

impl TriggerShared {
    fn view(&self) -> SlotView<'_> {
        let resource = match self.state.get() {
            LoadState::Visible => Some(self.descriptor.final_src()),
            LoadState::Pending => self.descriptor.placeholder_src(),
        };
        SlotView {
            resource,
            deferred_natively: self.deferred_natively,
        }
    }

    /// Gated body of the `on_enter` callback. Returns false for stale calls.
    fn mark_visible(&self) -> bool {
        if self.torn_down.get() || self.state.get() == LoadState::Visible {
            log::trace!("ignoring stale visibility for {}", self.descriptor.id());
            return false;
        }
        let now = Instant::now();
        self.state.set(LoadState::Visible);
        self.visible_at.set(Some(now));
        self.renderer.render(self.view());
        log::debug!(
            "image {} visible after {:?}",
            self.descriptor.id(),
            now.duration_since(self.created_at)
        );
        true
    }
}

/// Drives one image from placeholder to final resource.
///
/// With native lazy loading the trigger becomes [`LoadState::Visible`] at
/// construction and leaves deferral to the environment. Otherwise it holds an
/// [`ObservationHandle`] until the element enters the viewport.
///
/// Dropping the trigger tears it down.
pub struct LoadTrigger {
    shared: Rc<TriggerShared>,
    handle: Option<ObservationHandle>,
}

impl LoadTrigger {
    pub fn new<H, R>(
        descriptor: ImageDescriptor,
        capability: CapabilityFlag,
        host: &H,
        element: H::Element,
        options: &WatchOptions,
        renderer: R,
    ) -> Self
    where
        H: ObserverHost,
        R: SlotRenderer + 'static,
    {
        let native = capability.is_native();
        let shared = Rc::new(TriggerShared {
            descriptor,
            state: Cell::new(if native {
                LoadState::Visible
            } else {
                LoadState::Pending
            }),
            torn_down: Cell::new(false),
            deferred_natively: native,
            renderer: Box::new(renderer),
            created_at: Instant::now(),
            visible_at: Cell::new(None),
        });
        if native {
            shared.visible_at.set(Some(shared.created_at));
        }
        shared.renderer.render(shared.view());

        let mut trigger = Self {
            shared,
            handle: None,
        };
        if !native {
            trigger.subscribe(host, element, options);
        }
        trigger
    }

    fn subscribe<H: ObserverHost>(
        &mut self,
        host: &H,
        element: H::Element,
        options: &WatchOptions,
    ) {
        let weak: Weak<TriggerShared> = Rc::downgrade(&self.shared);
        let on_enter = move || {
            if let Some(shared) = weak.upgrade() {
                shared.mark_visible();
            }
        };
        match watch(host, element, options, on_enter) {
            Ok(handle) => self.handle = Some(handle),
            Err(err) => {
                log::warn!(
                    "{err}; image {} stays on its placeholder",
                    self.shared.descriptor.id()
                );
            }
        }
    }

    /// Re-runs the subscription step, e.g. after the element was re-created.
    ///
    /// Does nothing once visible, after teardown, or while a watcher is
    /// still live. Returns true if a new watcher was registered.
    pub fn ensure_watching<H: ObserverHost>(
        &mut self,
        host: &H,
        element: H::Element,
        options: &WatchOptions,
    ) -> bool {
        if self.shared.torn_down.get()
            || self.state().is_visible()
            || self.has_active_observation()
        {
            return false;
        }
        self.subscribe(host, element, options);
        self.has_active_observation()
    }

    /// Releases any live observation. Idempotent.
    pub fn teardown(&mut self) {
        if self.shared.torn_down.replace(true) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
    }

    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.shared.descriptor
    }

    pub fn state(&self) -> LoadState {
        self.shared.state.get()
    }

    /// The `(resource, deferred_natively)` pair currently exposed.
    pub fn view(&self) -> SlotView<'_> {
        self.shared.view()
    }

    pub fn is_deferred_natively(&self) -> bool {
        self.shared.deferred_natively
    }

    pub fn has_active_observation(&self) -> bool {
        self.handle
            .as_ref()
            .map(ObservationHandle::is_active)
            .unwrap_or(false)
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.torn_down.get()
    }

    /// Time spent pending, once visible.
    pub fn time_to_visible(&self) -> Option<Duration> {
        self.shared
            .visible_at
            .get()
            .map(|at| at.duration_since(self.shared.created_at))
    }
}

impl Drop for LoadTrigger {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for LoadTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadTrigger")
            .field("id", &self.shared.descriptor.id())
            .field("state", &self.state())
            .field("deferred_natively", &self.shared.deferred_natively)
            .field("observing", &self.has_active_observation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IntersectionCallback, IntersectionEntry, LazyLoadError, ObserverConnection};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Host {
        callbacks: RefCell<Vec<IntersectionCallback>>,
        unsupported: bool,
    }

    struct Observer;

    impl ObserverConnection for Observer {
        type Element = ();
        fn observe(&self, _: &()) {}
        fn unobserve(&self, _: &()) {}
        fn disconnect(&self) {}
    }

    impl ObserverHost for Host {
        type Element = ();
        type Observer = Observer;

        fn create_observer(
            &self,
            _options: &WatchOptions,
            callback: IntersectionCallback,
        ) -> Result<Observer, LazyLoadError> {
            if self.unsupported {
                return Err(LazyLoadError::UnsupportedEnvironment {
                    reason: "stub without observer",
                });
            }
            self.callbacks.borrow_mut().push(callback);
            Ok(Observer)
        }
    }

    impl Host {
        fn fire(&self) {
            let callbacks = self.callbacks.borrow().clone();
            for callback in callbacks {
                callback(&[IntersectionEntry::visible()]);
            }
        }
    }

    #[derive(Clone, Default)]
    struct Log(Rc<RefCell<Vec<(Option<String>, bool)>>>);

    impl SlotRenderer for Log {
        fn render(&self, view: SlotView<'_>) {
            self.0
                .borrow_mut()
                .push((view.resource.map(str::to_owned), view.deferred_natively));
        }
    }

    fn descriptor() -> ImageDescriptor {
        ImageDescriptor::new("7", "final.jpg").with_placeholder("blur.jpg")
    }

    #[test]
    fn native_capability_skips_observation() {
        let host = Host::default();
        let log = Log::default();
        let trigger = LoadTrigger::new(
            descriptor(),
            CapabilityFlag::NATIVE,
            &host,
            (),
            &WatchOptions::default(),
            log.clone(),
        );

        assert_eq!(trigger.state(), LoadState::Visible);
        assert!(host.callbacks.borrow().is_empty());
        assert_eq!(*log.0.borrow(), vec![(Some("final.jpg".into()), true)]);
        assert_eq!(trigger.time_to_visible(), Some(Duration::ZERO));
    }

    #[test]
    fn fallback_swaps_placeholder_for_final() {
        let host = Host::default();
        let log = Log::default();
        let trigger = LoadTrigger::new(
            descriptor(),
            CapabilityFlag::FALLBACK,
            &host,
            (),
            &WatchOptions::default(),
            log.clone(),
        );
        assert_eq!(trigger.state(), LoadState::Pending);
        assert_eq!(trigger.view().resource, Some("blur.jpg"));

        host.fire();
        host.fire();

        assert_eq!(trigger.state(), LoadState::Visible);
        assert!(!trigger.has_active_observation());
        assert_eq!(
            *log.0.borrow(),
            vec![
                (Some("blur.jpg".into()), false),
                (Some("final.jpg".into()), false)
            ]
        );
    }

    #[test]
    fn unsupported_environment_degrades_to_placeholder() {
        let host = Host {
            unsupported: true,
            ..Host::default()
        };
        let mut trigger = LoadTrigger::new(
            descriptor(),
            CapabilityFlag::FALLBACK,
            &host,
            (),
            &WatchOptions::default(),
            Log::default(),
        );

        assert_eq!(trigger.state(), LoadState::Pending);
        assert!(!trigger.has_active_observation());
        assert!(!trigger.ensure_watching(&host, (), &WatchOptions::default()));
    }

    #[test]
    fn ensure_watching_never_resubscribes_after_visible() {
        let host = Host::default();
        let mut trigger = LoadTrigger::new(
            descriptor(),
            CapabilityFlag::FALLBACK,
            &host,
            (),
            &WatchOptions::default(),
            Log::default(),
        );
        assert!(!trigger.ensure_watching(&host, (), &WatchOptions::default()));

        host.fire();
        assert!(!trigger.ensure_watching(&host, (), &WatchOptions::default()));
        assert_eq!(host.callbacks.borrow().len(), 1);
    }

    #[test]
    fn teardown_suppresses_late_callbacks() {
        let host = Host::default();
        let log = Log::default();
        let mut trigger = LoadTrigger::new(
            descriptor(),
            CapabilityFlag::FALLBACK,
            &host,
            (),
            &WatchOptions::default(),
            log.clone(),
        );
        trigger.teardown();
        trigger.teardown();
        host.fire();

        assert!(trigger.is_torn_down());
        assert_eq!(trigger.state(), LoadState::Pending);
        assert_eq!(log.0.borrow().len(), 1);
    }
}
