//! In-memory observation primitive.

use std::cell::RefCell;
use std::rc::Rc;

use lazyimg_core::{
    IntersectionCallback, IntersectionEntry, LazyLoadError, ObserverConnection, ObserverHost,
    WatchOptions,
};

/// Opaque observable element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FakeElement(u64);

impl FakeElement {
    pub fn id(self) -> u64 {
        self.0
    }
}

pub type ObserverId = usize;

/// One (observer, element) pair currently being observed.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub observer: ObserverId,
    pub element: FakeElement,
    pub options: WatchOptions,
}

struct ObserverRecord {
    options: WatchOptions,
    callback: IntersectionCallback,
    targets: Vec<FakeElement>,
    /// Every element this observer ever watched, for late deliveries.
    history: Vec<FakeElement>,
}

#[derive(Default)]
struct HostState {
    observers: Vec<ObserverRecord>,
    next_element: u64,
    unsupported: bool,
}

/// Deterministic [`ObserverHost`].
///
/// Observers stay registered after they disconnect so tests can reproduce
/// callbacks that arrive after a disconnect request via
/// [`deliver_late`](Self::deliver_late).
#[derive(Clone, Default)]
pub struct FakeObserverHost {
    state: Rc<RefCell<HostState>>,
}

impl FakeObserverHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose observer construction always fails.
    pub fn unsupported() -> Self {
        let host = Self::new();
        host.state.borrow_mut().unsupported = true;
        host
    }

    pub fn create_element(&self) -> FakeElement {
        let mut state = self.state.borrow_mut();
        state.next_element += 1;
        FakeElement(state.next_element)
    }

    /// Observers constructed so far.
    pub fn constructions(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Live (observer, element) subscriptions.
    pub fn live_observations(&self) -> usize {
        self.state
            .borrow()
            .observers
            .iter()
            .map(|record| record.targets.len())
            .sum()
    }

    pub fn is_observed(&self, element: FakeElement) -> bool {
        self.state
            .borrow()
            .observers
            .iter()
            .any(|record| record.targets.contains(&element))
    }

    pub fn observations(&self) -> Vec<Observation> {
        let state = self.state.borrow();
        state
            .observers
            .iter()
            .enumerate()
            .flat_map(|(observer, record)| {
                record.targets.iter().map(move |&element| Observation {
                    observer,
                    element,
                    options: record.options.clone(),
                })
            })
            .collect()
    }

    /// Delivers `entry` to every observer currently watching `element`.
    /// Returns the number of callbacks invoked.
    pub fn deliver(&self, element: FakeElement, entry: IntersectionEntry) -> usize {
        let callbacks = self.collect_callbacks(|record| record.targets.contains(&element));
        invoke(callbacks, entry)
    }

    /// Delivers `entry` to every observer that ever watched `element`,
    /// including ones that were unobserved or disconnected since.
    pub fn deliver_late(&self, element: FakeElement, entry: IntersectionEntry) -> usize {
        let callbacks = self.collect_callbacks(|record| record.history.contains(&element));
        invoke(callbacks, entry)
    }

    /// Delivers `entry` to one observer regardless of its targets.
    pub fn deliver_to(&self, observer: ObserverId, entry: IntersectionEntry) -> bool {
        let callback = self
            .state
            .borrow()
            .observers
            .get(observer)
            .map(|record| record.callback.clone());
        match callback {
            Some(callback) => {
                callback(&[entry]);
                true
            }
            None => false,
        }
    }

    // Callbacks are cloned out so they can re-enter the host.
    fn collect_callbacks(
        &self,
        filter: impl Fn(&ObserverRecord) -> bool,
    ) -> Vec<IntersectionCallback> {
        self.state
            .borrow()
            .observers
            .iter()
            .filter(|record| filter(*record))
            .map(|record| record.callback.clone())
            .collect()
    }
}

fn invoke(callbacks: Vec<IntersectionCallback>, entry: IntersectionEntry) -> usize {
    for callback in &callbacks {
        callback(&[entry]);
    }
    callbacks.len()
}

impl ObserverHost for FakeObserverHost {
    type Element = FakeElement;
    type Observer = FakeObserver;

    fn create_observer(
        &self,
        options: &WatchOptions,
        callback: IntersectionCallback,
    ) -> Result<FakeObserver, LazyLoadError> {
        let mut state = self.state.borrow_mut();
        if state.unsupported {
            return Err(LazyLoadError::UnsupportedEnvironment {
                reason: "fake host configured without observers",
            });
        }
        state.observers.push(ObserverRecord {
            options: options.clone(),
            callback,
            targets: Vec::new(),
            history: Vec::new(),
        });
        Ok(FakeObserver {
            id: state.observers.len() - 1,
            state: self.state.clone(),
        })
    }
}

/// Connection handed out by [`FakeObserverHost`].
pub struct FakeObserver {
    id: ObserverId,
    state: Rc<RefCell<HostState>>,
}

impl FakeObserver {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    fn with_record(&self, f: impl FnOnce(&mut ObserverRecord)) {
        if let Some(record) = self.state.borrow_mut().observers.get_mut(self.id) {
            f(record);
        }
    }
}

impl ObserverConnection for FakeObserver {
    type Element = FakeElement;

    fn observe(&self, element: &FakeElement) {
        self.with_record(|record| {
            if !record.targets.contains(element) {
                record.targets.push(*element);
            }
            if !record.history.contains(element) {
                record.history.push(*element);
            }
        });
    }

    fn unobserve(&self, element: &FakeElement) {
        self.with_record(|record| record.targets.retain(|target| target != element));
    }

    fn disconnect(&self) {
        self.with_record(|record| record.targets.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tracks_live_observations() {
        let host = FakeObserverHost::new();
        let element = host.create_element();
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        let observer = host
            .create_observer(
                &WatchOptions::default(),
                Rc::new(move |_: &[IntersectionEntry]| counter.set(counter.get() + 1)),
            )
            .unwrap();

        observer.observe(&element);
        assert_eq!(host.live_observations(), 1);
        assert_eq!(host.deliver(element, IntersectionEntry::visible()), 1);

        observer.disconnect();
        assert_eq!(host.live_observations(), 0);
        assert_eq!(host.deliver(element, IntersectionEntry::visible()), 0);
        assert_eq!(host.deliver_late(element, IntersectionEntry::visible()), 1);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn unsupported_host_refuses_observers() {
        let host = FakeObserverHost::unsupported();
        let result = host.create_observer(
            &WatchOptions::default(),
            Rc::new(|_: &[IntersectionEntry]| {}),
        );
        assert!(matches!(
            result,
            Err(LazyLoadError::UnsupportedEnvironment { .. })
        ));
        assert_eq!(host.constructions(), 0);
    }
}
