//! `IntersectionObserver` backed [`ObserverHost`].

use std::cell::RefCell;

use lazyimg_core::{
    IntersectionBatch, IntersectionCallback, IntersectionEntry, LazyLoadError, ObserverConnection,
    ObserverHost, WatchOptions,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

type EntriesClosure = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

thread_local! {
    // Observers are usually dropped from inside their own callback, so their
    // closures are parked here instead of being freed while still running.
    static RETIRED: RefCell<Vec<EntriesClosure>> = const { RefCell::new(Vec::new()) };
}

/// Frees closures of observers dropped earlier. Must not be called from
/// inside an intersection callback.
pub fn release_retired_callbacks() {
    let retired = RETIRED.with(|retired| std::mem::take(&mut *retired.borrow_mut()));
    if !retired.is_empty() {
        log::trace!("freeing {} retired observer callbacks", retired.len());
    }
}

/// Returns true if the browser exposes `IntersectionObserver`.
pub fn intersection_observer_supported() -> bool {
    web_sys::window()
        .and_then(|window| {
            js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver")).ok()
        })
        .unwrap_or(false)
}

/// Observes elements against the browser viewport.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomObserverHost;

impl DomObserverHost {
    pub fn new() -> Self {
        Self
    }
}

impl ObserverHost for DomObserverHost {
    type Element = Element;
    type Observer = DomObserver;

    fn create_observer(
        &self,
        options: &WatchOptions,
        callback: IntersectionCallback,
    ) -> Result<DomObserver, LazyLoadError> {
        release_retired_callbacks();
        if !intersection_observer_supported() {
            return Err(LazyLoadError::UnsupportedEnvironment {
                reason: "IntersectionObserver is not available",
            });
        }

        let closure = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let batch: IntersectionBatch = entries
                    .iter()
                    .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        IntersectionEntry::new(entry.is_intersecting(), entry.intersection_ratio())
                    })
                    .collect();
                callback(&batch);
            },
        ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));

        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)
                .map_err(|err| {
                    log::warn!(
                        "IntersectionObserver rejected root_margin={:?} threshold={}: {err:?}",
                        options.root_margin,
                        options.threshold
                    );
                    LazyLoadError::UnsupportedEnvironment {
                        reason: "IntersectionObserver construction failed",
                    }
                })?;

        Ok(DomObserver {
            observer,
            closure: Some(closure),
        })
    }
}

/// One browser `IntersectionObserver` and the closure it calls.
pub struct DomObserver {
    observer: IntersectionObserver,
    closure: Option<EntriesClosure>,
}

impl ObserverConnection for DomObserver {
    type Element = Element;

    fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }

    fn unobserve(&self, element: &Element) {
        self.observer.unobserve(element);
    }

    fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        if let Some(closure) = self.closure.take() {
            RETIRED.with(|retired| retired.borrow_mut().push(closure));
        }
    }
}
