//! Geometric viewport simulation on top of [`FakeObserverHost`].

use lazyimg_core::collections::HashMap;
use lazyimg_core::{IntersectionEntry, Rect, RootMargin};

use crate::{FakeElement, FakeObserverHost, ObserverId};

/// Places elements in document coordinates and reports intersections the
/// way a browser would: once when observation starts, then whenever an
/// element crosses its observer's threshold.
pub struct ViewportSimulator {
    host: FakeObserverHost,
    viewport: Rect,
    layout: HashMap<FakeElement, Rect>,
    last_reported: HashMap<(ObserverId, FakeElement), (bool, bool)>,
}

impl ViewportSimulator {
    /// `width` x `height` viewport scrolled to the document origin.
    pub fn new(host: FakeObserverHost, width: f64, height: f64) -> Self {
        Self {
            host,
            viewport: Rect::new(0.0, 0.0, width, height),
            layout: HashMap::default(),
            last_reported: HashMap::default(),
        }
    }

    pub fn host(&self) -> &FakeObserverHost {
        &self.host
    }

    /// Current viewport in document coordinates.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn place(&mut self, element: FakeElement, bounds: Rect) {
        self.layout.insert(element, bounds);
    }

    pub fn bounds(&self, element: FakeElement) -> Option<Rect> {
        self.layout.get(&element).copied()
    }

    /// Scrolls to a document offset and flushes pending notifications.
    pub fn scroll_to(&mut self, x: f64, y: f64) -> usize {
        self.viewport.x = x;
        self.viewport.y = y;
        self.flush()
    }

    pub fn scroll_by(&mut self, dy: f64) -> usize {
        let (x, y) = (self.viewport.x, self.viewport.y + dy);
        self.scroll_to(x, y)
    }

    /// Delivers an entry to every live observation whose state changed since
    /// its last report. Returns the number of deliveries.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        for observation in self.host.observations() {
            let Some(target) = self.layout.get(&observation.element).copied() else {
                continue;
            };
            let margin = observation.options.parsed_root_margin().unwrap_or_else(|| {
                log::warn!(
                    "unparseable root margin {:?}, simulating without margin",
                    observation.options.root_margin
                );
                RootMargin::ZERO
            });
            let root = margin.expand(&self.viewport);
            let entry = IntersectionEntry::between(&target, &root);
            let state = (
                entry.is_intersecting,
                entry.crosses(observation.options.threshold),
            );

            let key = (observation.observer, observation.element);
            if self.last_reported.get(&key) == Some(&state) {
                continue;
            }
            self.last_reported.insert(key, state);
            if self.host.deliver_to(observation.observer, entry) {
                delivered += 1;
            }
        }
        delivered
    }
}
