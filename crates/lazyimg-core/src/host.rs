//! Contracts between the engine and its host environment.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::{LazyLoadError, Rect, WatchOptions};

/// Slack applied to ratio comparisons. Browsers report subpixel ratios such
/// as `0.99999` for elements that are fully on screen.
pub const RATIO_TOLERANCE: f64 = 1e-4;

/// One intersection observation for a watched element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub is_intersecting: bool,
    /// Visible fraction of the element, in `[0, 1]`.
    pub intersection_ratio: f64,
}

impl IntersectionEntry {
    pub const fn new(is_intersecting: bool, intersection_ratio: f64) -> Self {
        Self {
            is_intersecting,
            intersection_ratio,
        }
    }

    /// Fully visible element.
    pub const fn visible() -> Self {
        Self::new(true, 1.0)
    }

    /// Element entirely outside the (margin-expanded) root.
    pub const fn hidden() -> Self {
        Self::new(false, 0.0)
    }

    /// Computes the entry for `target` against the already margin-expanded
    /// `root` bounds.
    pub fn between(target: &Rect, root: &Rect) -> Self {
        match target.intersect(root) {
            Some(overlap) => {
                let area = target.area();
                let ratio = if area > 0.0 {
                    (overlap.area() / area).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                Self::new(true, ratio)
            }
            None => Self::hidden(),
        }
    }

    /// True if this entry counts as entering the viewport for `threshold`,
    /// within [`RATIO_TOLERANCE`].
    pub fn crosses(&self, threshold: f64) -> bool {
        self.is_intersecting && self.intersection_ratio + RATIO_TOLERANCE >= threshold
    }
}

/// Entries delivered together in one callback invocation.
pub type IntersectionBatch = SmallVec<[IntersectionEntry; 4]>;

/// Callback handed to the observation primitive.
///
/// Shared rather than boxed so hosts can clone it out of their bookkeeping
/// before invoking it; the callback may re-enter the host to unobserve.
pub type IntersectionCallback = Rc<dyn Fn(&[IntersectionEntry])>;

/// The environment's viewport observation primitive.
pub trait ObserverHost {
    /// Handle to an observable element.
    type Element: Clone + 'static;

    /// A constructed observer.
    type Observer: ObserverConnection<Element = Self::Element> + 'static;

    /// Builds an observer for `options`. Entries for every observed element
    /// are reported through `callback`.
    fn create_observer(
        &self,
        options: &WatchOptions,
        callback: IntersectionCallback,
    ) -> Result<Self::Observer, LazyLoadError>;
}

/// A live observer created by an [`ObserverHost`].
pub trait ObserverConnection {
    type Element;

    fn observe(&self, element: &Self::Element);

    fn unobserve(&self, element: &Self::Element);

    fn disconnect(&self);
}

/// What a slot currently exposes to the rendering surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotView<'a> {
    /// Source to show, `None` for "no source attribute at all".
    pub resource: Option<&'a str>,
    /// The element must carry the native "defer" hint.
    pub deferred_natively: bool,
}

/// Surface that draws an image slot.
///
/// Each call is one atomic update; implementations must write the source in
/// a single operation so no intermediate empty value becomes observable.
pub trait SlotRenderer {
    fn render(&self, view: SlotView<'_>);
}

impl<R: SlotRenderer + ?Sized> SlotRenderer for Rc<R> {
    fn render(&self, view: SlotView<'_>) {
        (**self).render(view)
    }
}
