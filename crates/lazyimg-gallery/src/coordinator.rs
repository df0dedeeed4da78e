//! One load trigger per gallery image.

use lazyimg_core::collections::{Entry, HashMap};
use lazyimg_core::{
    CapabilityFlag, ImageDescriptor, LoadState, LoadTrigger, ObserverHost, SlotRenderer, SlotView,
};

use crate::GalleryConfig;

/// Counts over the gallery's triggers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GalleryStats {
    pub total: usize,
    pub pending: usize,
    pub visible: usize,
    /// Triggers still holding a live observation.
    pub active_observations: usize,
    pub deferred_natively: usize,
}

/// Read-only view of one slot, in gallery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSnapshot<'a> {
    pub index: usize,
    pub id: &'a str,
    pub state: LoadState,
    pub view: SlotView<'a>,
}

/// Owns the load triggers of a mounted gallery.
///
/// Dropping the gallery unmounts it.
#[derive(Debug, Default)]
pub struct Gallery {
    triggers: Vec<LoadTrigger>,
    index_by_id: HashMap<String, usize>,
}

impl Gallery {
    /// Creates one trigger per descriptor, preserving input order.
    ///
    /// `slot_factory` supplies the observable element and the renderer for
    /// each descriptor.
    pub fn mount<H, R, I, F>(
        descriptors: I,
        capability: CapabilityFlag,
        host: &H,
        config: &GalleryConfig,
        mut slot_factory: F,
    ) -> Self
    where
        H: ObserverHost,
        R: SlotRenderer + 'static,
        I: IntoIterator<Item = ImageDescriptor>,
        F: FnMut(usize, &ImageDescriptor) -> (H::Element, R),
    {
        let capability = config.resolve_capability(capability);
        let mut gallery = Gallery::default();

        for (index, descriptor) in descriptors.into_iter().enumerate() {
            match gallery.index_by_id.entry(descriptor.id().to_owned()) {
                Entry::Vacant(entry) => {
                    entry.insert(index);
                }
                Entry::Occupied(entry) => {
                    log::warn!(
                        "duplicate image id {:?} at {index}; lookups resolve to slot {}",
                        entry.key(),
                        entry.get()
                    );
                }
            }
            let (element, renderer) = slot_factory(index, &descriptor);
            gallery.triggers.push(LoadTrigger::new(
                descriptor,
                capability,
                host,
                element,
                &config.policy,
                renderer,
            ));
        }

        log::debug!(
            "mounted gallery with {} images (native lazy loading: {})",
            gallery.triggers.len(),
            capability.is_native()
        );
        gallery
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn trigger(&self, index: usize) -> Option<&LoadTrigger> {
        self.triggers.get(index)
    }

    pub fn trigger_mut(&mut self, index: usize) -> Option<&mut LoadTrigger> {
        self.triggers.get_mut(index)
    }

    pub fn trigger_by_id(&self, id: &str) -> Option<&LoadTrigger> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.triggers.get(index))
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotSnapshot<'_>> {
        self.triggers
            .iter()
            .enumerate()
            .map(|(index, trigger)| SlotSnapshot {
                index,
                id: trigger.descriptor().id(),
                state: trigger.state(),
                view: trigger.view(),
            })
    }

    pub fn stats(&self) -> GalleryStats {
        let mut stats = GalleryStats {
            total: self.triggers.len(),
            ..GalleryStats::default()
        };
        for trigger in &self.triggers {
            match trigger.state() {
                LoadState::Pending => stats.pending += 1,
                LoadState::Visible => stats.visible += 1,
            }
            if trigger.has_active_observation() {
                stats.active_observations += 1;
            }
            if trigger.is_deferred_natively() {
                stats.deferred_natively += 1;
            }
        }
        stats
    }

    /// Tears down every trigger and drops the slots. Idempotent.
    pub fn unmount(&mut self) {
        if self.triggers.is_empty() {
            return;
        }
        let pending = self
            .triggers
            .iter()
            .filter(|trigger| !trigger.state().is_visible())
            .count();
        for trigger in &mut self.triggers {
            trigger.teardown();
        }
        self.triggers.clear();
        self.index_by_id.clear();
        log::debug!("unmounted gallery ({pending} images never became visible)");
    }
}

impl Drop for Gallery {
    fn drop(&mut self) {
        self.unmount();
    }
}
