use lazyimg_core::{CapabilityFlag, ImageDescriptor, Rect};
use lazyimg_gallery::{Gallery, GalleryConfig};

use crate::{FakeElement, FakeObserverHost, RecordingRenderer, ViewportSimulator};

/// Viewport and item sizes used by [`GalleryTestRule`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GalleryLayout {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub item_width: f64,
    pub item_height: f64,
    pub gap: f64,
    /// Document offset of the first item.
    pub offset: f64,
}

impl Default for GalleryLayout {
    /// A single column of 400x600 images in a 400x600 viewport.
    fn default() -> Self {
        Self {
            viewport_width: 400.0,
            viewport_height: 600.0,
            item_width: 400.0,
            item_height: 600.0,
            gap: 0.0,
            offset: 0.0,
        }
    }
}

impl GalleryLayout {
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn item_bounds(&self, index: usize) -> Rect {
        let y = self.offset + index as f64 * (self.item_height + self.gap);
        Rect::new(0.0, y, self.item_width, self.item_height)
    }
}

/// Mounts a gallery against a [`FakeObserverHost`] laid out as a single
/// column, with one [`RecordingRenderer`] per slot.
pub struct GalleryTestRule {
    viewport: ViewportSimulator,
    gallery: Gallery,
    elements: Vec<FakeElement>,
    renderers: Vec<RecordingRenderer>,
}

impl GalleryTestRule {
    pub fn new(
        descriptors: Vec<ImageDescriptor>,
        capability: CapabilityFlag,
        config: GalleryConfig,
    ) -> Self {
        Self::with_host(
            FakeObserverHost::new(),
            descriptors,
            capability,
            config,
            GalleryLayout::default(),
        )
    }

    pub fn with_host(
        host: FakeObserverHost,
        descriptors: Vec<ImageDescriptor>,
        capability: CapabilityFlag,
        config: GalleryConfig,
        layout: GalleryLayout,
    ) -> Self {
        let mut viewport =
            ViewportSimulator::new(host.clone(), layout.viewport_width, layout.viewport_height);
        let mut elements = Vec::new();
        let mut renderers = Vec::new();

        let gallery = Gallery::mount(descriptors, capability, &host, &config, |index, _| {
            let element = host.create_element();
            viewport.place(element, layout.item_bounds(index));
            let renderer = RecordingRenderer::new();
            elements.push(element);
            renderers.push(renderer.clone());
            (element, renderer)
        });

        // Observation reports the initial state right after mounting.
        viewport.flush();

        Self {
            viewport,
            gallery,
            elements,
            renderers,
        }
    }

    pub fn host(&self) -> &FakeObserverHost {
        self.viewport.host()
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    pub fn viewport(&mut self) -> &mut ViewportSimulator {
        &mut self.viewport
    }

    pub fn element(&self, index: usize) -> FakeElement {
        self.elements[index]
    }

    pub fn renderer(&self, index: usize) -> &RecordingRenderer {
        &self.renderers[index]
    }

    pub fn renderers(&self) -> &[RecordingRenderer] {
        &self.renderers
    }

    /// Scrolls vertically to `y` and returns the number of deliveries.
    pub fn scroll_to(&mut self, y: f64) -> usize {
        self.viewport.scroll_to(0.0, y)
    }

    pub fn unmount(&mut self) {
        self.gallery.unmount();
    }
}
