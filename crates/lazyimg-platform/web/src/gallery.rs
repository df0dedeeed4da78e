use lazyimg_core::ImageDescriptor;
use lazyimg_gallery::{Gallery, GalleryConfig, GalleryStats};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement};

use crate::{
    native_lazy_load_flag, release_retired_callbacks, DomError, DomObserverHost, ImgRenderer,
};

/// Intrinsic size given to every `<img>`, so the layout is stable before
/// any source arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomGalleryLayout {
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for DomGalleryLayout {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 600,
        }
    }
}

/// A gallery mounted into a container element.
///
/// Dropping it removes the markup and releases every observation.
pub struct DomGallery {
    gallery: Gallery,
    container: Element,
    slots: Vec<Element>,
}

/// Appends one `div.image-container > img.image` per descriptor to the
/// element with `container_id` and mounts a gallery over them.
pub fn mount_dom_gallery(
    container_id: &str,
    descriptors: Vec<ImageDescriptor>,
    config: &GalleryConfig,
    layout: DomGalleryLayout,
) -> Result<DomGallery, DomError> {
    let document = document()?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| DomError::MissingElement {
            id: container_id.to_owned(),
        })?;

    let mut nodes = Vec::with_capacity(descriptors.len());
    for _ in &descriptors {
        let node = create_slot(&document, layout)?;
        container.append_child(&node.0)?;
        nodes.push(node);
    }

    let host = DomObserverHost::new();
    let gallery = Gallery::mount(
        descriptors,
        native_lazy_load_flag(),
        &host,
        config,
        |index, _| {
            let (wrapper, image) = nodes[index].clone();
            (wrapper, ImgRenderer::new(image))
        },
    );

    log::info!(
        "mounted {} images into #{container_id}: {:?}",
        gallery.len(),
        gallery.stats()
    );

    Ok(DomGallery {
        gallery,
        container,
        slots: nodes.into_iter().map(|(wrapper, _)| wrapper).collect(),
    })
}

fn document() -> Result<Document, DomError> {
    web_sys::window()
        .ok_or(DomError::NoWindow)?
        .document()
        .ok_or(DomError::NoDocument)
}

fn create_slot(
    document: &Document,
    layout: DomGalleryLayout,
) -> Result<(Element, HtmlImageElement), DomError> {
    let wrapper = document.create_element("div")?;
    wrapper.set_class_name("image-container");

    let image = document
        .create_element("img")?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| DomError::UnexpectedElement {
            expected: "HTMLImageElement",
        })?;
    image.set_class_name("image");
    image.set_alt("");
    image.set_width(layout.image_width);
    image.set_height(layout.image_height);

    wrapper.append_child(&image)?;
    Ok((wrapper, image))
}

impl DomGallery {
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn container(&self) -> &Element {
        &self.container
    }

    pub fn stats(&self) -> GalleryStats {
        self.gallery.stats()
    }

    /// Releases every observation and removes the slot markup. Idempotent.
    pub fn unmount(&mut self) {
        self.gallery.unmount();
        for slot in self.slots.drain(..) {
            slot.remove();
        }
        release_retired_callbacks();
    }
}

impl Drop for DomGallery {
    fn drop(&mut self) {
        self.unmount();
    }
}
