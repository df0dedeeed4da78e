use lazyimg_core::{SlotRenderer, SlotView};
use web_sys::HtmlImageElement;

/// Draws a slot into an `<img>` element.
pub struct ImgRenderer {
    image: HtmlImageElement,
}

impl ImgRenderer {
    pub fn new(image: HtmlImageElement) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &HtmlImageElement {
        &self.image
    }
}

impl SlotRenderer for ImgRenderer {
    fn render(&self, view: SlotView<'_>) {
        // The hint has to be in place before `src` starts the fetch.
        if view.deferred_natively {
            if let Err(err) = self.image.set_attribute("loading", "lazy") {
                log::warn!("failed to set loading=lazy: {err:?}");
            }
        }
        match view.resource {
            Some(src) => self.image.set_src(src),
            None => {
                if let Err(err) = self.image.remove_attribute("src") {
                    log::warn!("failed to clear src: {err:?}");
                }
            }
        }
    }
}
