use std::cell::RefCell;

use lazyimg_core::WatchOptions;
use lazyimg_gallery::{DescriptorProvider, GalleryConfig, UrlTemplate};
use lazyimg_platform_web::{mount_dom_gallery, DomGallery, DomGalleryLayout};
use wasm_bindgen::prelude::*;

const IMAGE_URL: &str = "https://res.cloudinary.com/chimson/image/upload/f_webp,q_70,w_400,h_600/v1643655382/intersection-observer-demo/image_{id}.jpg";
const BLURRED_URL: &str = "https://res.cloudinary.com/chimson/image/upload/f_webp,q_30,w_40,h_60,e_blur:400/v1643655382/intersection-observer-demo/image_{id}.jpg";

const IMAGE_COUNT: usize = 15;

thread_local! {
    static GALLERY: RefCell<Option<DomGallery>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Web gallery starting...");
}

/// Mounts the demo gallery into `container_id`, replacing any previous one.
#[wasm_bindgen]
pub fn run_gallery(
    container_id: &str,
    blurred_placeholders: bool,
    just_in_time: bool,
) -> Result<(), JsValue> {
    unmount_gallery();

    let mut template = UrlTemplate::new(IMAGE_URL);
    if blurred_placeholders {
        template = template.with_placeholder(BLURRED_URL);
    }
    // Slot 0 is intentionally empty.
    let ids = (0..IMAGE_COUNT).map(|index| (index != 0).then(|| index.to_string()));
    let descriptors = template.descriptors(ids);

    let policy = if just_in_time {
        WatchOptions::just_in_time()
    } else {
        WatchOptions::preload_margin()
    };
    let config = GalleryConfig::new().with_policy(policy);

    let gallery = mount_dom_gallery(
        container_id,
        descriptors,
        &config,
        DomGalleryLayout::default(),
    )?;
    GALLERY.with(|slot| *slot.borrow_mut() = Some(gallery));
    Ok(())
}

/// Removes the mounted gallery, if any.
#[wasm_bindgen]
pub fn unmount_gallery() {
    let previous = GALLERY.with(|slot| slot.borrow_mut().take());
    if let Some(mut gallery) = previous {
        gallery.unmount();
    }
}
