use lazyimg_core::{CapabilityDetector, CapabilityFlag, CapabilityProbe};
use wasm_bindgen::JsValue;

/// Checks for `"loading" in HTMLImageElement.prototype`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomCapabilityProbe;

impl CapabilityProbe for DomCapabilityProbe {
    fn probe(&self) -> Option<bool> {
        let window = web_sys::window()?;
        let image_ctor =
            js_sys::Reflect::get(&window, &JsValue::from_str("HTMLImageElement")).ok()?;
        if !image_ctor.is_function() {
            return None;
        }
        let prototype = js_sys::Reflect::get(&image_ctor, &JsValue::from_str("prototype")).ok()?;
        if !prototype.is_object() {
            return None;
        }
        js_sys::Reflect::has(&prototype, &JsValue::from_str("loading")).ok()
    }
}

thread_local! {
    // wasm runs on a single thread, so this is effectively process-wide.
    static DETECTOR: CapabilityDetector<DomCapabilityProbe> =
        CapabilityDetector::new(DomCapabilityProbe);
}

/// Cached answer to "does this browser defer `<img loading=lazy>` itself".
pub fn native_lazy_load_flag() -> CapabilityFlag {
    DETECTOR.with(|detector| detector.flag())
}
