use lazyimg_core::{CapabilityFlag, WatchOptions};

/// Gallery-wide settings.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryConfig {
    /// Observation policy shared by every image.
    pub policy: WatchOptions,
    /// Forces native lazy loading on or off instead of using detection.
    pub native_lazy_load: Option<bool>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            policy: WatchOptions::preload_margin(),
            native_lazy_load: None,
        }
    }
}

impl GalleryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: WatchOptions) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_native_lazy_load(mut self, enabled: bool) -> Self {
        self.native_lazy_load = Some(enabled);
        self
    }

    /// Applies the override, if any, to the detected capability.
    pub fn resolve_capability(&self, detected: CapabilityFlag) -> CapabilityFlag {
        self.native_lazy_load
            .map(CapabilityFlag::from_native_support)
            .unwrap_or(detected)
    }
}
