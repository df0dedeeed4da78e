//! Native lazy-loading capability detection.
//!
//! The environment either understands a native "defer until near viewport"
//! image hint or it doesn't, and that cannot change while the process runs.
//! [`CapabilityDetector`] asks its probe once and caches the answer; triggers
//! receive the resulting [`CapabilityFlag`] by value instead of querying the
//! environment themselves.

use std::cell::OnceCell;

/// Environment-specific feature test.
///
/// Returns `None` when detection is inconclusive.
pub trait CapabilityProbe {
    fn probe(&self) -> Option<bool>;
}

impl<F> CapabilityProbe for F
where
    F: Fn() -> Option<bool>,
{
    fn probe(&self) -> Option<bool> {
        self()
    }
}

/// Whether native deferred loading is trusted for an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapabilityFlag(bool);

impl CapabilityFlag {
    /// The environment defers image fetches on its own.
    pub const NATIVE: Self = Self(true);

    /// Deferral must be driven by viewport observation.
    pub const FALLBACK: Self = Self(false);

    pub fn from_native_support(supported: bool) -> Self {
        Self(supported)
    }

    pub fn is_native(self) -> bool {
        self.0
    }
}

/// Caches the result of a [`CapabilityProbe`].
///
/// Single writer, written once: the first call to
/// [`supports_native_lazy_load`](Self::supports_native_lazy_load) runs the
/// probe, every later call reads the cached value. An inconclusive probe
/// resolves to `false` since the observation fallback is always correct.
pub struct CapabilityDetector<P> {
    probe: P,
    resolved: OnceCell<bool>,
}

impl<P: CapabilityProbe> CapabilityDetector<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            resolved: OnceCell::new(),
        }
    }

    pub fn supports_native_lazy_load(&self) -> bool {
        *self.resolved.get_or_init(|| {
            let detected = self.probe.probe();
            if detected.is_none() {
                log::debug!("native lazy loading detection inconclusive, using fallback");
            }
            detected.unwrap_or(false)
        })
    }

    pub fn flag(&self) -> CapabilityFlag {
        CapabilityFlag::from_native_support(self.supports_native_lazy_load())
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Returns true once the probe has run.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

impl<P> std::fmt::Debug for CapabilityDetector<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityDetector")
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn probe_runs_once() {
        let calls = Cell::new(0);
        let detector = CapabilityDetector::new(|| {
            calls.set(calls.get() + 1);
            Some(true)
        });

        assert!(!detector.is_resolved());
        assert!(detector.supports_native_lazy_load());
        assert!(detector.supports_native_lazy_load());
        assert!(detector.flag().is_native());
        assert_eq!(calls.get(), 1);
        assert!(detector.is_resolved());
    }

    #[test]
    fn inconclusive_probe_prefers_fallback() {
        let detector = CapabilityDetector::new(|| None);
        assert!(!detector.supports_native_lazy_load());
        assert_eq!(detector.flag(), CapabilityFlag::FALLBACK);
    }
}
