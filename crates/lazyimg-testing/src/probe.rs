use std::cell::Cell;

use lazyimg_core::CapabilityProbe;

/// Probe with a fixed answer that counts how often it was asked.
#[derive(Debug, Default)]
pub struct FixedProbe {
    answer: Option<bool>,
    calls: Cell<usize>,
}

impl FixedProbe {
    pub fn new(answer: Option<bool>) -> Self {
        Self {
            answer,
            calls: Cell::new(0),
        }
    }

    pub fn supported() -> Self {
        Self::new(Some(true))
    }

    pub fn unsupported() -> Self {
        Self::new(Some(false))
    }

    pub fn inconclusive() -> Self {
        Self::new(None)
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CapabilityProbe for FixedProbe {
    fn probe(&self) -> Option<bool> {
        self.calls.set(self.calls.get() + 1);
        self.answer
    }
}
