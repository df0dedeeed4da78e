use std::cell::RefCell;
use std::rc::Rc;

use lazyimg_core::{SlotRenderer, SlotView};

/// Owned copy of one [`SlotView`] update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRecord {
    pub resource: Option<String>,
    pub deferred_natively: bool,
}

/// Renderer that keeps every update it receives.
///
/// Clones share the same history, so a test can keep one clone while the
/// trigger owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    records: Rc<RefCell<Vec<RenderRecord>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<RenderRecord> {
        self.records.borrow().clone()
    }

    pub fn render_count(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn last(&self) -> Option<RenderRecord> {
        self.records.borrow().last().cloned()
    }

    /// Source currently shown, `None` if nothing was rendered or the slot
    /// has no source.
    pub fn current_resource(&self) -> Option<String> {
        self.last().and_then(|record| record.resource)
    }

    /// Sources in render order.
    pub fn resources(&self) -> Vec<Option<String>> {
        self.records
            .borrow()
            .iter()
            .map(|record| record.resource.clone())
            .collect()
    }

    /// True if a source was ever cleared after being set.
    pub fn flickered(&self) -> bool {
        self.records
            .borrow()
            .windows(2)
            .any(|pair| pair[0].resource.is_some() && pair[1].resource.is_none())
    }
}

impl SlotRenderer for RecordingRenderer {
    fn render(&self, view: SlotView<'_>) {
        self.records.borrow_mut().push(RenderRecord {
            resource: view.resource.map(str::to_owned),
            deferred_natively: view.deferred_natively,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cleared_source() {
        let renderer = RecordingRenderer::new();
        renderer.render(SlotView {
            resource: Some("a"),
            deferred_natively: false,
        });
        assert!(!renderer.flickered());

        renderer.render(SlotView {
            resource: None,
            deferred_natively: false,
        });
        assert!(renderer.flickered());
        assert_eq!(renderer.resources(), vec![Some("a".to_owned()), None]);
    }
}
