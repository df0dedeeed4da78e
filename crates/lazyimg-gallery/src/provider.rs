//! Identifier to URL expansion.

use lazyimg_core::ImageDescriptor;

/// Token replaced by the image identifier in URL templates.
pub const ID_TOKEN: &str = "{id}";

/// Builds descriptors from image identifiers.
pub trait DescriptorProvider {
    fn descriptor(&self, id: &str) -> ImageDescriptor;

    /// Builds descriptors in order, skipping empty slots.
    fn descriptors<I, S>(&self, ids: I) -> Vec<ImageDescriptor>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .flatten()
            .map(|id| self.descriptor(id.as_ref()))
            .collect()
    }
}

/// URL templates with an `{id}` token.
///
/// ```
/// use lazyimg_gallery::{DescriptorProvider, UrlTemplate};
///
/// let template = UrlTemplate::new("https://cdn.example/w_400/image_{id}.jpg")
///     .with_placeholder("https://cdn.example/w_20,e_blur/image_{id}.jpg");
/// let descriptor = template.descriptor("3");
/// assert_eq!(descriptor.final_src(), "https://cdn.example/w_400/image_3.jpg");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlTemplate {
    final_template: String,
    placeholder_template: Option<String>,
}

impl UrlTemplate {
    pub fn new(final_template: impl Into<String>) -> Self {
        Self {
            final_template: final_template.into(),
            placeholder_template: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder_template: impl Into<String>) -> Self {
        self.placeholder_template = Some(placeholder_template.into());
        self
    }

    pub fn final_url(&self, id: &str) -> String {
        self.final_template.replace(ID_TOKEN, id)
    }

    pub fn placeholder_url(&self, id: &str) -> Option<String> {
        self.placeholder_template
            .as_ref()
            .map(|template| template.replace(ID_TOKEN, id))
    }
}

impl DescriptorProvider for UrlTemplate {
    fn descriptor(&self, id: &str) -> ImageDescriptor {
        let descriptor = ImageDescriptor::new(id, self.final_url(id));
        match self.placeholder_url(id) {
            Some(placeholder) => descriptor.with_placeholder(placeholder),
            None => descriptor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_empty_slots_and_keeps_order() {
        let template = UrlTemplate::new("img_{id}.jpg");
        let ids = (0..5).map(|i| (i != 0).then(|| i.to_string()));
        let descriptors = template.descriptors(ids);

        let ids: Vec<_> = descriptors.iter().map(|d| d.id().to_owned()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
        assert_eq!(descriptors[0].final_src(), "img_1.jpg");
        assert_eq!(descriptors[0].placeholder_src(), None);
    }

    #[test]
    fn placeholder_template_is_expanded() {
        let template = UrlTemplate::new("full/{id}").with_placeholder("blur/{id}");
        let descriptor = template.descriptor("9");
        assert_eq!(descriptor.placeholder_src(), Some("blur/9"));
    }
}
