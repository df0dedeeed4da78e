/// One image as handed over by the URL-construction collaborator.
///
/// Immutable once built. `placeholder_src` is optional: without it the
/// element shows nothing until it becomes visible, with it a cheap stand-in
/// (for example a blurred low-resolution variant) is shown instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageDescriptor {
    id: String,
    final_src: String,
    placeholder_src: Option<String>,
}

impl ImageDescriptor {
    pub fn new(id: impl Into<String>, final_src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            final_src: final_src.into(),
            placeholder_src: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder_src: impl Into<String>) -> Self {
        self.placeholder_src = Some(placeholder_src.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn final_src(&self) -> &str {
        &self.final_src
    }

    pub fn placeholder_src(&self) -> Option<&str> {
        self.placeholder_src.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_optional() {
        let plain = ImageDescriptor::new("1", "https://cdn/1.jpg");
        assert_eq!(plain.placeholder_src(), None);

        let blurred = plain.clone().with_placeholder("https://cdn/1-blur.jpg");
        assert_eq!(blurred.placeholder_src(), Some("https://cdn/1-blur.jpg"));
        assert_eq!(blurred.final_src(), plain.final_src());
        assert_eq!(blurred.id(), "1");
    }
}
