use wasm_bindgen::JsValue;

/// Failures while building gallery markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    NoWindow,
    NoDocument,
    MissingElement { id: String },
    UnexpectedElement { expected: &'static str },
    Js(String),
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomError::NoWindow => write!(f, "no global window exists"),
            DomError::NoDocument => write!(f, "window has no document"),
            DomError::MissingElement { id } => write!(f, "element with id '{id}' not found"),
            DomError::UnexpectedElement { expected } => {
                write!(f, "created element is not {expected}")
            }
            DomError::Js(message) => write!(f, "javascript error: {message}"),
        }
    }
}

impl std::error::Error for DomError {}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<DomError> for JsValue {
    fn from(err: DomError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
