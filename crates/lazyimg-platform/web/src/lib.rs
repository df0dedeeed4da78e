//! Browser bindings for lazyimg.
//!
//! Native lazy loading is detected through `HTMLImageElement.prototype`,
//! the fallback path uses `IntersectionObserver`, and images are drawn into
//! plain `<img>` elements.

mod capability;
mod error;
mod gallery;
mod observer;
mod renderer;

pub use capability::*;
pub use error::*;
pub use gallery::*;
pub use observer::*;
pub use renderer::*;
