//! Testing utilities and harness for lazyimg.
//!
//! Everything here is deterministic and single-threaded: intersection
//! events are delivered only when a test asks for them.

mod fake_host;
mod gallery_rule;
mod probe;
mod renderer;
mod viewport;

pub use fake_host::*;
pub use gallery_rule::*;
pub use probe::*;
pub use renderer::*;
pub use viewport::*;
