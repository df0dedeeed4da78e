//! Lazy-load trigger engine.
//!
//! Images are not fetched until they are about to enter the viewport (or a
//! margin around it). Each image is driven by a [`LoadTrigger`] that either
//! trusts the environment's native deferred loading or falls back to a
//! one-shot [`IntersectionWatcher`](watch) subscription.
//!
//! # Architecture
//!
//! - [`CapabilityDetector`] - resolves once whether native lazy loading exists
//! - [`watch`] / [`ObservationHandle`] - one-shot viewport observation
//! - [`LoadTrigger`] - per-image `Pending -> Visible` state machine
//!
//! The engine never talks to a concrete environment. Hosts implement
//! [`ObserverHost`] (the observation primitive), [`SlotRenderer`] (the
//! rendering surface) and [`CapabilityProbe`] (feature detection).
//!
//! # Example
//!
//! ```rust,ignore
//! let detector = CapabilityDetector::new(probe);
//! let trigger = LoadTrigger::new(
//!     descriptor,
//!     detector.flag(),
//!     &host,
//!     element,
//!     &WatchOptions::preload_margin(),
//!     renderer,
//! );
//! ```

mod capability;
pub mod collections;
mod descriptor;
mod error;
mod geometry;
mod host;
mod options;
mod trigger;
mod watcher;

pub use capability::*;
pub use descriptor::*;
pub use error::*;
pub use geometry::*;
pub use host::*;
pub use options::*;
pub use trigger::*;
pub use watcher::*;
