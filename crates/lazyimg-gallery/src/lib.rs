//! Gallery coordination for lazily loaded images.
//!
//! A [`Gallery`] turns an ordered list of [`ImageDescriptor`]s into one
//! [`LoadTrigger`] per image. Descriptors usually come from a
//! [`UrlTemplate`], which expands image identifiers into final and
//! placeholder URLs.
//!
//! [`ImageDescriptor`]: lazyimg_core::ImageDescriptor
//! [`LoadTrigger`]: lazyimg_core::LoadTrigger

mod config;
mod coordinator;
mod provider;

pub use config::*;
pub use coordinator::*;
pub use provider::*;
