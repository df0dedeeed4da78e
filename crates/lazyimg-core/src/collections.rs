//! Hash map used for id and element lookups.
//!
//! Fx hashing by default; the `std-hash` feature switches to the std hasher.

pub use std::collections::hash_map::Entry;

#[cfg(not(feature = "std-hash"))]
pub type MapHasher = rustc_hash::FxBuildHasher;

#[cfg(feature = "std-hash")]
pub type MapHasher = std::collections::hash_map::RandomState;

pub type HashMap<K, V> = std::collections::HashMap<K, V, MapHasher>;
