#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod consolidate;

pub use consolidate::{ConsolidationError, Consolidator};

// We use non-std collections here for their ordering semantics: the
// consolidation must be reproducible bit-for-bit, map iteration included.
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
