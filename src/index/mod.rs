//! Substring index over the corpus
//!
//! This module provides O(m log n) substring membership and prefix
//! enumeration using a suffix array over every indexed field.
//!
//! ## Architecture
//!
//! - `builder`: Constructs the index from records
//! - `reader`: The [`CorpusIndex`] type and its queries
//! - `writer`: Persists an index to a single blob
//! - `loader`: Decodes and validates a persisted blob
//! - `cache`: Keeps built indexes in the app data directory
//! - `stats`: Human-readable index statistics
//! - `types`: Core type definitions

pub mod builder;
pub mod cache;
pub mod loader;
pub mod reader;
pub mod stats;
pub mod types;
pub mod writer;

// Re-exports for convenience
pub use builder::CorpusIndexBuilder;
pub use reader::{CorpusIndex, KeysWithPrefix};
pub use types::{FieldId, FieldRef, IndexStats, RecordId};
