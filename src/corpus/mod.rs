//! Corpus records and the helpers that feed them to the index.
//!
//! - [`SourceRecord`] - one corpus entry, field name to text
//! - [`loader`] - JSON corpus loading with language filtering
//! - [`target`] - cleaning raw user text into decomposable tokens

pub mod loader;
pub mod target;

pub use loader::{load_records, parse_records};
pub use target::prepare_target;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One corpus entry: a set of named text fields
///
/// A record's id is its position in the corpus list handed to the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord {
    fields: BTreeMap<String, String>,
}

impl SourceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.fields.insert(name.into(), text.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SourceRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
