//! # ransom - corpus-sourced text decomposition
//!
//! Splits a target string into left-to-right fragments, each of which occurs
//! verbatim somewhere in a corpus of text records, and reports where every
//! fragment can be found. Think of a ransom note assembled from clippings.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Suffix-array substring index over the corpus, with persistence
//! - [`decompose`] - Greedy longest-match decomposition and location lookup
//! - [`corpus`] - Source records, JSON loading, target preparation
//! - [`output`] - Result formatting (colored text or JSON)
//! - [`utils`] - Configuration, cache locations, progress spinners
//!
//! ## Quick Start
//!
//! ```no_run
//! use ransom::{decompose, CorpusIndex, SourceRecord};
//!
//! let records = vec![
//!     SourceRecord::new().with_field("text", "ratchet bomb"),
//!     SourceRecord::new().with_field("text", "please wait"),
//! ];
//! let index = CorpusIndex::build(&records, &["text"]).unwrap();
//!
//! for fragment in decompose("pls chet", &index, 5).unwrap() {
//!     println!("{:?} <- {:?}", fragment.text, fragment.locations);
//! }
//! ```
//!
//! ## Guarantees
//!
//! Concatenating the returned fragments reproduces the target exactly. Any
//! part of the target that occurs nowhere in the corpus fails the whole call
//! with [`Error::Unsourceable`]; nothing is dropped or substituted.

pub mod corpus;
pub mod decompose;
pub mod error;
pub mod index;
pub mod output;
pub mod utils;

pub use corpus::SourceRecord;
pub use decompose::{decompose, Fragment, FragmentDecomposer};
pub use error::{BuildError, Error, Result};
pub use index::{CorpusIndex, CorpusIndexBuilder, FieldId, FieldRef, RecordId};
