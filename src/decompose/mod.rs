//! Decomposing target text into corpus-sourced fragments
//!
//! ## Architecture
//!
//! - `split`: greedy longest-match split of a target into present pieces
//! - `resolve`: bounded location lookup for each piece
//!
//! [`FragmentDecomposer`] ties the two together over a shared index.

pub mod resolve;
pub mod split;

pub use resolve::resolve_locations;
pub use split::{greedy_split, longest_match};

use crate::error::{Error, Result};
use crate::index::{CorpusIndex, FieldRef};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One contiguous piece of a target, present verbatim in the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    /// Where the text can be found, in index enumeration order
    pub locations: Vec<FieldRef>,
}

impl Fragment {
    /// Number of distinct records among the locations
    pub fn source_count(&self) -> usize {
        let mut records: Vec<_> = self.locations.iter().map(|l| l.record_id).collect();
        records.sort_unstable();
        records.dedup();
        records.len()
    }
}

/// Decomposes targets against one index with a fixed location limit
#[derive(Clone, Copy)]
pub struct FragmentDecomposer<'a> {
    index: &'a CorpusIndex,
    limit: usize,
}

impl<'a> FragmentDecomposer<'a> {
    /// `limit` is the number of distinct keys consulted per fragment
    pub fn new(index: &'a CorpusIndex, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidArgument(
                "location limit must be at least 1".to_string(),
            ));
        }
        Ok(Self { index, limit })
    }

    /// Split `target` into fragments that concatenate back to it
    pub fn decompose(&self, target: &str) -> Result<Vec<Fragment>> {
        if target.is_empty() {
            return Err(Error::InvalidArgument("target is empty".to_string()));
        }

        let pieces = if self.index.lookup_exact(target) {
            vec![target]
        } else {
            greedy_split(target, self.index)?
        };

        let fragments = pieces
            .into_iter()
            .map(|piece| {
                Ok(Fragment {
                    text: piece.to_string(),
                    locations: resolve_locations(piece, self.index, self.limit)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            target_len = target.len(),
            fragments = fragments.len(),
            "decomposed target"
        );
        Ok(fragments)
    }

    /// Decompose several targets in parallel, results in input order
    pub fn decompose_all<S: AsRef<str> + Sync>(&self, targets: &[S]) -> Result<Vec<Vec<Fragment>>> {
        targets
            .par_iter()
            .map(|t| self.decompose(t.as_ref()))
            .collect()
    }
}

/// Decompose `target` against `index`, consulting up to `limit` keys per fragment
pub fn decompose(target: &str, index: &CorpusIndex, limit: usize) -> Result<Vec<Fragment>> {
    FragmentDecomposer::new(index, limit)?.decompose(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::SourceRecord;

    fn scenario_index() -> CorpusIndex {
        let records = vec![
            SourceRecord::new().with_field("text", "ratchet bomb"),
            SourceRecord::new().with_field("text", "please wait"),
        ];
        CorpusIndex::build(&records, &["text"]).unwrap()
    }

    fn concat(fragments: &[Fragment]) -> String {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_pls_chet_scenario() {
        let index = scenario_index();
        let fragments = decompose("pls chet", &index, 5).unwrap();

        assert_eq!(concat(&fragments), "pls chet");

        let chet = fragments.iter().find(|f| f.text == "chet").unwrap();
        assert_eq!(chet.locations, vec![FieldRef::new(0, 0)]);

        let pl = fragments.iter().find(|f| f.text == "pl").unwrap();
        assert_eq!(pl.locations, vec![FieldRef::new(1, 0)]);

        for fragment in &fragments {
            assert!(index.contains(&fragment.text));
            assert!(!fragment.locations.is_empty());
        }
    }

    #[test]
    fn test_exact_key_fast_path() {
        let index = scenario_index();
        let fragments = decompose("bomb", &index, 5).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "bomb");
    }

    #[test]
    fn test_space_has_locations_in_both_records() {
        let index = scenario_index();
        let fragments = decompose(" ", &index, 5).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].source_count(), 2);
    }

    #[test]
    fn test_unsourceable_is_fatal() {
        let index = scenario_index();
        let err = decompose("xq7", &index, 5).unwrap_err();
        assert!(matches!(err, Error::Unsourceable { .. }));

        let err = decompose("bomb!", &index, 5).unwrap_err();
        assert!(matches!(err, Error::Unsourceable { ref text } if text == "!"));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let index = scenario_index();
        assert!(matches!(
            decompose("", &index, 5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            decompose("bomb", &index, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_deterministic() {
        let index = scenario_index();
        let a = decompose("bat tea sip", &index, 3).unwrap();
        let b = decompose("bat tea sip", &index, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decompose_all_keeps_order() {
        let index = scenario_index();
        let decomposer = FragmentDecomposer::new(&index, 5).unwrap();
        let results = decomposer.decompose_all(&["wait", "pls", "chet"]).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(concat(&results[0]), "wait");
        assert_eq!(concat(&results[1]), "pls");
        assert_eq!(concat(&results[2]), "chet");
    }

    #[test]
    fn test_decompose_all_fails_on_any_unsourceable() {
        let index = scenario_index();
        let decomposer = FragmentDecomposer::new(&index, 5).unwrap();
        assert!(decomposer.decompose_all(&["wait", "zzz"]).is_err());
    }

    #[test]
    fn test_source_count_dedups_records() {
        let fragment = Fragment {
            text: "a".to_string(),
            locations: vec![
                FieldRef::new(3, 0),
                FieldRef::new(3, 1),
                FieldRef::new(1, 0),
            ],
        };
        assert_eq!(fragment.source_count(), 2);
    }
}
