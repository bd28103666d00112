//! Corpus index builder
//!
//! Builds the index from a list of records by:
//! 1. Concatenating every present field's lowercased text, each followed by
//!    a sentinel
//! 2. Sorting every char-boundary suffix position by the key it starts
//!
//! The resulting suffix array answers prefix queries with binary search.

use super::reader::{compare_keys, CorpusIndex};
use super::types::*;
use crate::corpus::SourceRecord;
use crate::error::BuildError;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

/// Sort in parallel once the suffix count passes this
const PARALLEL_SORT_THRESHOLD: usize = 100_000;

/// Builder for constructing a corpus index one record at a time
pub struct CorpusIndexBuilder {
    field_names: Vec<String>,
    /// Concatenated lowercased field text with sentinels
    text: String,
    /// Field extents in the concatenated text, in (record, field) order
    spans: Vec<FieldSpan>,
    record_count: u32,
}

impl CorpusIndexBuilder {
    /// Create a builder for the given field-name list
    pub fn new<S: AsRef<str>>(field_names: &[S]) -> Result<Self, BuildError> {
        let field_names = validate_field_names(field_names)?;
        Ok(Self {
            field_names,
            text: String::new(),
            spans: Vec::new(),
            record_count: 0,
        })
    }

    /// Add the next record; its id is the number of records added before it
    ///
    /// Returns the number of fields that contributed text.
    pub fn add_record(&mut self, record: &SourceRecord) -> Result<usize, BuildError> {
        let record_id = self.record_count;
        let mut added = 0;

        for (field_id, name) in self.field_names.iter().enumerate() {
            let Some(content) = record.get(name) else {
                continue;
            };
            if content.is_empty() {
                continue;
            }

            let lowered = content.to_lowercase();
            if lowered.contains(SENTINEL) {
                return Err(BuildError::ReservedByte {
                    record_id,
                    field: name.clone(),
                });
            }

            let start = self.text.len() as TextPosition;
            self.text.push_str(&lowered);
            let end = self.text.len() as TextPosition;
            self.text.push(SENTINEL);

            self.spans.push(FieldSpan {
                field: FieldRef::new(record_id, field_id as FieldId),
                start,
                end,
            });
            added += 1;
        }

        self.record_count = self
            .record_count
            .checked_add(1)
            .ok_or(BuildError::TooManyRecords)?;
        Ok(added)
    }

    /// Sort all suffixes and produce the read-only index
    pub fn build(self) -> Result<CorpusIndex, BuildError> {
        if self.record_count == 0 {
            return Err(BuildError::EmptyCorpus);
        }
        if self.spans.is_empty() {
            return Err(BuildError::NothingIndexed);
        }

        let started = Instant::now();
        let positions = suffix_positions(&self.text, &self.spans);
        let suffixes = build_suffix_array_parallel(&self.text, positions);

        info!(
            records = self.record_count,
            fields = self.spans.len(),
            text_bytes = self.text.len(),
            suffixes = suffixes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built corpus index"
        );

        Ok(CorpusIndex::from_parts(
            self.field_names,
            self.record_count,
            self.text,
            self.spans,
            suffixes,
        ))
    }

    /// Get the current size of accumulated text
    pub fn text_size(&self) -> usize {
        self.text.len()
    }

    /// Get the number of records added
    pub fn record_count(&self) -> u32 {
        self.record_count
    }
}

impl CorpusIndex {
    /// Build an index over `records`, resolving field ids against `field_names`
    pub fn build<S: AsRef<str>>(
        records: &[SourceRecord],
        field_names: &[S],
    ) -> Result<Self, BuildError> {
        let mut builder = CorpusIndexBuilder::new(field_names)?;
        for record in records {
            builder.add_record(record)?;
        }
        builder.build()
    }
}

/// Reject field-name lists that would make a FieldRef ambiguous
pub(crate) fn validate_field_names<S: AsRef<str>>(
    field_names: &[S],
) -> Result<Vec<String>, BuildError> {
    if field_names.is_empty() {
        return Err(BuildError::NoFieldNames);
    }
    if field_names.len() > FieldId::MAX as usize + 1 {
        return Err(BuildError::TooManyFields(field_names.len()));
    }

    let mut seen = HashSet::with_capacity(field_names.len());
    for name in field_names {
        if !seen.insert(name.as_ref()) {
            return Err(BuildError::DuplicateFieldName(name.as_ref().to_string()));
        }
    }

    Ok(field_names.iter().map(|n| n.as_ref().to_string()).collect())
}

/// Every char-boundary start offset inside every field
fn suffix_positions(text: &str, spans: &[FieldSpan]) -> Vec<SuffixEntry> {
    let mut positions = Vec::with_capacity(text.len());
    for span in spans {
        let field_text = &text[span.start as usize..span.end as usize];
        positions.extend(
            field_text
                .char_indices()
                .map(|(offset, _)| span.start + offset as SuffixEntry),
        );
    }
    debug!(suffixes = positions.len(), "collected suffix positions");
    positions
}

/// Sort suffix positions by their key, using rayon for large corpora
///
/// Time: O(n log n) comparisons, each bounded by the key length
/// Space: O(n) for the suffix array
fn build_suffix_array_parallel(text: &str, mut sa: Vec<SuffixEntry>) -> Vec<SuffixEntry> {
    if sa.len() > PARALLEL_SORT_THRESHOLD {
        sa.par_sort_unstable_by(|&a, &b| compare_suffixes(text, a as usize, b as usize));
    } else {
        sa.sort_unstable_by(|&a, &b| compare_suffixes(text, a as usize, b as usize));
    }
    sa
}

/// Order by key, then by position
///
/// Equal keys end up adjacent and ordered by where they occur, which is
/// (record, field) order because fields are appended in that order.
#[inline]
pub(crate) fn compare_suffixes(text: &str, a: usize, b: usize) -> Ordering {
    compare_keys(text.as_bytes(), a, b).then(a.cmp(&b))
}
