//! Corpus index queries
//!
//! Provides O(m log n) prefix search over the sorted suffixes. A stored key
//! is the text from a suffix start up to the sentinel ending its field, so a
//! string is a prefix of some key exactly when it occurs inside some field.

use super::types::*;
use std::cmp::Ordering;

/// Read-only substring index over a corpus
///
/// Built with [`CorpusIndexBuilder`](super::CorpusIndexBuilder) or loaded from
/// a persisted blob. Shared freely across threads once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusIndex {
    /// Field-name list the index was built against
    pub(super) field_names: Vec<String>,
    pub(super) record_count: u32,
    /// Concatenated lowercased field text, each field followed by a sentinel
    pub(super) text: String,
    /// Field extents, sorted by position and by (record, field)
    pub(super) spans: Vec<FieldSpan>,
    /// Sorted suffix array (positions into text)
    pub(super) suffixes: Vec<SuffixEntry>,
}

impl CorpusIndex {
    pub(crate) fn from_parts(
        field_names: Vec<String>,
        record_count: u32,
        text: String,
        spans: Vec<FieldSpan>,
        suffixes: Vec<SuffixEntry>,
    ) -> Self {
        Self {
            field_names,
            record_count,
            text,
            spans,
            suffixes,
        }
    }

    /// Field-name list this index was built against
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Key starting at suffix array slot `i`
    #[inline]
    fn key(&self, i: usize) -> &str {
        key_at(&self.text, self.suffixes[i] as usize)
    }

    /// Compare the key at slot `i` against `pattern` over the pattern's length
    #[inline]
    fn cmp_prefix(&self, i: usize, pattern: &[u8]) -> Ordering {
        compare_prefix(self.text.as_bytes(), self.suffixes[i] as usize, pattern)
    }

    /// Range [lo, hi) of suffix array slots whose key starts with `pattern`
    pub fn search(&self, pattern: &str) -> (usize, usize) {
        if pattern.is_empty() || self.suffixes.is_empty() {
            return (0, 0);
        }

        let pattern = pattern.as_bytes();
        let lo = self.lower_bound(pattern);
        let hi = self.upper_bound(pattern, lo);
        (lo, hi)
    }

    /// First slot whose key is >= pattern when compared over the pattern's length
    fn lower_bound(&self, pattern: &[u8]) -> usize {
        let mut lo = 0;
        let mut hi = self.suffixes.len();

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.cmp_prefix(mid, pattern) == Ordering::Less {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        lo
    }

    /// First slot at or after `start` whose key does not start with pattern
    fn upper_bound(&self, pattern: &[u8], start: usize) -> usize {
        let mut lo = start;
        let mut hi = self.suffixes.len();

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.cmp_prefix(mid, pattern) == Ordering::Equal {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        lo
    }

    /// Check whether `candidate` occurs anywhere in the corpus
    pub fn contains(&self, candidate: &str) -> bool {
        let (lo, hi) = self.search(candidate);
        lo < hi
    }

    /// Check whether `key` is itself a stored key (a whole field suffix)
    pub fn lookup_exact(&self, key: &str) -> bool {
        let (lo, hi) = self.search(key);
        // An exact key sorts before every longer key sharing its prefix
        lo < hi
            && self.text.as_bytes().get(self.suffixes[lo] as usize + key.len()).copied()
                == Some(SENTINEL as u8)
    }

    /// Enumerate distinct stored keys starting with `prefix`
    ///
    /// Keys come in byte-lexicographic order; each carries every location it
    /// occurs at, in (record, field) order.
    pub fn iter_keys_with_prefix(&self, prefix: &str) -> KeysWithPrefix<'_> {
        let (lo, hi) = self.search(prefix);
        KeysWithPrefix {
            index: self,
            cursor: lo,
            end: hi,
        }
    }

    /// Number of matching suffixes for a pattern
    pub fn count_matches(&self, pattern: &str) -> usize {
        let (lo, hi) = self.search(pattern);
        hi - lo
    }

    /// Find the field containing a global text position
    pub fn position_to_field(&self, pos: TextPosition) -> Option<FieldRef> {
        let idx = self
            .spans
            .binary_search_by(|s| {
                if pos < s.start {
                    Ordering::Greater
                } else if pos >= s.end {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .ok()?;

        Some(self.spans[idx].field)
    }

    /// Indexed (lowercased) text of a field, if that field carried any
    pub fn field_text(&self, field: FieldRef) -> Option<&str> {
        let idx = self.spans.binary_search_by(|s| s.field.cmp(&field)).ok()?;
        let span = &self.spans[idx];
        self.text.get(span.start as usize..span.end as usize)
    }

    /// Name of a field id under this index's field-name list
    pub fn field_name(&self, field_id: FieldId) -> Option<&str> {
        self.field_names.get(field_id as usize).map(String::as_str)
    }

    /// Get statistics about this index
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            field_names: self.field_names.clone(),
            record_count: self.record_count,
            field_count: self.spans.len(),
            text_size: self.text.len(),
            suffix_count: self.suffixes.len(),
        }
    }
}

/// Text from `pos` up to the next sentinel
#[inline]
fn key_at(text: &str, pos: usize) -> &str {
    let rest = &text[pos..];
    match rest.find(SENTINEL) {
        Some(len) => &rest[..len],
        None => rest,
    }
}

/// Compare the keys starting at `a` and `b`, stopping at the first difference
///
/// The sentinel is the smallest byte, so a key sorts before every longer key
/// it is a prefix of, exactly as comparing the two key strings would.
#[inline]
pub(crate) fn compare_keys(text: &[u8], a: usize, b: usize) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let sentinel = SENTINEL as u8;
    let mut k = 0;
    loop {
        let x = text.get(a + k).copied().unwrap_or(sentinel);
        let y = text.get(b + k).copied().unwrap_or(sentinel);
        if x != y {
            return x.cmp(&y);
        }
        if x == sentinel {
            return Ordering::Equal;
        }
        k += 1;
    }
}

/// Compare the key starting at `pos` against `pattern`, reading at most
/// `pattern.len()` bytes
///
/// `Equal` means the key starts with the pattern. A key that ends first is
/// `Less`, even when the pattern itself continues with a NUL.
#[inline]
pub(crate) fn compare_prefix(text: &[u8], pos: usize, pattern: &[u8]) -> Ordering {
    let sentinel = SENTINEL as u8;
    for (k, &p) in pattern.iter().enumerate() {
        let x = text.get(pos + k).copied().unwrap_or(sentinel);
        if x == sentinel {
            return Ordering::Less;
        }
        if x != p {
            return x.cmp(&p);
        }
    }
    Ordering::Equal
}

/// Lazy enumeration of keys sharing a prefix, see
/// [`CorpusIndex::iter_keys_with_prefix`]
pub struct KeysWithPrefix<'a> {
    index: &'a CorpusIndex,
    cursor: usize,
    end: usize,
}

impl<'a> Iterator for KeysWithPrefix<'a> {
    type Item = (&'a str, Vec<FieldRef>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }

        let index = self.index;
        let text = index.text.as_bytes();
        let first = index.suffixes[self.cursor] as usize;
        let key = index.key(self.cursor);
        let mut locations = Vec::new();

        // Equal keys are adjacent in the suffix array
        while self.cursor < self.end
            && compare_keys(text, index.suffixes[self.cursor] as usize, first) == Ordering::Equal
        {
            if let Some(field) = index.position_to_field(index.suffixes[self.cursor]) {
                locations.push(field);
            }
            self.cursor += 1;
        }

        Some((key, locations))
    }
}
