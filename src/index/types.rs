//! Types for the corpus index
//!
//! The index is a suffix array over the concatenation of every indexed
//! field's lowercased text. Each field is terminated by a sentinel so that
//! a stored key never runs across a field boundary.

use serde::{Deserialize, Serialize};

/// Position of a record in the corpus list
pub type RecordId = u32;

/// Position of a field name in the configured field-name list
pub type FieldId = u16;

/// Position in concatenated text
pub type TextPosition = u64;

/// Suffix array entry - position in concatenated text
pub type SuffixEntry = u64;

/// Magic number for index blobs
pub const INDEX_MAGIC: u32 = 0x58494E52; // "RNIX" in little-endian

/// Current version of the index blob format
pub const INDEX_VERSION: u32 = 1;

/// Header flag: field text was lowercased before indexing
pub const FLAG_LOWERCASED: u32 = 1 << 0;

/// Sentinel separating fields in the concatenated text
pub const SENTINEL: char = '\0';

/// Location of a string in the corpus: which record, which field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub record_id: RecordId,
    pub field_id: FieldId,
}

impl FieldRef {
    pub fn new(record_id: RecordId, field_id: FieldId) -> Self {
        Self {
            record_id,
            field_id,
        }
    }
}

/// Extent of one field inside the concatenated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub field: FieldRef,
    /// Start position in concatenated text (inclusive)
    pub start: TextPosition,
    /// End position in concatenated text (exclusive, before sentinel)
    pub end: TextPosition,
}

impl FieldSpan {
    /// Size of a serialized span in bytes
    pub const SIZE: usize = 4 + 2 + 8 + 8; // 22 bytes
}

/// Header of a persisted index blob
#[derive(Debug, Clone, Copy)]
pub struct IndexHeader {
    pub magic: u32,
    pub version: u32,
    pub flags: u32,
    /// XxHash64 of everything following the header
    pub checksum: u64,
}

impl IndexHeader {
    /// Size of header in bytes
    pub const SIZE: usize = 4 + 4 + 4 + 8; // 20 bytes

    pub fn new(checksum: u64) -> Self {
        Self {
            magic: INDEX_MAGIC,
            version: INDEX_VERSION,
            flags: FLAG_LOWERCASED,
            checksum,
        }
    }
}

/// Summary counts for a built or loaded index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub field_names: Vec<String>,
    pub record_count: u32,
    /// Number of (record, field) pairs that carried text
    pub field_count: usize,
    /// Bytes of concatenated text, sentinels included
    pub text_size: usize,
    pub suffix_count: usize,
}
