//! Error types shared by the index and the decomposer.

use thiserror::Error;

/// Reasons an index cannot be built from the supplied corpus.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("corpus contains no records")]
    EmptyCorpus,

    #[error("no field names configured")]
    NoFieldNames,

    #[error("field name `{0}` is listed more than once")]
    DuplicateFieldName(String),

    #[error("{0} field names configured, at most 65536 are supported")]
    TooManyFields(usize),

    #[error("more than {} records in corpus", u32::MAX)]
    TooManyRecords,

    #[error("record {record_id} field `{field}` contains a NUL byte")]
    ReservedByte { record_id: u32, field: String },

    #[error("no record carries any of the configured fields")]
    NothingIndexed,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot build index: {0}")]
    Build(#[from] BuildError),

    /// The persisted index was built against a different field-name list.
    #[error("index was built for fields {found:?}, expected {expected:?}")]
    IndexMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Some part of the target occurs nowhere in the corpus.
    #[error("text not found anywhere in corpus: {text:?}")]
    Unsourceable { text: String },

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A fragment accepted by the split resolved to no locations.
    #[error("fragment {fragment:?} is present in the index but has no locations")]
    Inconsistent { fragment: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_converts() {
        let err: Error = BuildError::EmptyCorpus.into();
        assert!(matches!(err, Error::Build(BuildError::EmptyCorpus)));
        assert_eq!(err.to_string(), "cannot build index: corpus contains no records");
    }

    #[test]
    fn test_unsourceable_message_names_text() {
        let err = Error::Unsourceable {
            text: "xq7".to_string(),
        };
        assert!(err.to_string().contains("\"xq7\""));
    }

    #[test]
    fn test_mismatch_message_lists_both_sides() {
        let err = Error::IndexMismatch {
            expected: vec!["name".into()],
            found: vec!["text".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"name\""));
        assert!(msg.contains("\"text\""));
    }
}
