//! Index writer
//!
//! Serializes an index into a single little-endian blob. See
//! [`loader`](super::loader) for the reverse direction.
//!
//! ## Blob layout
//!
//! - header: magic, version, flags, XxHash64 of the payload
//! - field-name list (count, then length-prefixed UTF-8)
//! - record count
//! - field spans (count, then record id, field id, start, end)
//! - concatenated text (length, bytes)
//! - suffix array (count, then positions)

use super::reader::CorpusIndex;
use super::types::*;
use crate::error::Result;
use std::fs::File;
use std::hash::Hasher;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use twox_hash::XxHash64;

impl CorpusIndex {
    /// Write the index blob to `writer`
    pub fn persist<W: Write>(&self, mut writer: W) -> Result<()> {
        let payload = self.encode_payload();
        let header = IndexHeader::new(checksum(&payload));

        writer.write_all(&header.magic.to_le_bytes())?;
        writer.write_all(&header.version.to_le_bytes())?;
        writer.write_all(&header.flags.to_le_bytes())?;
        writer.write_all(&header.checksum.to_le_bytes())?;
        writer.write_all(&payload)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the index blob to a file, replacing any existing one
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = BufWriter::with_capacity(65536, File::create(path)?);
        self.persist(file)?;
        info!(path = %path.display(), "saved corpus index");
        Ok(())
    }

    fn encode_payload(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            64 + self.spans.len() * FieldSpan::SIZE + self.text.len() + self.suffixes.len() * 8,
        );

        buf.extend_from_slice(&(self.field_names.len() as u32).to_le_bytes());
        for name in &self.field_names {
            buf.extend_from_slice(&(name.len() as u32).to_le_bytes());
            buf.extend_from_slice(name.as_bytes());
        }

        buf.extend_from_slice(&self.record_count.to_le_bytes());

        buf.extend_from_slice(&(self.spans.len() as u32).to_le_bytes());
        for span in &self.spans {
            buf.extend_from_slice(&span.field.record_id.to_le_bytes());
            buf.extend_from_slice(&span.field.field_id.to_le_bytes());
            buf.extend_from_slice(&span.start.to_le_bytes());
            buf.extend_from_slice(&span.end.to_le_bytes());
        }

        buf.extend_from_slice(&(self.text.len() as u64).to_le_bytes());
        buf.extend_from_slice(self.text.as_bytes());

        buf.extend_from_slice(&(self.suffixes.len() as u64).to_le_bytes());
        for &entry in &self.suffixes {
            buf.extend_from_slice(&entry.to_le_bytes());
        }

        buf
    }
}

/// Checksum stored in the blob header
pub(crate) fn checksum(payload: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(payload);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::SourceRecord;
    use std::fs;
    use tempfile::tempdir;

    fn sample_index() -> CorpusIndex {
        let records = vec![
            SourceRecord::new().with_field("text", "hello world"),
            SourceRecord::new().with_field("text", "foo bar"),
        ];
        CorpusIndex::build(&records, &["text"]).unwrap()
    }

    #[test]
    fn test_persist_header() {
        let mut blob = Vec::new();
        sample_index().persist(&mut blob).unwrap();

        let magic = u32::from_le_bytes(blob[0..4].try_into().unwrap());
        let version = u32::from_le_bytes(blob[4..8].try_into().unwrap());
        let flags = u32::from_le_bytes(blob[8..12].try_into().unwrap());
        let stored = u64::from_le_bytes(blob[12..20].try_into().unwrap());

        assert_eq!(magic, INDEX_MAGIC);
        assert_eq!(version, INDEX_VERSION);
        assert_eq!(flags & FLAG_LOWERCASED, FLAG_LOWERCASED);
        assert_eq!(stored, checksum(&blob[IndexHeader::SIZE..]));
    }

    #[test]
    fn test_persist_embeds_field_names() {
        let mut blob = Vec::new();
        sample_index().persist(&mut blob).unwrap();

        let payload = &blob[IndexHeader::SIZE..];
        let count = u32::from_le_bytes(payload[0..4].try_into().unwrap());
        let len = u32::from_le_bytes(payload[4..8].try_into().unwrap()) as usize;
        assert_eq!(count, 1);
        assert_eq!(&payload[8..8 + len], b"text");
    }

    #[test]
    fn test_save_writes_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("index.bin");

        let index = sample_index();
        index.save(&path).unwrap();

        let mut expected = Vec::new();
        index.persist(&mut expected).unwrap();
        assert_eq!(fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn test_persist_is_deterministic() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        sample_index().persist(&mut a).unwrap();
        sample_index().persist(&mut b).unwrap();
        assert_eq!(a, b);
    }
}
