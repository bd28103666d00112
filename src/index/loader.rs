//! Index loader
//!
//! Decodes blobs written by [`writer`](super::writer). Every structural
//! property queries rely on is checked here, so a loaded index never panics
//! on slicing or misreads a blob: text is valid UTF-8, spans are ordered and
//! in bounds, and the suffix array holds every char-boundary position inside
//! a field exactly once, in sorted order.

use super::builder::{compare_suffixes, validate_field_names};
use super::reader::CorpusIndex;
use super::types::*;
use super::writer::checksum;
use crate::error::{Error, Result};
use memmap2::Mmap;
use std::cmp::Ordering;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

impl CorpusIndex {
    /// Read an index blob from `reader`, checking it against `field_names`
    pub fn load<R: Read, S: AsRef<str>>(mut reader: R, field_names: &[S]) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data, field_names)
    }

    /// Memory-map and decode the index blob at `path`
    pub fn open<S: AsRef<str>>(path: &Path, field_names: &[S]) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the map is read-only and dropped before this function returns;
        // decoding copies everything it keeps.
        let mmap = unsafe { Mmap::map(&file)? };
        let index = Self::from_bytes(&mmap, field_names)?;
        info!(
            path = %path.display(),
            records = index.record_count,
            suffixes = index.suffixes.len(),
            "opened corpus index"
        );
        Ok(index)
    }

    /// Decode an index blob held in memory
    pub fn from_bytes<S: AsRef<str>>(data: &[u8], field_names: &[S]) -> Result<Self> {
        let expected = validate_field_names(field_names)?;

        if data.len() < IndexHeader::SIZE {
            return Err(corrupt("blob too small"));
        }

        let mut header = ByteReader::new(&data[..IndexHeader::SIZE]);
        let magic = header.u32()?;
        if magic != INDEX_MAGIC {
            return Err(corrupt("bad magic number"));
        }
        let version = header.u32()?;
        if version != INDEX_VERSION {
            return Err(corrupt(format!("unsupported version {version}")));
        }
        let flags = header.u32()?;
        if flags & FLAG_LOWERCASED == 0 {
            return Err(corrupt("index text was not lowercased"));
        }
        let stored_checksum = header.u64()?;

        let payload = &data[IndexHeader::SIZE..];
        if checksum(payload) != stored_checksum {
            return Err(corrupt("checksum mismatch"));
        }

        let mut r = ByteReader::new(payload);

        let field_count = r.u32()? as usize;
        let mut found = Vec::with_capacity(field_count.min(1024));
        for _ in 0..field_count {
            let len = r.u32()? as usize;
            let name = std::str::from_utf8(r.bytes(len)?)
                .map_err(|_| corrupt("field name is not UTF-8"))?;
            found.push(name.to_string());
        }

        if found != expected {
            return Err(Error::IndexMismatch { expected, found });
        }

        let record_count = r.u32()?;

        let span_count = r.u32()? as usize;
        let mut spans = Vec::with_capacity(span_count.min(r.remaining() / FieldSpan::SIZE));
        for _ in 0..span_count {
            let record_id = r.u32()?;
            let field_id = r.u16()?;
            let start = r.u64()?;
            let end = r.u64()?;
            spans.push(FieldSpan {
                field: FieldRef::new(record_id, field_id),
                start,
                end,
            });
        }

        let text_len = r.len_u64()?;
        let text = std::str::from_utf8(r.bytes(text_len)?)
            .map_err(|_| corrupt("text is not UTF-8"))?
            .to_string();

        let suffix_count = r.len_u64()?;
        let mut suffixes = Vec::with_capacity(suffix_count.min(r.remaining() / 8));
        for _ in 0..suffix_count {
            suffixes.push(r.u64()?);
        }

        if r.remaining() != 0 {
            return Err(corrupt("trailing bytes after suffix array"));
        }

        let index = Self::from_parts(found, record_count, text, spans, suffixes);
        index.validate()?;
        debug!(bytes = data.len(), "decoded corpus index");
        Ok(index)
    }

    /// Check the invariants that slicing in queries depends on
    fn validate(&self) -> Result<()> {
        let text_len = self.text.len() as u64;
        let mut prev: Option<&FieldSpan> = None;

        for span in &self.spans {
            if span.start > span.end || span.end >= text_len {
                return Err(corrupt("field span out of bounds"));
            }
            if span.field.record_id >= self.record_count
                || span.field.field_id as usize >= self.field_names.len()
            {
                return Err(corrupt("field span refers to unknown record or field"));
            }
            if !self.text.is_char_boundary(span.start as usize)
                || self.text.as_bytes()[span.end as usize] != SENTINEL as u8
            {
                return Err(corrupt("field span not aligned to field text"));
            }
            if let Some(p) = prev {
                if span.start <= p.end || span.field <= p.field {
                    return Err(corrupt("field spans out of order"));
                }
            }
            prev = Some(span);
        }

        let expected_suffixes: usize = self
            .spans
            .iter()
            .map(|span| self.text[span.start as usize..span.end as usize].chars().count())
            .sum();
        if self.suffixes.len() != expected_suffixes {
            return Err(corrupt(format!(
                "suffix array has {} entries, fields hold {} chars",
                self.suffixes.len(),
                expected_suffixes
            )));
        }

        for &pos in &self.suffixes {
            if self.position_to_field(pos).is_none() || !self.text.is_char_boundary(pos as usize) {
                return Err(corrupt("suffix outside field text"));
            }
        }

        // Strictly increasing also rules out duplicates, so with the count
        // above every suffix is present exactly once
        for pair in self.suffixes.windows(2) {
            if compare_suffixes(&self.text, pair[0] as usize, pair[1] as usize) != Ordering::Less {
                return Err(corrupt("suffix array not sorted"));
            }
        }

        Ok(())
    }
}

fn corrupt(reason: impl Into<String>) -> Error {
    Error::CorruptIndex(reason.into())
}

/// Bounds-checked little-endian cursor
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(corrupt("unexpected end of blob"));
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    /// A u64 length that must fit in memory
    fn len_u64(&mut self) -> Result<usize> {
        usize::try_from(self.u64()?).map_err(|_| corrupt("length overflows usize"))
    }
}
