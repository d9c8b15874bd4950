// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Segment wire codec.
//!
//! One segment is one transport-bounded chunk of a split collection:
//!
//! ```text
//! +--------+---------+-------+-------------+-----------+-------------+
//! | magic  | version | flags | start token | elem count| records ... |
//! | u16 LE | u8      | u8    | u64 LE      | u32 LE    |             |
//! +--------+---------+-------+-------------+-----------+-------------+
//! ```
//!
//! Each record carries a factory-encoding tag (by-name or inline ordinal)
//! followed by a length-prefixed payload. The continuation token is not
//! transmitted separately: a segment carries the collection offset of its
//! first element, and when `FLAG_HAS_MORE` is set the next segment is
//! requested at `start + count`. The consumer checks the echoed start
//! offset against its expectation to detect misordered delivery.

use crate::config::{
    FLAG_HAS_MORE, SEGMENT_HEADER_LEN, SEGMENT_MAGIC, TAG_BY_NAME, TAG_INLINE, WIRE_VERSION,
};
use crate::error::{ProtocolError, Result};
use crate::resolve::FactoryId;
use crate::wire::{WireReader, WireWriter};
use std::fmt;
use std::sync::Arc;

/// Opaque marker identifying where a follow-up segment begins.
///
/// Consumers echo it back through `fetch_next`; only the producer interprets
/// the contained value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContinuationToken(u64);

impl ContinuationToken {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How one element record references its factory.
///
/// Decode accepts either variant regardless of the local
/// [`crate::config::WireProfile`]; the profile only gates what a producer
/// writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryEncoding {
    /// Type name string; the consumer resolves through the name path.
    ByName(Arc<str>),
    /// Registration ordinal in the consuming context.
    Inline(FactoryId),
}

/// One encoded element inside a segment.
#[derive(Debug, Clone)]
pub struct ElementRecord {
    encoding: FactoryEncoding,
    payload: Vec<u8>,
}

impl ElementRecord {
    pub(crate) fn new(encoding: FactoryEncoding, payload: Vec<u8>) -> Self {
        Self { encoding, payload }
    }

    #[must_use]
    pub fn encoding(&self) -> &FactoryEncoding {
        &self.encoding
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialized length of this record: tag + factory reference +
    /// length-prefixed payload.
    #[must_use]
    pub fn wire_len(&self) -> usize {
        let reference = match &self.encoding {
            FactoryEncoding::ByName(name) => 4 + name.len(),
            FactoryEncoding::Inline(_) => 4,
        };
        1 + reference + 4 + self.payload.len()
    }
}

// Smallest possible record: tag + inline ordinal + empty payload.
const MIN_RECORD_LEN: usize = 9;

/// One transport-bounded chunk of a split collection.
#[derive(Debug, Clone)]
pub struct Segment {
    start: u64,
    records: Vec<ElementRecord>,
    has_more: bool,
}

impl Segment {
    pub(crate) fn new(start: u64, records: Vec<ElementRecord>, has_more: bool) -> Self {
        Self {
            start,
            records,
            has_more,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn records(&self) -> &[ElementRecord] {
        &self.records
    }

    /// Collection offset of this segment's first element.
    #[must_use]
    pub fn start_token(&self) -> ContinuationToken {
        ContinuationToken(self.start)
    }

    /// Where the next segment begins, if one was promised.
    #[must_use]
    pub fn continuation_token(&self) -> Option<ContinuationToken> {
        self.has_more
            .then(|| ContinuationToken(self.start + self.records.len() as u64))
    }

    /// Serialized byte length without encoding.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        SEGMENT_HEADER_LEN + self.records.iter().map(ElementRecord::wire_len).sum::<usize>()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(self.encoded_len());
        writer.write_u16_le(SEGMENT_MAGIC);
        writer.write_u8(WIRE_VERSION);
        writer.write_u8(if self.has_more { FLAG_HAS_MORE } else { 0 });
        writer.write_u64_le(self.start);
        writer.write_u32_le(self.records.len() as u32);
        for record in &self.records {
            match &record.encoding {
                FactoryEncoding::ByName(name) => {
                    writer.write_u8(TAG_BY_NAME);
                    writer.write_string(name);
                }
                FactoryEncoding::Inline(ordinal) => {
                    writer.write_u8(TAG_INLINE);
                    writer.write_u32_le(ordinal.raw());
                }
            }
            writer.write_bytes(&record.payload);
        }
        writer.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Segment> {
        let mut reader = WireReader::new(bytes);

        let magic = reader.read_u16_le()?;
        if magic != SEGMENT_MAGIC {
            return Err(ProtocolError::malformed(format!(
                "invalid magic {:#06X}",
                magic
            )));
        }
        let version = reader.read_u8()?;
        if version != WIRE_VERSION {
            return Err(ProtocolError::malformed(format!(
                "unsupported version {}",
                version
            )));
        }
        let flags = reader.read_u8()?;
        let start = reader.read_u64_le()?;
        let count = reader.read_u32_le()? as usize;

        // Reject counts the buffer cannot possibly hold before allocating.
        if count.saturating_mul(MIN_RECORD_LEN) > reader.remaining() {
            return Err(ProtocolError::malformed(format!(
                "element count {} exceeds remaining buffer ({} bytes)",
                count,
                reader.remaining()
            )));
        }

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let tag = reader.read_u8()?;
            let encoding = match tag {
                TAG_BY_NAME => FactoryEncoding::ByName(reader.read_string()?.into()),
                TAG_INLINE => FactoryEncoding::Inline(FactoryId::from_raw(reader.read_u32_le()?)),
                other => {
                    return Err(ProtocolError::malformed(format!(
                        "unknown record tag {:#04X}",
                        other
                    )))
                }
            };
            let payload = reader.read_bytes()?.to_vec();
            records.push(ElementRecord { encoding, payload });
        }

        Ok(Segment {
            start,
            records,
            has_more: (flags & FLAG_HAS_MORE) != 0,
        })
    }
}
