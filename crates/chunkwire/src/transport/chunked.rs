// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Splitting and merging of ordered collections.
//!
//! `split` is a greedy bin fill: elements are encoded in order and appended
//! to the current segment until the next record would push its serialized
//! length (header included) past the payload budget, at which point the
//! segment is sealed and a new one begins. Greedy fill is the contract, not
//! an optimization shortcut; segment counts are deterministic for identical
//! input. A single element whose record alone exceeds the
//! budget forms its own oversized segment rather than being dropped or
//! truncated.

use crate::config::{TransferConfig, WireProfile, SEGMENT_HEADER_LEN};
use crate::element::{encode_element, Wireable};
use crate::error::Result;
use crate::resolve::Context;
use crate::transport::segment::{ContinuationToken, ElementRecord, FactoryEncoding, Segment};
use crate::transport::session::TransferSession;

/// A zero-length collection, produced without touching any segment
/// machinery.
#[must_use]
pub fn empty_collection() -> Vec<Box<dyn Wireable>> {
    Vec::new()
}

/// Bitwise OR of every element's content descriptor; 0 for an empty
/// collection.
#[must_use]
pub fn describe_contents(collection: &[Box<dyn Wireable>]) -> u32 {
    collection
        .iter()
        .fold(0, |acc, element| acc | element.content_descriptor())
}

/// Partition `collection` into budget-bounded segments, preserving order.
///
/// Guarantees: no loss, no duplication, order preserved; every segment's
/// serialized length stays within `config.payload_budget` except the
/// documented oversized-element escape valve. An empty collection yields
/// exactly one empty terminal segment. The `context` is consulted only by
/// the inline factory profile, to map type names to registration ordinals;
/// unregistered types fall back to by-name records.
pub fn split(
    collection: &[Box<dyn Wireable>],
    config: &TransferConfig,
    context: &Context,
) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut current: Vec<ElementRecord> = Vec::new();
    let mut current_len = SEGMENT_HEADER_LEN;
    let mut start = 0u64;

    for (index, element) in collection.iter().enumerate() {
        let payload = encode_element(element.as_ref())?;
        let record = ElementRecord::new(pick_encoding(element.as_ref(), config, context), payload);
        let record_len = record.wire_len();

        if !current.is_empty() && current_len + record_len > config.payload_budget {
            segments.push(Segment::new(start, std::mem::take(&mut current), true));
            start = index as u64;
            current_len = SEGMENT_HEADER_LEN;
        }
        if current.is_empty() && SEGMENT_HEADER_LEN + record_len > config.payload_budget {
            log::warn!(
                "[transfer] element {} ('{}') needs {} bytes against a {}-byte budget, sending oversized segment",
                index,
                element.type_name(),
                SEGMENT_HEADER_LEN + record_len,
                config.payload_budget
            );
        }
        current.push(record);
        current_len += record_len;
    }

    segments.push(Segment::new(start, current, false));
    log::debug!(
        "[transfer] split {} elements into {} segment(s), budget {}",
        collection.len(),
        segments.len(),
        config.payload_budget
    );
    Ok(segments)
}

fn pick_encoding(
    element: &dyn Wireable,
    config: &TransferConfig,
    context: &Context,
) -> FactoryEncoding {
    match config.profile {
        WireProfile::ByName => FactoryEncoding::ByName(element.type_name().into()),
        WireProfile::Inline => match context.factory_id(element.type_name()) {
            Some(ordinal) => FactoryEncoding::Inline(ordinal),
            None => {
                log::debug!(
                    "[transfer] '{}' has no ordinal in context '{}', writing by-name record",
                    element.type_name(),
                    context.label()
                );
                FactoryEncoding::ByName(element.type_name().into())
            }
        },
    }
}

/// Reassemble a collection from its initial segment, pulling follow-up
/// segments through `fetch_next` until exhaustion.
///
/// Fails with [`crate::ProtocolError::TransportExhausted`] when `fetch_next`
/// returns `None` while more data was promised, and with
/// [`crate::ProtocolError::OutOfOrderSegment`] when a returned segment does
/// not start at the promised continuation; in both cases the partial
/// accumulator is discarded. Resolution failures surface immediately and are
/// never skipped, since skipping would corrupt the order and count
/// invariants.
pub fn merge<F>(
    initial: &Segment,
    fetch_next: F,
    context: &Context,
) -> Result<Vec<Box<dyn Wireable>>>
where
    F: FnMut(ContinuationToken) -> Result<Option<Segment>>,
{
    let mut session = TransferSession::begin(initial, context.clone())?;
    session.resume(fetch_next)?;
    Ok(session.finish())
}
