// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::items_after_statements)] // Test helpers
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::needless_pass_by_value)] // Test functions
#![allow(clippy::must_use_candidate)] // Test functions

//! Split/merge integration tests.
//!
//! Validates the full transfer path over a fake remote: a collection is
//! split into segments, every segment crosses the "wire" through its byte
//! encoding, and the consumer reassembles the collection by pulling
//! follow-up segments through `fetch_next`.

use chunkwire::{
    describe_contents, empty_collection, merge, split, Context, ContinuationToken, FactoryFn,
    ProtocolError, Result, Segment, TransferConfig, TransferSession, WireProfile, Wireable,
    WireReader, WireWriter, CONTENTS_FILE_HANDLE,
};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Test element types (two of them, so collections stay heterogeneous)
// ---------------------------------------------------------------------------

/// Element carrying an opaque byte payload.
#[derive(Debug, PartialEq, Eq)]
struct Blob {
    bytes: Vec<u8>,
}

impl Blob {
    fn boxed(len: usize) -> Box<dyn Wireable> {
        // deterministic non-trivial pattern, easy to verify after merge
        Box::new(Blob {
            bytes: (0..len).map(|i| (i % 251) as u8).collect(),
        })
    }
}

impl Wireable for Blob {
    fn type_name(&self) -> &str {
        "test.Blob"
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_bytes(&self.bytes);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Element carrying a label and a descriptor bit.
#[derive(Debug, PartialEq, Eq)]
struct Note {
    label: String,
}

impl Wireable for Note {
    fn type_name(&self) -> &str {
        "test.Note"
    }

    fn content_descriptor(&self) -> u32 {
        CONTENTS_FILE_HANDLE
    }

    fn encode(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_string(&self.label);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn blob_factory() -> FactoryFn {
    Arc::new(|reader: &mut WireReader<'_>, _ctx: &Context| {
        let bytes = reader.read_bytes().map_err(ProtocolError::from)?.to_vec();
        Ok(Box::new(Blob { bytes }) as Box<dyn Wireable>)
    })
}

fn note_factory() -> FactoryFn {
    Arc::new(|reader: &mut WireReader<'_>, _ctx: &Context| {
        let label = reader.read_string().map_err(ProtocolError::from)?.to_string();
        Ok(Box::new(Note { label }) as Box<dyn Wireable>)
    })
}

/// Context with both element types registered, in a fixed order so inline
/// ordinals agree between producer and consumer.
fn test_context(label: &str) -> Context {
    let ctx = Context::new(label);
    ctx.register("test.Blob", blob_factory());
    ctx.register("test.Note", note_factory());
    ctx
}

/// Serve follow-up segments the way a remote endpoint would: every segment
/// crosses as bytes and is re-decoded on the consuming side.
fn serve_over_wire(segments: &[Segment]) -> impl FnMut(ContinuationToken) -> Result<Option<Segment>> + '_ {
    let encoded: Vec<Vec<u8>> = segments.iter().skip(1).map(Segment::encode).collect();
    let mut queue = encoded.into_iter();
    move |_token| match queue.next() {
        Some(bytes) => Ok(Some(Segment::decode(&bytes)?)),
        None => Ok(None),
    }
}

fn assert_same_elements(merged: &[Box<dyn Wireable>], original: &[Box<dyn Wireable>]) {
    assert_eq!(merged.len(), original.len(), "length must survive transfer");
    for (i, (got, want)) in merged.iter().zip(original.iter()).enumerate() {
        assert_eq!(got.type_name(), want.type_name(), "type of element {}", i);
        match want.as_any().downcast_ref::<Blob>() {
            Some(want_blob) => {
                let got_blob = got
                    .as_any()
                    .downcast_ref::<Blob>()
                    .unwrap_or_else(|| panic!("element {} should be a Blob", i));
                assert_eq!(got_blob, want_blob, "blob {} must match", i);
            }
            None => {
                let want_note = want
                    .as_any()
                    .downcast_ref::<Note>()
                    .unwrap_or_else(|| panic!("element {} should be a Note", i));
                let got_note = got
                    .as_any()
                    .downcast_ref::<Note>()
                    .unwrap_or_else(|| panic!("element {} should be a Note", i));
                assert_eq!(got_note, want_note, "note {} must match", i);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Test: round-trip over the byte encoding, heterogeneous collection
// ---------------------------------------------------------------------------

#[test]
fn test_heterogeneous_roundtrip_over_wire() {
    let ctx = test_context("roundtrip");
    let mut collection: Vec<Box<dyn Wireable>> = Vec::new();
    for i in 0..25 {
        if i % 3 == 0 {
            collection.push(Box::new(Note {
                label: format!("note-{}", i),
            }));
        } else {
            collection.push(Blob::boxed(30 + i));
        }
    }

    let config = TransferConfig::new(160);
    let segments = split(&collection, &config, &ctx).expect("split");
    assert!(segments.len() > 1, "budget must force multiple segments");

    let initial = Segment::decode(&segments[0].encode()).expect("initial over wire");
    let merged = merge(&initial, serve_over_wire(&segments), &ctx).expect("merge");
    assert_same_elements(&merged, &collection);
}

#[test]
fn test_randomized_roundtrip_is_order_preserving() {
    fastrand::seed(0x5EED);
    let ctx = test_context("roundtrip-random");

    for _ in 0..20 {
        let len = fastrand::usize(0..60);
        let collection: Vec<Box<dyn Wireable>> = (0..len)
            .map(|_| Blob::boxed(fastrand::usize(1..120)))
            .collect();
        let budget = fastrand::usize(64..512);

        let segments = split(&collection, &TransferConfig::new(budget), &ctx).expect("split");
        let total: usize = segments.iter().map(Segment::len).sum();
        assert_eq!(total, collection.len(), "no loss, no duplication");

        let merged = merge(&segments[0], serve_over_wire(&segments), &ctx).expect("merge");
        assert_same_elements(&merged, &collection);
    }
}

#[test]
fn test_inline_profile_roundtrip() {
    let producer = test_context("inline-producer");
    let consumer = test_context("inline-consumer");
    let collection: Vec<Box<dyn Wireable>> = (0..10).map(|i| Blob::boxed(20 + i)).collect();

    let config = TransferConfig::new(128).with_profile(WireProfile::Inline);
    let segments = split(&collection, &config, &producer).expect("split");

    let merged = merge(&segments[0], serve_over_wire(&segments), &consumer).expect("merge");
    assert_same_elements(&merged, &collection);
}

// ---------------------------------------------------------------------------
// Test: canonical fill scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_five_equal_elements_fill_two_two_one() {
    let ctx = test_context("greedy");
    let collection: Vec<Box<dyn Wireable>> = (0..5).map(|_| Blob::boxed(40)).collect();

    // size the budget so exactly two Blob records fit per segment
    let probe = split(&collection[..1], &TransferConfig::new(usize::MAX), &ctx)
        .expect("probe split");
    let record_len = probe[0].encoded_len() - split(&[], &TransferConfig::new(1), &ctx)
        .expect("empty split")[0]
        .encoded_len();
    let config = TransferConfig::new(probe[0].encoded_len() + record_len);

    let segments = split(&collection, &config, &ctx).expect("split");
    let sizes: Vec<usize> = segments.iter().map(Segment::len).collect();
    assert_eq!(sizes, vec![2, 2, 1]);

    let merged = merge(&segments[0], serve_over_wire(&segments), &ctx).expect("merge");
    assert_same_elements(&merged, &collection);
}

#[test]
fn test_single_oversized_element_single_segment() {
    let ctx = test_context("oversized");
    let collection = vec![Blob::boxed(500)];

    let segments = split(&collection, &TransferConfig::new(100), &ctx).expect("split");
    assert_eq!(segments.len(), 1);
    assert!(!segments[0].has_more());
    assert!(segments[0].encoded_len() > 100);

    let merged = merge(&segments[0], serve_over_wire(&segments), &ctx).expect("merge");
    assert_same_elements(&merged, &collection);
}

#[test]
fn test_empty_collection_fast_path() {
    let ctx = test_context("empty");
    let collection = empty_collection();
    assert_eq!(describe_contents(&collection), 0);

    let segments = split(&collection, &TransferConfig::new(64), &ctx).expect("split");
    assert_eq!(segments.len(), 1);

    let merged = merge(
        &segments[0],
        |_token| panic!("no follow-up segments exist"),
        &ctx,
    )
    .expect("merge");
    assert!(merged.is_empty());
}

#[test]
fn test_describe_contents_matches_element_fold() {
    let collection: Vec<Box<dyn Wireable>> = vec![
        Blob::boxed(4),
        Box::new(Note {
            label: "handle".into(),
        }),
    ];
    let expected = collection
        .iter()
        .fold(0, |acc, e| acc | e.content_descriptor());
    assert_eq!(describe_contents(&collection), expected);
    assert_eq!(describe_contents(&collection), CONTENTS_FILE_HANDLE);
}

// ---------------------------------------------------------------------------
// Test: contract violations by the remote
// ---------------------------------------------------------------------------

#[test]
fn test_exhausted_remote_fails_transfer() {
    let ctx = test_context("exhausted");
    let collection: Vec<Box<dyn Wireable>> = (0..6).map(|_| Blob::boxed(64)).collect();
    let segments = split(&collection, &TransferConfig::new(128), &ctx).expect("split");
    assert!(segments.len() > 2);

    // remote serves only the second segment, then goes silent
    let mut served = false;
    let err = merge(
        &segments[0],
        |_token| {
            if served {
                Ok(None)
            } else {
                served = true;
                Ok(Some(segments[1].clone()))
            }
        },
        &ctx,
    )
    .unwrap_err();
    assert!(matches!(err, ProtocolError::TransportExhausted { .. }));
    assert!(err.is_transport());
}

#[test]
fn test_out_of_order_segment_discards_partial_result() {
    let ctx = test_context("out-of-order");
    let collection: Vec<Box<dyn Wireable>> = (0..6).map(|_| Blob::boxed(64)).collect();
    let segments = split(&collection, &TransferConfig::new(128), &ctx).expect("split");
    assert!(segments.len() > 2);

    let mut session = TransferSession::begin(&segments[0], ctx.clone()).expect("begin");
    assert!(!session.is_complete());
    assert!(!session.elements().is_empty());

    // serve segment 2 where segment 1 was promised
    let err = session.absorb(&segments[2]).unwrap_err();
    match err {
        ProtocolError::OutOfOrderSegment { expected, got } => {
            assert_eq!(expected, segments[1].start_token());
            assert_eq!(got, segments[2].start_token());
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(
        session.elements().is_empty(),
        "partial accumulator must be discarded"
    );
}

#[test]
fn test_resume_after_completion_is_idempotent() {
    let ctx = test_context("idempotent");
    let collection: Vec<Box<dyn Wireable>> = (0..4).map(|_| Blob::boxed(40)).collect();
    let segments = split(&collection, &TransferConfig::new(128), &ctx).expect("split");

    let mut session = TransferSession::begin(&segments[0], ctx.clone()).expect("begin");
    session
        .resume(serve_over_wire(&segments))
        .expect("first resume");
    assert!(session.is_complete());
    let len = session.elements().len();

    // a completed session never goes back to the remote
    session
        .resume(|_token| -> Result<Option<Segment>> {
            panic!("fetch_next must not run after completion")
        })
        .expect("second resume");
    assert_eq!(session.elements().len(), len);
    assert_same_elements(&session.finish(), &collection);
}

#[test]
fn test_initial_segment_must_start_at_origin() {
    let ctx = test_context("origin");
    let collection: Vec<Box<dyn Wireable>> = (0..6).map(|_| Blob::boxed(64)).collect();
    let segments = split(&collection, &TransferConfig::new(128), &ctx).expect("split");
    assert!(segments.len() > 1);

    let err = TransferSession::begin(&segments[1], ctx).unwrap_err();
    assert!(matches!(err, ProtocolError::OutOfOrderSegment { .. }));
}
