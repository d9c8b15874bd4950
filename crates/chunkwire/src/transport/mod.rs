// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chunked collection transport.
//!
//! [`split`] partitions an ordered collection into budget-bounded
//! [`Segment`]s; the first segment travels inline with the initiating call
//! and the rest are pulled lazily through a `fetch_next` collaborator.
//! [`merge`] reassembles the collection on the far side, resolving each
//! element's factory per record and verifying continuation tokens against a
//! misbehaving remote. [`TransferSession`] carries the state between pulls.

mod chunked;
mod segment;
mod session;

pub use chunked::{describe_contents, empty_collection, merge, split};
pub use segment::{ContinuationToken, ElementRecord, FactoryEncoding, Segment};
pub use session::TransferSession;
