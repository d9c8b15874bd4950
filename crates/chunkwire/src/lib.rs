// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # chunkwire - chunked object-list transfer for payload-bounded IPC
//!
//! Moves an ordered, heterogeneous collection of serializable elements over
//! a transport that enforces a hard per-call payload ceiling. The collection
//! is split into budget-bounded segments; the first segment travels inline
//! with the initiating call and the rest are pulled lazily through a
//! `fetch_next` collaborator, reassembled in original order on the far side.
//! Element types are reconstructed through context-scoped factories resolved
//! by name (or registration ordinal) and memoized per context.
//!
//! ## Quick Start
//!
//! ```rust
//! use chunkwire::{
//!     merge, split, Context, FactoryFn, ProtocolError, Result, TransferConfig, Wireable,
//! };
//! use std::sync::Arc;
//!
//! struct Reading {
//!     value: u32,
//! }
//!
//! impl Wireable for Reading {
//!     fn type_name(&self) -> &str {
//!         "demo.Reading"
//!     }
//!     fn encode(&self, writer: &mut chunkwire::WireWriter) -> Result<()> {
//!         writer.write_u32_le(self.value);
//!         Ok(())
//!     }
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let context = Context::new("demo");
//!     let factory: FactoryFn = Arc::new(|reader, _ctx| {
//!         let value = reader.read_u32_le().map_err(ProtocolError::from)?;
//!         Ok(Box::new(Reading { value }) as Box<dyn Wireable>)
//!     });
//!     context.register("demo.Reading", factory);
//!
//!     let collection: Vec<Box<dyn Wireable>> =
//!         (0u32..100).map(|value| Box::new(Reading { value }) as Box<dyn Wireable>).collect();
//!     let segments = split(&collection, &TransferConfig::new(256), &context)?;
//!
//!     // the remote side would serve follow-up segments; here they are local
//!     let mut follow_up = segments[1..].iter();
//!     let merged = merge(
//!         &segments[0],
//!         |_token| Ok(follow_up.next().cloned()),
//!         &context,
//!     )?;
//!     assert_eq!(merged.len(), collection.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------------+
//! |                        ChunkedListTransport                        |
//! |        split / merge / describe_contents / TransferSession         |
//! +--------------------------------------------------------------------+
//! |                        DeserializerResolver                        |
//! |     context table walk -> validated factory, memoized per key      |
//! +--------------------------------------------------------------------+
//! |            TypeResolutionCache            |   Segment wire codec   |
//! |   context -> (name -> ResolvedFactory)    |  records + token flags |
//! +--------------------------------------------------------------------+
//! |                      WireWriter / WireReader                       |
//! +--------------------------------------------------------------------+
//! ```
//!
//! The remote call itself stays outside this crate: `merge` receives a
//! `fetch_next` closure and never performs I/O of its own.

/// Wire constants and transfer configuration.
pub mod config;
/// The wire capability implemented by transferable elements.
pub mod element;
/// Error taxonomy for transfers and factory resolution.
pub mod error;
/// Per-type factory resolution with context-scoped caching.
pub mod resolve;
/// Chunked collection transport (split, merge, sessions, segment codec).
pub mod transport;
/// Buffer primitives for the segment wire format.
pub mod wire;

pub use config::{TransferConfig, WireProfile, DEFAULT_PAYLOAD_BUDGET};
pub use element::{
    encode_element, FactoryFn, ResolvedFactory, Wireable, CONTENTS_FILE_HANDLE,
};
pub use error::{ProtocolError, Result};
pub use resolve::{
    Context, ContextId, DeserializerResolver, FactoryId, FactoryMember, LookupStats, TypeDecl,
    TypeResolutionCache,
};
pub use transport::{
    describe_contents, empty_collection, merge, split, ContinuationToken, ElementRecord,
    FactoryEncoding, Segment, TransferSession,
};
pub use wire::{WireError, WireReader, WireWriter};
