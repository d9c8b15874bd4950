// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The wire capability implemented by transferable elements.
//!
//! Each element type owns its own wire format: the transfer core only asks
//! an element to encode itself into a [`WireWriter`] and asks a resolved
//! factory to reconstruct an instance from a [`WireReader`]. The core never
//! inspects payload bytes.

use crate::error::Result;
use crate::resolve::Context;
use crate::wire::{WireReader, WireWriter};
use std::any::Any;
use std::sync::Arc;

/// Content-descriptor bit: the element references a file-like handle that
/// cannot cross the transport as plain bytes.
pub const CONTENTS_FILE_HANDLE: u32 = 0x0001;

/// Capability implemented by every transferable element type.
///
/// Object-safe so collections stay heterogeneous: the transfer path works
/// on `Box<dyn Wireable>` and reconstructs concrete types through factories
/// resolved per element record.
pub trait Wireable: Send + Sync {
    /// Stable type name written on the wire when the by-name factory
    /// encoding is in effect. Must match the name the type was registered
    /// under on the consuming side.
    fn type_name(&self) -> &str;

    /// Bitmask of special resource requirements (see [`CONTENTS_FILE_HANDLE`]).
    fn content_descriptor(&self) -> u32 {
        0
    }

    /// Serialize this element's payload. The writer carries only the
    /// payload; record framing (type reference, length) is the segment
    /// codec's job.
    fn encode(&self, writer: &mut WireWriter) -> Result<()>;

    /// Downcast support for consumers that know what they received.
    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn Wireable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wireable")
            .field("type_name", &self.type_name())
            .finish()
    }
}

/// Callable that reconstructs one element instance from its payload bytes.
pub type FactoryFn =
    Arc<dyn Fn(&mut WireReader<'_>, &Context) -> Result<Box<dyn Wireable>> + Send + Sync>;

/// A validated factory bound to the type name it was resolved for.
///
/// Immutable once created; clones share the same underlying callable, so a
/// cache hit hands every caller the identical instance.
#[derive(Clone)]
pub struct ResolvedFactory {
    type_name: Arc<str>,
    create: FactoryFn,
}

impl ResolvedFactory {
    pub(crate) fn new(type_name: Arc<str>, create: FactoryFn) -> Self {
        Self { type_name, create }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Reconstruct one element from its payload.
    pub fn create(&self, reader: &mut WireReader<'_>, context: &Context) -> Result<Box<dyn Wireable>> {
        (self.create)(reader, context)
    }

    /// Reference equality on the underlying callable. Used by tests to show
    /// that repeated resolution returns the cached instance.
    #[must_use]
    pub fn same_instance(&self, other: &ResolvedFactory) -> bool {
        Arc::ptr_eq(&self.create, &other.create)
    }
}

impl std::fmt::Debug for ResolvedFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFactory")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Encode one element into a fresh scratch buffer and return its payload.
///
/// The scratch pass exists so the splitter can measure an element before
/// committing it to a segment.
pub fn encode_element(element: &dyn Wireable) -> Result<Vec<u8>> {
    let mut writer = WireWriter::new();
    element.encode(&mut writer)?;
    Ok(writer.into_bytes())
}
