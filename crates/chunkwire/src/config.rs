// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire constants and transfer configuration - single source of truth.
//!
//! This module centralizes ALL segment wire-format constants and the runtime
//! transfer configuration. **NEVER hardcode elsewhere!**

/// Segment magic, "CW" in ASCII, little-endian on the wire.
pub const SEGMENT_MAGIC: u16 = 0x4357;

/// Segment wire-format version.
pub const WIRE_VERSION: u8 = 0x01;

/// Flags bit 0: more segments follow this one.
pub const FLAG_HAS_MORE: u8 = 0x01;

/// Element record tag: factory referenced by type name (resolver path).
pub const TAG_BY_NAME: u8 = 0x01;

/// Element record tag: factory referenced by registration ordinal.
pub const TAG_INLINE: u8 = 0x02;

/// Fixed segment header length in bytes:
/// magic (2) + version (1) + flags (1) + start token (8) + element count (4).
pub const SEGMENT_HEADER_LEN: usize = 16;

/// Default per-call payload budget in bytes.
///
/// Matches the usual kernel-side IPC transaction allowance with headroom for
/// the caller's own framing. Callers with a different transport ceiling set
/// their own budget via [`TransferConfig`].
pub const DEFAULT_PAYLOAD_BUDGET: usize = 64 * 1024;

/// Which factory encoding the producer writes for each element.
///
/// The decode path accepts either tag regardless of this setting, so peers
/// running different profiles interoperate; the profile only gates what a
/// producer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireProfile {
    /// Write the element's type name; the consumer resolves it by name.
    #[default]
    ByName,
    /// Write the factory's registration ordinal; falls back to the type name
    /// for elements whose type is not registered in the producing context.
    Inline,
}

/// Runtime configuration for one transfer.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Hard ceiling on a single segment's serialized byte length. A single
    /// element whose encoding alone exceeds this still travels, alone, in an
    /// oversized segment.
    pub payload_budget: usize,
    /// Factory encoding written by the producer.
    pub profile: WireProfile,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            payload_budget: DEFAULT_PAYLOAD_BUDGET,
            profile: WireProfile::default(),
        }
    }
}

impl TransferConfig {
    #[must_use]
    pub fn new(payload_budget: usize) -> Self {
        Self {
            payload_budget,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: WireProfile) -> Self {
        self.profile = profile;
        self
    }
}
