// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Buffer primitives for the segment wire format.
//!
//! Provides a growable [`WireWriter`] and a borrowed, bounds-checked
//! [`WireReader`] for little-endian primitives, length-prefixed byte
//! ranges, and UTF-8 strings. Element codecs receive these at the
//! encode/decode seam; the segment codec uses them internally.

pub mod cursor;

pub use cursor::{WireReader, WireWriter};

use std::fmt;

/// Error raised while reading the wire format.
#[derive(Debug, Clone)]
pub enum WireError {
    ReadFailed { offset: usize, reason: String },
    InvalidData { offset: usize, reason: String },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            WireError::InvalidData { offset, reason } => {
                write!(f, "invalid data at offset {}: {}", offset, reason)
            }
        }
    }
}

impl std::error::Error for WireError {}

pub type WireResult<T> = core::result::Result<T, WireError>;
