// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for chunked transfers and factory resolution.

use crate::transport::ContinuationToken;
use crate::wire::WireError;
use std::fmt;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, ProtocolError>;

/// Errors that can occur while transferring or reconstructing a collection.
///
/// Transport-level variants mean the remote side violated the chunking
/// contract; the transfer is dead and no partial result is returned.
/// Resolution-level variants mean a received type could not be reconstructed
/// in the given context. Both families are surfaced immediately and never
/// retried internally; retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub enum ProtocolError {
    /// `fetch_next` returned no segment although the previous segment
    /// promised more data.
    TransportExhausted { expected: ContinuationToken },

    /// A follow-up segment did not start at the expected continuation point.
    OutOfOrderSegment {
        expected: ContinuationToken,
        got: ContinuationToken,
    },

    /// A segment's bytes could not be decoded (truncated, bad magic,
    /// unsupported version, unknown record tag).
    MalformedSegment { reason: String },

    /// No type with that name is declared in the context (or its fallback).
    TypeNotFound { type_name: String },

    /// The type exists but does not carry the wire capability.
    NotSerializable { type_name: String },

    /// The type lacks a factory member.
    MissingFactory { type_name: String },

    /// A factory member exists but has the wrong type, or is not a static
    /// accessible member.
    FactoryWrongShape { type_name: String, reason: String },

    /// The factory member resolved to an absent value.
    FactoryProducedNull { type_name: String },

    /// The context refuses introspection.
    AccessDenied { type_name: String, context: String },
}

impl ProtocolError {
    /// `true` for failures of the chunking contract itself.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProtocolError::TransportExhausted { .. }
                | ProtocolError::OutOfOrderSegment { .. }
                | ProtocolError::MalformedSegment { .. }
        )
    }

    /// `true` for failures to resolve a factory for a received type.
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        !self.is_transport()
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ProtocolError::MalformedSegment {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::TransportExhausted { expected } => write!(
                f,
                "transport exhausted: no segment returned for continuation {}",
                expected
            ),
            ProtocolError::OutOfOrderSegment { expected, got } => write!(
                f,
                "out-of-order segment: expected continuation {}, got {}",
                expected, got
            ),
            ProtocolError::MalformedSegment { reason } => {
                write!(f, "malformed segment: {}", reason)
            }
            ProtocolError::TypeNotFound { type_name } => {
                write!(f, "type not found: '{}'", type_name)
            }
            ProtocolError::NotSerializable { type_name } => {
                write!(f, "type '{}' does not carry the wire capability", type_name)
            }
            ProtocolError::MissingFactory { type_name } => {
                write!(f, "type '{}' declares no factory member", type_name)
            }
            ProtocolError::FactoryWrongShape { type_name, reason } => {
                write!(f, "factory member of '{}' has wrong shape: {}", type_name, reason)
            }
            ProtocolError::FactoryProducedNull { type_name } => {
                write!(f, "factory member of '{}' resolved to null", type_name)
            }
            ProtocolError::AccessDenied { type_name, context } => write!(
                f,
                "context '{}' denied introspection while resolving '{}'",
                context, type_name
            ),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<WireError> for ProtocolError {
    fn from(err: WireError) -> Self {
        ProtocolError::MalformedSegment {
            reason: err.to_string(),
        }
    }
}
