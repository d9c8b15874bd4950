// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transfer-side reassembly state.
//!
//! A session exists for the duration of one logical transfer: created when
//! the initial segment arrives, driven by [`TransferSession::resume`] while
//! follow-up segments remain, and consumed by [`TransferSession::finish`].
//! Abandoning a session mid-transfer leaks nothing; it holds no external
//! handles beyond the partial accumulator.

use crate::element::Wireable;
use crate::error::{ProtocolError, Result};
use crate::resolve::{Context, DeserializerResolver};
use crate::transport::segment::{ContinuationToken, FactoryEncoding, Segment};
use crate::wire::WireReader;

/// Ephemeral state held across follow-up pulls of one transfer.
pub struct TransferSession {
    elements: Vec<Box<dyn Wireable>>,
    context: Context,
    /// Continuation the next segment must start at; `None` once complete.
    expected: Option<ContinuationToken>,
}

impl std::fmt::Debug for TransferSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferSession")
            .field("elements", &self.elements.len())
            .field("expected", &self.expected)
            .finish()
    }
}

impl TransferSession {
    /// Start a session from the segment that arrived inline with the
    /// initiating call. The initial segment must start at offset zero.
    pub fn begin(initial: &Segment, context: Context) -> Result<Self> {
        let origin = ContinuationToken::new(0);
        if initial.start_token() != origin {
            return Err(ProtocolError::OutOfOrderSegment {
                expected: origin,
                got: initial.start_token(),
            });
        }
        let mut session = Self {
            elements: Vec::new(),
            context,
            expected: None,
        };
        session.decode_into(initial)?;
        Ok(session)
    }

    /// `true` once the terminal segment has been absorbed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.expected.is_none()
    }

    /// Elements reassembled so far, in original order.
    #[must_use]
    pub fn elements(&self) -> &[Box<dyn Wireable>] {
        &self.elements
    }

    /// Absorb one follow-up segment, verifying it starts at the expected
    /// continuation. Absorbing into a completed session is a no-op.
    ///
    /// On any failure the partial accumulator is discarded; the session is
    /// dead and should be dropped, never resumed.
    pub fn absorb(&mut self, segment: &Segment) -> Result<()> {
        let Some(expected) = self.expected else {
            return Ok(());
        };
        if segment.start_token() != expected {
            log::warn!(
                "[transfer] segment started at {} while continuation {} was promised",
                segment.start_token(),
                expected
            );
            self.elements.clear();
            return Err(ProtocolError::OutOfOrderSegment {
                expected,
                got: segment.start_token(),
            });
        }
        if let Err(err) = self.decode_into(segment) {
            self.elements.clear();
            return Err(err);
        }
        Ok(())
    }

    /// Pull segments through `fetch_next` until the transfer completes.
    ///
    /// Segments are consumed strictly in the order `fetch_next` returns
    /// them; nothing is prefetched. Resuming a completed session never
    /// invokes `fetch_next` again.
    pub fn resume<F>(&mut self, mut fetch_next: F) -> Result<()>
    where
        F: FnMut(ContinuationToken) -> Result<Option<Segment>>,
    {
        while let Some(expected) = self.expected {
            match fetch_next(expected)? {
                Some(segment) => self.absorb(&segment)?,
                None => {
                    self.elements.clear();
                    return Err(ProtocolError::TransportExhausted { expected });
                }
            }
        }
        Ok(())
    }

    /// Take the reassembled collection. Callers check
    /// [`is_complete`](Self::is_complete) first; finishing an incomplete
    /// session just yields what arrived so far.
    #[must_use]
    pub fn finish(self) -> Vec<Box<dyn Wireable>> {
        self.elements
    }

    fn decode_into(&mut self, segment: &Segment) -> Result<()> {
        let resolver = DeserializerResolver::global();
        for record in segment.records() {
            let factory = match record.encoding() {
                FactoryEncoding::ByName(name) => resolver.resolve(&self.context, name)?,
                FactoryEncoding::Inline(ordinal) => {
                    resolver.resolve_ordinal(&self.context, *ordinal)?
                }
            };
            let mut reader = WireReader::new(record.payload());
            self.elements.push(factory.create(&mut reader, &self.context)?);
        }
        self.expected = segment.continuation_token();
        Ok(())
    }
}
