// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type factory resolution with context-scoped caching.
//!
//! A [`Context`] is an opaque scope holding type declarations; the
//! [`DeserializerResolver`] turns a type name (or registration ordinal)
//! into a validated [`crate::ResolvedFactory`], memoizing the result in a
//! [`TypeResolutionCache`] so hot transfer paths pay the table walk at most
//! once per `(context, type name)` pair. Failures are never cached: a type
//! that becomes declarable later resolves on the next attempt.

mod cache;
mod context;
mod resolver;

pub use cache::{LookupStats, TypeResolutionCache};
pub use context::{Context, ContextId, FactoryId, FactoryMember, TypeDecl};
pub use resolver::DeserializerResolver;
