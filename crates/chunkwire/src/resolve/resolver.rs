// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Factory resolution with memoization.
//!
//! `resolve` walks the context's type table only on a cache miss, validating
//! the declaration shape step by step the way a reflective lookup would:
//! does the type exist, does it carry the wire capability, does it declare a
//! factory member, is the member static and accessible, is its value
//! actually a factory, and is that value present. Each step failing maps to
//! its own [`ProtocolError`] kind; none of them is cached, so resolution for
//! the same key can succeed later once the type becomes declarable.

use crate::element::{FactoryFn, ResolvedFactory};
use crate::error::{ProtocolError, Result};
use crate::resolve::{Context, FactoryId, TypeDecl, TypeResolutionCache};
use std::sync::OnceLock;

/// Resolves type names to validated factories, memoizing per context.
#[derive(Default)]
pub struct DeserializerResolver {
    cache: TypeResolutionCache,
}

impl DeserializerResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide resolver used by the transfer path.
    pub fn global() -> &'static DeserializerResolver {
        static GLOBAL: OnceLock<DeserializerResolver> = OnceLock::new();
        GLOBAL.get_or_init(DeserializerResolver::new)
    }

    #[must_use]
    pub fn cache(&self) -> &TypeResolutionCache {
        &self.cache
    }

    /// Resolve `type_name` within `context`, falling back to the ambient
    /// context when the name has no local binding.
    ///
    /// Cache hits are O(1) and return the identical factory instance every
    /// time. On a miss the context table is walked once; success populates
    /// the cache (first writer wins under concurrency), failure leaves the
    /// cache untouched.
    pub fn resolve(&self, context: &Context, type_name: &str) -> Result<ResolvedFactory> {
        if let Some(hit) = self.cache.get(context.id(), type_name) {
            return Ok(hit);
        }

        let factory = introspect(context, type_name)?;
        log::debug!(
            "[resolve] resolved '{}' in context '{}'",
            type_name,
            context.label()
        );
        Ok(self
            .cache
            .insert_if_absent(context.id(), type_name.into(), factory))
    }

    /// Resolve a factory by its registration ordinal (inline wire encoding).
    ///
    /// The ordinal is mapped back to its name through the context table and
    /// then follows the exact same resolve contract, so both wire encodings
    /// share one cache and one failure taxonomy.
    pub fn resolve_ordinal(&self, context: &Context, ordinal: FactoryId) -> Result<ResolvedFactory> {
        let name = context
            .name_of(ordinal)
            .ok_or_else(|| ProtocolError::TypeNotFound {
                type_name: format!("ordinal #{}", ordinal.raw()),
            })?;
        self.resolve(context, &name)
    }
}

/// Locate and validate the declaration for `type_name`. Pure with respect to
/// a fixed context: same input, same outcome.
fn introspect(context: &Context, type_name: &str) -> Result<ResolvedFactory> {
    if context.is_sealed() {
        return Err(ProtocolError::AccessDenied {
            type_name: type_name.into(),
            context: context.label().into(),
        });
    }

    let decl = match context.lookup(type_name) {
        Some(decl) => decl,
        None => lookup_ambient(context, type_name)?,
    };

    validate(type_name, &decl)
}

/// Fallback to the ambient context when the requested scope has no binding.
fn lookup_ambient(context: &Context, type_name: &str) -> Result<TypeDecl> {
    let ambient = Context::ambient();
    if ambient.id() == context.id() {
        return Err(ProtocolError::TypeNotFound {
            type_name: type_name.into(),
        });
    }
    ambient
        .lookup(type_name)
        .ok_or_else(|| ProtocolError::TypeNotFound {
            type_name: type_name.into(),
        })
}

fn validate(type_name: &str, decl: &TypeDecl) -> Result<ResolvedFactory> {
    if !decl.serializable {
        return Err(ProtocolError::NotSerializable {
            type_name: type_name.into(),
        });
    }

    let member = decl
        .factory
        .as_ref()
        .ok_or_else(|| ProtocolError::MissingFactory {
            type_name: type_name.into(),
        })?;

    if !member.is_static {
        return Err(ProtocolError::FactoryWrongShape {
            type_name: type_name.into(),
            reason: "factory member is not static".into(),
        });
    }
    if !member.accessible {
        return Err(ProtocolError::FactoryWrongShape {
            type_name: type_name.into(),
            reason: "factory member is not accessible".into(),
        });
    }

    // Check the member's type before touching its value, the same order a
    // reflective field lookup verifies the declared type first.
    let slot = member
        .value
        .downcast_ref::<Option<FactoryFn>>()
        .ok_or_else(|| ProtocolError::FactoryWrongShape {
            type_name: type_name.into(),
            reason: "factory member does not hold a factory".into(),
        })?;

    match slot {
        Some(create) => Ok(ResolvedFactory::new(type_name.into(), create.clone())),
        None => Err(ProtocolError::FactoryProducedNull {
            type_name: type_name.into(),
        }),
    }
}
