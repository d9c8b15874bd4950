// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-resolution contexts.
//!
//! A [`Context`] is the scope a type name is resolved within, analogous to a
//! module or loading namespace. Its identity (not its contents) keys the
//! resolution cache: two contexts with identical tables are still distinct
//! scopes. Contexts are cheap to clone (shared handle, reference equality).

use crate::element::FactoryFn;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Opaque identity of a [`Context`]. Assigned once at creation, never reused
/// within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Registration ordinal of a factory inside one context. Written on the wire
/// by the inline factory encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactoryId(u32);

impl FactoryId {
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }

    pub(crate) fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

/// The factory member slot of a type declaration.
///
/// Mirrors what resolution has to verify about a declared factory: that the
/// member is static and accessible, that its value actually is a factory,
/// and that the value is present. Hosts registering well-formed types only
/// ever construct this via [`FactoryMember::of`]; the degenerate shapes
/// exist for hosts bridging externally declared types.
#[derive(Clone)]
pub struct FactoryMember {
    pub(crate) is_static: bool,
    pub(crate) accessible: bool,
    pub(crate) value: Arc<dyn Any + Send + Sync>,
}

impl FactoryMember {
    /// A well-formed static, accessible member holding the given factory.
    #[must_use]
    pub fn of(factory: FactoryFn) -> Self {
        Self {
            is_static: true,
            accessible: true,
            value: Arc::new(Some(factory)),
        }
    }

    /// A member whose slot is present but holds no factory.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            is_static: true,
            accessible: true,
            value: Arc::new(None::<FactoryFn>),
        }
    }

    /// A member holding a value that is not a factory at all.
    #[must_use]
    pub fn foreign(value: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            is_static: true,
            accessible: true,
            value,
        }
    }

    #[must_use]
    pub fn non_static(mut self) -> Self {
        self.is_static = false;
        self
    }

    #[must_use]
    pub fn inaccessible(mut self) -> Self {
        self.accessible = false;
        self
    }
}

/// Declaration of one type inside a context.
#[derive(Clone)]
pub struct TypeDecl {
    pub(crate) serializable: bool,
    pub(crate) factory: Option<FactoryMember>,
    pub(crate) ordinal: Option<FactoryId>,
}

impl TypeDecl {
    /// A type carrying the wire capability, factory to be attached.
    #[must_use]
    pub fn serializable() -> Self {
        Self {
            serializable: true,
            factory: None,
            ordinal: None,
        }
    }

    /// A type that exists but does not carry the wire capability.
    #[must_use]
    pub fn opaque() -> Self {
        Self {
            serializable: false,
            factory: None,
            ordinal: None,
        }
    }

    #[must_use]
    pub fn with_factory(mut self, member: FactoryMember) -> Self {
        self.factory = Some(member);
        self
    }
}

#[derive(Default)]
struct TypeTable {
    decls: HashMap<Arc<str>, TypeDecl>,
    /// Ordinal -> name, in registration order. Only `register` assigns
    /// ordinals; raw declarations stay name-only.
    ordinals: Vec<Arc<str>>,
}

struct ContextInner {
    id: ContextId,
    label: String,
    sealed: bool,
    table: RwLock<TypeTable>,
}

/// An opaque type-resolution scope.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self::build(label.into(), false)
    }

    /// A context whose table can be populated but which refuses resolution
    /// lookups, modeling a runtime access policy that blocks introspection.
    #[must_use]
    pub fn sealed(label: impl Into<String>) -> Self {
        Self::build(label.into(), true)
    }

    fn build(label: String, sealed: bool) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                id: ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed)),
                label,
                sealed,
                table: RwLock::new(TypeTable::default()),
            }),
        }
    }

    /// The process-wide ambient context, used as the fallback scope when a
    /// name has no binding in the requested context.
    pub fn ambient() -> &'static Context {
        static AMBIENT: OnceLock<Context> = OnceLock::new();
        AMBIENT.get_or_init(|| Context::new("ambient"))
    }

    #[must_use]
    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.inner.sealed
    }

    /// Register a well-formed factory for `name` and assign its ordinal.
    ///
    /// First registration wins: registering the same name again keeps the
    /// original binding (the cache never invalidates, so a rebind would
    /// desynchronize already-resolved factories) and returns the existing
    /// ordinal.
    pub fn register(&self, name: &str, factory: FactoryFn) -> FactoryId {
        let mut table = self.inner.table.write();
        if let Some(decl) = table.decls.get(name) {
            if let Some(ordinal) = decl.ordinal {
                log::debug!(
                    "[resolve] '{}' already registered in context '{}', keeping first binding",
                    name,
                    self.inner.label
                );
                return ordinal;
            }
        }
        let ordinal = FactoryId(table.ordinals.len() as u32);
        let name: Arc<str> = name.into();
        table.ordinals.push(Arc::clone(&name));
        let mut decl = TypeDecl::serializable().with_factory(FactoryMember::of(factory));
        decl.ordinal = Some(ordinal);
        table.decls.insert(name, decl);
        ordinal
    }

    /// Declare a type with an explicit (possibly degenerate) shape.
    ///
    /// Escape hatch for hosts whose types are declared externally. Raw
    /// declarations get no ordinal, so the inline factory encoding falls
    /// back to by-name for them.
    pub fn declare(&self, name: &str, decl: TypeDecl) {
        let mut table = self.inner.table.write();
        table.decls.insert(name.into(), decl);
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<TypeDecl> {
        self.inner.table.read().decls.get(name).cloned()
    }

    pub(crate) fn name_of(&self, ordinal: FactoryId) -> Option<Arc<str>> {
        self.inner
            .table
            .read()
            .ordinals
            .get(ordinal.0 as usize)
            .cloned()
    }

    /// Ordinal previously assigned by [`register`](Self::register), if any.
    #[must_use]
    pub fn factory_id(&self, name: &str) -> Option<FactoryId> {
        self.inner
            .table
            .read()
            .decls
            .get(name)
            .and_then(|decl| decl.ordinal)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Context {}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("sealed", &self.inner.sealed)
            .finish()
    }
}
