// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent, context-scoped factory cache.
//!
//! Two-level map: context identity -> (type name -> resolved factory).
//! Entries are written at most once and never evicted; a context's whole
//! sub-map is reclaimed via [`TypeResolutionCache::retire`] when the context
//! reaches end of life. Writes are atomic insert-if-absent scoped to the
//! per-context sub-map, so racing resolvers for the same key agree on one
//! winner and unrelated contexts never contend.

use crate::element::ResolvedFactory;
use crate::resolve::ContextId;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
}

type SubMap = Arc<DashMap<Arc<str>, ResolvedFactory>>;

/// Process-lifetime cache of resolved factories, keyed `(context, name)`.
#[derive(Default)]
pub struct TypeResolutionCache {
    contexts: DashMap<ContextId, SubMap>,
    stats: RwLock<LookupStats>,
}

impl TypeResolutionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached factory for `(context, name)`, if resolution already succeeded.
    #[must_use]
    pub fn get(&self, context: ContextId, name: &str) -> Option<ResolvedFactory> {
        let hit = self
            .contexts
            .get(&context)
            .and_then(|sub| sub.get(name).map(|entry| entry.clone()));
        match hit {
            Some(factory) => {
                self.record_hit();
                Some(factory)
            }
            None => {
                self.record_miss();
                None
            }
        }
    }

    /// Store `factory` unless the key is already populated; returns the
    /// stored value either way, so racing writers converge on one instance.
    pub fn insert_if_absent(
        &self,
        context: ContextId,
        name: Arc<str>,
        factory: ResolvedFactory,
    ) -> ResolvedFactory {
        let sub = self
            .contexts
            .entry(context)
            .or_insert_with(|| Arc::new(DashMap::new()))
            .clone();
        let stored = sub.entry(name).or_insert(factory).clone();
        stored
    }

    /// Drop every entry scoped to `context`. Returns `true` if the context
    /// had a sub-map.
    pub fn retire(&self, context: ContextId) -> bool {
        let removed = self.contexts.remove(&context).is_some();
        if removed {
            log::debug!("[resolve] retired cache sub-map for {:?}", context);
        }
        removed
    }

    /// Number of cached factories for `context`.
    #[must_use]
    pub fn entries_for(&self, context: ContextId) -> usize {
        self.contexts.get(&context).map_or(0, |sub| sub.len())
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
    }
}
