use std::{
    collections::HashMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    drawable::{Drawable, DrawableId},
    foundation::error::{HandanimError, HandanimResult},
    ops::sequence::OpSequence,
    style::StyleContext,
};

type CacheKey = (DrawableId, u64);

/// Counters describing how a [`DrawCache`] was used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Read-through memo of drawn base geometry, keyed by drawable id and style fingerprint.
///
/// Shareable between threads. When two threads draw the same key concurrently the first
/// insertion wins and both callers receive it; drawing is pure, so the loser's result is
/// identical anyway.
#[derive(Debug, Default)]
pub struct DrawCache {
    entries: RwLock<HashMap<CacheKey, Arc<OpSequence>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DrawCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached geometry of `drawable` under `ctx`, drawing and storing it on a miss.
    pub fn get_or_draw(
        &self,
        drawable: &Drawable,
        ctx: &StyleContext,
    ) -> HandanimResult<Arc<OpSequence>> {
        let key = (drawable.id(), ctx.fingerprint());
        if let Some(hit) = self.get_key(&key)? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id = %drawable.id(), label = ?drawable.label(), "draw cache miss");
        let drawn = Arc::new(drawable.draw(ctx)?);

        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(Arc::clone(entries.entry(key).or_insert(drawn)))
    }

    /// Cached geometry of `id` under `ctx`, without drawing.
    pub fn get(
        &self,
        id: DrawableId,
        ctx: &StyleContext,
    ) -> HandanimResult<Option<Arc<OpSequence>>> {
        self.get_key(&(id, ctx.fingerprint()))
    }

    fn get_key(&self, key: &CacheKey) -> HandanimResult<Option<Arc<OpSequence>>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) -> HandanimResult<()> {
        self.entries.write().map_err(poisoned)?.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> HandanimError {
    HandanimError::evaluation("draw cache lock poisoned")
}

#[cfg(test)]
#[path = "../../tests/unit/scene/cache.rs"]
mod tests;
