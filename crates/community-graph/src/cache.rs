//! Stale-on-error result cache.
//!
//! One slot per [`QueryName`], holding the last successfully mapped payload.
//! Slots are written only on success and read only when a fresh resolution
//! fails. Nothing expires; staleness is unbounded.

use crate::store::QueryName;
use chrono::{DateTime, Utc};
use log::trace;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

struct Slot {
    payload: Arc<dyn Any + Send + Sync>,
    stored_at: DateTime<Utc>,
}

/// A last-known-good payload and when it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResult<T> {
    /// The payload
    pub data: T,
    /// When the payload was stored
    pub stored_at: DateTime<Utc>,
}

/// Process-wide cache with one slot per query.
///
/// Writers replace whole payloads, so concurrent writers to the same slot
/// resolve as last-write-wins.
#[derive(Default)]
pub struct ResultCache {
    slots: RwLock<HashMap<QueryName, Slot>>,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the payload for `name`.
    pub fn store<T>(&self, name: QueryName, data: T)
    where
        T: Send + Sync + 'static,
    {
        let slot = Slot {
            payload: Arc::new(data),
            stored_at: Utc::now(),
        };
        self.slots.write().insert(name, slot);
        trace!("Cached result for {name}");
    }

    /// The last payload stored for `name`, if any and if it has type `T`.
    pub fn load<T>(&self, name: QueryName) -> Option<CachedResult<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        let slots = self.slots.read();
        let slot = slots.get(&name)?;
        let data = slot.payload.downcast_ref::<T>()?.clone();
        Some(CachedResult {
            data,
            stored_at: slot.stored_at,
        })
    }

    /// Whether a payload exists for `name`.
    pub fn contains(&self, name: QueryName) -> bool {
        self.slots.read().contains_key(&name)
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Check if no slot has been filled yet.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}
