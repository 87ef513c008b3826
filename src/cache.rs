//! Read-through cache for stored trees.
//!
//! Entries carry a wall-clock expiry. A cache only ever mirrors the durable
//! store, so losing it (process restart, poisoned lock) costs a re-read and
//! nothing else.

use crate::tree::BonsaiTree;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Cache seam used by [`TreeStore`](crate::store::TreeStore).
///
/// Implementations must be safe to share across threads; one cache may back
/// several stores in the same process.
pub trait TreeCache: Send + Sync {
    /// The cached tree for `key` if its entry has not expired at `now`
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<BonsaiTree>;

    /// Insert or replace the entry for `key`
    fn put(&self, key: &str, tree: BonsaiTree, expires_at: DateTime<Utc>);

    /// Drop the entry for `key`, returning whether one was present
    fn remove(&self, key: &str) -> bool;
}

#[derive(Debug, Clone)]
struct Entry {
    tree: BonsaiTree,
    expires_at: DateTime<Utc>,
}

/// In-process cache backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TreeCache for MemoryCache {
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<BonsaiTree> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.tree.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // expired: evict so the next read goes to the durable store
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        None
    }

    fn put(&self, key: &str, tree: BonsaiTree, expires_at: DateTime<Utc>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), Entry { tree, expires_at });
    }

    fn remove(&self, key: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }
}
