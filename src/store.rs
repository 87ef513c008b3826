//! Durable tree storage with a read-through cache.
//!
//! Each tree is one JSON record at `<root>/<key>.json`, where `key` is the
//! hex SHA-256 of the caller's configuration identifier. Every write goes to
//! its own temporary file that is renamed over the record, so readers never
//! see a half-written tree. Concurrent writers to the same identifier race;
//! the last rename wins.
//!
//! # Cache
//!
//! `store` and `get` refresh the cache entry for the key with the store's
//! TTL. `exists` and `all` consult only the durable records: a cache entry
//! says nothing about what is on disk once the record is gone.

use crate::cache::{MemoryCache, TreeCache};
use crate::config::EngineConfig;
use crate::error::{BonsaiError, Result};
use crate::tree::BonsaiTree;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const RECORD_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = ".tmp";

/// Keyed, durable storage for [`BonsaiTree`] snapshots
#[derive(Clone)]
pub struct TreeStore {
    root: PathBuf,
    cache: Arc<dyn TreeCache>,
    ttl: Duration,
}

impl std::fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeStore")
            .field("root", &self.root)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TreeStore {
    /// Open (creating if needed) a store rooted at `root` with a private
    /// in-memory cache and the default TTL.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| BonsaiError::io(&root, e))?;
        Ok(Self {
            root,
            cache: Arc::new(MemoryCache::new()),
            ttl: Duration::hours(crate::config::DEFAULT_CACHE_TTL_HOURS as i64),
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::open(&config.store_dir)?.with_ttl(config.cache_ttl()))
    }

    /// Share a cache with other stores in the process.
    pub fn with_cache(mut self, cache: Arc<dyn TreeCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage key for a configuration identifier
    pub fn key_for(config_id: &str) -> String {
        hex::encode(Sha256::digest(config_id.as_bytes()))
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{RECORD_EXTENSION}"))
    }

    /// Persist `tree` under `config_id`, replacing any existing record.
    pub fn store(&self, config_id: &str, tree: &BonsaiTree) -> Result<()> {
        self.store_at(config_id, tree, Utc::now())
    }

    pub fn store_at(&self, config_id: &str, tree: &BonsaiTree, now: DateTime<Utc>) -> Result<()> {
        let key = Self::key_for(config_id);
        let json = serde_json::to_vec_pretty(tree)?;

        // one temp file per write; a failed write drops (and removes) it
        let path = self.record_path(&key);
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(TMP_SUFFIX)
            .tempfile_in(&self.root)
            .map_err(|e| BonsaiError::io(&self.root, e))?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(&json).map_err(|e| BonsaiError::io(&tmp_path, e))?;
        tmp.persist(&path).map_err(|e| BonsaiError::io(&path, e.error))?;

        self.cache.put(&key, tree.clone(), now + self.ttl);
        info!(%config_id, %key, "stored tree");
        Ok(())
    }

    /// The tree stored under `config_id`, or `None` if there is none.
    pub fn get(&self, config_id: &str) -> Result<Option<BonsaiTree>> {
        self.get_at(config_id, Utc::now())
    }

    pub fn get_at(&self, config_id: &str, now: DateTime<Utc>) -> Result<Option<BonsaiTree>> {
        let key = Self::key_for(config_id);
        if let Some(tree) = self.cache.get(&key, now) {
            debug!(%key, "cache hit");
            return Ok(Some(tree));
        }
        debug!(%key, "cache miss");

        let Some(tree) = self.read_record(&key)? else {
            return Ok(None);
        };
        self.cache.put(&key, tree.clone(), now + self.ttl);
        Ok(Some(tree))
    }

    /// Whether a durable record exists for `config_id`
    pub fn exists(&self, config_id: &str) -> Result<bool> {
        let path = self.record_path(&Self::key_for(config_id));
        path.try_exists().map_err(|e| BonsaiError::io(&path, e))
    }

    /// Fail with [`BonsaiError::AlreadyStored`] if a record exists for `config_id`.
    pub fn ensure_vacant(&self, config_id: &str) -> Result<()> {
        if self.exists(config_id)? {
            return Err(BonsaiError::AlreadyStored(config_id.to_string()));
        }
        Ok(())
    }

    /// Every durable record as `(key, tree)`, ordered by key.
    ///
    /// Bypasses the cache in both directions.
    pub fn all(&self) -> Result<Vec<(String, BonsaiTree)>> {
        let entries = fs::read_dir(&self.root).map_err(|e| BonsaiError::io(&self.root, e))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BonsaiError::io(&self.root, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) {
                if is_key(key) {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort_unstable();

        let mut trees = Vec::with_capacity(keys.len());
        for key in keys {
            // a record deleted mid-listing is simply skipped
            if let Some(tree) = self.read_record(&key)? {
                trees.push((key, tree));
            }
        }
        Ok(trees)
    }

    /// Remove the cache entry and durable record for `config_id`.
    ///
    /// Returns whether a durable record was removed.
    pub fn delete(&self, config_id: &str) -> Result<bool> {
        let key = Self::key_for(config_id);
        self.cache.remove(&key);

        let path = self.record_path(&key);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(%config_id, %key, "deleted tree");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BonsaiError::io(&path, e)),
        }
    }

    fn read_record(&self, key: &str) -> Result<Option<BonsaiTree>> {
        let path = self.record_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BonsaiError::io(&path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| BonsaiError::corrupt(key, &path, e))
    }
}

/// Hex SHA-256 digest, as produced by [`TreeStore::key_for`]
fn is_key(name: &str) -> bool {
    name.len() == 64 && name.bytes().all(|b| b.is_ascii_hexdigit())
}
