//! Stamp cache system
//!
//! Provides caching and lazy loading of decoded stamps to avoid re-decoding
//! the same files while stitching maps together.

use crate::ds1::Ds1;
use crate::loader::StampLoader;
use crate::object::{Object, Path};
use crate::substitution::SubstitutionGroup;
use crate::tile::Tile;
use crate::Result;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of stamps to keep in cache
    pub max_stamps: usize,

    /// Maximum memory usage in bytes (approximately)
    pub max_memory_bytes: usize,

    /// Cache TTL in seconds (0 = no expiration)
    pub ttl_seconds: u64,

    /// Whether to enable automatic cache cleanup
    pub auto_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_stamps: 100,
            max_memory_bytes: 100 * 1024 * 1024, // 100 MB
            ttl_seconds: 0,
            auto_cleanup: true,
        }
    }
}

/// Cache entry with metadata
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached stamp
    stamp: Arc<Ds1>,

    /// Timestamp when this entry was last accessed
    last_accessed: u64,

    /// Timestamp when this entry was loaded
    loaded_at: u64,

    /// Approximate size in bytes
    size_bytes: usize,
}

/// Stamp cache with LRU eviction
pub struct StampCache {
    /// Cached stamps indexed by file name
    cache: DashMap<String, CacheEntry>,

    /// Path to the stamps directory
    stamps_dir: PathBuf,

    /// Cache configuration
    config: CacheConfig,

    /// Current memory usage
    memory_usage: AtomicUsize,
}

impl StampCache {
    /// Create a new stamp cache
    pub fn new<P: Into<PathBuf>>(stamps_dir: P, config: CacheConfig) -> Self {
        Self {
            cache: DashMap::new(),
            stamps_dir: stamps_dir.into(),
            config,
            memory_usage: AtomicUsize::new(0),
        }
    }

    /// Create a new stamp cache with default config
    pub fn with_defaults<P: Into<PathBuf>>(stamps_dir: P) -> Self {
        Self::new(stamps_dir, CacheConfig::default())
    }

    /// Get a stamp from cache or load it.
    ///
    /// This is the primary method for accessing stamps. An expired entry is
    /// reloaded from disk transparently.
    pub async fn get(&self, name: &str) -> Result<Arc<Ds1>> {
        if let Some(entry) = self.cache.get(name) {
            if !self.is_expired(&entry) {
                // access times are only stamped at load; refreshing them on
                // every hit would write-lock the shard
                return Ok(Arc::clone(&entry.stamp));
            }
        }

        self.load_stamp(name).await
    }

    /// Load a stamp from disk and cache it
    async fn load_stamp(&self, name: &str) -> Result<Arc<Ds1>> {
        let path = self.stamps_dir.join(name);

        let stamp = StampLoader::load_file(&path)?;
        let size_bytes = Self::estimate_size(&stamp);

        if self.config.auto_cleanup {
            self.cleanup_if_needed().await;
        }

        let now = Self::current_time();
        let entry = CacheEntry {
            stamp: Arc::new(stamp),
            last_accessed: now,
            loaded_at: now,
            size_bytes,
        };

        let stamp_arc = Arc::clone(&entry.stamp);

        // replacing an expired entry gives back its accounted memory
        if let Some(previous) = self.cache.insert(name.to_string(), entry) {
            self.memory_usage
                .fetch_sub(previous.size_bytes, Ordering::Relaxed);
        }
        self.memory_usage.fetch_add(size_bytes, Ordering::Relaxed);

        Ok(stamp_arc)
    }

    /// Reload a stamp from disk (refresh cache)
    pub async fn reload(&self, name: &str) -> Result<Arc<Ds1>> {
        self.remove(name);
        self.load_stamp(name).await
    }

    /// Remove a stamp from cache
    pub fn remove(&self, name: &str) {
        if let Some((_, entry)) = self.cache.remove(name) {
            self.memory_usage
                .fetch_sub(entry.size_bytes, Ordering::Relaxed);
        }
    }

    /// Clear all cached stamps
    pub fn clear(&self) {
        self.cache.clear();
        self.memory_usage.store(0, Ordering::Relaxed);
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut total_memory = 0;
        let mut oldest_access = u64::MAX;
        let mut newest_access = 0;

        for entry in self.cache.iter() {
            total_memory += entry.size_bytes;
            oldest_access = oldest_access.min(entry.last_accessed);
            newest_access = newest_access.max(entry.last_accessed);
        }

        CacheStats {
            num_stamps: self.cache.len(),
            total_memory_bytes: total_memory,
            oldest_access_secs: oldest_access,
            newest_access_secs: newest_access,
        }
    }

    /// Preload stamps into cache
    pub async fn preload(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.get(name).await?;
        }
        Ok(())
    }

    /// Cleanup old/unused stamps if needed
    async fn cleanup_if_needed(&self) {
        let needs_cleanup = self.cache.len() >= self.config.max_stamps
            || self.memory_usage.load(Ordering::Relaxed) >= self.config.max_memory_bytes;

        if !needs_cleanup {
            return;
        }

        // collect and sort by last access, oldest first
        let mut entries: Vec<(String, u64)> = self
            .cache
            .iter()
            .map(|entry| (entry.key().clone(), entry.last_accessed))
            .collect();

        entries.sort_by_key(|&(_, accessed)| accessed);

        for (name, _) in entries {
            if self.cache.len() < self.config.max_stamps
                && self.memory_usage.load(Ordering::Relaxed) < self.config.max_memory_bytes
            {
                break;
            }

            self.remove(&name);
        }
    }

    /// Check if a cache entry has expired
    fn is_expired(&self, entry: &CacheEntry) -> bool {
        if self.config.ttl_seconds == 0 {
            return false;
        }

        let now = Self::current_time();
        now.saturating_sub(entry.loaded_at) > self.config.ttl_seconds
    }

    /// Get current time as seconds since UNIX epoch
    fn current_time() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Estimate memory size of a stamp
    fn estimate_size(stamp: &Ds1) -> usize {
        let mut size = std::mem::size_of::<Ds1>();

        let tiles_per_layer = stamp.width() * stamp.height();
        let layer_count = stamp.wall_layer_count()
            + stamp.orientation_layer_count()
            + stamp.floor_layer_count()
            + stamp.shadow_layer_count()
            + stamp.substitution_layer_count();
        size += layer_count * tiles_per_layer * std::mem::size_of::<Tile>();

        size += stamp.objects().len() * std::mem::size_of::<Object>();
        for object in stamp.objects() {
            size += object.paths.len() * std::mem::size_of::<Path>();
        }

        size += stamp.substitution_groups().len() * std::mem::size_of::<SubstitutionGroup>();
        size += stamp.files().iter().map(|f| f.len()).sum::<usize>();

        size
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of stamps in cache
    pub num_stamps: usize,

    /// Total memory usage in bytes
    pub total_memory_bytes: usize,

    /// Oldest access time (seconds since epoch)
    pub oldest_access_secs: u64,

    /// Newest access time (seconds since epoch)
    pub newest_access_secs: u64,
}
