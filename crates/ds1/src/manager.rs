//! Stamp manager for runtime stamp handling
//!
//! Provides a simple interface for fetching stamps during map assembly.

use crate::cache::{CacheStats, StampCache};
use crate::ds1::{Ds1, DEFAULT_VERSION};
use crate::layer::Layer;
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Dimensions of the fallback stamp, in tiles
const DEFAULT_STAMP_SIZE: usize = 8;

/// Stamp manager
///
/// Provides a high-level interface for stamp loading and management.
pub struct StampManager {
    /// Stamp cache for decoded files
    cache: StampCache,

    /// Default stamps directory
    stamps_dir: PathBuf,
}

impl StampManager {
    /// Create a new stamp manager
    ///
    /// # Arguments
    /// * `stamps_dir` - Directory containing `.ds1` files
    pub fn new<P: Into<PathBuf>>(stamps_dir: P) -> Self {
        let stamps_dir = stamps_dir.into();
        let cache = StampCache::with_defaults(&stamps_dir);

        Self { cache, stamps_dir }
    }

    /// Get or load a stamp by file name.
    ///
    /// # Purpose
    /// Retrieves a stamp from cache or loads it from disk. If the file
    /// doesn't exist, returns a default stamp instead of failing.
    ///
    /// # Arguments
    /// * `name` - Stamp file name (e.g., "townwest.ds1")
    pub async fn get_stamp(&self, name: &str) -> Result<Arc<Ds1>> {
        match self.cache.get(name).await {
            Ok(stamp) => Ok(stamp),
            Err(_) => {
                tracing::warn!("Stamp '{}' not found, using default stamp", name);
                Ok(Arc::new(Self::default_stamp()))
            }
        }
    }

    /// Minimal authored stamp used when a file is missing: one floor layer
    /// and one shadow layer of zero-valued tiles.
    pub fn default_stamp() -> Ds1 {
        let mut stamp = Ds1::new(DEFAULT_VERSION, DEFAULT_STAMP_SIZE, DEFAULT_STAMP_SIZE);

        stamp
            .floors_mut()
            .push(Layer::new(DEFAULT_STAMP_SIZE, DEFAULT_STAMP_SIZE));
        stamp
            .shadows_mut()
            .push(Layer::new(DEFAULT_STAMP_SIZE, DEFAULT_STAMP_SIZE));

        stamp
    }

    /// Get the stamps directory
    pub fn stamps_dir(&self) -> &PathBuf {
        &self.stamps_dir
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Clear the stamp cache
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Preload stamps into cache
    pub async fn preload(&self, names: &[&str]) -> Result<()> {
        self.cache.preload(names).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manager_falls_back_to_default_stamp() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let manager = StampManager::new(temp_dir.path());

        let stamp = manager.get_stamp("nonexistent.ds1").await.unwrap();

        assert_eq!(stamp.version(), DEFAULT_VERSION);
        assert_eq!(stamp.size(), (DEFAULT_STAMP_SIZE, DEFAULT_STAMP_SIZE));
        assert_eq!(stamp.floor_layer_count(), 1);
        assert_eq!(stamp.shadow_layer_count(), 1);
    }

    #[tokio::test]
    async fn test_manager_loads_real_stamp() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        let mut doc = Ds1::new(18, 2, 2);
        doc.floors_mut().push(Layer::new(2, 2));
        doc.shadows_mut().push(Layer::new(2, 2));
        std::fs::write(temp_dir.path().join("real.ds1"), doc.encode()).unwrap();

        let manager = StampManager::new(temp_dir.path());
        let stamp = manager.get_stamp("real.ds1").await.unwrap();

        assert_eq!(stamp.size(), (2, 2));
        assert_eq!(manager.stats().num_stamps, 1);

        manager.clear_cache();
        assert_eq!(manager.stats().num_stamps, 0);
    }

    #[test]
    fn test_default_stamp_encodes() {
        let stamp = StampManager::default_stamp();
        let decoded = Ds1::decode(&stamp.encode()).unwrap();

        assert_eq!(decoded.size(), stamp.size());
        assert_eq!(decoded.floor_layer_count(), 1);
    }
}
