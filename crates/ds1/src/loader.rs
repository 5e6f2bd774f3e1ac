//! Stamp file loading

use crate::ds1::Ds1;
use crate::error::{Result, StampError};
use std::fs;
use std::path::Path;

/// Loads DS1 stamp files from disk
pub struct StampLoader;

impl StampLoader {
    /// Load and decode a stamp file
    ///
    /// # Arguments
    /// * `path` - Path to a `.ds1` file
    ///
    /// # Returns
    /// The decoded document
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Ds1> {
        let path = path.as_ref();

        let data = fs::read(path).map_err(|_| StampError::NotFound(path.display().to_string()))?;

        let stamp = Ds1::decode(&data)?;

        tracing::debug!(
            "loaded stamp '{}': version {}, {}x{} tiles",
            path.display(),
            stamp.version(),
            stamp.width(),
            stamp.height()
        );

        Ok(stamp)
    }
}
