//! Substitution group region descriptors

use serde::{Deserialize, Serialize};

/// A rectangular region descriptor, independent of the per-cell
/// substitution layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionGroup {
    /// Region origin X, in tiles
    pub tile_x: i32,

    /// Region origin Y, in tiles
    pub tile_y: i32,

    /// Region width, in tiles
    pub width_in_tiles: i32,

    /// Region height, in tiles
    pub height_in_tiles: i32,

    /// Reserved, round-trips as read
    pub unknown: i32,
}
