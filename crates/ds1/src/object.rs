//! Spawned objects and their NPC waypoints

use serde::{Deserialize, Serialize};

/// A waypoint on an object's patrol path.
///
/// The `action` code only exists on disk in format versions 15 and newer;
/// older files leave it zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    /// Waypoint X coordinate
    pub x: i32,

    /// Waypoint Y coordinate
    pub y: i32,

    /// Action code performed at the waypoint
    pub action: i32,
}

/// A world-placed entity reference
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    /// Which catalog table the id refers to
    pub object_type: i32,

    /// Catalog reference
    pub id: i32,

    /// Tile X coordinate
    pub x: i32,

    /// Tile Y coordinate
    pub y: i32,

    /// Spawn flags
    pub flags: i32,

    /// NPC waypoints bound to this object by coordinate match
    pub paths: Vec<Path>,
}
