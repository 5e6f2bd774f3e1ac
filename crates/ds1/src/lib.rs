//! # d2stamp DS1 Codec
//!
//! This crate decodes the DS1 map "stamp" binary format into an editable
//! layered grid model and re-encodes it, reserved fields included, so an
//! untouched decode/encode cycle reproduces the input byte-for-byte.
//!
//! ## Features
//! - All historical format revisions, gated through one capability table
//! - Bit-packed tile records (wall, floor, shadow, substitution variants)
//! - Capacity-bounded layer groups with compaction on delete
//! - Object list with coordinate-matched NPC waypoints
//! - Substitution groups and reserved-field round-tripping
//! - Stamp loading, caching, and management for map assembly
//!
//! ## File Layout
//!
//! All integers are little-endian. After the version/size header and its
//! version-gated fields comes the file reference list, then the layer word
//! streams (one 32-bit word per cell per layer, ordered by the layer stream
//! schema), then objects, substitution groups, and NPC paths.

pub mod cache;
pub mod ds1;
pub mod error;
pub mod group;
pub mod layer;
pub mod loader;
pub mod manager;
pub mod object;
pub mod schema;
pub mod substitution;
pub mod tile;
pub mod version;

pub use cache::{CacheConfig, CacheStats, StampCache};
pub use ds1::{Ds1, DEFAULT_VERSION};
pub use error::{Result, StampError};
pub use group::{LayerGroup, LayerKind};
pub use layer::Layer;
pub use loader::StampLoader;
pub use manager::StampManager;
pub use object::{Object, Path};
pub use schema::{layer_stream, LayerCounts, LayerStreamType};
pub use substitution::SubstitutionGroup;
pub use tile::Tile;
pub use version::VersionPolicy;
