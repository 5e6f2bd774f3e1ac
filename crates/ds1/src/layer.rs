//! A single rectangular grid of tile records

use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// One 2D grid of tile records, row-major (a row spans x at a fixed y).
///
/// Every row has identical length, and a layer is never smaller than 1x1;
/// the legacy tooling never persists a zero-dimension grid, so constructors
/// and resizes clamp to that minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    tiles: Vec<Vec<Tile>>,
}

impl Layer {
    /// Create a layer of zero-valued tiles
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));

        Self {
            tiles: vec![vec![Tile::default(); width]; height],
        }
    }

    /// Width of the grid in tiles
    pub fn width(&self) -> usize {
        self.tiles[0].len()
    }

    /// Height of the grid in tiles
    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    /// Size of the grid as (width, height)
    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Resize the grid, preserving tiles at overlapping coordinates and
    /// filling new cells with zero-valued tiles
    pub fn set_size(&mut self, width: usize, height: usize) {
        let (width, height) = (width.max(1), height.max(1));

        for row in &mut self.tiles {
            row.resize(width, Tile::default());
        }

        self.tiles
            .resize_with(height, || vec![Tile::default(); width]);
    }

    /// Resize the grid's width only
    pub fn set_width(&mut self, width: usize) {
        let height = self.height();
        self.set_size(width, height);
    }

    /// Resize the grid's height only
    pub fn set_height(&mut self, height: usize) {
        let width = self.width();
        self.set_size(width, height);
    }

    /// Tile at (x, y), or None when out of bounds
    #[inline]
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles.get(y)?.get(x)
    }

    /// Mutable tile at (x, y), or None when out of bounds
    #[inline]
    pub fn tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(y)?.get_mut(x)
    }

    /// Replace the tile at (x, y). Out-of-bounds coordinates are ignored;
    /// setting a tile never resizes the grid.
    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        if let Some(slot) = self.tile_mut(x, y) {
            *slot = tile;
        }
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_normalizes_to_1x1() {
        let layer = Layer::new(0, 0);
        assert_eq!(layer.size(), (1, 1));

        let mut layer = Layer::new(3, 3);
        layer.set_size(0, 0);
        assert_eq!(layer.size(), (1, 1));
    }

    #[test]
    fn test_set_and_get_tile() {
        let mut layer = Layer::new(4, 4);

        let tile = Tile {
            prop1: 7,
            style: 3,
            ..Tile::default()
        };
        layer.set_tile(2, 1, tile);

        assert_eq!(layer.tile(2, 1), Some(&tile));
        assert_eq!(layer.tile(1, 2), Some(&Tile::default()));
    }

    #[test]
    fn test_out_of_range_access_is_tolerant() {
        let mut layer = Layer::new(2, 2);

        assert!(layer.tile(2, 0).is_none());
        assert!(layer.tile(0, 2).is_none());

        // no resize side effect
        layer.set_tile(5, 5, Tile { prop1: 1, ..Tile::default() });
        assert_eq!(layer.size(), (2, 2));
    }

    #[test]
    fn test_resize_preserves_overlap() {
        let mut layer = Layer::new(3, 3);
        let marked = Tile { prop1: 9, ..Tile::default() };
        layer.set_tile(1, 1, marked);
        layer.set_tile(2, 2, marked);

        layer.set_size(2, 2);
        assert_eq!(layer.size(), (2, 2));
        assert_eq!(layer.tile(1, 1), Some(&marked));

        layer.set_size(4, 4);
        assert_eq!(layer.tile(1, 1), Some(&marked));
        // cells dropped by the shrink do not come back
        assert_eq!(layer.tile(2, 2), Some(&Tile::default()));
        assert_eq!(layer.tile(3, 3), Some(&Tile::default()));
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut layer = Layer::new(5, 2);
        layer.set_tile(4, 1, Tile { sequence: 2, ..Tile::default() });

        layer.set_size(3, 6);
        let once = layer.clone();
        layer.set_size(3, 6);

        assert_eq!(layer, once);
    }
}
