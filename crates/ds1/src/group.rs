//! Capacity-bounded ordered collections of same-kind layers

use crate::layer::Layer;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_FLOOR_LAYERS: usize = 2;
const MAX_WALL_LAYERS: usize = 4;
const MAX_ORIENTATION_LAYERS: usize = 4;
const MAX_SHADOW_LAYERS: usize = 1;
const MAX_SUBSTITUTION_LAYERS: usize = 1;

/// The kind of layers a group holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Floor,
    Wall,
    Orientation,
    Shadow,
    Substitution,
}

impl LayerKind {
    /// Maximum number of layers a group of this kind may hold
    pub const fn max_layers(self) -> usize {
        match self {
            LayerKind::Floor => MAX_FLOOR_LAYERS,
            LayerKind::Wall => MAX_WALL_LAYERS,
            LayerKind::Orientation => MAX_ORIENTATION_LAYERS,
            LayerKind::Shadow => MAX_SHADOW_LAYERS,
            LayerKind::Substitution => MAX_SUBSTITUTION_LAYERS,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Floor => "floor",
            LayerKind::Wall => "wall",
            LayerKind::Orientation => "orientation",
            LayerKind::Shadow => "shadow",
            LayerKind::Substitution => "substitution",
        };

        write!(f, "{name}")
    }
}

/// Ordered collection of layers of a single kind, never longer than the
/// kind's capacity.
///
/// Slots can transiently hold no layer; every mutation compacts the group so
/// that no empty slot survives at index 1 or above. An empty slot at index 0
/// is kept as-is — the backward compaction scan of the legacy tooling never
/// reaches it, and files in the wild rely on the resulting slot count.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    kind: LayerKind,
    width: usize,
    height: usize,
    slots: Vec<Option<Layer>>,
}

impl LayerGroup {
    /// Create an empty group whose layers will have the given dimensions
    pub fn new(kind: LayerKind, width: usize, height: usize) -> Self {
        Self {
            kind,
            width: width.max(1),
            height: height.max(1),
            slots: Vec::new(),
        }
    }

    /// The kind of layers this group holds
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Number of slots, occupied or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the group holds no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Dimensions shared by every layer in the group
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Resize every contained layer.
    ///
    /// Group dimensions normally follow the owning document; resizing a
    /// group directly leaves the document's other groups untouched.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);

        for layer in self.slots.iter_mut().flatten() {
            layer.set_size(self.width, self.height);
        }
    }

    /// Append a layer, resized to the group's dimensions. Silently ignored
    /// when the group is at its kind's capacity — legacy files cannot exceed
    /// it by construction.
    pub fn push(&mut self, mut layer: Layer) {
        self.compact();

        if self.slots.len() >= self.kind.max_layers() {
            return;
        }

        layer.set_size(self.width, self.height);
        self.slots.push(Some(layer));
    }

    /// Remove and return the last layer, or None when the group is empty
    pub fn pop(&mut self) -> Option<Layer> {
        self.compact();
        self.slots.pop().flatten()
    }

    /// Layer at `index`, or None for an invalid index or an empty slot
    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.slots.get(index)?.as_ref()
    }

    /// Mutable layer at `index`, or None for an invalid index or an empty
    /// slot
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Insert a layer, shifting a single slot. `index` is clamped to the
    /// last occupied position; at capacity the insert is ignored.
    pub fn insert(&mut self, index: usize, mut layer: Layer) {
        self.compact();

        if self.slots.len() >= self.kind.max_layers() {
            return;
        }

        layer.set_size(self.width, self.height);

        if self.slots.is_empty() {
            self.slots.push(Some(layer));
            return;
        }

        let index = index.min(self.slots.len() - 1);
        self.slots.insert(index, Some(layer));
    }

    /// Empty the slot at `index`, then compact
    pub fn delete(&mut self, index: usize) {
        if index >= self.slots.len() {
            return;
        }

        self.slots[index] = None;
        self.compact();
    }

    /// Iterate occupied layers in order
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Backward compaction scan: from the last slot down to index 1, drop
    /// the first empty slot found and rescan, until a full scan finds none.
    /// Index 0 is intentionally out of the scan's reach.
    fn compact(&mut self) {
        'scan: loop {
            for index in (1..self.slots.len()).rev() {
                if self.slots[index].is_none() {
                    self.slots.remove(index);
                    continue 'scan;
                }
            }

            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(kind: LayerKind) -> LayerGroup {
        LayerGroup::new(kind, 2, 2)
    }

    #[test]
    fn test_push_respects_capacity() {
        let mut walls = group(LayerKind::Wall);

        for _ in 0..6 {
            walls.push(Layer::new(2, 2));
        }

        assert_eq!(walls.len(), LayerKind::Wall.max_layers());
    }

    #[test]
    fn test_substitution_capacity_is_one() {
        let mut substitutions = group(LayerKind::Substitution);

        substitutions.push(Layer::new(2, 2));
        substitutions.push(Layer::new(2, 2));

        assert_eq!(substitutions.len(), 1);
    }

    #[test]
    fn test_push_resizes_to_group_dimensions() {
        let mut floors = group(LayerKind::Floor);
        floors.push(Layer::new(9, 9));

        assert_eq!(floors.get(0).unwrap().size(), (2, 2));
    }

    #[test]
    fn test_pop() {
        let mut floors = group(LayerKind::Floor);
        assert!(floors.pop().is_none());

        floors.push(Layer::new(2, 2));
        assert!(floors.pop().is_some());
        assert!(floors.is_empty());
    }

    #[test]
    fn test_get_invalid_index() {
        let mut walls = group(LayerKind::Wall);
        walls.push(Layer::new(2, 2));

        assert!(walls.get(0).is_some());
        assert!(walls.get(1).is_none());
        assert!(walls.get(99).is_none());
    }

    #[test]
    fn test_insert_clamps_to_last_index() {
        let mut walls = group(LayerKind::Wall);

        let mut a = Layer::new(2, 2);
        a.set_tile(0, 0, crate::tile::Tile { prop1: 1, ..Default::default() });
        let mut b = Layer::new(2, 2);
        b.set_tile(0, 0, crate::tile::Tile { prop1: 2, ..Default::default() });
        let mut c = Layer::new(2, 2);
        c.set_tile(0, 0, crate::tile::Tile { prop1: 3, ..Default::default() });

        walls.push(a);
        walls.push(b);

        // index clamped to the last occupied position, shifting b right
        walls.insert(9, c);

        assert_eq!(walls.len(), 3);
        assert_eq!(walls.get(1).unwrap().tile(0, 0).unwrap().prop1, 3);
        assert_eq!(walls.get(2).unwrap().tile(0, 0).unwrap().prop1, 2);
    }

    #[test]
    fn test_insert_at_capacity_is_ignored() {
        let mut shadows = group(LayerKind::Shadow);
        shadows.push(Layer::new(2, 2));
        shadows.insert(0, Layer::new(2, 2));

        assert_eq!(shadows.len(), 1);
    }

    #[test]
    fn test_delete_compacts_interior_slots() {
        let mut walls = group(LayerKind::Wall);
        for _ in 0..4 {
            walls.push(Layer::new(2, 2));
        }

        walls.delete(2);

        assert_eq!(walls.len(), 3);
        for index in 0..3 {
            assert!(walls.get(index).is_some());
        }
    }

    #[test]
    fn test_delete_slot_zero_stays_empty() {
        let mut walls = group(LayerKind::Wall);
        walls.push(Layer::new(2, 2));
        walls.push(Layer::new(2, 2));

        walls.delete(0);

        // the backward scan never reaches slot 0
        assert_eq!(walls.len(), 2);
        assert!(walls.get(0).is_none());
        assert!(walls.get(1).is_some());
    }

    #[test]
    fn test_set_size_cascades() {
        let mut floors = group(LayerKind::Floor);
        floors.push(Layer::new(2, 2));
        floors.push(Layer::new(2, 2));

        floors.set_size(5, 3);

        assert_eq!(floors.size(), (5, 3));
        for layer in floors.iter() {
            assert_eq!(layer.size(), (5, 3));
        }
    }
}
