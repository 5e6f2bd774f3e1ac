//! Tile records and the packed-word codec
//!
//! Every cell of a DS1 layer occupies one 32-bit word on disk. Wall, floor,
//! and shadow words share a common six-field bit layout; orientation words
//! carry a type code and a filler byte; substitution words are opaque.
//! Reserved sub-fields must survive a decode/encode cycle untouched.

use d2stamp_stream::StreamWriter;
use serde::{Deserialize, Serialize};

const PROP1_MASK: u32 = 0x0000_00FF;
const PROP1_OFFSET: u32 = 0;
const PROP1_LENGTH: u32 = 8;

const SEQUENCE_MASK: u32 = 0x0000_3F00;
const SEQUENCE_OFFSET: u32 = 8;
const SEQUENCE_LENGTH: u32 = 6;

const UNKNOWN1_MASK: u32 = 0x000F_C000;
const UNKNOWN1_OFFSET: u32 = 14;
const UNKNOWN1_LENGTH: u32 = 6;

const STYLE_MASK: u32 = 0x03F0_0000;
const STYLE_OFFSET: u32 = 20;
const STYLE_LENGTH: u32 = 6;

const UNKNOWN2_MASK: u32 = 0x7C00_0000;
const UNKNOWN2_OFFSET: u32 = 26;
const UNKNOWN2_LENGTH: u32 = 5;

const HIDDEN_MASK: u32 = 0x8000_0000;
const HIDDEN_OFFSET: u32 = 31;
const HIDDEN_LENGTH: u32 = 1;

const ORIENTATION_TYPE_MASK: u32 = 0x0000_00FF;
const ORIENTATION_ZERO_MASK: u32 = 0xFFFF_FF00;
const ORIENTATION_ZERO_OFFSET: u32 = 8;

/// Remap applied to wall-orientation codes in files older than version 7.
/// Codes past the end of the table pass through unchanged. The values are a
/// historical quirk of the format and cannot be derived.
const DIRECTION_LOOKUP: [u8; 25] = [
    0x00, 0x01, 0x02, 0x01, 0x02, 0x03, 0x03, 0x05, 0x05, 0x06, 0x06, 0x07, 0x07, 0x08, 0x09,
    0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x14,
];

/// One cell-level record of a DS1 layer.
///
/// The packed fields (`prop1` through `hidden`) are the wire representation
/// shared by wall, floor, and shadow cells. Orientation cells use
/// `orientation`/`zero`, substitution cells keep their whole word in
/// `substitution`. `animated`, `random_index`, and `y_adjust` are
/// engine-assigned state that never reaches the wire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Material / sub-tile index (8 bits)
    pub prop1: u8,

    /// Frame sequence (6 bits)
    pub sequence: u8,

    /// Reserved (6 bits), round-trips as read
    pub unknown1: u8,

    /// Tile style (6 bits)
    pub style: u8,

    /// Reserved (5 bits), round-trips as read
    pub unknown2: u8,

    /// Raw hidden bit (1 bit)
    pub hidden: u8,

    /// Whether a floor/shadow cell animates
    pub animated: bool,

    /// Engine-assigned variation index
    pub random_index: u8,

    /// Engine-assigned vertical draw offset
    pub y_adjust: i32,

    /// Wall-orientation type code
    pub orientation: u8,

    /// Filler byte following the orientation code
    pub zero: u8,

    /// Opaque substitution-layer word
    pub substitution: u32,
}

impl Tile {
    /// Whether the cell is hidden
    pub fn hidden(&self) -> bool {
        self.hidden > 0
    }

    /// Unpack the six common sub-fields from a wall, floor, or shadow word
    pub fn decode(&mut self, word: u32) {
        self.prop1 = ((word & PROP1_MASK) >> PROP1_OFFSET) as u8;
        self.sequence = ((word & SEQUENCE_MASK) >> SEQUENCE_OFFSET) as u8;
        self.unknown1 = ((word & UNKNOWN1_MASK) >> UNKNOWN1_OFFSET) as u8;
        self.style = ((word & STYLE_MASK) >> STYLE_OFFSET) as u8;
        self.unknown2 = ((word & UNKNOWN2_MASK) >> UNKNOWN2_OFFSET) as u8;
        self.hidden = ((word & HIDDEN_MASK) >> HIDDEN_OFFSET) as u8;
    }

    /// Pack the six common sub-fields into the writer's bit stream.
    ///
    /// Out-of-range field values are masked to their wire width, never
    /// rejected.
    pub fn encode(&self, writer: &mut StreamWriter) {
        writer.push_bits(u32::from(self.prop1), PROP1_LENGTH);
        writer.push_bits(u32::from(self.sequence), SEQUENCE_LENGTH);
        writer.push_bits(u32::from(self.unknown1), UNKNOWN1_LENGTH);
        writer.push_bits(u32::from(self.style), STYLE_LENGTH);
        writer.push_bits(u32::from(self.unknown2), UNKNOWN2_LENGTH);
        writer.push_bits(u32::from(self.hidden), HIDDEN_LENGTH);
    }

    /// Unpack an orientation word.
    ///
    /// With `remap_legacy` set (files older than version 7) the type code is
    /// run through [`DIRECTION_LOOKUP`]; codes beyond the table pass through.
    pub fn decode_orientation(&mut self, word: u32, remap_legacy: bool) {
        let mut code = (word & ORIENTATION_TYPE_MASK) as usize;

        if remap_legacy && code < DIRECTION_LOOKUP.len() {
            code = DIRECTION_LOOKUP[code] as usize;
        }

        self.orientation = code as u8;
        self.zero = ((word & ORIENTATION_ZERO_MASK) >> ORIENTATION_ZERO_OFFSET) as u8;
    }

    /// Repack the orientation word
    pub fn orientation_word(&self) -> u32 {
        u32::from(self.orientation) | (u32::from(self.zero) << ORIENTATION_ZERO_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_of(tile: &Tile) -> u32 {
        let mut writer = StreamWriter::new();
        tile.encode(&mut writer);
        let bytes = writer.into_bytes();
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[test]
    fn test_decode_splits_sub_fields() {
        let word: u32 = 0xAB | (21 << 8) | (42 << 14) | (0x3F << 20) | (0x1F << 26) | (1 << 31);

        let mut tile = Tile::default();
        tile.decode(word);

        assert_eq!(tile.prop1, 0xAB);
        assert_eq!(tile.sequence, 21);
        assert_eq!(tile.unknown1, 42);
        assert_eq!(tile.style, 0x3F);
        assert_eq!(tile.unknown2, 0x1F);
        assert_eq!(tile.hidden, 1);
        assert!(tile.hidden());
    }

    #[test]
    fn test_encode_inverts_decode() {
        // reserved fields included; every bit of the word must come back
        for &word in &[0u32, 0x8123_4567, 0xFFFF_FFFF, 0x0004_0200] {
            let mut tile = Tile::default();
            tile.decode(word);
            assert_eq!(word_of(&tile), word);
        }
    }

    #[test]
    fn test_encode_masks_out_of_range_values() {
        let tile = Tile {
            sequence: 0xFF,
            ..Tile::default()
        };

        // the 6-bit sequence field keeps only its low bits
        assert_eq!(word_of(&tile), 0x3F << 8);
    }

    #[test]
    fn test_orientation_remap_pre_v7() {
        let mut tile = Tile::default();

        tile.decode_orientation(0x0000_1503, true);
        assert_eq!(tile.orientation, 0x01);
        assert_eq!(tile.zero, 0x15);

        tile.decode_orientation(24, true);
        assert_eq!(tile.orientation, 0x14);

        // codes beyond the table pass through unchanged
        tile.decode_orientation(25, true);
        assert_eq!(tile.orientation, 25);
    }

    #[test]
    fn test_orientation_no_remap_from_v7() {
        let mut tile = Tile::default();
        tile.decode_orientation(0x0000_0003, false);

        assert_eq!(tile.orientation, 3);
        assert_eq!(tile.orientation_word(), 3);
    }

    #[test]
    fn test_orientation_word_round_trip() {
        let mut tile = Tile::default();
        tile.decode_orientation(0x0000_2A10, false);

        assert_eq!(tile.orientation_word(), 0x0000_2A10);
    }
}
