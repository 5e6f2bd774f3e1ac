//! Layer stream ordering
//!
//! The body of a DS1 file is a flat run of 32-bit words, one grid's worth
//! per layer. This module derives which layer each consecutive grid belongs
//! to from the version policy and the per-kind layer counts. The ordering is
//! load-bearing: the decode loop consumes words in exactly this order.

use crate::version::VersionPolicy;

/// Identifies the target of one grid's worth of words in the file body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerStreamType {
    /// Wall layer at the given group index
    Wall(usize),

    /// Orientation layer at the given group index
    Orientation(usize),

    /// Floor layer at the given group index
    Floor(usize),

    /// The single shadow layer
    Shadow,

    /// The single substitution layer
    Substitute,
}

/// Per-kind layer counts a schema is derived from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerCounts {
    pub walls: usize,
    pub floors: usize,
    pub shadows: usize,
    pub substitutions: usize,
}

/// Ordered schema of the word stream for the given capabilities and counts.
///
/// Files that predate explicit layer counts use a fixed five-entry schema.
/// Newer files interleave each wall with its orientation, then list all
/// floors, then the shadow and substitution layers when present.
pub fn layer_stream(policy: VersionPolicy, counts: LayerCounts) -> Vec<LayerStreamType> {
    if !policy.specifies_wall_count {
        return vec![
            LayerStreamType::Wall(0),
            LayerStreamType::Floor(0),
            LayerStreamType::Orientation(0),
            LayerStreamType::Substitute,
            LayerStreamType::Shadow,
        ];
    }

    let mut stream = Vec::with_capacity(
        counts.walls * 2 + counts.floors + counts.shadows + counts.substitutions,
    );

    for index in 0..counts.walls {
        stream.push(LayerStreamType::Wall(index));
        stream.push(LayerStreamType::Orientation(index));
    }

    for index in 0..counts.floors {
        stream.push(LayerStreamType::Floor(index));
    }

    if counts.shadows > 0 {
        stream.push(LayerStreamType::Shadow);
    }

    if counts.substitutions > 0 {
        stream.push(LayerStreamType::Substitute);
    }

    stream
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_schema_before_layer_counts() {
        let counts = LayerCounts {
            walls: 3,
            floors: 2,
            shadows: 1,
            substitutions: 1,
        };

        // counts are ignored entirely for the fixed schema
        let stream = layer_stream(VersionPolicy::of(3), counts);

        assert_eq!(
            stream,
            vec![
                LayerStreamType::Wall(0),
                LayerStreamType::Floor(0),
                LayerStreamType::Orientation(0),
                LayerStreamType::Substitute,
                LayerStreamType::Shadow,
            ]
        );
    }

    #[test]
    fn test_walls_interleave_with_orientations() {
        let counts = LayerCounts {
            walls: 2,
            floors: 1,
            shadows: 1,
            substitutions: 0,
        };

        let stream = layer_stream(VersionPolicy::of(17), counts);

        assert_eq!(
            stream,
            vec![
                LayerStreamType::Wall(0),
                LayerStreamType::Orientation(0),
                LayerStreamType::Wall(1),
                LayerStreamType::Orientation(1),
                LayerStreamType::Floor(0),
                LayerStreamType::Shadow,
            ]
        );
    }

    #[test]
    fn test_absent_kinds_are_omitted() {
        let counts = LayerCounts {
            walls: 0,
            floors: 2,
            shadows: 0,
            substitutions: 1,
        };

        let stream = layer_stream(VersionPolicy::of(18), counts);

        assert_eq!(
            stream,
            vec![
                LayerStreamType::Floor(0),
                LayerStreamType::Floor(1),
                LayerStreamType::Substitute,
            ]
        );
    }
}
