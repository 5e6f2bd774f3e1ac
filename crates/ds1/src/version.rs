//! Version capability policy
//!
//! The DS1 format went through more than fifteen revisions, each adding or
//! dropping header fields and trailing sections. Every conditional read and
//! write in the codec consults this table instead of comparing version
//! numbers inline, so the policy can be tested on its own.

/// Which optional fields and sections a given format version carries.
///
/// The mapping is total: versions newer than the last known revision decode
/// with the full capability set rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPolicy {
    /// Eight reserved header bytes (versions 9 through 13)
    pub has_reserved_header_bytes: bool,

    /// Reserved dword ahead of the substitution-group count (18+)
    pub has_trailing_reserved_dword: bool,

    /// Act number stored in the header (8+)
    pub specifies_act: bool,

    /// Substitution type stored in the header (10+)
    pub specifies_substitution_type: bool,

    /// Wall-layer count stored after the file list (4+); older files use a
    /// fixed layer stream instead
    pub specifies_wall_count: bool,

    /// Floor-layer count stored after the wall count (16+); older files
    /// carry exactly one floor layer
    pub specifies_floor_count: bool,

    /// File reference list present (3+)
    pub has_file_list: bool,

    /// Object list present (2+)
    pub has_objects: bool,

    /// Substitution-group section present (12+, further gated by the
    /// substitution type)
    pub has_substitutions: bool,

    /// NPC path section present (14+)
    pub has_npc_paths: bool,

    /// Per-waypoint action dword (15+)
    pub has_path_actions: bool,

    /// Wall-orientation codes remapped through the legacy direction table
    /// (anything older than 7)
    pub remaps_wall_orientations: bool,
}

impl VersionPolicy {
    /// Capabilities of format `version`
    pub fn of(version: i32) -> Self {
        Self {
            has_reserved_header_bytes: (9..=13).contains(&version),
            has_trailing_reserved_dword: version >= 18,
            specifies_act: version >= 8,
            specifies_substitution_type: version >= 10,
            specifies_wall_count: version >= 4,
            specifies_floor_count: version >= 16,
            has_file_list: version >= 3,
            has_objects: version >= 2,
            has_substitutions: version >= 12,
            has_npc_paths: version >= 14,
            has_path_actions: version >= 15,
            remaps_wall_orientations: version < 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_1_has_nothing_optional() {
        let policy = VersionPolicy::of(1);

        assert!(!policy.has_objects);
        assert!(!policy.has_file_list);
        assert!(!policy.specifies_act);
        assert!(!policy.specifies_wall_count);
        assert!(policy.remaps_wall_orientations);
    }

    #[test]
    fn test_version_3_gates() {
        let policy = VersionPolicy::of(3);

        assert!(policy.has_file_list);
        assert!(policy.has_objects);
        assert!(!policy.specifies_act);
        assert!(!policy.specifies_substitution_type);
        assert!(!policy.specifies_wall_count);
        assert!(!policy.has_substitutions);
    }

    #[test]
    fn test_reserved_header_byte_window() {
        assert!(!VersionPolicy::of(8).has_reserved_header_bytes);
        assert!(VersionPolicy::of(9).has_reserved_header_bytes);
        assert!(VersionPolicy::of(13).has_reserved_header_bytes);
        assert!(!VersionPolicy::of(14).has_reserved_header_bytes);
    }

    #[test]
    fn test_orientation_remap_window() {
        assert!(VersionPolicy::of(6).remaps_wall_orientations);
        assert!(!VersionPolicy::of(7).remaps_wall_orientations);
    }

    #[test]
    fn test_npc_path_gates() {
        assert!(!VersionPolicy::of(13).has_npc_paths);
        assert!(VersionPolicy::of(14).has_npc_paths);
        assert!(!VersionPolicy::of(14).has_path_actions);
        assert!(VersionPolicy::of(15).has_path_actions);
    }

    #[test]
    fn test_version_17_gates() {
        let policy = VersionPolicy::of(17);

        assert!(policy.specifies_act);
        assert!(policy.specifies_substitution_type);
        assert!(policy.specifies_wall_count);
        assert!(policy.specifies_floor_count);
        assert!(policy.has_substitutions);
        assert!(policy.has_npc_paths);
        assert!(policy.has_path_actions);
        assert!(!policy.has_trailing_reserved_dword);
        assert!(!policy.has_reserved_header_bytes);
    }

    #[test]
    fn test_unknown_future_version_degrades_forward() {
        let policy = VersionPolicy::of(999);

        assert!(policy.has_trailing_reserved_dword);
        assert!(policy.specifies_floor_count);
        assert!(policy.has_npc_paths);
        assert!(!policy.has_reserved_header_bytes);
        assert!(!policy.remaps_wall_orientations);
    }
}
