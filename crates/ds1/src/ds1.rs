//! The DS1 document: decode, edit, encode
//!
//! A stamp file is read strictly front to back:
//!
//! ```text
//! header -> act -> substitution type -> reserved bytes -> file list
//!        -> wall/floor counts -> layer word streams -> objects
//!        -> substitution groups -> NPC paths
//! ```
//!
//! Every conditional step is gated by the [`VersionPolicy`] for the file's
//! version. Encoding mirrors the same sequence and re-derives the layer
//! stream from the live layer groups, so documents assembled through the
//! authoring API serialize self-consistently.

use crate::error::{Result, StampError};
use crate::group::{LayerGroup, LayerKind};
use crate::layer::Layer;
use crate::object::{Object, Path};
use crate::schema::{layer_stream, LayerCounts, LayerStreamType};
use crate::substitution::SubstitutionGroup;
use crate::tile::Tile;
use crate::version::VersionPolicy;
use d2stamp_stream::{StreamReader, StreamWriter};

/// Version written for documents authored from scratch
pub const DEFAULT_VERSION: i32 = 18;

/// Number of reserved header bytes in versions 9 through 13
const RESERVED_HEADER_LEN: usize = 8;

/// Substitution types that enable the substitution layer and group section
const SUBSTITUTION_TYPE_1: i32 = 1;
const SUBSTITUTION_TYPE_2: i32 = 2;

/// An editable DS1 map stamp.
///
/// Owns the single width/height pair shared by all layers, the five layer
/// groups, the object list, the substitution groups, and the reserved fields
/// that must round-trip untouched. A document has no shared state; the
/// caller owns it exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Ds1 {
    version: i32,
    width: usize,
    height: usize,
    act: i32,
    substitution_type: i32,
    files: Vec<String>,
    objects: Vec<Object>,
    floors: LayerGroup,
    walls: LayerGroup,
    orientations: LayerGroup,
    shadows: LayerGroup,
    substitutions: LayerGroup,
    substitution_groups: Vec<SubstitutionGroup>,
    reserved_header: [u8; RESERVED_HEADER_LEN],
    reserved_substitution: u32,
}

impl Ds1 {
    /// Create an empty document for programmatic authoring.
    ///
    /// The document starts with no layers, objects, or files; populate it
    /// through the group and list accessors, then [`encode`](Self::encode).
    pub fn new(version: i32, width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));

        Self {
            version,
            width,
            height,
            act: 1,
            substitution_type: 0,
            files: Vec::new(),
            objects: Vec::new(),
            floors: LayerGroup::new(LayerKind::Floor, width, height),
            walls: LayerGroup::new(LayerKind::Wall, width, height),
            orientations: LayerGroup::new(LayerKind::Orientation, width, height),
            shadows: LayerGroup::new(LayerKind::Shadow, width, height),
            substitutions: LayerGroup::new(LayerKind::Substitution, width, height),
            substitution_groups: Vec::new(),
            reserved_header: [0; RESERVED_HEADER_LEN],
            reserved_substitution: 0,
        }
    }

    /// Format version
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Change the format version a later [`encode`](Self::encode) will write
    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    /// Width shared by all layers, in tiles
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height shared by all layers, in tiles
    pub fn height(&self) -> usize {
        self.height
    }

    /// Size as (width, height)
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Resize the document and every layer in every group
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);

        for group in [
            &mut self.floors,
            &mut self.walls,
            &mut self.orientations,
            &mut self.shadows,
            &mut self.substitutions,
        ] {
            group.set_size(self.width, self.height);
        }
    }

    /// Resize the width only
    pub fn set_width(&mut self, width: usize) {
        self.set_size(width, self.height);
    }

    /// Resize the height only
    pub fn set_height(&mut self, height: usize) {
        self.set_size(self.width, height);
    }

    /// Act number, 1-based
    pub fn act(&self) -> i32 {
        self.act
    }

    /// Set the act number; values below 1 clamp to 1
    pub fn set_act(&mut self, act: i32) {
        self.act = act.max(1);
    }

    /// Substitution type: 0 for none, else 1 or 2
    pub fn substitution_type(&self) -> i32 {
        self.substitution_type
    }

    /// Set the substitution type
    pub fn set_substitution_type(&mut self, substitution_type: i32) {
        self.substitution_type = substitution_type;
    }

    /// Referenced tile-graphics file paths
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Append a file reference
    pub fn add_file(&mut self, file: impl Into<String>) {
        self.files.push(file.into());
    }

    /// Remove a file reference by exact path
    pub fn remove_file(&mut self, file: &str) -> Result<()> {
        match self.files.iter().position(|f| f == file) {
            Some(index) => {
                self.files.remove(index);
                Ok(())
            }
            None => Err(StampError::NotFound(file.to_string())),
        }
    }

    /// Spawned objects
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Mutable access to the spawned objects
    pub fn objects_mut(&mut self) -> &mut Vec<Object> {
        &mut self.objects
    }

    /// Append an object
    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// Remove the first object equal to `object`, if any
    pub fn remove_object(&mut self, object: &Object) {
        if let Some(index) = self.objects.iter().position(|o| o == object) {
            self.objects.remove(index);
        }
    }

    /// Substitution group region descriptors
    pub fn substitution_groups(&self) -> &[SubstitutionGroup] {
        &self.substitution_groups
    }

    /// Replace the substitution group list
    pub fn set_substitution_groups(&mut self, groups: Vec<SubstitutionGroup>) {
        self.substitution_groups = groups;
    }

    /// Floor layer group
    pub fn floors(&self) -> &LayerGroup {
        &self.floors
    }

    /// Mutable floor layer group
    pub fn floors_mut(&mut self) -> &mut LayerGroup {
        &mut self.floors
    }

    /// Wall layer group
    pub fn walls(&self) -> &LayerGroup {
        &self.walls
    }

    /// Mutable wall layer group
    pub fn walls_mut(&mut self) -> &mut LayerGroup {
        &mut self.walls
    }

    /// Wall-orientation layer group
    pub fn orientations(&self) -> &LayerGroup {
        &self.orientations
    }

    /// Mutable wall-orientation layer group
    pub fn orientations_mut(&mut self) -> &mut LayerGroup {
        &mut self.orientations
    }

    /// Shadow layer group
    pub fn shadows(&self) -> &LayerGroup {
        &self.shadows
    }

    /// Mutable shadow layer group
    pub fn shadows_mut(&mut self) -> &mut LayerGroup {
        &mut self.shadows
    }

    /// Substitution layer group
    pub fn substitutions(&self) -> &LayerGroup {
        &self.substitutions
    }

    /// Mutable substitution layer group
    pub fn substitutions_mut(&mut self) -> &mut LayerGroup {
        &mut self.substitutions
    }

    /// Number of wall layers, derived from the live group
    pub fn wall_layer_count(&self) -> usize {
        self.walls.len()
    }

    /// Number of wall-orientation layers
    pub fn orientation_layer_count(&self) -> usize {
        self.orientations.len()
    }

    /// Number of floor layers
    pub fn floor_layer_count(&self) -> usize {
        self.floors.len()
    }

    /// Number of shadow layers
    pub fn shadow_layer_count(&self) -> usize {
        self.shadows.len()
    }

    /// Number of substitution layers
    pub fn substitution_layer_count(&self) -> usize {
        self.substitutions.len()
    }

    fn has_substitution_layer(&self) -> bool {
        self.substitution_type == SUBSTITUTION_TYPE_1
            || self.substitution_type == SUBSTITUTION_TYPE_2
    }

    fn layer_counts(&self) -> LayerCounts {
        LayerCounts {
            walls: self.walls.len(),
            floors: self.floors.len(),
            shadows: self.shadows.len(),
            substitutions: self.substitutions.len(),
        }
    }

    /// Decode a document from raw file bytes.
    ///
    /// # Errors
    /// Fails only on truncated input; the error names the section being read
    /// and the byte offset of the failed read. Unmatched NPC entries,
    /// out-of-capacity layer counts, and similar oddities in legacy content
    /// are tolerated silently.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = StreamReader::new(data);

        let version = reader.read_i32().map_err(StampError::read("version"))?;
        let policy = VersionPolicy::of(version);

        // width and height are stored off by one
        let width = reader
            .read_i32()
            .map_err(StampError::read("width"))?
            .saturating_add(1)
            .max(1) as usize;
        let height = reader
            .read_i32()
            .map_err(StampError::read("height"))?
            .saturating_add(1)
            .max(1) as usize;

        let mut ds1 = Ds1::new(version, width, height);

        if policy.specifies_act {
            // stored zero-based
            let act = reader.read_i32().map_err(StampError::read("act"))?;
            ds1.act = act.saturating_add(1);
        }

        if policy.specifies_substitution_type {
            ds1.substitution_type = reader
                .read_i32()
                .map_err(StampError::read("substitution type"))?;
        }

        if policy.has_reserved_header_bytes {
            let bytes = reader
                .read_bytes(RESERVED_HEADER_LEN)
                .map_err(StampError::read("reserved header bytes"))?;
            ds1.reserved_header.copy_from_slice(bytes);
        }

        ds1.read_file_list(&mut reader, policy)?;

        // Per-kind layer counts; a shadow layer is implicit in every version.
        let mut counts = LayerCounts {
            walls: 0,
            floors: 1,
            shadows: 1,
            substitutions: 0,
        };

        if ds1.has_substitution_layer() {
            counts.substitutions = 1;
        }

        if policy.specifies_wall_count {
            counts.walls = reader
                .read_i32()
                .map_err(StampError::read("wall layer count"))?
                .max(0) as usize;

            if policy.specifies_floor_count {
                counts.floors = reader
                    .read_i32()
                    .map_err(StampError::read("floor layer count"))?
                    .max(0) as usize;
            }
        } else {
            // the fixed layer stream carries one of each kind
            counts.walls = 1;
            counts.substitutions = 1;
        }

        ds1.allocate_layers(&counts);
        ds1.read_layer_streams(&mut reader, policy, counts)?;
        ds1.read_objects(&mut reader, policy)?;
        ds1.read_substitution_groups(&mut reader, policy)?;
        ds1.read_npc_paths(&mut reader, policy)?;

        Ok(ds1)
    }

    fn read_file_list(&mut self, reader: &mut StreamReader<'_>, policy: VersionPolicy) -> Result<()> {
        if !policy.has_file_list {
            return Ok(());
        }

        let count = reader.read_i32().map_err(StampError::read("file count"))?.max(0);

        for _ in 0..count {
            let mut path = Vec::new();

            loop {
                let ch = reader.read_u8().map_err(StampError::read("file path"))?;
                if ch == 0 {
                    break;
                }
                path.push(ch);
            }

            self.files.push(String::from_utf8_lossy(&path).into_owned());
        }

        Ok(())
    }

    fn allocate_layers(&mut self, counts: &LayerCounts) {
        // pushes past a kind's capacity drop silently
        for _ in 0..counts.walls {
            self.walls.push(Layer::new(self.width, self.height));
            self.orientations.push(Layer::new(self.width, self.height));
        }

        for _ in 0..counts.floors {
            self.floors.push(Layer::new(self.width, self.height));
        }

        for _ in 0..counts.shadows {
            self.shadows.push(Layer::new(self.width, self.height));
        }

        for _ in 0..counts.substitutions {
            self.substitutions.push(Layer::new(self.width, self.height));
        }
    }

    fn read_layer_streams(
        &mut self,
        reader: &mut StreamReader<'_>,
        policy: VersionPolicy,
        counts: LayerCounts,
    ) -> Result<()> {
        // one grid's worth of words per schema entry, rows outermost
        for entry in layer_stream(policy, counts) {
            for y in 0..self.height {
                for x in 0..self.width {
                    let word = reader.read_u32().map_err(StampError::read("layer word"))?;
                    self.store_word(entry, x, y, word, policy);
                }
            }
        }

        Ok(())
    }

    /// Route one body word into the matching layer cell. Words addressed to
    /// a layer the groups could not hold are consumed and dropped.
    fn store_word(
        &mut self,
        entry: LayerStreamType,
        x: usize,
        y: usize,
        word: u32,
        policy: VersionPolicy,
    ) {
        match entry {
            LayerStreamType::Wall(index) => {
                if let Some(tile) = self.walls.get_mut(index).and_then(|l| l.tile_mut(x, y)) {
                    tile.decode(word);
                }
            }
            LayerStreamType::Orientation(index) => {
                if let Some(tile) = self
                    .orientations
                    .get_mut(index)
                    .and_then(|l| l.tile_mut(x, y))
                {
                    tile.decode_orientation(word, policy.remaps_wall_orientations);
                }
            }
            LayerStreamType::Floor(index) => {
                if let Some(tile) = self.floors.get_mut(index).and_then(|l| l.tile_mut(x, y)) {
                    tile.decode(word);
                }
            }
            LayerStreamType::Shadow => {
                if let Some(tile) = self.shadows.get_mut(0).and_then(|l| l.tile_mut(x, y)) {
                    tile.decode(word);
                }
            }
            LayerStreamType::Substitute => {
                if let Some(tile) = self
                    .substitutions
                    .get_mut(0)
                    .and_then(|l| l.tile_mut(x, y))
                {
                    tile.substitution = word;
                }
            }
        }
    }

    fn read_objects(&mut self, reader: &mut StreamReader<'_>, policy: VersionPolicy) -> Result<()> {
        if !policy.has_objects {
            return Ok(());
        }

        let count = reader
            .read_i32()
            .map_err(StampError::read("object count"))?
            .max(0);

        for _ in 0..count {
            let object = Object {
                object_type: reader.read_i32().map_err(StampError::read("object type"))?,
                id: reader.read_i32().map_err(StampError::read("object id"))?,
                x: reader.read_i32().map_err(StampError::read("object x"))?,
                y: reader.read_i32().map_err(StampError::read("object y"))?,
                flags: reader.read_i32().map_err(StampError::read("object flags"))?,
                paths: Vec::new(),
            };

            self.objects.push(object);
        }

        Ok(())
    }

    fn read_substitution_groups(
        &mut self,
        reader: &mut StreamReader<'_>,
        policy: VersionPolicy,
    ) -> Result<()> {
        if !policy.has_substitutions || !self.has_substitution_layer() {
            return Ok(());
        }

        if policy.has_trailing_reserved_dword {
            self.reserved_substitution = reader
                .read_u32()
                .map_err(StampError::read("reserved substitution dword"))?;
        }

        let count = reader
            .read_i32()
            .map_err(StampError::read("substitution group count"))?
            .max(0);

        for _ in 0..count {
            let group = SubstitutionGroup {
                tile_x: reader
                    .read_i32()
                    .map_err(StampError::read("substitution group x"))?,
                tile_y: reader
                    .read_i32()
                    .map_err(StampError::read("substitution group y"))?,
                width_in_tiles: reader
                    .read_i32()
                    .map_err(StampError::read("substitution group width"))?,
                height_in_tiles: reader
                    .read_i32()
                    .map_err(StampError::read("substitution group height"))?,
                unknown: reader
                    .read_i32()
                    .map_err(StampError::read("substitution group reserved"))?,
            };

            self.substitution_groups.push(group);
        }

        Ok(())
    }

    fn read_npc_paths(&mut self, reader: &mut StreamReader<'_>, policy: VersionPolicy) -> Result<()> {
        if !policy.has_npc_paths {
            return Ok(());
        }

        let npc_count = reader
            .read_i32()
            .map_err(StampError::read("npc count"))?
            .max(0);

        for _ in 0..npc_count {
            let path_count = reader
                .read_i32()
                .map_err(StampError::read("npc path count"))?
                .max(0) as usize;
            let npc_x = reader.read_i32().map_err(StampError::read("npc x"))?;
            let npc_y = reader.read_i32().map_err(StampError::read("npc y"))?;

            // an NPC binds to the first object at its exact coordinates
            let matched = self
                .objects
                .iter()
                .position(|object| object.x == npc_x && object.y == npc_y);

            match matched {
                Some(index) => self.read_paths_into(reader, index, path_count, policy)?,
                None => {
                    // unmatched entries carry opaque per-path bytes
                    let per_path = if policy.has_path_actions { 3 } else { 2 };
                    reader.skip(path_count * per_path);
                }
            }
        }

        Ok(())
    }

    fn read_paths_into(
        &mut self,
        reader: &mut StreamReader<'_>,
        object_index: usize,
        path_count: usize,
        policy: VersionPolicy,
    ) -> Result<()> {
        for _ in 0..path_count {
            let mut path = Path {
                x: reader.read_i32().map_err(StampError::read("path x"))?,
                y: reader.read_i32().map_err(StampError::read("path y"))?,
                action: 0,
            };

            if policy.has_path_actions {
                path.action = reader.read_i32().map_err(StampError::read("path action"))?;
            }

            if let Some(object) = self.objects.get_mut(object_index) {
                object.paths.push(path);
            }
        }

        Ok(())
    }

    /// Serialize the document to file bytes.
    ///
    /// The layer stream schema is re-derived from the live group lengths.
    /// Reserved fields are written back exactly as held, so decoding a file
    /// and encoding the untouched document reproduces the input
    /// byte-for-byte.
    pub fn encode(&self) -> Vec<u8> {
        let policy = VersionPolicy::of(self.version);
        let mut writer = StreamWriter::new();

        writer.push_i32(self.version);
        writer.push_i32(self.width as i32 - 1);
        writer.push_i32(self.height as i32 - 1);

        if policy.specifies_act {
            writer.push_i32(self.act - 1);
        }

        if policy.specifies_substitution_type {
            writer.push_i32(self.substitution_type);
        }

        if policy.has_reserved_header_bytes {
            writer.push_bytes(&self.reserved_header);
        }

        if policy.has_file_list {
            writer.push_i32(self.files.len() as i32);

            for file in &self.files {
                writer.push_bytes(file.as_bytes());
                writer.push_u8(0);
            }
        }

        if policy.specifies_wall_count {
            writer.push_i32(self.walls.len() as i32);

            if policy.specifies_floor_count {
                writer.push_i32(self.floors.len() as i32);
            }
        }

        self.write_layer_streams(&mut writer, policy);

        if policy.has_objects {
            writer.push_i32(self.objects.len() as i32);

            for object in &self.objects {
                writer.push_i32(object.object_type);
                writer.push_i32(object.id);
                writer.push_i32(object.x);
                writer.push_i32(object.y);
                writer.push_i32(object.flags);
            }
        }

        if policy.has_substitutions && self.has_substitution_layer() {
            if policy.has_trailing_reserved_dword {
                writer.push_u32(self.reserved_substitution);
            }

            writer.push_i32(self.substitution_groups.len() as i32);

            for group in &self.substitution_groups {
                writer.push_i32(group.tile_x);
                writer.push_i32(group.tile_y);
                writer.push_i32(group.width_in_tiles);
                writer.push_i32(group.height_in_tiles);
                writer.push_i32(group.unknown);
            }
        }

        if policy.has_npc_paths {
            self.write_npc_paths(&mut writer, policy);
        }

        writer.into_bytes()
    }

    fn write_layer_streams(&self, writer: &mut StreamWriter, policy: VersionPolicy) {
        let zero = Tile::default();

        for entry in layer_stream(policy, self.layer_counts()) {
            for y in 0..self.height {
                for x in 0..self.width {
                    // an uncompactable empty slot encodes as zero tiles
                    let tile = self.stream_tile(entry, x, y).unwrap_or(&zero);

                    match entry {
                        LayerStreamType::Wall(_)
                        | LayerStreamType::Floor(_)
                        | LayerStreamType::Shadow => tile.encode(writer),
                        LayerStreamType::Orientation(_) => {
                            writer.push_u32(tile.orientation_word())
                        }
                        LayerStreamType::Substitute => writer.push_u32(tile.substitution),
                    }
                }
            }
        }
    }

    fn stream_tile(&self, entry: LayerStreamType, x: usize, y: usize) -> Option<&Tile> {
        match entry {
            LayerStreamType::Wall(index) => self.walls.get(index)?.tile(x, y),
            LayerStreamType::Orientation(index) => self.orientations.get(index)?.tile(x, y),
            LayerStreamType::Floor(index) => self.floors.get(index)?.tile(x, y),
            LayerStreamType::Shadow => self.shadows.get(0)?.tile(x, y),
            LayerStreamType::Substitute => self.substitutions.get(0)?.tile(x, y),
        }
    }

    fn write_npc_paths(&self, writer: &mut StreamWriter, policy: VersionPolicy) {
        let with_paths: Vec<&Object> = self
            .objects
            .iter()
            .filter(|object| !object.paths.is_empty())
            .collect();

        writer.push_i32(with_paths.len() as i32);

        for object in with_paths {
            writer.push_i32(object.paths.len() as i32);
            writer.push_i32(object.x);
            writer.push_i32(object.y);

            for path in &object.paths {
                writer.push_i32(path.x);
                writer.push_i32(path.y);

                if policy.has_path_actions {
                    writer.push_i32(path.action);
                }
            }
        }
    }
}
