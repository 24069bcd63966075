//! The architectural program model.
//!
//! This module contains the input side of the layout pipeline: a structured
//! description of the rooms a building must contain, their target areas, and
//! which rooms should sit next to each other.
//!
//! # Pipeline Position
//!
//! ```text
//! Program JSON
//!     ↓ serde
//! ArchitecturalProgram (these types) - validated room requirements
//!     ↓ graph
//! ConstraintGraph
//!     ↓ encode / sample / template
//! Raw geometry vectors
//!     ↓ resolve
//! Layout
//!     ↓ extrude + export
//! SVG / GLB / IFC
//! ```

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{color::Color, identifier::RoomId};

/// Errors produced when an architectural program fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgramError {
    /// The program declares no rooms at all.
    #[error("program contains no rooms")]
    EmptyProgram,

    /// Two requirements share the same declared identifier.
    #[error("duplicate room id `{0}`")]
    DuplicateRoomId(RoomId),

    /// A requirement asks for zero instances.
    #[error("room `{0}` has count 0")]
    ZeroCount(RoomId),

    /// The minimum area exceeds the maximum area.
    #[error("room `{id}` has area_min {min} greater than area_max {max}")]
    InvalidAreaRange { id: RoomId, min: f32, max: f32 },

    /// The preferred aspect ratio is not positive.
    #[error("room `{id}` has non-positive aspect ratio {ratio}")]
    InvalidAspectRatio { id: RoomId, ratio: f32 },

    /// An adjacency preference names a room that is not declared.
    #[error("room `{id}` declares adjacency to unknown room `{reference}`")]
    UnknownAdjacency { id: RoomId, reference: RoomId },

    /// An adjacency preference names the declaring room itself.
    #[error("room `{0}` declares adjacency to itself")]
    SelfAdjacency(RoomId),

    /// The site boundary has a non-positive dimension.
    #[error("site boundary has non-positive dimensions {width} x {depth}")]
    InvalidSite { width: f32, depth: f32 },
}

/// The fixed vocabulary of room functions.
///
/// Every requirement carries a `RoomType`; the type supplies a default target
/// area range and a fill color when the program does not override them, and it
/// drives the one-hot feature encoding of graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    LivingRoom,
    Kitchen,
    Bedroom,
    Bathroom,
    DiningRoom,
    Office,
    Garage,
    Balcony,
    Corridor,
    Storage,
    Utility,
    Entrance,
    Other,
}

impl RoomType {
    /// All room types in declaration order.
    ///
    /// The order is stable; [`RoomType::index`] positions match it.
    pub const ALL: [RoomType; 13] = [
        RoomType::LivingRoom,
        RoomType::Kitchen,
        RoomType::Bedroom,
        RoomType::Bathroom,
        RoomType::DiningRoom,
        RoomType::Office,
        RoomType::Garage,
        RoomType::Balcony,
        RoomType::Corridor,
        RoomType::Storage,
        RoomType::Utility,
        RoomType::Entrance,
        RoomType::Other,
    ];

    /// Returns the stable position of this type in [`RoomType::ALL`].
    ///
    /// Used as the one-hot slot when building node features.
    pub fn index(self) -> usize {
        match self {
            RoomType::LivingRoom => 0,
            RoomType::Kitchen => 1,
            RoomType::Bedroom => 2,
            RoomType::Bathroom => 3,
            RoomType::DiningRoom => 4,
            RoomType::Office => 5,
            RoomType::Garage => 6,
            RoomType::Balcony => 7,
            RoomType::Corridor => 8,
            RoomType::Storage => 9,
            RoomType::Utility => 10,
            RoomType::Entrance => 11,
            RoomType::Other => 12,
        }
    }

    /// Returns the default target area range in square meters.
    ///
    /// Used when a requirement supplies no explicit `area_min`/`area_max`.
    pub fn default_area_range(self) -> (f32, f32) {
        match self {
            RoomType::LivingRoom => (18.0, 30.0),
            RoomType::Kitchen => (8.0, 15.0),
            RoomType::Bedroom => (10.0, 18.0),
            RoomType::Bathroom => (4.0, 8.0),
            RoomType::DiningRoom => (10.0, 18.0),
            RoomType::Office => (8.0, 15.0),
            RoomType::Garage => (15.0, 30.0),
            RoomType::Balcony => (4.0, 10.0),
            RoomType::Corridor => (4.0, 10.0),
            RoomType::Storage => (2.0, 6.0),
            RoomType::Utility => (3.0, 8.0),
            RoomType::Entrance => (3.0, 8.0),
            RoomType::Other => (8.0, 20.0),
        }
    }

    /// Returns the fill color used when drawing rooms of this type.
    pub fn fill_color(self) -> Color {
        let hex = match self {
            RoomType::LivingRoom => "#FFCC80",
            RoomType::Kitchen => "#EF9A9A",
            RoomType::Bedroom => "#90CAF9",
            RoomType::Bathroom => "#81C784",
            RoomType::DiningRoom => "#FFAB91",
            RoomType::Office => "#80CBC4",
            RoomType::Garage => "#BCAAA4",
            RoomType::Balcony => "#B0BEC5",
            RoomType::Corridor => "#E0E0E0",
            RoomType::Storage => "#D7CCC8",
            RoomType::Utility => "#B39DDB",
            RoomType::Entrance => "#FFF59D",
            RoomType::Other => "#CE93D8",
        };
        Color::new(hex).expect("palette entries are valid CSS colors")
    }
}

impl FromStr for RoomType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "living_room" => Ok(Self::LivingRoom),
            "kitchen" => Ok(Self::Kitchen),
            "bedroom" => Ok(Self::Bedroom),
            "bathroom" => Ok(Self::Bathroom),
            "dining_room" => Ok(Self::DiningRoom),
            "office" => Ok(Self::Office),
            "garage" => Ok(Self::Garage),
            "balcony" => Ok(Self::Balcony),
            "corridor" => Ok(Self::Corridor),
            "storage" => Ok(Self::Storage),
            "utility" => Ok(Self::Utility),
            "entrance" => Ok(Self::Entrance),
            "other" => Ok(Self::Other),
            _ => Err("Unsupported room type"),
        }
    }
}

impl From<RoomType> for &'static str {
    fn from(val: RoomType) -> Self {
        match val {
            RoomType::LivingRoom => "living_room",
            RoomType::Kitchen => "kitchen",
            RoomType::Bedroom => "bedroom",
            RoomType::Bathroom => "bathroom",
            RoomType::DiningRoom => "dining_room",
            RoomType::Office => "office",
            RoomType::Garage => "garage",
            RoomType::Balcony => "balcony",
            RoomType::Corridor => "corridor",
            RoomType::Storage => "storage",
            RoomType::Utility => "utility",
            RoomType::Entrance => "entrance",
            RoomType::Other => "other",
        }
    }
}

impl Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// The rectangular site a layout must fit into, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteBoundary {
    width: f32,
    depth: f32,
}

impl SiteBoundary {
    /// Creates a new site boundary with the given width and depth in meters.
    pub fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }

    /// Returns the east-west extent of the site
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the north-south extent of the site
    pub fn depth(self) -> f32 {
        self.depth
    }
}

/// A single room requirement within an architectural program.
///
/// A requirement declares one room (or, with `count > 1`, several rooms of the
/// same kind), its target area range, and the rooms it prefers to sit next to.
///
/// # Examples
///
/// ```
/// use maquette_core::{identifier::RoomId, program::{RoomRequirement, RoomType}};
///
/// let bedroom = RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom)
///     .with_count(2)
///     .with_area_range(10.0, 14.0)
///     .with_adjacent_to(vec![RoomId::new("bathroom")]);
///
/// assert_eq!(bedroom.count(), 2);
/// assert_eq!(bedroom.target_area(), 12.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRequirement {
    /// Declared identifier, unique within a program.
    id: RoomId,

    /// Optional human readable label; the id is used when absent.
    #[serde(default)]
    name: Option<String>,

    /// Function of the room.
    room_type: RoomType,

    /// Minimum target area in square meters.
    #[serde(default)]
    area_min: Option<f32>,

    /// Maximum target area in square meters.
    #[serde(default)]
    area_max: Option<f32>,

    /// Preferred width-to-height ratio of the footprint.
    #[serde(default)]
    aspect_ratio: Option<f32>,

    /// How many instances of this requirement to create.
    #[serde(default = "default_count")]
    count: usize,

    /// Declared ids of rooms this one should touch.
    #[serde(default)]
    adjacent_to: Vec<RoomId>,
}

fn default_count() -> usize {
    1
}

impl RoomRequirement {
    /// Creates a requirement for a single room with type defaults.
    pub fn new(id: RoomId, room_type: RoomType) -> Self {
        Self {
            id,
            name: None,
            room_type,
            area_min: None,
            area_max: None,
            aspect_ratio: None,
            count: 1,
            adjacent_to: Vec::new(),
        }
    }

    /// Returns the requirement with the given human readable name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the requirement with an explicit target area range.
    pub fn with_area_range(mut self, min: f32, max: f32) -> Self {
        self.area_min = Some(min);
        self.area_max = Some(max);
        self
    }

    /// Returns the requirement with a preferred aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: f32) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Returns the requirement with the given instance count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Returns the requirement with the given adjacency preferences.
    pub fn with_adjacent_to(mut self, adjacent_to: Vec<RoomId>) -> Self {
        self.adjacent_to = adjacent_to;
        self
    }

    /// Returns the declared identifier
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Returns the declared human readable name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the human readable name, falling back to the identifier
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// Returns the room type
    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    /// Returns the explicit minimum area, if declared
    pub fn area_min(&self) -> Option<f32> {
        self.area_min
    }

    /// Returns the explicit maximum area, if declared
    pub fn area_max(&self) -> Option<f32> {
        self.area_max
    }

    /// Returns the preferred aspect ratio, if declared
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.aspect_ratio
    }

    /// Returns the instance count
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the declared adjacency preferences
    pub fn adjacent_to(&self) -> &[RoomId] {
        &self.adjacent_to
    }

    /// Resolves the target area range, applying type defaults for missing ends.
    ///
    /// An explicit minimum above the type's default maximum widens the range
    /// upward rather than inverting it.
    pub fn target_area_range(&self) -> (f32, f32) {
        let (default_min, default_max) = self.room_type.default_area_range();
        let min = self.area_min.unwrap_or(default_min);
        let max = self.area_max.unwrap_or_else(|| default_max.max(min));
        (min, max)
    }

    /// Returns the midpoint of the target area range in square meters
    pub fn target_area(&self) -> f32 {
        let (min, max) = self.target_area_range();
        (min + max) / 2.0
    }
}

/// A complete architectural program: the structured input of one generation run.
///
/// # Examples
///
/// ```
/// use maquette_core::{identifier::RoomId, program::{ArchitecturalProgram, RoomRequirement, RoomType}};
///
/// let program = ArchitecturalProgram::new(vec![
///     RoomRequirement::new(RoomId::new("living_room"), RoomType::LivingRoom),
///     RoomRequirement::new(RoomId::new("kitchen"), RoomType::Kitchen)
///         .with_adjacent_to(vec![RoomId::new("living_room")]),
/// ]);
///
/// assert!(program.validate().is_ok());
/// assert_eq!(program.rooms().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitecturalProgram {
    /// The prompt this program was derived from, if any. Informational only.
    #[serde(default)]
    raw_prompt: Option<String>,

    /// Room requirements, in declaration order.
    rooms: Vec<RoomRequirement>,

    /// Optional site boundary the layout must fit into.
    #[serde(default)]
    site: Option<SiteBoundary>,
}

impl ArchitecturalProgram {
    /// Creates a program from a list of room requirements.
    pub fn new(rooms: Vec<RoomRequirement>) -> Self {
        Self {
            raw_prompt: None,
            rooms,
            site: None,
        }
    }

    /// Returns the program with a site boundary attached.
    pub fn with_site(mut self, site: SiteBoundary) -> Self {
        self.site = Some(site);
        self
    }

    /// Returns the program with the originating prompt recorded.
    pub fn with_raw_prompt(mut self, raw_prompt: impl Into<String>) -> Self {
        self.raw_prompt = Some(raw_prompt.into());
        self
    }

    /// Returns the room requirements in declaration order
    pub fn rooms(&self) -> &[RoomRequirement] {
        &self.rooms
    }

    /// Returns the site boundary, if declared
    pub fn site(&self) -> Option<SiteBoundary> {
        self.site
    }

    /// Returns the originating prompt, if recorded
    pub fn raw_prompt(&self) -> Option<&str> {
        self.raw_prompt.as_deref()
    }

    /// Returns the summed target area over all instances, in square meters
    pub fn total_target_area(&self) -> f32 {
        self.rooms
            .iter()
            .map(|r| r.target_area() * r.count as f32)
            .sum()
    }

    /// Checks structural validity of the program.
    ///
    /// Adjacency preferences must reference declared ids; instance expansion
    /// happens later, so `adjacent_to` entries name the declared id even when
    /// `count > 1`.
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.rooms.is_empty() {
            return Err(ProgramError::EmptyProgram);
        }

        let mut seen = std::collections::HashSet::new();
        for room in &self.rooms {
            if !seen.insert(room.id) {
                return Err(ProgramError::DuplicateRoomId(room.id));
            }
        }

        for room in &self.rooms {
            if room.count == 0 {
                return Err(ProgramError::ZeroCount(room.id));
            }
            if let (Some(min), Some(max)) = (room.area_min, room.area_max) {
                if min > max {
                    return Err(ProgramError::InvalidAreaRange {
                        id: room.id,
                        min,
                        max,
                    });
                }
            }
            if let Some(ratio) = room.aspect_ratio {
                if ratio <= 0.0 {
                    return Err(ProgramError::InvalidAspectRatio { id: room.id, ratio });
                }
            }
            for reference in &room.adjacent_to {
                if *reference == room.id {
                    return Err(ProgramError::SelfAdjacency(room.id));
                }
                if !seen.contains(reference) {
                    return Err(ProgramError::UnknownAdjacency {
                        id: room.id,
                        reference: *reference,
                    });
                }
            }
        }

        if let Some(site) = self.site {
            if site.width <= 0.0 || site.depth <= 0.0 {
                return Err(ProgramError::InvalidSite {
                    width: site.width,
                    depth: site.depth,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_room_program() -> ArchitecturalProgram {
        ArchitecturalProgram::new(vec![
            RoomRequirement::new(RoomId::new("living_room"), RoomType::LivingRoom),
            RoomRequirement::new(RoomId::new("kitchen"), RoomType::Kitchen)
                .with_adjacent_to(vec![RoomId::new("living_room")]),
        ])
    }

    #[test]
    fn test_room_type_roundtrip() {
        for room_type in RoomType::ALL {
            let s = room_type.to_string();
            let parsed: RoomType = s.parse().unwrap();
            assert_eq!(parsed, room_type);
        }
        assert!("ballroom".parse::<RoomType>().is_err());
    }

    #[test]
    fn test_room_type_indices_are_distinct() {
        let mut seen = [false; RoomType::ALL.len()];
        for room_type in RoomType::ALL {
            let index = room_type.index();
            assert!(index < RoomType::ALL.len());
            assert!(!seen[index], "index {index} assigned twice");
            seen[index] = true;
            assert_eq!(RoomType::ALL[index], room_type);
        }
    }

    #[test]
    fn test_room_type_defaults_are_ordered() {
        for room_type in RoomType::ALL {
            let (min, max) = room_type.default_area_range();
            assert!(min > 0.0);
            assert!(max >= min);
        }
    }

    #[test]
    fn test_room_type_palette() {
        assert_eq!(
            RoomType::LivingRoom.fill_color(),
            Color::new("#FFCC80").unwrap()
        );
        assert_eq!(
            RoomType::Bedroom.fill_color(),
            Color::new("#90CAF9").unwrap()
        );

        // Every type has its own hue.
        let mut colors = std::collections::HashSet::new();
        for room_type in RoomType::ALL {
            assert!(colors.insert(room_type.fill_color()));
        }
    }

    #[test]
    fn test_room_type_serde() {
        let json = serde_json::to_string(&RoomType::DiningRoom).unwrap();
        assert_eq!(json, "\"dining_room\"");
        let back: RoomType = serde_json::from_str("\"living_room\"").unwrap();
        assert_eq!(back, RoomType::LivingRoom);
    }

    #[test]
    fn test_requirement_target_area_range() {
        let explicit = RoomRequirement::new(RoomId::new("studio"), RoomType::Other)
            .with_area_range(20.0, 30.0);
        assert_eq!(explicit.target_area_range(), (20.0, 30.0));
        assert_eq!(explicit.target_area(), 25.0);

        let defaulted = RoomRequirement::new(RoomId::new("bath"), RoomType::Bathroom);
        assert_eq!(
            defaulted.target_area_range(),
            RoomType::Bathroom.default_area_range()
        );
    }

    #[test]
    fn test_requirement_min_above_default_max() {
        let mut requirement = RoomRequirement::new(RoomId::new("big_bath"), RoomType::Bathroom);
        requirement.area_min = Some(12.0);

        let (min, max) = requirement.target_area_range();
        assert_eq!(min, 12.0);
        assert!(max >= min);
    }

    #[test]
    fn test_requirement_display_name() {
        let unnamed = RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom);
        assert_eq!(unnamed.display_name(), "bedroom");

        let named = unnamed.with_name("Master Bedroom");
        assert_eq!(named.display_name(), "Master Bedroom");
    }

    #[test]
    fn test_program_total_target_area() {
        let program = ArchitecturalProgram::new(vec![
            RoomRequirement::new(RoomId::new("a"), RoomType::Other).with_area_range(10.0, 10.0),
            RoomRequirement::new(RoomId::new("b"), RoomType::Other)
                .with_area_range(5.0, 5.0)
                .with_count(3),
        ]);
        assert_eq!(program.total_target_area(), 25.0);
    }

    #[test]
    fn test_validate_ok() {
        assert!(two_room_program().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_program() {
        let program = ArchitecturalProgram::new(Vec::new());
        assert_eq!(program.validate(), Err(ProgramError::EmptyProgram));
    }

    #[test]
    fn test_validate_duplicate_id() {
        let program = ArchitecturalProgram::new(vec![
            RoomRequirement::new(RoomId::new("twin"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("twin"), RoomType::Office),
        ]);
        assert_eq!(
            program.validate(),
            Err(ProgramError::DuplicateRoomId(RoomId::new("twin")))
        );
    }

    #[test]
    fn test_validate_zero_count() {
        let program = ArchitecturalProgram::new(vec![
            RoomRequirement::new(RoomId::new("ghost"), RoomType::Storage).with_count(0),
        ]);
        assert_eq!(
            program.validate(),
            Err(ProgramError::ZeroCount(RoomId::new("ghost")))
        );
    }

    #[test]
    fn test_validate_inverted_area_range() {
        let program = ArchitecturalProgram::new(vec![
            RoomRequirement::new(RoomId::new("odd"), RoomType::Office).with_area_range(20.0, 10.0),
        ]);
        assert!(matches!(
            program.validate(),
            Err(ProgramError::InvalidAreaRange { .. })
        ));
    }

    #[test]
    fn test_validate_unknown_adjacency() {
        let program = ArchitecturalProgram::new(vec![
            RoomRequirement::new(RoomId::new("kitchen"), RoomType::Kitchen)
                .with_adjacent_to(vec![RoomId::new("pantry")]),
        ]);
        assert!(matches!(
            program.validate(),
            Err(ProgramError::UnknownAdjacency { .. })
        ));
    }

    #[test]
    fn test_validate_self_adjacency() {
        let program = ArchitecturalProgram::new(vec![
            RoomRequirement::new(RoomId::new("loop"), RoomType::Other)
                .with_adjacent_to(vec![RoomId::new("loop")]),
        ]);
        assert_eq!(
            program.validate(),
            Err(ProgramError::SelfAdjacency(RoomId::new("loop")))
        );
    }

    #[test]
    fn test_validate_bad_site() {
        let program = two_room_program().with_site(SiteBoundary::new(0.0, 12.0));
        assert!(matches!(
            program.validate(),
            Err(ProgramError::InvalidSite { .. })
        ));
    }

    #[test]
    fn test_program_from_json() {
        let json = r#"{
            "raw_prompt": "two bedroom flat",
            "rooms": [
                {
                    "id": "living_room",
                    "room_type": "living_room",
                    "area_min": 20.0,
                    "area_max": 28.0
                },
                {
                    "id": "bedroom",
                    "room_type": "bedroom",
                    "count": 2,
                    "adjacent_to": ["living_room"]
                }
            ],
            "site": { "width": 15.0, "depth": 12.0 }
        }"#;

        let program: ArchitecturalProgram = serde_json::from_str(json).unwrap();
        assert!(program.validate().is_ok());
        assert_eq!(program.raw_prompt(), Some("two bedroom flat"));
        assert_eq!(program.rooms().len(), 2);
        assert_eq!(program.rooms()[1].count(), 2);
        assert_eq!(program.site().unwrap().width(), 15.0);
    }

    #[test]
    fn test_program_json_defaults() {
        let json = r#"{ "rooms": [ { "id": "studio", "room_type": "other" } ] }"#;
        let program: ArchitecturalProgram = serde_json::from_str(json).unwrap();

        let room = &program.rooms()[0];
        assert_eq!(room.count(), 1);
        assert!(room.adjacent_to().is_empty());
        assert!(room.area_min().is_none());
        assert!(program.site().is_none());
    }
}
