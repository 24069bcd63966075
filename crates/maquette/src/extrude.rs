//! Volumetric extrusion: a validated layout into per-room triangle meshes.
//!
//! Every room becomes one mesh built from axis-aligned boxes: a floor slab
//! under the footprint and a wall prism along each footprint edge, inset
//! into the room so neighboring rooms never share wall volume. Walls that
//! carry a door opening are segmented into two jambs and a header above the
//! opening instead of one solid prism.
//!
//! Triangulation is fixed: boxes are emitted with a constant corner and
//! index order, so identical layouts produce byte-identical meshes.
//!
//! # Coordinate System
//!
//! Plan coordinates map into a right-handed y-up world: plan x stays x,
//! plan y becomes -z, and extrusion height runs along +y. The floor's top
//! face sits at height zero.
//!
//! # Pipeline Position
//!
//! ```text
//! resolve -> [extrude] -> export (glb, ifc)
//! ```

use log::debug;

use maquette_core::{geometry::Bounds, identifier::RoomId, program::RoomType};

use crate::{
    config::ExportConfig,
    error::MaquetteError,
    resolve::{Layout, Opening, RoomGeometry},
};

/// Thickness of the floor slab, in meters.
const FLOOR_THICKNESS: f32 = 0.1;

/// Height of door openings, in meters. Walls continue above as a header.
const DOOR_HEIGHT: f32 = 2.1;

/// Pieces shorter than this are not emitted.
const PIECE_EPSILON: f32 = 1e-3;

/// How far a door line may sit from a room face and still cut its wall.
const FACE_TOLERANCE: f32 = 0.1;

/// An indexed triangle mesh with positions in world coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Returns the vertex positions.
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Returns the triangle indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the componentwise minimum and maximum of all positions.
    pub fn position_bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for position in &self.positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }
        (min, max)
    }

    /// Appends an axis-aligned box with outward-facing triangles.
    ///
    /// Corners and indices follow a fixed order so repeated extrusion of the
    /// same input yields identical buffers.
    fn add_box(&mut self, min: [f32; 3], max: [f32; 3]) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[
            [min[0], min[1], min[2]],
            [max[0], min[1], min[2]],
            [min[0], max[1], min[2]],
            [max[0], max[1], min[2]],
            [min[0], min[1], max[2]],
            [max[0], min[1], max[2]],
            [min[0], max[1], max[2]],
            [max[0], max[1], max[2]],
        ]);

        // One quad per face, counter-clockwise seen from outside.
        const QUADS: [[u32; 4]; 6] = [
            [0, 4, 6, 2],
            [1, 3, 7, 5],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 2, 3, 1],
            [4, 5, 7, 6],
        ];
        for quad in QUADS {
            self.indices.extend_from_slice(&[
                base + quad[0],
                base + quad[1],
                base + quad[2],
                base + quad[0],
                base + quad[2],
                base + quad[3],
            ]);
        }
    }
}

/// One extruded room: its identity plus the triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSolid {
    id: RoomId,
    name: String,
    room_type: RoomType,
    mesh: Mesh,
}

impl RoomSolid {
    /// Returns the room identifier.
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the room type.
    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    /// Returns the triangle mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

/// The wall sides of a rectangular footprint, in emission order.
#[derive(Debug, Clone, Copy, PartialEq)]
enum WallSide {
    North,
    South,
    West,
    East,
}

const WALL_SIDES: [WallSide; 4] = [
    WallSide::North,
    WallSide::South,
    WallSide::West,
    WallSide::East,
];

/// Extrudes every room of a layout into a solid.
///
/// Solids come back in the layout's room order, one per room.
///
/// # Errors
///
/// Returns [`MaquetteError::Mesh`] when a room footprint has no area. The
/// resolver never produces such a footprint, so this signals a defect
/// upstream rather than bad user input.
pub fn extrude_layout(
    layout: &Layout,
    config: &ExportConfig,
) -> Result<Vec<RoomSolid>, MaquetteError> {
    let solids = layout
        .rooms()
        .iter()
        .map(|room| {
            let mesh = extrude_room(
                room,
                layout.openings(),
                config.wall_height(),
                config.wall_thickness(),
            )?;
            Ok(RoomSolid {
                id: room.id(),
                name: room.name().to_string(),
                room_type: room.room_type(),
                mesh,
            })
        })
        .collect::<Result<Vec<_>, MaquetteError>>()?;

    debug!("Extruded {} room solids", solids.len());
    Ok(solids)
}

fn extrude_room(
    room: &RoomGeometry,
    openings: &[Opening],
    wall_height: f32,
    wall_thickness: f32,
) -> Result<Mesh, MaquetteError> {
    if room.area() <= f32::EPSILON {
        return Err(MaquetteError::Mesh(format!(
            "room '{}' has a degenerate footprint",
            room.id()
        )));
    }

    let bounds = room.bounds();
    let mut mesh = Mesh::default();

    // Floor slab, top face at height zero.
    add_plan_box(
        &mut mesh,
        (bounds.min_x(), bounds.max_x()),
        (bounds.min_y(), bounds.max_y()),
        -FLOOR_THICKNESS,
        0.0,
    );

    let gaps = door_gaps(room.id(), bounds, openings);

    for side in WALL_SIDES {
        emit_wall(
            &mut mesh,
            side,
            bounds,
            wall_height,
            wall_thickness,
            &gaps[side as usize],
        );
    }

    Ok(mesh)
}

/// Collects the door intervals cutting each wall side of a room.
///
/// Intervals run along the wall: x for north/south walls, y for west/east.
fn door_gaps(id: RoomId, bounds: Bounds, openings: &[Opening]) -> [Vec<(f32, f32)>; 4] {
    let mut gaps: [Vec<(f32, f32)>; 4] = Default::default();
    for opening in openings {
        if opening.a() != id && opening.b() != id {
            continue;
        }
        let segment = opening.segment();
        if segment.is_vertical() {
            let line = segment.start().x();
            let interval = ordered(segment.start().y(), segment.end().y());
            if (line - bounds.min_x()).abs() <= FACE_TOLERANCE {
                gaps[WallSide::West as usize].push(interval);
            } else if (line - bounds.max_x()).abs() <= FACE_TOLERANCE {
                gaps[WallSide::East as usize].push(interval);
            }
        } else {
            let line = segment.start().y();
            let interval = ordered(segment.start().x(), segment.end().x());
            if (line - bounds.min_y()).abs() <= FACE_TOLERANCE {
                gaps[WallSide::North as usize].push(interval);
            } else if (line - bounds.max_y()).abs() <= FACE_TOLERANCE {
                gaps[WallSide::South as usize].push(interval);
            }
        }
    }
    for side in &mut gaps {
        side.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    gaps
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    (a.min(b), a.max(b))
}

/// Emits one wall, segmented around its door gaps.
///
/// North/south walls run the full footprint width; west/east walls are
/// shortened by the wall thickness at both ends so corner prisms never
/// overlap.
fn emit_wall(
    mesh: &mut Mesh,
    side: WallSide,
    bounds: Bounds,
    wall_height: f32,
    wall_thickness: f32,
    gaps: &[(f32, f32)],
) {
    let (span, cross) = match side {
        WallSide::North => (
            (bounds.min_x(), bounds.max_x()),
            (bounds.min_y(), bounds.min_y() + wall_thickness),
        ),
        WallSide::South => (
            (bounds.min_x(), bounds.max_x()),
            (bounds.max_y() - wall_thickness, bounds.max_y()),
        ),
        WallSide::West => (
            (bounds.min_y() + wall_thickness, bounds.max_y() - wall_thickness),
            (bounds.min_x(), bounds.min_x() + wall_thickness),
        ),
        WallSide::East => (
            (bounds.min_y() + wall_thickness, bounds.max_y() - wall_thickness),
            (bounds.max_x() - wall_thickness, bounds.max_x()),
        ),
    };
    if span.1 - span.0 <= PIECE_EPSILON {
        return;
    }

    // Walk the span: solid pieces between gaps, headers above them.
    let mut full_pieces = Vec::new();
    let mut headers = Vec::new();
    let mut cursor = span.0;
    for &(gap_start, gap_end) in gaps {
        let start = gap_start.max(cursor).max(span.0);
        let end = gap_end.min(span.1);
        if end - start <= PIECE_EPSILON {
            continue;
        }
        if start - cursor > PIECE_EPSILON {
            full_pieces.push((cursor, start));
        }
        headers.push((start, end));
        cursor = end;
    }
    if span.1 - cursor > PIECE_EPSILON {
        full_pieces.push((cursor, span.1));
    }

    let horizontal = matches!(side, WallSide::North | WallSide::South);
    for (start, end) in full_pieces {
        let (x, y) = if horizontal {
            ((start, end), cross)
        } else {
            (cross, (start, end))
        };
        add_plan_box(mesh, x, y, 0.0, wall_height);
    }
    if wall_height - DOOR_HEIGHT > PIECE_EPSILON {
        for (start, end) in headers {
            let (x, y) = if horizontal {
                ((start, end), cross)
            } else {
                (cross, (start, end))
            };
            add_plan_box(mesh, x, y, DOOR_HEIGHT, wall_height);
        }
    }
}

/// Adds a box from a plan rectangle and a height interval.
///
/// Plan y maps to world -z, so the plan's maximum y becomes the world's
/// minimum z.
fn add_plan_box(mesh: &mut Mesh, x: (f32, f32), y: (f32, f32), bottom: f32, top: f32) {
    mesh.add_box([x.0, bottom, -y.1], [x.1, top, -y.0]);
}
