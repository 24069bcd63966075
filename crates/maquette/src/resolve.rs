//! Geometry resolution: raw room vectors into a validated layout.
//!
//! The resolver is the gatekeeper between synthesis and export. Raw vectors
//! from either backend carry no guarantees; this stage decodes them into
//! axis-aligned rectangle footprints, pushes overlapping rooms apart until
//! the arrangement is clean, snaps adjacent rooms into shared walls, places
//! door openings, and reports per-edge constraint satisfaction. An
//! arrangement that cannot be cleaned within the iteration cap is an error,
//! not a degraded result.
//!
//! # Overview
//!
//! - [`RoomGeometry`] - One resolved room footprint.
//! - [`Layout`] - The validated arrangement: rooms, walls, openings.
//! - [`SatisfactionReport`] - One verdict per constraint edge.
//! - [`resolve_layout`] - The full decode/relax/snap/report pass.
//!
//! # Pipeline Position
//!
//! ```text
//! {sample | template} -> [resolve] -> extrude -> export
//! ```

use log::{debug, trace};
use petgraph::graph::NodeIndex;
use serde::Serialize;

use maquette_core::{
    geometry::{Bounds, Point, Polygon, Segment, Size},
    identifier::RoomId,
    program::{RoomType, SiteBoundary},
};

use crate::{
    config::ResolverConfig,
    error::MaquetteError,
    graph::{ConstraintGraph, EdgeKind},
    synthesis::RawRoomVector,
};

/// Gap below which two room faces count as touching, in meters.
const CONTACT_TOLERANCE: f32 = 0.05;

/// Distance within which separation edges actively push rooms apart.
const SEPARATION_CLEARANCE: f32 = 1.0;

/// A resolved room footprint.
///
/// Quarter-turn rotations are folded into the footprint during decoding
/// (width and height swapped), so the polygon is always axis-aligned; the
/// recorded rotation is informational.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomGeometry {
    id: RoomId,
    name: String,
    room_type: RoomType,
    center: Point,
    size: Size,
    rotation: f32,
    polygon: Polygon,
}

impl RoomGeometry {
    pub(crate) fn new(
        id: RoomId,
        name: String,
        room_type: RoomType,
        center: Point,
        size: Size,
        rotation: f32,
    ) -> Self {
        RoomGeometry {
            id,
            name,
            room_type,
            center,
            size,
            rotation,
            polygon: footprint(center, size),
        }
    }

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

    /// Returns the footprint center.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Returns the footprint dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the width in meters.
    pub fn width(&self) -> f32 {
        self.size.width()
    }

    /// Returns the height in meters.
    pub fn height(&self) -> f32 {
        self.size.height()
    }

    /// Returns the quantized rotation in degrees, 0 or 90.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Returns the footprint polygon.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Returns the floor area in square meters.
    pub fn area(&self) -> f32 {
        self.polygon.area()
    }

    /// Returns the axis-aligned bounds of the footprint.
    pub fn bounds(&self) -> Bounds {
        self.polygon.bounds()
    }
}

/// A wall segment shared by two adjacent rooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    a: RoomId,
    b: RoomId,
    segment: Segment,
}

impl Wall {
    /// Returns the first room on the wall.
    pub fn a(&self) -> RoomId {
        self.a
    }

    /// Returns the second room on the wall.
    pub fn b(&self) -> RoomId {
        self.b
    }

    /// Returns the wall segment.
    pub fn segment(&self) -> Segment {
        self.segment
    }
}

/// A door opening centered on a shared wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opening {
    a: RoomId,
    b: RoomId,
    segment: Segment,
}

impl Opening {
    /// Returns the first room the opening connects.
    pub fn a(&self) -> RoomId {
        self.a
    }

    /// Returns the second room the opening connects.
    pub fn b(&self) -> RoomId {
        self.b
    }

    /// Returns the opening span on the wall.
    pub fn segment(&self) -> Segment {
        self.segment
    }

    /// Returns the opening width in meters.
    pub fn width(&self) -> f32 {
        self.segment.length()
    }
}

/// A validated, exportable arrangement of rooms.
///
/// Rooms appear in the graph's canonical order. Walls and openings exist
/// only for satisfied adjacency edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    rooms: Vec<RoomGeometry>,
    walls: Vec<Wall>,
    openings: Vec<Opening>,
    bounding_box: Bounds,
}

impl Layout {
    pub(crate) fn new(
        rooms: Vec<RoomGeometry>,
        walls: Vec<Wall>,
        openings: Vec<Opening>,
        bounding_box: Bounds,
    ) -> Self {
        Layout {
            rooms,
            walls,
            openings,
            bounding_box,
        }
    }

    /// Returns the resolved rooms in canonical order.
    pub fn rooms(&self) -> &[RoomGeometry] {
        &self.rooms
    }

    /// Returns the shared wall segments.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Returns the door openings.
    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    /// Returns the bounds enclosing every room footprint.
    pub fn bounding_box(&self) -> Bounds {
        self.bounding_box
    }

    /// Looks a room up by its identifier.
    pub fn room(&self, id: RoomId) -> Option<&RoomGeometry> {
        self.rooms.iter().find(|room| room.id == id)
    }
}

/// The verdict for one constraint edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SatisfactionEntry {
    a: RoomId,
    b: RoomId,
    kind: EdgeKind,
    satisfied: bool,
}

impl SatisfactionEntry {
    /// Returns the first endpoint.
    pub fn a(&self) -> RoomId {
        self.a
    }

    /// Returns the second endpoint.
    pub fn b(&self) -> RoomId {
        self.b
    }

    /// Returns the constraint kind.
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Reports whether the layout satisfies the constraint.
    pub fn satisfied(&self) -> bool {
        self.satisfied
    }
}

/// Per-edge constraint verdicts, one entry per graph edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SatisfactionReport {
    entries: Vec<SatisfactionEntry>,
}

impl SatisfactionReport {
    /// Returns the entries in canonical edge order.
    pub fn entries(&self) -> &[SatisfactionEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts the satisfied entries.
    pub fn satisfied_count(&self) -> usize {
        self.entries.iter().filter(|e| e.satisfied).count()
    }

    /// Reports whether every constraint is satisfied.
    pub fn is_fully_satisfied(&self) -> bool {
        self.entries.iter().all(|e| e.satisfied)
    }

    /// Finds the entry for an unordered room pair.
    pub fn find(&self, a: RoomId, b: RoomId) -> Option<&SatisfactionEntry> {
        self.entries
            .iter()
            .find(|e| (e.a == a && e.b == b) || (e.a == b && e.b == a))
    }
}

/// One graph edge mapped onto canonical room slots.
struct Bond {
    a: usize,
    b: usize,
    kind: EdgeKind,
    weight: f32,
}

/// Resolves raw room vectors into a validated layout.
///
/// The raw vectors must be in the graph's canonical node order, one per
/// room, as both synthesis backends produce them.
///
/// # Errors
///
/// - [`MaquetteError::Validation`] when the graph has no rooms, when the
///   relaxation cap is reached with residual overlap, or when a declared
///   site boundary cannot hold the layout margin.
/// - [`MaquetteError::Encoding`] when the vector count does not match the
///   graph's node count.
pub fn resolve_layout(
    graph: &ConstraintGraph,
    raw: &[RawRoomVector],
    site: Option<SiteBoundary>,
    config: &ResolverConfig,
) -> Result<(Layout, SatisfactionReport), MaquetteError> {
    let order = graph.canonical_order();
    if order.is_empty() {
        return Err(MaquetteError::Validation(
            "cannot resolve a layout with zero rooms".to_string(),
        ));
    }
    if raw.len() != order.len() {
        return Err(MaquetteError::Encoding(format!(
            "{} raw vectors for {} rooms",
            raw.len(),
            order.len()
        )));
    }

    let count = order.len();
    debug!("Resolving {count} rooms");

    // Decode raw vectors against their nodes.
    let mut centers = Vec::with_capacity(count);
    let mut sizes = Vec::with_capacity(count);
    let mut rotations = Vec::with_capacity(count);
    for (&idx, vector) in order.iter().zip(raw) {
        let node = graph.node_from_idx(idx);
        let (center, size, rotation) = decode_room(node.area_range(), node.aspect_ratio(), vector);
        centers.push(center);
        sizes.push(size);
        rotations.push(rotation);
    }

    let bonds = collect_bonds(graph, &order);

    relax_overlaps(&mut centers, &sizes, &bonds, config)?;
    snap_walls(&mut centers, &sizes, &bonds, config.snap_tolerance());
    normalize(&mut centers, &mut sizes, site, config)?;

    // Final footprints after every positional pass.
    let polygons: Vec<Polygon> = centers
        .iter()
        .zip(&sizes)
        .map(|(&center, &size)| footprint(center, size))
        .collect();

    let ids: Vec<RoomId> = order
        .iter()
        .map(|&idx| graph.node_from_idx(idx).id())
        .collect();

    let mut walls = Vec::new();
    let mut openings = Vec::new();
    let mut entries = Vec::with_capacity(bonds.len());
    for bond in &bonds {
        let bounds_a = polygons[bond.a].bounds();
        let bounds_b = polygons[bond.b].bounds();
        let satisfied = match bond.kind {
            EdgeKind::Adjacency => {
                match bounds_a.shared_boundary(&bounds_b, CONTACT_TOLERANCE) {
                    Some(boundary) => {
                        walls.push(Wall {
                            a: ids[bond.a],
                            b: ids[bond.b],
                            segment: boundary,
                        });
                        openings.push(Opening {
                            a: ids[bond.a],
                            b: ids[bond.b],
                            segment: boundary.centered_subsegment(config.door_width()),
                        });
                        true
                    }
                    None => false,
                }
            }
            EdgeKind::Separation => {
                polygons[bond.a].separation_vector(&polygons[bond.b]).is_none()
                    && bounds_a.shared_boundary(&bounds_b, CONTACT_TOLERANCE).is_none()
            }
            EdgeKind::Containment => {
                polygons[bond.a].contains_polygon(&polygons[bond.b])
                    || polygons[bond.b].contains_polygon(&polygons[bond.a])
            }
        };
        entries.push(SatisfactionEntry {
            a: ids[bond.a],
            b: ids[bond.b],
            kind: bond.kind,
            satisfied,
        });
    }

    let bounding_box = polygons
        .iter()
        .map(Polygon::bounds)
        .reduce(|merged, bounds| merged.merge(&bounds))
        .expect("Layout should have at least one room");

    let rooms = order
        .iter()
        .enumerate()
        .map(|(slot, &idx)| {
            let node = graph.node_from_idx(idx);
            RoomGeometry::new(
                node.id(),
                node.name().to_string(),
                node.room_type(),
                centers[slot],
                sizes[slot],
                rotations[slot],
            )
        })
        .collect();

    debug!(
        "Resolved layout with {} walls and {} door openings",
        walls.len(),
        openings.len()
    );

    Ok((
        Layout::new(rooms, walls, openings, bounding_box),
        SatisfactionReport { entries },
    ))
}

/// Decodes one raw vector into center, footprint size, and rotation.
///
/// The rotation channel is quantized to a quarter turn and folded into the
/// size; the footprint area is clamped into the node's target range while
/// preserving the aspect ratio (the program's explicit ratio when given,
/// otherwise the sampled proportions).
fn decode_room(
    area_range: (f32, f32),
    aspect_ratio: Option<f32>,
    vector: &RawRoomVector,
) -> (Point, Size, f32) {
    let rotation = quantize_rotation(vector.rotation());
    let (raw_width, raw_height) = if rotation == 90.0 {
        (vector.height(), vector.width())
    } else {
        (vector.width(), vector.height())
    };

    let aspect = aspect_ratio.unwrap_or_else(|| {
        if raw_height > f32::EPSILON {
            raw_width / raw_height
        } else {
            1.0
        }
    });
    let (area_min, area_max) = area_range;
    let area = (raw_width * raw_height).clamp(area_min, area_max);

    (
        Point::new(vector.cx(), vector.cy()),
        Size::new((area * aspect).sqrt(), (area / aspect).sqrt()),
        rotation,
    )
}

/// Quantizes a raw rotation channel to 0 or 90 degrees.
fn quantize_rotation(raw: f32) -> f32 {
    let degrees = (raw * 90.0).rem_euclid(180.0);
    if (45.0..135.0).contains(&degrees) {
        90.0
    } else {
        0.0
    }
}

/// Builds an axis-aligned room footprint.
fn footprint(center: Point, size: Size) -> Polygon {
    Polygon::new_from_rect(center, size, 0.0)
}

/// Maps graph edges onto canonical slots, sorted for determinism.
fn collect_bonds(graph: &ConstraintGraph, order: &[NodeIndex]) -> Vec<Bond> {
    let mut slot_by_node = vec![0usize; order.len()];
    for (slot, &node) in order.iter().enumerate() {
        slot_by_node[node.index()] = slot;
    }

    let mut bonds: Vec<Bond> = graph
        .edges_with_endpoints()
        .map(|(a, b, edge)| {
            let slot_a = slot_by_node[a.index()];
            let slot_b = slot_by_node[b.index()];
            Bond {
                a: slot_a.min(slot_b),
                b: slot_a.max(slot_b),
                kind: edge.kind(),
                weight: edge.weight(),
            }
        })
        .collect();
    bonds.sort_by_key(|bond| (bond.a, bond.b));
    bonds
}

/// Pushes overlapping rooms apart until the arrangement is clean.
///
/// Overlapping pairs move along the minimum translation vector scaled by
/// the damping factor; adjacency and containment bonds pull their rooms
/// together in proportion to the edge weight, separation bonds push theirs
/// apart while closer than the clearance. The loop stops as soon as the
/// largest pairwise overlap drops below the configured epsilon, so an
/// arrangement that starts clean is left untouched.
fn relax_overlaps(
    centers: &mut [Point],
    sizes: &[Size],
    bonds: &[Bond],
    config: &ResolverConfig,
) -> Result<(), MaquetteError> {
    let count = centers.len();
    let mut iteration = 0;
    loop {
        let polygons: Vec<Polygon> = centers
            .iter()
            .zip(sizes)
            .map(|(&center, &size)| footprint(center, size))
            .collect();

        let mut displacements = vec![Point::default(); count];
        let mut max_overlap = 0.0f32;
        for i in 0..count {
            for j in (i + 1)..count {
                if let Some(mtv) = polygons[i].separation_vector(&polygons[j]) {
                    max_overlap = max_overlap.max(polygons[i].intersection_area(&polygons[j]));
                    let push = mtv.scale(0.5 * config.damping());
                    displacements[i] = displacements[i].add_point(push);
                    displacements[j] = displacements[j].sub_point(push);
                }
            }
        }

        if max_overlap < config.overlap_epsilon() {
            debug!("Overlap relaxation converged after {iteration} iterations");
            return Ok(());
        }
        if iteration >= config.max_iterations() {
            return Err(MaquetteError::Validation(format!(
                "overlap resolution did not converge within {} iterations, residual overlap {max_overlap:.3} m2",
                config.max_iterations()
            )));
        }

        for bond in bonds {
            match bond.kind {
                EdgeKind::Adjacency | EdgeKind::Containment => {
                    let pull = centers[bond.b]
                        .sub_point(centers[bond.a])
                        .scale(config.attraction() * bond.weight);
                    displacements[bond.a] = displacements[bond.a].add_point(pull);
                    displacements[bond.b] = displacements[bond.b].sub_point(pull);
                }
                EdgeKind::Separation => {
                    let zone = polygons[bond.a].bounds().expand(SEPARATION_CLEARANCE);
                    if zone.intersects(&polygons[bond.b].bounds()) {
                        let apart = centers[bond.a]
                            .sub_point(centers[bond.b])
                            .normalized()
                            .scale(config.attraction() * bond.weight.abs());
                        displacements[bond.a] = displacements[bond.a].add_point(apart);
                        displacements[bond.b] = displacements[bond.b].sub_point(apart);
                    }
                }
            }
        }

        for (center, displacement) in centers.iter_mut().zip(&displacements) {
            *center = center.add_point(*displacement);
        }

        iteration += 1;
        trace!("Relaxation iteration {iteration}, max overlap {max_overlap:.3}");
    }
}

/// Aligns near-touching adjacency pairs onto exactly shared wall lines.
fn snap_walls(centers: &mut [Point], sizes: &[Size], bonds: &[Bond], tolerance: f32) {
    for bond in bonds.iter().filter(|b| b.kind == EdgeKind::Adjacency) {
        let bounds_a = Bounds::new_from_center(centers[bond.a], sizes[bond.a]);
        let bounds_b = Bounds::new_from_center(centers[bond.b], sizes[bond.b]);
        let Some(boundary) = bounds_a.shared_boundary(&bounds_b, tolerance) else {
            continue;
        };

        if boundary.is_vertical() {
            let line = boundary.start().x();
            centers[bond.a] =
                centers[bond.a].add_point(Point::new(line - nearest_face_x(bounds_a, line), 0.0));
            centers[bond.b] =
                centers[bond.b].add_point(Point::new(line - nearest_face_x(bounds_b, line), 0.0));
        } else {
            let line = boundary.start().y();
            centers[bond.a] =
                centers[bond.a].add_point(Point::new(0.0, line - nearest_face_y(bounds_a, line)));
            centers[bond.b] =
                centers[bond.b].add_point(Point::new(0.0, line - nearest_face_y(bounds_b, line)));
        }
    }
}

/// Returns the vertical face of the bounds closest to the given line.
fn nearest_face_x(bounds: Bounds, line: f32) -> f32 {
    if (bounds.max_x() - line).abs() <= (bounds.min_x() - line).abs() {
        bounds.max_x()
    } else {
        bounds.min_x()
    }
}

/// Returns the horizontal face of the bounds closest to the given line.
fn nearest_face_y(bounds: Bounds, line: f32) -> f32 {
    if (bounds.max_y() - line).abs() <= (bounds.min_y() - line).abs() {
        bounds.max_y()
    } else {
        bounds.min_y()
    }
}

/// Moves the arrangement into non-negative coordinates with a margin, and
/// scales it uniformly down when a site boundary cannot hold it.
///
/// Site fitting trades target areas for the site: a hard lot constraint
/// shrinks rooms below their target range rather than spilling over.
fn normalize(
    centers: &mut [Point],
    sizes: &mut [Size],
    site: Option<SiteBoundary>,
    config: &ResolverConfig,
) -> Result<(), MaquetteError> {
    let margin = config.margin();

    if let Some(site) = site {
        let available_width = site.width() - 2.0 * margin;
        let available_depth = site.depth() - 2.0 * margin;
        if available_width <= 0.0 || available_depth <= 0.0 {
            return Err(MaquetteError::Validation(format!(
                "site boundary {}x{} cannot hold the {margin} m layout margin",
                site.width(),
                site.depth()
            )));
        }

        let bounds = arrangement_bounds(centers, sizes);
        let factor = (available_width / bounds.width())
            .min(available_depth / bounds.height())
            .min(1.0);
        if factor < 1.0 {
            debug!("Scaling layout by {factor:.3} to fit the site boundary");
            for center in centers.iter_mut() {
                *center = center.scale(factor);
            }
            for size in sizes.iter_mut() {
                *size = size.scale(factor);
            }
        }
    }

    let bounds = arrangement_bounds(centers, sizes);
    let offset = Point::new(margin - bounds.min_x(), margin - bounds.min_y());
    for center in centers.iter_mut() {
        *center = center.add_point(offset);
    }
    Ok(())
}

/// Merged axis-aligned bounds of all room footprints.
fn arrangement_bounds(centers: &[Point], sizes: &[Size]) -> Bounds {
    centers
        .iter()
        .zip(sizes)
        .map(|(&center, &size)| Bounds::new_from_center(center, size))
        .reduce(|merged, bounds| merged.merge(&bounds))
        .expect("Layout should have at least one room")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use float_cmp::assert_approx_eq;
    use maquette_core::program::{ArchitecturalProgram, RoomRequirement};

    fn build(rooms: Vec<RoomRequirement>) -> ConstraintGraph {
        let program = ArchitecturalProgram::new(rooms);
        ConstraintGraph::from_program(&program, &GraphConfig::default()).unwrap()
    }

    fn vector(cx: f32, cy: f32, w: f32, h: f32) -> RawRoomVector {
        RawRoomVector::new(cx, cy, w, h, 0.0)
    }

    #[test]
    fn test_vector_count_mismatch_rejected() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("office"), RoomType::Office),
        ]);
        let raw = vec![vector(0.0, 0.0, 4.0, 4.0)];
        let result = resolve_layout(&graph, &raw, None, &ResolverConfig::default());
        assert!(matches!(result, Err(MaquetteError::Encoding(_))));
    }

    #[test]
    fn test_overlapping_rooms_are_separated() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("office"), RoomType::Office),
        ]);
        // Both rooms start on the same spot.
        let raw = vec![vector(0.0, 0.0, 3.5, 3.5), vector(0.2, 0.1, 3.5, 3.5)];
        let config = ResolverConfig::default();

        let (layout, _) = resolve_layout(&graph, &raw, None, &config).unwrap();
        let a = layout.rooms()[0].polygon();
        let b = layout.rooms()[1].polygon();
        assert!(a.intersection_area(b) < config.overlap_epsilon());
    }

    #[test]
    fn test_unresolvable_overlap_reports_divergence() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("office"), RoomType::Office),
        ]);
        let raw = vec![vector(0.0, 0.0, 4.0, 4.0), vector(0.0, 0.0, 4.0, 4.0)];
        // Zero damping never moves anything, so the cap must fire.
        let config: ResolverConfig =
            serde_json::from_str(r#"{ "damping": 0.0, "max_iterations": 3 }"#).unwrap();

        let result = resolve_layout(&graph, &raw, None, &config);
        assert!(matches!(result, Err(MaquetteError::Validation(_))));
    }

    #[test]
    fn test_layout_normalized_to_margin() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("office"), RoomType::Office),
        ]);
        let raw = vec![
            vector(-20.0, -14.0, 3.5, 3.5),
            vector(-8.0, -14.0, 3.5, 3.5),
        ];
        let config = ResolverConfig::default();

        let (layout, _) = resolve_layout(&graph, &raw, None, &config).unwrap();
        let bounds = layout.bounding_box();
        assert_approx_eq!(f32, bounds.min_x(), config.margin(), epsilon = 1e-4);
        assert_approx_eq!(f32, bounds.min_y(), config.margin(), epsilon = 1e-4);
    }

    #[test]
    fn test_single_room_area_clamped_to_target_range() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("studio"), RoomType::Other)
                .with_area_range(20.0, 30.0),
        ]);
        // Raw area far beyond the range: 10 x 8 = 80.
        let raw = vec![vector(0.0, 0.0, 10.0, 8.0)];

        let (layout, _) = resolve_layout(&graph, &raw, None, &ResolverConfig::default()).unwrap();
        assert_eq!(layout.rooms().len(), 1);
        let area = layout.rooms()[0].area();
        assert!((20.0 - 1e-2..=30.0 + 1e-2).contains(&area), "area {area}");
    }

    #[test]
    fn test_declared_adjacency_is_snapped_and_satisfied() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom)
                .with_adjacent_to(vec![RoomId::new("bathroom")]),
            RoomRequirement::new(RoomId::new("bathroom"), RoomType::Bathroom),
        ]);
        // A thin gap within snapping tolerance: faces at 1.1 and 1.2.
        let raw = vec![vector(0.0, 0.0, 2.2, 2.2), vector(3.0, 0.0, 3.6, 3.6)];
        let config = ResolverConfig::default();

        let (layout, report) = resolve_layout(&graph, &raw, None, &config).unwrap();

        let entry = report
            .find(RoomId::new("bedroom"), RoomId::new("bathroom"))
            .unwrap();
        assert!(entry.satisfied());
        assert_eq!(layout.walls().len(), 1);
        assert!(layout.walls()[0].segment().length() > 0.0);

        // Faces are flush after snapping.
        let bathroom = layout.room(RoomId::new("bathroom")).unwrap().bounds();
        let bedroom = layout.room(RoomId::new("bedroom")).unwrap().bounds();
        assert_approx_eq!(f32, bathroom.max_x(), bedroom.min_x(), epsilon = 1e-4);
    }

    #[test]
    fn test_distant_adjacency_reported_unsatisfied() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom)
                .with_adjacent_to(vec![RoomId::new("bathroom")]),
            RoomRequirement::new(RoomId::new("bathroom"), RoomType::Bathroom),
        ]);
        let raw = vec![vector(0.0, 0.0, 2.2, 2.2), vector(20.0, 0.0, 3.6, 3.6)];

        let (layout, report) =
            resolve_layout(&graph, &raw, None, &ResolverConfig::default()).unwrap();

        let entry = report
            .find(RoomId::new("bedroom"), RoomId::new("bathroom"))
            .unwrap();
        assert!(!entry.satisfied());
        assert!(layout.walls().is_empty());
        assert!(layout.openings().is_empty());
    }

    #[test]
    fn test_report_has_one_entry_per_edge() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("kitchen"), RoomType::Kitchen)
                .with_adjacent_to(vec![RoomId::new("dining")]),
            RoomRequirement::new(RoomId::new("dining"), RoomType::DiningRoom),
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("corridor"), RoomType::Corridor),
        ]);
        let raw = vec![
            vector(0.0, 0.0, 3.0, 3.0),
            vector(8.0, 0.0, 3.5, 3.5),
            vector(0.0, 8.0, 3.5, 3.5),
            vector(8.0, 8.0, 2.5, 2.5),
        ];

        let (_, report) = resolve_layout(&graph, &raw, None, &ResolverConfig::default()).unwrap();
        assert_eq!(report.len(), graph.edge_count());
        assert!(report.find(RoomId::new("kitchen"), RoomId::new("dining")).is_some());
        assert!(report.find(RoomId::new("bedroom"), RoomId::new("corridor")).is_some());
    }

    #[test]
    fn test_separation_edge_flags_contact() {
        // Bedroom and garage carry a default separation rule.
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("garage"), RoomType::Garage),
        ]);

        // Flush contact: faces touch exactly, no overlap to relax.
        let touching = vec![vector(0.0, 0.0, 4.0, 4.0), vector(4.0, 0.0, 4.0, 4.0)];
        let (_, report) =
            resolve_layout(&graph, &touching, None, &ResolverConfig::default()).unwrap();
        let entry = report
            .find(RoomId::new("bedroom"), RoomId::new("garage"))
            .unwrap();
        assert_eq!(entry.kind(), EdgeKind::Separation);
        assert!(!entry.satisfied());

        // Far apart: the separation holds.
        let apart = vec![vector(0.0, 0.0, 4.0, 4.0), vector(20.0, 0.0, 4.0, 4.0)];
        let (_, report) = resolve_layout(&graph, &apart, None, &ResolverConfig::default()).unwrap();
        assert!(
            report
                .find(RoomId::new("bedroom"), RoomId::new("garage"))
                .unwrap()
                .satisfied()
        );
    }

    #[test]
    fn test_door_centered_on_wall_with_config_width() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom)
                .with_adjacent_to(vec![RoomId::new("bathroom")]),
            RoomRequirement::new(RoomId::new("bathroom"), RoomType::Bathroom),
        ]);
        let raw = vec![vector(0.0, 0.0, 2.2, 2.2), vector(2.9, 0.0, 3.6, 3.6)];
        let config = ResolverConfig::default();

        let (layout, _) = resolve_layout(&graph, &raw, None, &config).unwrap();
        assert_eq!(layout.openings().len(), 1);
        let wall = layout.walls()[0].segment();
        let door = layout.openings()[0].segment();
        assert_approx_eq!(f32, door.length(), config.door_width(), epsilon = 1e-4);
        assert_approx_eq!(f32, door.midpoint().x(), wall.midpoint().x(), epsilon = 1e-4);
        assert_approx_eq!(f32, door.midpoint().y(), wall.midpoint().y(), epsilon = 1e-4);
    }

    #[test]
    fn test_site_boundary_scales_layout_down() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("living_room"), RoomType::LivingRoom),
        ]);
        let raw = vec![vector(0.0, 0.0, 6.0, 4.0)];
        let config = ResolverConfig::default();
        let site = SiteBoundary::new(5.0, 5.0);

        let (layout, _) = resolve_layout(&graph, &raw, Some(site), &config).unwrap();
        let bounds = layout.bounding_box();
        assert!(bounds.max_x() <= site.width() - config.margin() + 1e-3);
        assert!(bounds.max_y() <= site.depth() - config.margin() + 1e-3);
        assert!(bounds.min_x() >= config.margin() - 1e-3);
    }

    #[test]
    fn test_too_small_site_rejected() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("living_room"), RoomType::LivingRoom),
        ]);
        let raw = vec![vector(0.0, 0.0, 6.0, 4.0)];
        let site = SiteBoundary::new(0.5, 0.5);

        let result = resolve_layout(&graph, &raw, Some(site), &ResolverConfig::default());
        assert!(matches!(result, Err(MaquetteError::Validation(_))));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("bedroom"), RoomType::Bedroom),
            RoomRequirement::new(RoomId::new("office"), RoomType::Office),
            RoomRequirement::new(RoomId::new("kitchen"), RoomType::Kitchen),
        ]);
        let raw = vec![
            vector(0.0, 0.0, 3.5, 3.5),
            vector(1.0, 1.0, 3.5, 3.5),
            vector(-1.0, 2.0, 3.2, 3.2),
        ];
        let config = ResolverConfig::default();

        let first = resolve_layout(&graph, &raw, None, &config).unwrap();
        let second = resolve_layout(&graph, &raw, None, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_explicit_aspect_ratio_wins() {
        let graph = build(vec![
            RoomRequirement::new(RoomId::new("hall"), RoomType::Corridor)
                .with_area_range(8.0, 8.0)
                .with_aspect_ratio(2.0),
        ]);
        // Sampled proportions are square; the declared ratio overrides them.
        let raw = vec![vector(0.0, 0.0, 3.0, 3.0)];

        let (layout, _) = resolve_layout(&graph, &raw, None, &ResolverConfig::default()).unwrap();
        let room = &layout.rooms()[0];
        assert_approx_eq!(f32, room.width() / room.height(), 2.0, epsilon = 1e-4);
        assert_approx_eq!(f32, room.area(), 8.0, epsilon = 1e-3);
    }

    #[test]
    fn test_quarter_turn_swaps_footprint() {
        // 1.0 on the rotation channel is a quarter turn.
        let swapped = RawRoomVector::new(0.0, 0.0, 6.0, 3.0, 1.0);
        let (_, size, rotation) = decode_room((18.0, 18.0), None, &swapped);
        assert_eq!(rotation, 90.0);
        assert!(size.width() < size.height());

        let level = RawRoomVector::new(0.0, 0.0, 6.0, 3.0, 0.0);
        let (_, size, rotation) = decode_room((18.0, 18.0), None, &level);
        assert_eq!(rotation, 0.0);
        assert!(size.width() > size.height());
    }

    #[test]
    fn test_quantize_rotation_bands() {
        assert_eq!(quantize_rotation(0.0), 0.0);
        assert_eq!(quantize_rotation(1.0), 90.0);
        assert_eq!(quantize_rotation(-1.0), 90.0);
        assert_eq!(quantize_rotation(0.2), 0.0);
        assert_eq!(quantize_rotation(1.9), 0.0);
    }
}
