//! Constraint graph construction from an architectural program.
//!
//! This module turns a validated [`ArchitecturalProgram`] into the
//! [`ConstraintGraph`] consumed by the encoder, the synthesis backends, and
//! the geometry resolver. Rooms become nodes, declared and implied spatial
//! relations become weighted edges.
//!
//! # Overview
//!
//! - [`RoomNode`] - One room instance with its resolved target area range.
//! - [`ConstraintEdge`] - A weighted relation of a given [`EdgeKind`].
//! - [`ConstraintGraph`] - Undirected graph keyed by stable [`RoomId`]s.
//! - [`GraphSnapshot`] - Sorted, serializable dump for logging and tests.
//!
//! Construction expands `count` fields into numbered instances, connects
//! explicitly declared adjacencies with full weight, and then fills in
//! type-pair rules from [`GraphConfig`] where no explicit relation exists.
//! A disconnected graph is legal (detached garages are a thing) but is
//! logged, since downstream relaxation tends to scatter isolated rooms.
//!
//! # Pipeline Position
//!
//! ```text
//! ArchitecturalProgram -> [ConstraintGraph] -> encode -> sample/template -> resolve
//! ```

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    algo::connected_components,
    graph::{EdgeIndex, NodeIndex, UnGraph},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use maquette_core::{
    identifier::RoomId,
    program::{ArchitecturalProgram, RoomType},
};

use crate::{config::GraphConfig, error::MaquetteError};

/// Weight assigned to adjacencies the program declares explicitly.
const EXPLICIT_ADJACENCY_WEIGHT: f32 = 1.0;

/// The kind of spatial relation an edge encodes.
///
/// Adjacency edges pull rooms together and are expected to end up sharing a
/// wall. Separation edges push rooms apart. Containment edges require one
/// room's polygon to enclose the other's and currently only arise from
/// external graph sources, never from the built-in rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Adjacency,
    Containment,
    Separation,
}

impl FromStr for EdgeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adjacency" => Ok(EdgeKind::Adjacency),
            "containment" => Ok(EdgeKind::Containment),
            "separation" => Ok(EdgeKind::Separation),
            _ => Err(()),
        }
    }
}

impl From<EdgeKind> for &'static str {
    fn from(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Adjacency => "adjacency",
            EdgeKind::Containment => "containment",
            EdgeKind::Separation => "separation",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// One room instance in the constraint graph.
///
/// Carries everything downstream stages need to know about the room without
/// reaching back into the program: the stable instance id, a display name
/// for labeling, the room type, the resolved target area range and the
/// optional preferred aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomNode {
    id: RoomId,
    name: String,
    room_type: RoomType,
    area_range: (f32, f32),
    aspect_ratio: Option<f32>,
}

impl RoomNode {
    /// Creates a room node.
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        room_type: RoomType,
        area_range: (f32, f32),
        aspect_ratio: Option<f32>,
    ) -> Self {
        RoomNode {
            id,
            name: name.into(),
            room_type,
            area_range,
            aspect_ratio,
        }
    }

    /// Returns the stable instance identifier.
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Returns the display name used for labels.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the room type.
    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    /// Returns the resolved `(min, max)` target area range in square meters.
    pub fn area_range(&self) -> (f32, f32) {
        self.area_range
    }

    /// Returns the midpoint of the target area range.
    pub fn target_area(&self) -> f32 {
        (self.area_range.0 + self.area_range.1) / 2.0
    }

    /// Returns the preferred width to height ratio, if one was declared.
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.aspect_ratio
    }
}

/// A weighted spatial relation between two rooms.
///
/// Positive weights attract, negative weights repel. Edge endpoints live in
/// the surrounding graph structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintEdge {
    kind: EdgeKind,
    weight: f32,
}

impl ConstraintEdge {
    /// Creates a constraint edge.
    pub fn new(kind: EdgeKind, weight: f32) -> Self {
        ConstraintEdge { kind, weight }
    }

    /// Returns the relation kind.
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Returns the signed attraction weight.
    pub fn weight(&self) -> f32 {
        self.weight
    }
}

/// The constraint graph for one generation request.
///
/// Nodes are expanded room instances, edges are weighted spatial relations.
/// The graph is undirected: adjacency and separation are symmetric, and the
/// single containment orientation is recorded on the edge endpoints in
/// declaration order. Node identity is stable under program reordering, so
/// two programs declaring the same rooms in different orders produce graphs
/// with identical [`GraphSnapshot`]s.
#[derive(Debug)]
pub struct ConstraintGraph {
    graph: UnGraph<RoomNode, ConstraintEdge>,
    node_id_map: IndexMap<RoomId, NodeIndex>,
}

impl ConstraintGraph {
    /// Builds the constraint graph from a program.
    ///
    /// The program is validated first; `count` fields are then expanded into
    /// numbered instances, declared adjacencies become full-weight edges and
    /// the [`GraphConfig`] rule tables fill in default relations for
    /// type pairs with no explicit edge.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Validation`] when the program fails
    /// validation (empty room list, duplicate or unknown identifiers,
    /// inverted area ranges).
    ///
    /// # Examples
    ///
    /// ```
    /// # use maquette::config::GraphConfig;
    /// # use maquette::graph::ConstraintGraph;
    /// # use maquette_core::identifier::RoomId;
    /// # use maquette_core::program::{ArchitecturalProgram, RoomRequirement, RoomType};
    /// let program = ArchitecturalProgram::new(vec![
    ///     RoomRequirement::new(RoomId::new("living_room"), RoomType::LivingRoom),
    ///     RoomRequirement::new(RoomId::new("kitchen"), RoomType::Kitchen)
    ///         .with_adjacent_to(vec![RoomId::new("living_room")]),
    /// ]);
    /// let graph = ConstraintGraph::from_program(&program, &GraphConfig::default())?;
    /// assert_eq!(graph.node_count(), 2);
    /// # Ok::<(), maquette::error::MaquetteError>(())
    /// ```
    pub fn from_program(
        program: &ArchitecturalProgram,
        config: &GraphConfig,
    ) -> Result<Self, MaquetteError> {
        program.validate()?;

        trace!(program:?; "Building constraint graph");

        let mut constraint_graph = ConstraintGraph {
            graph: UnGraph::new_undirected(),
            node_id_map: IndexMap::new(),
        };

        // First pass: expand every requirement into its room instances.
        for requirement in program.rooms() {
            let area_range = requirement.target_area_range();
            if requirement.count() == 1 {
                constraint_graph.add_room(RoomNode::new(
                    requirement.id(),
                    requirement.display_name(),
                    requirement.room_type(),
                    area_range,
                    requirement.aspect_ratio(),
                ));
            } else {
                for index in 1..=requirement.count() {
                    let instance_id = requirement.id().instance(index);
                    let instance_name = match requirement.name() {
                        Some(name) => format!("{name} {index}"),
                        None => instance_id.to_string(),
                    };
                    constraint_graph.add_room(RoomNode::new(
                        instance_id,
                        instance_name,
                        requirement.room_type(),
                        area_range,
                        requirement.aspect_ratio(),
                    ));
                }
            }
        }

        // Second pass: declared adjacencies. A declared reference connects
        // every instance of the declaring requirement to every instance of
        // the referenced one; declaring both directions yields one edge.
        for requirement in program.rooms() {
            let sources = constraint_graph.instance_indices(requirement.id(), requirement.count());
            for reference in requirement.adjacent_to() {
                let reference_count = program
                    .rooms()
                    .iter()
                    .find(|candidate| candidate.id() == *reference)
                    .map(|candidate| candidate.count())
                    .unwrap_or(1);
                let targets = constraint_graph.instance_indices(*reference, reference_count);
                for &source in &sources {
                    for &target in &targets {
                        constraint_graph.add_relation(
                            source,
                            target,
                            ConstraintEdge::new(EdgeKind::Adjacency, EXPLICIT_ADJACENCY_WEIGHT),
                        );
                    }
                }
            }
        }

        // Third pass: type-pair rules for node pairs with no explicit edge.
        constraint_graph.apply_default_rules(config);

        let components = connected_components(&constraint_graph.graph);
        if components > 1 {
            debug!(
                "Constraint graph is disconnected ({components} components); \
                 isolated rooms will drift during relaxation"
            );
        }

        debug!(
            "Built constraint graph with {} nodes and {} edges",
            constraint_graph.node_count(),
            constraint_graph.edge_count()
        );

        Ok(constraint_graph)
    }

    /// Returns the total number of room nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the total number of constraint edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the node index for a room instance id, if present.
    pub fn node_index(&self, id: &RoomId) -> Option<NodeIndex> {
        self.node_id_map.get(id).copied()
    }

    /// Returns the room node for the given index.
    ///
    /// # Panics
    /// Panics if the node index does not exist in the graph.
    pub fn node_from_idx(&self, node_index: NodeIndex) -> &RoomNode {
        self.graph
            .node_weight(node_index)
            .expect("Node index should exist")
    }

    /// Returns an iterator over all node indices.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Returns an iterator over all nodes with their indices.
    pub fn nodes_with_indices(&self) -> impl Iterator<Item = (NodeIndex, &RoomNode)> {
        self.graph.node_indices().map(|idx| {
            (
                idx,
                self.graph.node_weight(idx).expect("Node idx should exist"),
            )
        })
    }

    /// Returns node indices sorted by room id string.
    ///
    /// This is the canonical room ordering shared by the encoder, the
    /// synthesis backends, and the resolver. Sorting by the id string rather
    /// than insertion order makes every downstream stage independent of the
    /// order rooms were declared in.
    pub fn canonical_order(&self) -> Vec<NodeIndex> {
        let mut indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        indices.sort_by_key(|&idx| self.node_from_idx(idx).id().to_string());
        indices
    }

    /// Returns an iterator over all edge indices.
    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        self.graph.edge_indices()
    }

    /// Returns the edge data for the given index, if present.
    pub fn edge_weight(&self, edge_index: EdgeIndex) -> Option<&ConstraintEdge> {
        self.graph.edge_weight(edge_index)
    }

    /// Returns the endpoints of the given edge, if present.
    pub fn edge_endpoints(&self, edge_index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge_index)
    }

    /// Returns an iterator over all edges with their endpoint indices.
    pub fn edges_with_endpoints(
        &self,
    ) -> impl Iterator<Item = (NodeIndex, NodeIndex, &ConstraintEdge)> {
        self.graph.edge_indices().map(|idx| {
            let (source, target) = self
                .graph
                .edge_endpoints(idx)
                .expect("Edge index should exist");
            (
                source,
                target,
                self.graph
                    .edge_weight(idx)
                    .expect("Edge index should exist"),
            )
        })
    }

    /// Returns an iterator over the neighbors of a node.
    pub fn neighbors(&self, node_index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(node_index)
    }

    /// Returns the edge between two nodes, if one exists.
    pub fn find_edge(&self, a: NodeIndex, b: NodeIndex) -> Option<&ConstraintEdge> {
        self.graph
            .find_edge(a, b)
            .and_then(|idx| self.graph.edge_weight(idx))
    }

    /// Reports whether every room is reachable from every other room.
    ///
    /// Disconnected graphs are legal input. Callers use this as a quality
    /// probe, not as a validation gate.
    pub fn is_connected(&self) -> bool {
        self.graph.node_count() == 0 || connected_components(&self.graph) == 1
    }

    /// Produces a sorted, serializable snapshot of the graph.
    ///
    /// Nodes are ordered by id string and edge endpoints are normalized so
    /// that two graphs with the same content compare equal regardless of
    /// construction order.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<NodeSnapshot> = self
            .nodes_with_indices()
            .map(|(_, node)| NodeSnapshot {
                id: node.id().to_string(),
                name: node.name().to_string(),
                room_type: node.room_type(),
                area_range: node.area_range(),
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<EdgeSnapshot> = self
            .edges_with_endpoints()
            .map(|(source, target, edge)| {
                let mut a = self.node_from_idx(source).id().to_string();
                let mut b = self.node_from_idx(target).id().to_string();
                if b < a {
                    std::mem::swap(&mut a, &mut b);
                }
                EdgeSnapshot {
                    a,
                    b,
                    kind: edge.kind(),
                    weight: edge.weight(),
                }
            })
            .collect();
        edges.sort_by(|x, y| (&x.a, &x.b).cmp(&(&y.a, &y.b)));

        GraphSnapshot { nodes, edges }
    }

    fn add_room(&mut self, node: RoomNode) {
        let id = node.id();
        let idx = self.graph.add_node(node);
        self.node_id_map.insert(id, idx);
    }

    /// Adds an edge unless the pair is already related. Self relations are
    /// ignored.
    fn add_relation(&mut self, a: NodeIndex, b: NodeIndex, edge: ConstraintEdge) {
        if a == b {
            return;
        }
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, edge);
        }
    }

    /// Resolves the node indices a requirement expanded into.
    fn instance_indices(&self, id: RoomId, count: usize) -> Vec<NodeIndex> {
        if count == 1 {
            self.node_index(&id).into_iter().collect()
        } else {
            (1..=count)
                .filter_map(|index| self.node_index(&id.instance(index)))
                .collect()
        }
    }

    /// Applies the configured type-pair tables to unrelated node pairs.
    ///
    /// Adjacency rules take precedence over separation rules for a pair that
    /// somehow matches both.
    fn apply_default_rules(&mut self, config: &GraphConfig) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for (position, &a) in indices.iter().enumerate() {
            for &b in &indices[position + 1..] {
                if self.graph.find_edge(a, b).is_some() {
                    continue;
                }
                let type_a = self.node_from_idx(a).room_type();
                let type_b = self.node_from_idx(b).room_type();

                if let Some(rule) = config
                    .default_adjacency()
                    .iter()
                    .find(|rule| rule.matches(type_a, type_b))
                {
                    self.graph
                        .add_edge(a, b, ConstraintEdge::new(EdgeKind::Adjacency, rule.weight()));
                } else if let Some(rule) = config
                    .default_separation()
                    .iter()
                    .find(|rule| rule.matches(type_a, type_b))
                {
                    self.graph.add_edge(
                        a,
                        b,
                        ConstraintEdge::new(EdgeKind::Separation, rule.weight()),
                    );
                }
            }
        }
    }
}

/// A node entry in a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    id: String,
    name: String,
    room_type: RoomType,
    area_range: (f32, f32),
}

/// An edge entry in a [`GraphSnapshot`]. Endpoints are sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSnapshot {
    a: String,
    b: String,
    kind: EdgeKind,
    weight: f32,
}

/// A sorted, serializable dump of a [`ConstraintGraph`].
///
/// Used for debug logging and for order-independence checks in tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    nodes: Vec<NodeSnapshot>,
    edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    /// Returns the sorted node entries.
    pub fn nodes(&self) -> &[NodeSnapshot] {
        &self.nodes
    }

    /// Returns the sorted edge entries.
    pub fn edges(&self) -> &[EdgeSnapshot] {
        &self.edges
    }
}
