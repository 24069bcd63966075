//! Configuration types for layout generation.
//!
//! This module provides configuration structures that control how layouts are
//! synthesized, repaired, and exported. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`GenerationConfig`] - Top-level configuration combining all sections.
//! - [`GraphConfig`] - Default adjacency and separation rules applied by the graph builder.
//! - [`SamplerConfig`] - Denoising step count and retry bound for the diffusion path.
//! - [`ResolverConfig`] - Relaxation loop bounds, snapping tolerance, and door width.
//! - [`ExportConfig`] - Drawing scale and wall dimensions.
//!
//! # Example
//!
//! ```
//! # use maquette::config::GenerationConfig;
//! // Use default configuration
//! let config = GenerationConfig::default();
//! assert_eq!(config.sampler().steps(), 50);
//! assert_eq!(config.export().wall_height(), 3.0);
//! ```

use serde::Deserialize;

use maquette_core::program::RoomType;

/// Top-level configuration for one engine instance.
///
/// Groups the per-stage sections into a single configuration root. Every
/// section falls back to shipped defaults when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationConfig {
    /// Graph builder rules section.
    #[serde(default)]
    graph: GraphConfig,

    /// Diffusion sampler section.
    #[serde(default)]
    sampler: SamplerConfig,

    /// Geometry resolver section.
    #[serde(default)]
    resolver: ResolverConfig,

    /// Export and extrusion section.
    #[serde(default)]
    export: ExportConfig,
}

impl GenerationConfig {
    /// Creates a new [`GenerationConfig`] from its sections.
    pub fn new(
        graph: GraphConfig,
        sampler: SamplerConfig,
        resolver: ResolverConfig,
        export: ExportConfig,
    ) -> Self {
        Self {
            graph,
            sampler,
            resolver,
            export,
        }
    }

    /// Returns the graph builder rules.
    pub fn graph(&self) -> &GraphConfig {
        &self.graph
    }

    /// Returns the sampler configuration.
    pub fn sampler(&self) -> &SamplerConfig {
        &self.sampler
    }

    /// Returns the resolver configuration.
    pub fn resolver(&self) -> &ResolverConfig {
        &self.resolver
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }
}

/// A symmetric room-type pair rule with an edge weight.
///
/// Rules are unordered: `(kitchen, dining_room)` matches both directions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypePairRule {
    first: RoomType,
    second: RoomType,
    weight: f32,
}

impl TypePairRule {
    /// Creates a rule for the unordered pair of room types.
    pub fn new(first: RoomType, second: RoomType, weight: f32) -> Self {
        Self {
            first,
            second,
            weight,
        }
    }

    /// Returns the rule weight
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Checks whether the rule covers the unordered pair of types
    pub fn matches(&self, a: RoomType, b: RoomType) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Default edge rules applied by the graph builder on top of explicit
/// program adjacencies.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Room-type pairs that attract each other when both are present.
    #[serde(default = "GraphConfig::default_adjacency_rules")]
    default_adjacency: Vec<TypePairRule>,

    /// Room-type pairs that should be kept apart.
    #[serde(default = "GraphConfig::default_separation_rules")]
    default_separation: Vec<TypePairRule>,
}

impl GraphConfig {
    fn default_adjacency_rules() -> Vec<TypePairRule> {
        vec![
            TypePairRule::new(RoomType::Kitchen, RoomType::DiningRoom, 0.5),
            TypePairRule::new(RoomType::LivingRoom, RoomType::Entrance, 0.5),
            TypePairRule::new(RoomType::Bedroom, RoomType::Corridor, 0.5),
        ]
    }

    fn default_separation_rules() -> Vec<TypePairRule> {
        vec![
            TypePairRule::new(RoomType::Bedroom, RoomType::Garage, -0.5),
            TypePairRule::new(RoomType::Bedroom, RoomType::Utility, -0.5),
        ]
    }

    /// Returns the default adjacency rules
    pub fn default_adjacency(&self) -> &[TypePairRule] {
        &self.default_adjacency
    }

    /// Returns the default separation rules
    pub fn default_separation(&self) -> &[TypePairRule] {
        &self.default_separation
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_adjacency: Self::default_adjacency_rules(),
            default_separation: Self::default_separation_rules(),
        }
    }
}

/// Configuration of the diffusion sampler.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    /// Number of denoising steps per sampling run.
    #[serde(default = "SamplerConfig::default_steps")]
    steps: usize,

    /// How many fresh-seed retries a diverged run is granted.
    #[serde(default = "SamplerConfig::default_max_retries")]
    max_retries: u32,
}

impl SamplerConfig {
    fn default_steps() -> usize {
        50
    }

    fn default_max_retries() -> u32 {
        3
    }

    /// Creates a sampler configuration with the given step count and retry bound.
    pub fn new(steps: usize, max_retries: u32) -> Self {
        Self { steps, max_retries }
    }

    /// Returns the number of denoising steps
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the retry bound for diverged runs
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            steps: Self::default_steps(),
            max_retries: Self::default_max_retries(),
        }
    }
}

/// Configuration of the geometry resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Hard cap on relaxation iterations.
    #[serde(default = "ResolverConfig::default_max_iterations")]
    max_iterations: usize,

    /// Convergence threshold on the maximum pairwise overlap area, in m².
    #[serde(default = "ResolverConfig::default_overlap_epsilon")]
    overlap_epsilon: f32,

    /// Fraction of each correction applied per iteration.
    #[serde(default = "ResolverConfig::default_damping")]
    damping: f32,

    /// Strength of the pull between adjacency pairs, per unit weight.
    #[serde(default = "ResolverConfig::default_attraction")]
    attraction: f32,

    /// Distance within which adjacent room edges snap to a shared wall, in meters.
    #[serde(default = "ResolverConfig::default_snap_tolerance")]
    snap_tolerance: f32,

    /// Door opening width, in meters.
    #[serde(default = "ResolverConfig::default_door_width")]
    door_width: f32,

    /// Margin kept around the layout during normalization, in meters.
    #[serde(default = "ResolverConfig::default_margin")]
    margin: f32,
}

impl ResolverConfig {
    fn default_max_iterations() -> usize {
        200
    }

    fn default_overlap_epsilon() -> f32 {
        0.01
    }

    fn default_damping() -> f32 {
        0.5
    }

    fn default_attraction() -> f32 {
        0.1
    }

    fn default_snap_tolerance() -> f32 {
        0.3
    }

    fn default_door_width() -> f32 {
        0.9
    }

    fn default_margin() -> f32 {
        0.5
    }

    /// Returns the relaxation iteration cap
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the convergence threshold on pairwise overlap area
    pub fn overlap_epsilon(&self) -> f32 {
        self.overlap_epsilon
    }

    /// Returns the per-iteration damping factor
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Returns the adjacency attraction strength
    pub fn attraction(&self) -> f32 {
        self.attraction
    }

    /// Returns the wall snapping tolerance
    pub fn snap_tolerance(&self) -> f32 {
        self.snap_tolerance
    }

    /// Returns the door opening width
    pub fn door_width(&self) -> f32 {
        self.door_width
    }

    /// Returns the normalization margin
    pub fn margin(&self) -> f32 {
        self.margin
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: Self::default_max_iterations(),
            overlap_epsilon: Self::default_overlap_epsilon(),
            damping: Self::default_damping(),
            attraction: Self::default_attraction(),
            snap_tolerance: Self::default_snap_tolerance(),
            door_width: Self::default_door_width(),
            margin: Self::default_margin(),
        }
    }
}

/// Configuration of drawing scale and extrusion dimensions.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// SVG pixels per meter.
    #[serde(default = "ExportConfig::default_svg_scale")]
    svg_scale: f32,

    /// Wall height used for extrusion, in meters.
    #[serde(default = "ExportConfig::default_wall_height")]
    wall_height: f32,

    /// Wall thickness used for extrusion, in meters.
    #[serde(default = "ExportConfig::default_wall_thickness")]
    wall_thickness: f32,
}

impl ExportConfig {
    fn default_svg_scale() -> f32 {
        50.0
    }

    fn default_wall_height() -> f32 {
        3.0
    }

    fn default_wall_thickness() -> f32 {
        0.2
    }

    /// Returns the SVG drawing scale in pixels per meter
    pub fn svg_scale(&self) -> f32 {
        self.svg_scale
    }

    /// Returns the wall height in meters
    pub fn wall_height(&self) -> f32 {
        self.wall_height
    }

    /// Returns the wall thickness in meters
    pub fn wall_thickness(&self) -> f32 {
        self.wall_thickness
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            svg_scale: Self::default_svg_scale(),
            wall_height: Self::default_wall_height(),
            wall_thickness: Self::default_wall_thickness(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sections() {
        let config = GenerationConfig::default();
        assert_eq!(config.sampler().steps(), 50);
        assert_eq!(config.sampler().max_retries(), 3);
        assert_eq!(config.resolver().max_iterations(), 200);
        assert_eq!(config.resolver().door_width(), 0.9);
        assert_eq!(config.export().svg_scale(), 50.0);
        assert_eq!(config.export().wall_thickness(), 0.2);
    }

    #[test]
    fn test_default_graph_rules() {
        let config = GraphConfig::default();
        assert!(
            config
                .default_adjacency()
                .iter()
                .any(|rule| rule.matches(RoomType::Kitchen, RoomType::DiningRoom))
        );
        assert!(
            config
                .default_separation()
                .iter()
                .any(|rule| rule.matches(RoomType::Garage, RoomType::Bedroom))
        );
    }

    #[test]
    fn test_type_pair_rule_is_unordered() {
        let rule = TypePairRule::new(RoomType::Kitchen, RoomType::DiningRoom, 0.5);
        assert!(rule.matches(RoomType::Kitchen, RoomType::DiningRoom));
        assert!(rule.matches(RoomType::DiningRoom, RoomType::Kitchen));
        assert!(!rule.matches(RoomType::Kitchen, RoomType::Bedroom));
        assert_eq!(rule.weight(), 0.5);
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{ "sampler": { "steps": 10 } }"#;
        let config: GenerationConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.sampler().steps(), 10);
        // Untouched fields keep their defaults.
        assert_eq!(config.sampler().max_retries(), 3);
        assert_eq!(config.resolver().max_iterations(), 200);
    }
}
