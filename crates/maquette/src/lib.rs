//! Maquette Layout Generation Engine
//!
//! This crate turns an architectural program into a resolved floor plan and
//! its export artifacts. The pipeline runs in fixed stages:
//!
//! - **Graph**: room requirements become a constraint graph ([`graph`] module)
//! - **Synthesis**: a diffusion sampler or template matcher proposes raw room
//!   vectors ([`synthesis`], [`encode`], [`sample`], [`template`] modules)
//! - **Resolution**: raw vectors become a validated, constraint-checked
//!   layout ([`resolve`] module)
//! - **Extrusion**: the plan becomes per-room 3D solids ([`extrude`] module)
//! - **Export**: SVG, GLB, and IFC serializations ([`export`] module)
//!
//! [`LayoutEngine`] ties the stages together behind one call:
//!
//! ```
//! use maquette::{GenerationRequest, LayoutEngine};
//! use maquette_core::{
//!     identifier::RoomId,
//!     program::{ArchitecturalProgram, RoomRequirement, RoomType},
//! };
//!
//! let engine = LayoutEngine::default();
//! let program = ArchitecturalProgram::new(vec![
//!     RoomRequirement::new(RoomId::new("living_room"), RoomType::LivingRoom),
//!     RoomRequirement::new(RoomId::new("kitchen"), RoomType::Kitchen)
//!         .with_adjacent_to(vec![RoomId::new("living_room")]),
//! ]);
//!
//! let result = engine.generate(&program, &GenerationRequest::default())?;
//! assert!(result.svg_content().starts_with("<svg"));
//! # Ok::<(), maquette::MaquetteError>(())
//! ```

use log::info;

use maquette_core::program::ArchitecturalProgram;

pub mod config;
pub mod encode;
pub mod error;
pub mod export;
pub mod extrude;
pub mod graph;
pub mod resolve;
pub mod sample;
pub mod synthesis;
pub mod template;
pub mod weights;

pub use config::GenerationConfig;
pub use error::MaquetteError;
pub use resolve::{Layout, SatisfactionReport};
pub use sample::CancelFlag;
pub use synthesis::SynthesisMode;
pub use template::TemplateLibrary;
pub use weights::ModelWeights;

use crate::{
    graph::ConstraintGraph,
    resolve::resolve_layout,
    synthesis::synthesize,
};

/// Parameters of a single generation request.
///
/// The engine itself is stateless across requests; everything that varies
/// between calls travels here.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    mode: SynthesisMode,
    seed: u64,
    include_ifc: bool,
    cancel: Option<CancelFlag>,
}

impl GenerationRequest {
    /// Creates a request with the given synthesis mode and seed.
    pub fn new(mode: SynthesisMode, seed: u64) -> Self {
        Self {
            mode,
            seed,
            include_ifc: false,
            cancel: None,
        }
    }

    /// Returns the request with IFC output enabled.
    pub fn with_ifc(mut self) -> Self {
        self.include_ifc = true;
        self
    }

    /// Returns the request with a cancellation flag attached.
    ///
    /// The flag is checked at sampler step boundaries; cancellation
    /// surfaces as [`MaquetteError::Canceled`].
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Returns the synthesis mode.
    pub fn mode(&self) -> SynthesisMode {
        self.mode
    }

    /// Returns the random seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns whether IFC output was requested.
    pub fn include_ifc(&self) -> bool {
        self.include_ifc
    }

    /// Returns the cancellation flag, if attached.
    pub fn cancel(&self) -> Option<&CancelFlag> {
        self.cancel.as_ref()
    }
}

/// Everything a generation call produces.
///
/// Artifacts are all-or-nothing: a result exists only when every requested
/// serialization succeeded.
#[derive(Debug)]
pub struct GenerationResult {
    svg_content: String,
    glb_content: Vec<u8>,
    ifc_content: Option<Vec<u8>>,
    satisfaction_report: SatisfactionReport,
    layout: Layout,
}

impl GenerationResult {
    /// Returns the SVG plan drawing.
    pub fn svg_content(&self) -> &str {
        &self.svg_content
    }

    /// Returns the binary glTF scene.
    pub fn glb_content(&self) -> &[u8] {
        &self.glb_content
    }

    /// Returns the IFC model, when the request asked for one.
    pub fn ifc_content(&self) -> Option<&[u8]> {
        self.ifc_content.as_deref()
    }

    /// Returns the per-constraint satisfaction report.
    pub fn satisfaction_report(&self) -> &SatisfactionReport {
        &self.satisfaction_report
    }

    /// Returns the resolved layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

/// The generation pipeline behind a single entry point.
///
/// An engine holds the configuration, model weights, and template library
/// for its lifetime; all three are immutable after construction, so one
/// engine can serve concurrent requests through `&self`.
#[derive(Debug)]
pub struct LayoutEngine {
    config: GenerationConfig,
    weights: ModelWeights,
    templates: TemplateLibrary,
}

impl LayoutEngine {
    /// Creates an engine with the given configuration, deterministic
    /// weights, and the built-in template library.
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            weights: ModelWeights::deterministic(),
            templates: TemplateLibrary::builtin(),
        }
    }

    /// Returns the engine with trained model weights installed.
    pub fn with_weights(mut self, weights: ModelWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Returns the engine with a custom template library installed.
    pub fn with_templates(mut self, templates: TemplateLibrary) -> Self {
        self.templates = templates;
        self
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Runs the full pipeline for one program.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure: program validation, graph
    /// construction, synthesis (after its internal retries), resolution,
    /// extrusion, or export. No partial artifacts survive a failure.
    pub fn generate(
        &self,
        program: &ArchitecturalProgram,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, MaquetteError> {
        info!(
            mode:% = request.mode(),
            seed = request.seed(),
            rooms = program.rooms().len();
            "Generating layout"
        );

        program.validate()?;
        let graph = ConstraintGraph::from_program(program, self.config.graph())?;

        let raw = synthesize(
            &graph,
            request.mode(),
            &self.weights,
            &self.templates,
            self.config.sampler(),
            request.seed(),
            request.cancel(),
        )?;

        let (layout, satisfaction_report) =
            resolve_layout(&graph, &raw, program.site(), self.config.resolver())?;

        let solids = extrude::extrude_layout(&layout, self.config.export())?;

        let svg_content = export::svg::render_plan(&layout, self.config.export());
        let glb_content = export::glb::encode_scene(&solids)?;
        let ifc_content = request
            .include_ifc()
            .then(|| export::ifc::render_model(&layout, self.config.export()).into_bytes());

        info!(
            rooms = layout.rooms().len(),
            satisfied = satisfaction_report.satisfied_count(),
            constraints = satisfaction_report.len();
            "Layout generated"
        );

        Ok(GenerationResult {
            svg_content,
            glb_content,
            ifc_content,
            satisfaction_report,
            layout,
        })
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}
