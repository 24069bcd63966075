//! CLI logic for the Maquette layout tool.
//!
//! This module contains the core CLI logic for the Maquette layout tool:
//! loading the program and configuration, running the generation pipeline,
//! and writing the requested artifacts.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use std::{fs, path::Path, str::FromStr};

use log::info;

use maquette::{
    GenerationConfig, GenerationRequest, LayoutEngine, MaquetteError, ModelWeights, SynthesisMode,
    TemplateLibrary, config::SamplerConfig, export,
};
use maquette_core::program::ArchitecturalProgram;

/// Run the Maquette CLI application
///
/// This function loads the architectural program, runs the generation
/// pipeline, and writes the SVG plan plus any requested GLB and IFC
/// artifacts.
///
/// # Errors
///
/// Returns `MaquetteError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Program validation errors
/// - Synthesis, resolution, or extrusion errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), MaquetteError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing architectural program"
    );

    // Load configuration, with command-line overrides applied on top
    let mut generation_config = config::load_config(args.config.as_ref())?;
    if let Some(steps) = args.steps {
        generation_config = GenerationConfig::new(
            generation_config.graph().clone(),
            SamplerConfig::new(steps, generation_config.sampler().max_retries()),
            generation_config.resolver().clone(),
            generation_config.export().clone(),
        );
    }

    let mode = SynthesisMode::from_str(&args.mode).map_err(MaquetteError::Validation)?;

    // Read and parse the program
    let source = fs::read_to_string(&args.input)?;
    let program: ArchitecturalProgram = serde_json::from_str(&source)
        .map_err(|e| MaquetteError::Validation(format!("Failed to parse program: {e}")))?;

    // Assemble the engine
    let mut engine = LayoutEngine::new(generation_config);
    if let Some(path) = &args.weights {
        engine = engine.with_weights(ModelWeights::from_file(Path::new(path))?);
    }
    if let Some(path) = &args.templates {
        engine = engine.with_templates(TemplateLibrary::from_file(Path::new(path))?);
    }

    let mut request = GenerationRequest::new(mode, args.seed);
    if args.ifc.is_some() {
        request = request.with_ifc();
    }

    let result = engine.generate(&program, &request)?;

    // Write output artifacts
    export::write_artifact(Path::new(&args.output), result.svg_content().as_bytes())?;
    if let Some(path) = &args.glb {
        export::write_artifact(Path::new(path), result.glb_content())?;
    }
    if let Some(path) = &args.ifc {
        if let Some(content) = result.ifc_content() {
            export::write_artifact(Path::new(path), content)?;
        }
    }

    let report = result.satisfaction_report();
    info!(
        output_file = args.output,
        satisfied = report.satisfied_count(),
        constraints = report.len();
        "Layout exported successfully"
    );

    Ok(())
}
