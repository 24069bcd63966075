//! Command-line argument definitions for the Maquette CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, synthesis mode and
//! seeding, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Maquette layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input architectural program JSON file
    #[arg(help = "Path to the architectural program JSON file")]
    pub input: String,

    /// Path to the output SVG plan file
    #[arg(short, long, default_value = "plan.svg")]
    pub output: String,

    /// Path to an optional GLB scene output file
    #[arg(long)]
    pub glb: Option<String>,

    /// Path to an optional IFC model output file
    #[arg(long)]
    pub ifc: Option<String>,

    /// Synthesis mode (diffusion, template)
    #[arg(short, long, default_value = "diffusion")]
    pub mode: String,

    /// Seed for the diffusion sampler
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Override the configured number of sampler steps
    #[arg(long)]
    pub steps: Option<usize>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to a template library JSON file
    #[arg(long)]
    pub templates: Option<String>,

    /// Path to a model weights JSON file
    #[arg(long)]
    pub weights: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
