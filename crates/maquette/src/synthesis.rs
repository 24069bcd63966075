//! Backend dispatch: one contract over both synthesis strategies.
//!
//! The diffusion sampler and the template matcher both reduce a
//! [`ConstraintGraph`] to one [`RawRoomVector`] per room node, in canonical
//! node order. Everything downstream (resolution, extrusion, export) is
//! backend-agnostic and consumes only that contract.
//!
//! [`SynthesisMode`] is a plain tag rather than a trait object: there are
//! exactly two strategies, they take different inputs (weights versus
//! templates), and a `match` keeps the dispatch visible in one place.
//!
//! # Pipeline Position
//!
//! ```text
//!          +-> sample ---+
//! graph ---+             +-> resolve -> extrude -> export
//!          +-> template -+
//! ```

use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    config::SamplerConfig,
    encode::encode_graph,
    error::MaquetteError,
    graph::ConstraintGraph,
    sample::{CancelFlag, sample_layout},
    template::{TemplateLibrary, match_template},
    weights::ModelWeights,
};

/// Seed increment between sampling attempts.
const RESEED_INCREMENT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Unresolved room geometry: center, size and rotation in meters-scale
/// world units, before constraint resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRoomVector {
    cx: f32,
    cy: f32,
    width: f32,
    height: f32,
    rotation: f32,
}

impl RawRoomVector {
    /// Creates a raw room vector.
    pub fn new(cx: f32, cy: f32, width: f32, height: f32, rotation: f32) -> Self {
        RawRoomVector {
            cx,
            cy,
            width,
            height,
            rotation,
        }
    }

    /// Returns the center x coordinate in meters.
    pub fn cx(&self) -> f32 {
        self.cx
    }

    /// Returns the center y coordinate in meters.
    pub fn cy(&self) -> f32 {
        self.cy
    }

    /// Returns the width in meters.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the height in meters.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns the raw rotation channel, not yet quantized.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

/// Which synthesis backend turns the graph into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMode {
    /// Conditional diffusion sampling over the latent encoding.
    #[default]
    Diffusion,
    /// Deterministic nearest-template matching.
    Template,
}

impl FromStr for SynthesisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diffusion" => Ok(SynthesisMode::Diffusion),
            "template" => Ok(SynthesisMode::Template),
            _ => Err(format!("Unknown synthesis mode: {s}")),
        }
    }
}

impl From<SynthesisMode> for &'static str {
    fn from(mode: SynthesisMode) -> Self {
        match mode {
            SynthesisMode::Diffusion => "diffusion",
            SynthesisMode::Template => "template",
        }
    }
}

impl std::fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", <&'static str>::from(*self))
    }
}

/// Runs the selected backend and returns one vector per room node.
///
/// The diffusion arm retries on [`MaquetteError::SamplingDivergence`] with
/// seeds derived from `seed`, up to `config.max_retries()` extra attempts;
/// the error reported after the last attempt carries the original seed and
/// the total attempt count. The template arm ignores `seed` and `cancel`.
///
/// # Errors
///
/// Besides divergence, the diffusion arm surfaces encoding errors,
/// [`MaquetteError::Validation`] for programs beyond its room capacity and
/// [`MaquetteError::Canceled`] when the flag fires. The template arm fails
/// only on an empty library.
pub fn synthesize(
    graph: &ConstraintGraph,
    mode: SynthesisMode,
    weights: &ModelWeights,
    templates: &TemplateLibrary,
    config: &SamplerConfig,
    seed: u64,
    cancel: Option<&CancelFlag>,
) -> Result<Vec<RawRoomVector>, MaquetteError> {
    match mode {
        SynthesisMode::Diffusion => {
            let latent = encode_graph(graph, weights.encoder())?;
            let mut attempt: u32 = 0;
            loop {
                let attempt_seed = derive_seed(seed, attempt);
                match sample_layout(
                    graph,
                    &latent,
                    weights.denoiser(),
                    config.steps(),
                    attempt_seed,
                    cancel,
                ) {
                    Err(MaquetteError::SamplingDivergence { .. })
                        if attempt < config.max_retries() =>
                    {
                        warn!(seed = attempt_seed; "Sampling diverged, retrying with derived seed");
                        attempt += 1;
                    }
                    Err(MaquetteError::SamplingDivergence { .. }) => {
                        return Err(MaquetteError::SamplingDivergence {
                            seed,
                            attempts: attempt + 1,
                        });
                    }
                    other => return other,
                }
            }
        }
        SynthesisMode::Template => match_template(graph, templates),
    }
}

/// Derives the seed for a retry attempt. Attempt zero keeps the seed as is.
fn derive_seed(seed: u64, attempt: u32) -> u64 {
    seed.wrapping_add(u64::from(attempt).wrapping_mul(RESEED_INCREMENT))
}
