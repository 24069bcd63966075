//! Conditional diffusion sampling of raw room geometry.
//!
//! This module runs the reverse diffusion process: starting from pure
//! Gaussian noise, a fixed number of denoising steps conditioned on the
//! graph latent and the adjacency mask produces one raw `(cx, cy, w, h,
//! theta)` tuple per room. The geometry is still unconstrained at this
//! point; the resolver turns it into a valid layout.
//!
//! # Overview
//!
//! - [`NoiseSchedule`] - Precomputed linear beta schedule and derived terms.
//! - [`CancelFlag`] - Cooperative cancellation checked between steps.
//! - [`sample_layout`] - The seeded reverse-process entry point.
//!
//! Every random draw derives from the explicit seed. Identical
//! `(graph, latent, seed, steps)` inputs produce bit-identical output, which
//! is what makes generation requests replayable.
//!
//! # Pipeline Position
//!
//! ```text
//! graph -> encode -> [sample] -> resolve -> extrude -> export
//! ```

use std::f32::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};
use ndarray::Array1;
use petgraph::graph::NodeIndex;
use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::{
    encode::LatentVector,
    error::MaquetteError,
    graph::ConstraintGraph,
    synthesis::RawRoomVector,
    weights::{
        DenoiserWeights, GEOMETRY_CHANNELS, LATENT_DIM, MAX_ROOMS, STATE_DIM, TIMESTEP_EMBED_DIM,
    },
};

/// First beta of the linear schedule.
const BETA_START: f32 = 1e-4;

/// Last beta of the linear schedule.
const BETA_END: f32 = 0.02;

/// Meters per unit of the raw position channels.
const POSITION_SCALE: f32 = 5.0;

/// Meters per unit of the raw dimension channels.
const DIM_SCALE: f32 = 5.0;

/// Smallest room side in meters, added after scaling.
const DIM_FLOOR: f32 = 2.0;

/// A cooperative cancellation flag shared between a caller and a running
/// generation.
///
/// The sampler checks the flag only between denoising iterations, so a
/// cancellation takes effect after the current step completes and
/// partially-denoised state is never observed.
///
/// # Examples
///
/// ```
/// # use maquette::sample::CancelFlag;
/// let flag = CancelFlag::new();
/// let handle = flag.clone();
/// assert!(!flag.is_canceled());
/// handle.cancel();
/// assert!(flag.is_canceled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    canceled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Creates a flag in the not-canceled state.
    pub fn new() -> Self {
        CancelFlag {
            canceled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests cancellation. Takes effect at the next step boundary.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    /// Reports whether cancellation has been requested.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

/// Precomputed diffusion schedule.
///
/// Betas rise linearly from [`BETA_START`] to [`BETA_END`] over the step
/// count; every derived term used by the reverse update is computed once at
/// construction.
#[derive(Debug, Clone)]
pub struct NoiseSchedule {
    betas: Vec<f32>,
    alphas: Vec<f32>,
    alphas_cumprod: Vec<f32>,
    sqrt_recip_alphas: Vec<f32>,
    sqrt_one_minus_alphas_cumprod: Vec<f32>,
    posterior_variance: Vec<f32>,
}

impl NoiseSchedule {
    /// Builds a linear schedule over `steps` timesteps.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Validation`] when `steps` is zero. Running
    /// zero denoising steps would return unmodified noise, which is never
    /// what a caller wants.
    pub fn linear(steps: usize) -> Result<Self, MaquetteError> {
        if steps == 0 {
            return Err(MaquetteError::Validation(
                "diffusion step count must be at least 1".to_string(),
            ));
        }

        let betas: Vec<f32> = if steps == 1 {
            vec![BETA_START]
        } else {
            (0..steps)
                .map(|i| BETA_START + (BETA_END - BETA_START) * i as f32 / (steps - 1) as f32)
                .collect()
        };
        let alphas: Vec<f32> = betas.iter().map(|beta| 1.0 - beta).collect();

        let mut alphas_cumprod = Vec::with_capacity(steps);
        let mut running = 1.0f32;
        for &alpha in &alphas {
            running *= alpha;
            alphas_cumprod.push(running);
        }

        let sqrt_recip_alphas = alphas.iter().map(|a| (1.0 / a).sqrt()).collect();
        let sqrt_one_minus_alphas_cumprod =
            alphas_cumprod.iter().map(|a| (1.0 - a).sqrt()).collect();

        // The posterior uses the previous cumulative product, padded with
        // 1.0 at t = 0, which zeroes the first variance.
        let posterior_variance = (0..steps)
            .map(|t| {
                let prev = if t == 0 { 1.0 } else { alphas_cumprod[t - 1] };
                betas[t] * (1.0 - prev) / (1.0 - alphas_cumprod[t])
            })
            .collect();

        Ok(NoiseSchedule {
            betas,
            alphas,
            alphas_cumprod,
            sqrt_recip_alphas,
            sqrt_one_minus_alphas_cumprod,
            posterior_variance,
        })
    }

    /// Returns the number of timesteps.
    pub fn len(&self) -> usize {
        self.betas.len()
    }

    /// Reports whether the schedule has no steps. Never true for a
    /// constructed schedule.
    pub fn is_empty(&self) -> bool {
        self.betas.is_empty()
    }

    /// Returns the beta values.
    pub fn betas(&self) -> &[f32] {
        &self.betas
    }

    /// Returns the alpha values (`1 - beta`).
    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }

    /// Returns the cumulative alpha products.
    pub fn alphas_cumprod(&self) -> &[f32] {
        &self.alphas_cumprod
    }

    /// Returns the posterior variance per timestep.
    pub fn posterior_variance(&self) -> &[f32] {
        &self.posterior_variance
    }
}

/// Runs the reverse diffusion process for one generation request.
///
/// Rooms are denoised in the graph's canonical order, so the i-th output
/// vector belongs to the i-th room of [`ConstraintGraph::canonical_order`].
/// Outputs are meters-scale: positions spread around the origin and every
/// room side is at least the dimension floor wide.
///
/// # Errors
///
/// - [`MaquetteError::Validation`] when `steps` is zero or the graph has
///   more rooms than the backend's [`MAX_ROOMS`] slots.
/// - [`MaquetteError::Encoding`] when the latent width does not match the
///   denoiser input layout.
/// - [`MaquetteError::Canceled`] when `cancel` fires between steps.
/// - [`MaquetteError::SamplingDivergence`] when the final state contains a
///   non-finite value.
pub fn sample_layout(
    graph: &ConstraintGraph,
    latent: &LatentVector,
    weights: &DenoiserWeights,
    steps: usize,
    seed: u64,
    cancel: Option<&CancelFlag>,
) -> Result<Vec<RawRoomVector>, MaquetteError> {
    let order = graph.canonical_order();
    if order.is_empty() {
        return Ok(Vec::new());
    }
    if order.len() > MAX_ROOMS {
        return Err(MaquetteError::Validation(format!(
            "program expands to {} rooms; the diffusion backend supports at most {MAX_ROOMS}",
            order.len()
        )));
    }
    if latent.dim() != LATENT_DIM {
        return Err(MaquetteError::Encoding(format!(
            "latent has width {}, the denoiser expects {LATENT_DIM}",
            latent.dim()
        )));
    }

    let schedule = NoiseSchedule::linear(steps)?;
    let mask = adjacency_mask(graph, &order);
    let mut rng = StdRng::seed_from_u64(seed);

    debug!(
        "Sampling {} rooms over {steps} denoising steps with seed {seed}",
        order.len()
    );

    // Start from pure noise and walk the schedule backwards.
    let mut state = randn_vector(&mut rng, STATE_DIM);
    for t in (0..steps).rev() {
        if let Some(flag) = cancel {
            if flag.is_canceled() {
                debug!("Sampling canceled before timestep {t}");
                return Err(MaquetteError::Canceled);
            }
        }
        state = denoise_step(&state, t, latent, &mask, weights, &schedule, &mut rng);
    }

    if state.iter().any(|v| !v.is_finite()) {
        return Err(MaquetteError::SamplingDivergence { seed, attempts: 1 });
    }

    // Unit-scale channels to meters: positions spread linearly, dimensions
    // take a magnitude plus a floor so no room degenerates. The rotation
    // channel stays raw until the resolver quantizes it.
    let rooms: Vec<RawRoomVector> = (0..order.len())
        .map(|slot| {
            let base = slot * GEOMETRY_CHANNELS;
            RawRoomVector::new(
                state[base] * POSITION_SCALE,
                state[base + 1] * POSITION_SCALE,
                state[base + 2].abs() * DIM_SCALE + DIM_FLOOR,
                state[base + 3].abs() * DIM_SCALE + DIM_FLOOR,
                state[base + 4],
            )
        })
        .collect();

    trace!("Sampled {} raw room vectors", rooms.len());

    Ok(rooms)
}

/// One reverse update `p(x_{t-1} | x_t)`.
///
/// The network predicts the noise component; the schedule's reverse formula
/// turns that into the posterior mean. Noise is re-injected on every step
/// except the final one.
fn denoise_step(
    state: &Array1<f32>,
    t: usize,
    latent: &LatentVector,
    mask: &Array1<f32>,
    weights: &DenoiserWeights,
    schedule: &NoiseSchedule,
    rng: &mut StdRng,
) -> Array1<f32> {
    let predicted = predict_noise(state, t, latent, mask, weights);

    let noise_scale = schedule.betas[t] / schedule.sqrt_one_minus_alphas_cumprod[t];
    let mean = (state - &(predicted * noise_scale)) * schedule.sqrt_recip_alphas[t];

    if t == 0 {
        mean
    } else {
        let sigma = schedule.posterior_variance[t].sqrt();
        mean + randn_vector(rng, STATE_DIM) * sigma
    }
}

/// Evaluates the denoiser network on the concatenated conditioning input.
fn predict_noise(
    state: &Array1<f32>,
    t: usize,
    latent: &LatentVector,
    mask: &Array1<f32>,
    weights: &DenoiserWeights,
) -> Array1<f32> {
    let t_embed = sinusoidal_embedding(t as f32, TIMESTEP_EMBED_DIM);

    let mut input = Array1::zeros(weights.hidden().nrows());
    let mut offset = write_segment(&mut input, 0, state);
    offset = write_segment(&mut input, offset, &t_embed);
    offset = write_segment(&mut input, offset, latent.values());
    write_segment(&mut input, offset, mask);

    let hidden = (input.dot(weights.hidden()) + weights.hidden_bias()).mapv(f32::tanh);
    hidden.dot(weights.output()) + weights.output_bias()
}

/// Copies `source` into `target` starting at `offset`, returning the end
/// offset.
fn write_segment(target: &mut Array1<f32>, offset: usize, source: &Array1<f32>) -> usize {
    for (i, &value) in source.iter().enumerate() {
        target[offset + i] = value;
    }
    offset + source.len()
}

/// Sinusoidal timestep embedding.
///
/// Half the dimensions carry sines and half carry cosines over
/// exponentially spaced frequencies.
fn sinusoidal_embedding(t: f32, dim: usize) -> Array1<f32> {
    let half_dim = dim / 2;
    let scale = (10000.0f32).ln() / (half_dim - 1) as f32;

    let mut embedding = Array1::zeros(dim);
    for k in 0..half_dim {
        let frequency = (-(k as f32) * scale).exp();
        embedding[k] = (t * frequency).sin();
        embedding[half_dim + k] = (t * frequency).cos();
    }
    embedding
}

/// Flattened symmetric adjacency mask over the room slots.
///
/// Entry `(i, j)` carries the signed edge weight between the i-th and j-th
/// canonical rooms, zero when unrelated. Separation edges enter with their
/// negative weight, which is how the conditioning distinguishes them from
/// adjacencies.
fn adjacency_mask(graph: &ConstraintGraph, order: &[NodeIndex]) -> Array1<f32> {
    let mut mask = Array1::zeros(MAX_ROOMS * MAX_ROOMS);
    for (i, &a) in order.iter().enumerate() {
        for (j, &b) in order.iter().enumerate().skip(i + 1) {
            if let Some(edge) = graph.find_edge(a, b) {
                mask[i * MAX_ROOMS + j] = edge.weight();
                mask[j * MAX_ROOMS + i] = edge.weight();
            }
        }
    }
    mask
}

/// One standard normal draw via the Box-Muller transform.
///
/// The first uniform is clamped away from zero to keep the logarithm
/// finite.
fn randn(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.random::<f32>().max(1e-10);
    let u2: f32 = rng.random::<f32>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// A vector of standard normal draws.
fn randn_vector(rng: &mut StdRng, len: usize) -> Array1<f32> {
    Array1::from_iter((0..len).map(|_| randn(rng)))
}
