//! Model parameter storage for the encoder and the diffusion denoiser.
//!
//! Weights are plain `ndarray` matrices wrapped in typed containers. They are
//! loaded once when the engine is constructed and shared read-only across
//! every generation request afterwards. A deterministic built-in set backs
//! deployments that ship without a trained weights file.
//!
//! # Overview
//!
//! - [`ModelWeights`] - The full parameter set, loadable from JSON.
//! - [`EncoderWeights`] - Attention message-passing layers plus the latent
//!   projection.
//! - [`DenoiserWeights`] - The two-layer noise prediction network.
//!
//! Dimension constants in this module fix the tensor contract between the
//! encoder, the sampler, and any externally trained weights file.
//!
//! # Pipeline Position
//!
//! ```text
//! graph -> encode(ModelWeights) -> sample(ModelWeights) -> resolve
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use maquette_core::program::RoomType;

use crate::error::MaquetteError;

/// Width of one node feature row: a one-hot room type plus normalized area.
pub const NODE_FEATURE_DIM: usize = RoomType::ALL.len() + 1;

/// Hidden width of the encoder's message-passing layers.
pub const HIDDEN_DIM: usize = 64;

/// Dimension of the graph-level latent vector.
pub const LATENT_DIM: usize = 128;

/// Number of attention layers in the shipped encoder.
pub const ENCODER_LAYERS: usize = 2;

/// Maximum number of room slots the sampler denoises at once.
pub const MAX_ROOMS: usize = 8;

/// Geometry channels per room slot: `(cx, cy, w, h, theta)`.
pub const GEOMETRY_CHANNELS: usize = 5;

/// Width of the sinusoidal timestep embedding.
pub const TIMESTEP_EMBED_DIM: usize = 16;

/// Flattened geometry state width.
pub const STATE_DIM: usize = MAX_ROOMS * GEOMETRY_CHANNELS;

/// Denoiser input width: state, timestep embedding, latent, adjacency mask.
pub const DENOISER_INPUT_DIM: usize = STATE_DIM + TIMESTEP_EMBED_DIM + LATENT_DIM + MAX_ROOMS * MAX_ROOMS;

/// Hidden width of the denoiser network.
pub const DENOISER_HIDDEN_DIM: usize = 128;

/// One attention message-passing layer.
///
/// `transform` maps incoming node features to the layer's output width and
/// `attention` scores concatenated transformed feature pairs, so it is twice
/// as long as the output width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionLayer {
    transform: Array2<f32>,
    attention: Array1<f32>,
}

impl AttentionLayer {
    /// Creates a layer from its parameter tensors.
    pub fn new(transform: Array2<f32>, attention: Array1<f32>) -> Self {
        AttentionLayer {
            transform,
            attention,
        }
    }

    /// Returns the feature transform matrix.
    pub fn transform(&self) -> &Array2<f32> {
        &self.transform
    }

    /// Returns the attention scoring vector.
    pub fn attention(&self) -> &Array1<f32> {
        &self.attention
    }

    /// Returns the layer's input width.
    pub fn input_dim(&self) -> usize {
        self.transform.nrows()
    }

    /// Returns the layer's output width.
    pub fn output_dim(&self) -> usize {
        self.transform.ncols()
    }
}

/// Parameters of the graph encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderWeights {
    layers: Vec<AttentionLayer>,
    projection: Array2<f32>,
}

impl EncoderWeights {
    /// Creates encoder weights from layers and a pooling projection.
    pub fn new(layers: Vec<AttentionLayer>, projection: Array2<f32>) -> Self {
        EncoderWeights { layers, projection }
    }

    /// Returns the message-passing layers in application order.
    pub fn layers(&self) -> &[AttentionLayer] {
        &self.layers
    }

    /// Returns the projection from pooled node embeddings to the latent.
    pub fn projection(&self) -> &Array2<f32> {
        &self.projection
    }
}

/// Parameters of the noise prediction network.
///
/// A two-layer perceptron: `tanh(x * hidden + hidden_bias) * output +
/// output_bias`, mapping the conditioned denoiser input back to a predicted
/// noise tensor of [`STATE_DIM`] width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenoiserWeights {
    hidden: Array2<f32>,
    hidden_bias: Array1<f32>,
    output: Array2<f32>,
    output_bias: Array1<f32>,
}

impl DenoiserWeights {
    /// Creates denoiser weights from the four parameter tensors.
    pub fn new(
        hidden: Array2<f32>,
        hidden_bias: Array1<f32>,
        output: Array2<f32>,
        output_bias: Array1<f32>,
    ) -> Self {
        DenoiserWeights {
            hidden,
            hidden_bias,
            output,
            output_bias,
        }
    }

    /// Returns the input to hidden matrix.
    pub fn hidden(&self) -> &Array2<f32> {
        &self.hidden
    }

    /// Returns the hidden layer bias.
    pub fn hidden_bias(&self) -> &Array1<f32> {
        &self.hidden_bias
    }

    /// Returns the hidden to output matrix.
    pub fn output(&self) -> &Array2<f32> {
        &self.output
    }

    /// Returns the output bias.
    pub fn output_bias(&self) -> &Array1<f32> {
        &self.output_bias
    }
}

/// The complete parameter set shared by all generation requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    encoder: EncoderWeights,
    denoiser: DenoiserWeights,
}

impl ModelWeights {
    /// Creates a weight set from its two halves.
    pub fn new(encoder: EncoderWeights, denoiser: DenoiserWeights) -> Self {
        ModelWeights { encoder, denoiser }
    }

    /// Returns the encoder parameters.
    pub fn encoder(&self) -> &EncoderWeights {
        &self.encoder
    }

    /// Returns the denoiser parameters.
    pub fn denoiser(&self) -> &DenoiserWeights {
        &self.denoiser
    }

    /// Builds the shipped deterministic weight set.
    ///
    /// Every tensor is filled from a fixed sinusoidal pattern, so two
    /// processes construct bit-identical parameters without any file on
    /// disk.
    pub fn deterministic() -> Self {
        let mut layers = Vec::with_capacity(ENCODER_LAYERS);
        let mut phase = 0.0;
        let mut input_dim = NODE_FEATURE_DIM;
        for _ in 0..ENCODER_LAYERS {
            layers.push(AttentionLayer::new(
                seeded_matrix(input_dim, HIDDEN_DIM, phase),
                seeded_vector(2 * HIDDEN_DIM, phase + 0.1),
            ));
            phase += 0.2;
            input_dim = HIDDEN_DIM;
        }
        let encoder = EncoderWeights::new(layers, seeded_matrix(HIDDEN_DIM, LATENT_DIM, phase));

        let denoiser = DenoiserWeights::new(
            seeded_matrix(DENOISER_INPUT_DIM, DENOISER_HIDDEN_DIM, phase + 0.2),
            seeded_vector(DENOISER_HIDDEN_DIM, phase + 0.3),
            seeded_matrix(DENOISER_HIDDEN_DIM, STATE_DIM, phase + 0.4),
            seeded_vector(STATE_DIM, phase + 0.5),
        );

        ModelWeights { encoder, denoiser }
    }

    /// Parses a weight set from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Encoding`] when the document does not parse
    /// or the tensor shapes are inconsistent.
    pub fn from_json(json: &str) -> Result<Self, MaquetteError> {
        let weights: ModelWeights = serde_json::from_str(json)
            .map_err(|e| MaquetteError::Encoding(format!("weights deserialization failed: {e}")))?;
        weights.validate()?;
        Ok(weights)
    }

    /// Reads a weight set from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Io`] when the file cannot be read and
    /// [`MaquetteError::Encoding`] when its content is invalid.
    pub fn from_file(path: &Path) -> Result<Self, MaquetteError> {
        let json = fs::read_to_string(path)?;
        let weights = Self::from_json(&json)?;
        debug!("Loaded model weights from {}", path.display());
        Ok(weights)
    }

    /// Checks that every tensor has the shape its consumers assume.
    ///
    /// # Errors
    ///
    /// Returns [`MaquetteError::Encoding`] naming the first offending
    /// tensor.
    pub fn validate(&self) -> Result<(), MaquetteError> {
        if self.encoder.layers.is_empty() {
            return Err(MaquetteError::Encoding(
                "encoder has no message-passing layers".to_string(),
            ));
        }

        let mut expected_input = NODE_FEATURE_DIM;
        for (index, layer) in self.encoder.layers.iter().enumerate() {
            if layer.input_dim() != expected_input {
                return Err(MaquetteError::Encoding(format!(
                    "encoder layer {index} expects input width {expected_input}, found {}",
                    layer.input_dim()
                )));
            }
            if layer.attention.len() != 2 * layer.output_dim() {
                return Err(MaquetteError::Encoding(format!(
                    "encoder layer {index} attention width {} does not match 2x output width {}",
                    layer.attention.len(),
                    layer.output_dim()
                )));
            }
            expected_input = layer.output_dim();
        }

        if self.encoder.projection.nrows() != expected_input
            || self.encoder.projection.ncols() != LATENT_DIM
        {
            return Err(MaquetteError::Encoding(format!(
                "encoder projection has shape {:?}, expected ({expected_input}, {LATENT_DIM})",
                self.encoder.projection.dim()
            )));
        }

        if self.denoiser.hidden.dim() != (DENOISER_INPUT_DIM, DENOISER_HIDDEN_DIM) {
            return Err(MaquetteError::Encoding(format!(
                "denoiser hidden matrix has shape {:?}, expected ({DENOISER_INPUT_DIM}, {DENOISER_HIDDEN_DIM})",
                self.denoiser.hidden.dim()
            )));
        }
        if self.denoiser.hidden_bias.len() != DENOISER_HIDDEN_DIM {
            return Err(MaquetteError::Encoding(format!(
                "denoiser hidden bias has width {}, expected {DENOISER_HIDDEN_DIM}",
                self.denoiser.hidden_bias.len()
            )));
        }
        if self.denoiser.output.dim() != (DENOISER_HIDDEN_DIM, STATE_DIM) {
            return Err(MaquetteError::Encoding(format!(
                "denoiser output matrix has shape {:?}, expected ({DENOISER_HIDDEN_DIM}, {STATE_DIM})",
                self.denoiser.output.dim()
            )));
        }
        if self.denoiser.output_bias.len() != STATE_DIM {
            return Err(MaquetteError::Encoding(format!(
                "denoiser output bias has width {}, expected {STATE_DIM}",
                self.denoiser.output_bias.len()
            )));
        }

        Ok(())
    }
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self::deterministic()
    }
}

/// Fills a matrix from a fixed sinusoidal pattern. The phase keeps distinct
/// tensors from repeating each other.
fn seeded_matrix(rows: usize, cols: usize, phase: f32) -> Array2<f32> {
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        (i as f32 * 0.01 + j as f32 * 0.001 + phase).sin() * 0.1
    })
}

/// Fills a vector from the same pattern as [`seeded_matrix`].
fn seeded_vector(len: usize, phase: f32) -> Array1<f32> {
    Array1::from_shape_fn(len, |i| (i as f32 * 0.01 + phase).sin() * 0.1)
}
