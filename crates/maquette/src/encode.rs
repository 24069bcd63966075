//! Graph encoding into a fixed-dimension latent vector.
//!
//! This module condenses a [`ConstraintGraph`] into the conditioning vector
//! the diffusion sampler consumes. Node features pass through attention
//! message-passing layers, are mean-pooled into a single graph embedding and
//! projected to [`LATENT_DIM`] width.
//!
//! # Overview
//!
//! - [`LatentVector`] - The graph-level embedding, one per generation call.
//! - [`encode_graph`] - The `ConstraintGraph -> LatentVector` entry point.
//!
//! Node order is canonicalized before any arithmetic, so programs declaring
//! the same rooms in different orders produce bit-identical latents. The
//! mean pooling step is what makes the result independent of room count
//! bookkeeping: it commutes with any node permutation.
//!
//! # Pipeline Position
//!
//! ```text
//! graph -> [encode] -> sample -> resolve -> extrude -> export
//! ```

use log::trace;
use ndarray::{Array1, Array2};
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

use crate::{
    error::MaquetteError,
    graph::ConstraintGraph,
    weights::{AttentionLayer, EncoderWeights, NODE_FEATURE_DIM},
};

/// Divisor applied to target areas before they enter the feature row.
const AREA_NORMALIZATION: f32 = 50.0;

/// Negative slope of the attention score activation.
const LEAKY_RELU_SLOPE: f32 = 0.2;

/// A graph-level embedding of [`LATENT_DIM`] width.
///
/// Ephemeral: lives for the duration of one generation call and conditions
/// the diffusion sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentVector {
    values: Array1<f32>,
}

impl LatentVector {
    /// Wraps a raw embedding.
    pub fn new(values: Array1<f32>) -> Self {
        LatentVector { values }
    }

    /// Returns the embedding values.
    pub fn values(&self) -> &Array1<f32> {
        &self.values
    }

    /// Returns the embedding width.
    pub fn dim(&self) -> usize {
        self.values.len()
    }
}

/// Encodes a constraint graph into its latent vector.
///
/// Rooms are featurized as a one-hot room type plus the normalized target
/// area, pushed through the configured attention layers and pooled into a
/// single embedding.
///
/// # Errors
///
/// Returns [`MaquetteError::Encoding`] when the graph has no rooms or when
/// a weight tensor's shape does not match the feature width it is applied
/// to.
pub fn encode_graph(
    graph: &ConstraintGraph,
    weights: &EncoderWeights,
) -> Result<LatentVector, MaquetteError> {
    let order = graph.canonical_order();
    if order.is_empty() {
        return Err(MaquetteError::Encoding(
            "constraint graph has no rooms".to_string(),
        ));
    }

    let neighborhoods = canonical_neighborhoods(graph, &order);
    let mut embeddings = node_features(graph, &order);

    for (index, layer) in weights.layers().iter().enumerate() {
        if embeddings.ncols() != layer.input_dim() {
            return Err(MaquetteError::Encoding(format!(
                "encoder layer {index} expects feature width {}, found {}",
                layer.input_dim(),
                embeddings.ncols()
            )));
        }
        if layer.attention().len() != 2 * layer.output_dim() {
            return Err(MaquetteError::Encoding(format!(
                "encoder layer {index} attention vector has width {}, expected {}",
                layer.attention().len(),
                2 * layer.output_dim()
            )));
        }
        embeddings = attention_layer(&embeddings, layer, &neighborhoods);
    }

    let projection = weights.projection();
    if projection.nrows() != embeddings.ncols() {
        return Err(MaquetteError::Encoding(format!(
            "latent projection expects width {}, found {}",
            projection.nrows(),
            embeddings.ncols()
        )));
    }

    // Permutation-invariant pooling: the mean over node embeddings.
    let pooled = embeddings.mean_axis(ndarray::Axis(0)).ok_or_else(|| {
        MaquetteError::Encoding("pooling over an empty embedding matrix".to_string())
    })?;
    let latent = pooled.dot(projection);

    trace!(
        "Encoded {} rooms into a latent of width {}",
        order.len(),
        latent.len()
    );

    Ok(LatentVector::new(latent))
}

/// Builds the node feature matrix in canonical order.
///
/// Row layout: one-hot room type over the full vocabulary, then the target
/// area divided by [`AREA_NORMALIZATION`].
fn node_features(graph: &ConstraintGraph, order: &[NodeIndex]) -> Array2<f32> {
    let mut features = Array2::zeros((order.len(), NODE_FEATURE_DIM));
    for (row, &idx) in order.iter().enumerate() {
        let node = graph.node_from_idx(idx);
        features[[row, node.room_type().index()]] = 1.0;
        features[[row, NODE_FEATURE_DIM - 1]] = node.target_area() / AREA_NORMALIZATION;
    }
    features
}

/// Resolves each node's neighbor rows, sorted, with the node itself first.
///
/// Sorting fixes the float summation order so the encoding is reproducible
/// across graphs built from permuted programs.
fn canonical_neighborhoods(graph: &ConstraintGraph, order: &[NodeIndex]) -> Vec<Vec<usize>> {
    let positions: HashMap<NodeIndex, usize> = order
        .iter()
        .enumerate()
        .map(|(row, &idx)| (idx, row))
        .collect();

    order
        .iter()
        .enumerate()
        .map(|(row, &idx)| {
            let mut rows: Vec<usize> = graph
                .neighbors(idx)
                .filter_map(|neighbor| positions.get(&neighbor).copied())
                .collect();
            rows.sort_unstable();
            rows.insert(0, row);
            rows
        })
        .collect()
}

/// Applies one attention message-passing layer.
///
/// Scores every (node, neighbor) pair with the layer's attention vector,
/// normalizes the scores per node with a softmax and aggregates transformed
/// neighbor features, finishing with an ELU activation.
fn attention_layer(
    embeddings: &Array2<f32>,
    layer: &AttentionLayer,
    neighborhoods: &[Vec<usize>],
) -> Array2<f32> {
    let transformed = embeddings.dot(layer.transform());
    let out_dim = layer.output_dim();
    let attention = layer.attention();

    // a^T [t_i || t_j] splits into a left term per source and a right term
    // per neighbor.
    let left: Vec<f32> = (0..transformed.nrows())
        .map(|row| {
            (0..out_dim)
                .map(|col| attention[col] * transformed[[row, col]])
                .sum()
        })
        .collect();
    let right: Vec<f32> = (0..transformed.nrows())
        .map(|row| {
            (0..out_dim)
                .map(|col| attention[out_dim + col] * transformed[[row, col]])
                .sum()
        })
        .collect();

    let mut output = Array2::zeros((transformed.nrows(), out_dim));
    for (row, neighborhood) in neighborhoods.iter().enumerate() {
        let scores: Vec<f32> = neighborhood
            .iter()
            .map(|&neighbor| leaky_relu(left[row] + right[neighbor]))
            .collect();

        // Stable softmax over the neighborhood.
        let max_score = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let exp_scores: Vec<f32> = scores.iter().map(|&s| (s - max_score).exp()).collect();
        let exp_sum: f32 = exp_scores.iter().sum();

        for (&neighbor, &exp_score) in neighborhood.iter().zip(&exp_scores) {
            let coefficient = exp_score / exp_sum;
            for col in 0..out_dim {
                output[[row, col]] += coefficient * transformed[[neighbor, col]];
            }
        }
        for col in 0..out_dim {
            output[[row, col]] = elu(output[[row, col]]);
        }
    }

    output
}

fn leaky_relu(x: f32) -> f32 {
    if x > 0.0 { x } else { LEAKY_RELU_SLOPE * x }
}

fn elu(x: f32) -> f32 {
    if x > 0.0 { x } else { x.exp_m1() }
}
