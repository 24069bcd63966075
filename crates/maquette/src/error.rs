//! Error types for Maquette operations.
//!
//! This module provides the main error type [`MaquetteError`] which wraps
//! the error conditions that can occur during layout generation.

use std::io;

use thiserror::Error;

/// The main error type for Maquette operations.
///
/// # Retryable Variants
///
/// `SamplingDivergence` is the only retryable condition: the synthesis stage
/// re-runs the sampler with a derived fresh seed up to a configured attempt
/// bound before surfacing it. Every other variant is terminal for the request.
#[derive(Debug, Error)]
pub enum MaquetteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("sampling diverged with seed {seed} after {attempts} attempt(s)")]
    SamplingDivergence { seed: u64, attempts: u32 },

    #[error("no template available: {0}")]
    NoTemplateMatch(String),

    #[error("Mesh error: {0}")]
    Mesh(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("generation canceled")]
    Canceled,
}

impl From<crate::export::Error> for MaquetteError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl From<maquette_core::program::ProgramError> for MaquetteError {
    fn from(error: maquette_core::program::ProgramError) -> Self {
        Self::Validation(error.to_string())
    }
}
