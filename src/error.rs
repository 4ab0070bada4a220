//! Error types for the simulator
//!
//! Construction and configuration are the only fallible boundaries. Once an
//! `Ensemble` exists, stepping and running never fail.

use thiserror::Error;

/// Result alias used across the crate
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// An ensemble needs at least one body
    #[error("ensemble must contain at least one body")]
    EmptyEnsemble,

    /// One of the per-body arrays disagrees with the body count
    #[error("{field} has {found} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// A single mass is negative, NaN or infinite
    #[error("body {index} has invalid mass {mass}")]
    InvalidMass { index: usize, mass: f64 },

    /// Masses must sum to something positive for the center of mass to exist
    #[error("total mass must be positive, got {0}")]
    NonPositiveTotalMass(f64),

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SimError {
    pub fn config(message: impl Into<String>) -> Self {
        SimError::Config { message: message.into() }
    }
}
