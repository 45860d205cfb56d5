// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Error types for configuration loading and connectivity construction.

use spikemesh_engine::EngineError;
use spikemesh_runtime::RuntimeError;
use thiserror::Error;

/// Errors raised while loading or validating a wiring configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not valid TOML.
    #[error("invalid TOML syntax: {0}")]
    Parse(String),

    /// One or more option values are outside their legal range.
    #[error("configuration validation failed:\n{0}")]
    Validation(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// A single rejected configuration value.
///
/// Validation collects every violation before failing so a bad config
/// file can be fixed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// A value is outside its legal range.
    InvalidValue { field: &'static str, reason: String },
    /// The requested fan-in cannot fit in the per-neuron slot rows.
    FanInExceedsCapacity { conns_per_neuron: u32, capacity: u32 },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValidationError::InvalidValue { field, reason } => {
                write!(f, "{field}: {reason}")
            }
            ConfigValidationError::FanInExceedsCapacity {
                conns_per_neuron,
                capacity,
            } => {
                write!(
                    f,
                    "conns_per_neuron: fan-in {conns_per_neuron} exceeds slot capacity {capacity}"
                )
            }
        }
    }
}

/// Errors raised during wiring, index-map construction, or verification.
#[derive(Debug, Error)]
pub enum WiringError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The neuron layout does not agree with the simulation geometry.
    #[error("invalid layout: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, WiringError>;
