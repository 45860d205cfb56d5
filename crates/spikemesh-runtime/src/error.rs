// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Error types for runtime operations
//!
//! All of these are fatal: connectivity construction aborts on the first one
//! rather than continuing with partially built state.

use spikemesh_neural::ClusterId;

/// Runtime errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// A neuron index fell outside the valid range.
    #[error("neuron index {index} out of range (limit {total})")]
    OutOfRange { index: u32, total: u32 },

    /// A destination neuron's slot row is already full.
    #[error("{cluster}: synapse capacity exceeded for local neuron {neuron} (capacity {capacity})")]
    CapacityExceeded {
        cluster: ClusterId,
        neuron: u32,
        capacity: u32,
    },

    /// Internal bookkeeping disagrees with the stored connectivity.
    #[error("{cluster}: corrupt connectivity state: {detail}")]
    CorruptState { cluster: ClusterId, detail: String },

    /// The cluster table does not tile the neuron range.
    #[error("invalid partition: {0}")]
    InvalidPartition(String),
}

/// Result type for runtime operations
pub type Result<T> = core::result::Result<T, RuntimeError>;
