// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Error types for backend and propagation operations

use spikemesh_runtime::RuntimeError;

/// Engine errors
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Backend name did not match any known kind.
    #[error("unknown backend kind: {0}")]
    UnknownBackend(String),

    /// A device mirror could not be staged or did not complete.
    #[error("device mirror failed: {0}")]
    MirrorFailed(String),

    /// Underlying runtime state failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Result type for engine operations
pub type Result<T> = core::result::Result<T, EngineError>;
