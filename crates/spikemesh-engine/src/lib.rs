// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! # Spikemesh Engine
//!
//! Execution-side consumers of the connectivity structures:
//! - **Backends**: where a cluster's maps live ([`CpuBackend`] host-only,
//!   [`StagedDeviceBackend`] with device-format mirrors) behind the
//!   [`ComputeBackend`] contract
//! - **Propagation**: the per-step delivery pass that reads the outgoing
//!   maps and accumulates into cluster summation buffers

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod backend;
pub mod error;
pub mod propagation;

pub use backend::{
    create_backend, BackendKind, ComputeBackend, CpuBackend, DeviceIndexMaps, MirrorHandle,
    StagedDeviceBackend,
};
pub use error::{EngineError, Result};
pub use propagation::{propagate, PropagationStats, StepState};
