// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! # Compute Backend Abstraction
//!
//! Unified interface over where a cluster's connectivity lives during
//! execution. Host-resident clusters need nothing beyond their own maps;
//! accelerator-bound clusters need a device-format mirror refreshed whenever
//! the host maps are rebuilt. Construction code talks to either through
//! [`ComputeBackend`] without caring which.

mod cpu;
mod mirror;
mod staged;

pub use cpu::CpuBackend;
pub use mirror::{DeviceIndexMaps, MirrorHandle};
pub use staged::StagedDeviceBackend;

use spikemesh_neural::ClusterId;
use spikemesh_runtime::ClusterIndexMaps;
use tracing::info;

use crate::error::{EngineError, Result};

/// Compute backend trait - abstracts host-only vs device-mirrored execution
pub trait ComputeBackend: Send + Sync {
    /// Get backend type name for logging/debugging
    fn backend_name(&self) -> &str;

    /// Mirror one cluster's completed host maps into device-resident form.
    ///
    /// Called once per cluster after its maps are final. The copy may run
    /// asynchronously; callers must [`wait`](MirrorHandle::wait) on the
    /// returned handle before anything reads the device maps, and must not
    /// mutate the host maps until it completes.
    fn copy_index_maps_to_device(
        &mut self,
        cluster: ClusterId,
        maps: &ClusterIndexMaps,
    ) -> Result<MirrorHandle>;
}

/// Backend kind enum for construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Host memory only (default)
    #[default]
    Cpu,

    /// Host maps packed into device-format staging buffers
    StagedDevice,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Cpu => write!(f, "CPU"),
            BackendKind::StagedDevice => write!(f, "StagedDevice"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(BackendKind::Cpu),
            "staged" | "device" => Ok(BackendKind::StagedDevice),
            _ => Err(EngineError::UnknownBackend(s.to_string())),
        }
    }
}

/// Construct a backend of the given kind.
pub fn create_backend(kind: BackendKind) -> Box<dyn ComputeBackend> {
    info!(backend = %kind, "compute backend selected");
    match kind {
        BackendKind::Cpu => Box::new(CpuBackend::new()),
        BackendKind::StagedDevice => Box::new(StagedDeviceBackend::new()),
    }
}
