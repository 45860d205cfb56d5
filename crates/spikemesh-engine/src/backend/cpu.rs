// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! CPU backend: clusters execute against host memory directly

use spikemesh_neural::ClusterId;
use spikemesh_runtime::ClusterIndexMaps;
use tracing::debug;

use crate::backend::mirror::MirrorHandle;
use crate::backend::ComputeBackend;
use crate::error::Result;

/// Host-only backend. There is no second copy of the maps, so every mirror
/// request completes immediately.
#[derive(Debug, Default)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ComputeBackend for CpuBackend {
    fn backend_name(&self) -> &str {
        "CPU"
    }

    fn copy_index_maps_to_device(
        &mut self,
        cluster: ClusterId,
        _maps: &ClusterIndexMaps,
    ) -> Result<MirrorHandle> {
        debug!(%cluster, "host-resident cluster, mirror is a no-op");
        Ok(MirrorHandle::ready())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_is_immediately_complete() {
        let mut backend = CpuBackend::new();
        let handle = backend
            .copy_index_maps_to_device(ClusterId(0), &ClusterIndexMaps::default())
            .expect("no-op mirror cannot fail");
        assert!(handle.is_complete());
        handle.wait().expect("no-op mirror cannot fail");
    }
}
