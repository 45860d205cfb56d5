// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Staged device backend
//!
//! Snapshots a cluster's host maps, packs them into the flat device wire
//! format off-thread, and retains the packed buffers keyed by cluster. This
//! is the host side of an accelerator upload: everything up to (but not
//! including) the vendor transfer call.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use spikemesh_neural::ClusterId;
use spikemesh_runtime::ClusterIndexMaps;
use tracing::{debug, warn};

use crate::backend::mirror::{DeviceIndexMaps, MirrorHandle};
use crate::backend::ComputeBackend;
use crate::error::{EngineError, Result};

/// Backend that maintains device-format copies of every mirrored cluster.
#[derive(Debug, Default)]
pub struct StagedDeviceBackend {
    device_maps: Arc<Mutex<AHashMap<ClusterId, DeviceIndexMaps>>>,
}

impl StagedDeviceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packed buffers for a cluster, if it has been mirrored.
    pub fn device_maps(&self, cluster: ClusterId) -> Option<DeviceIndexMaps> {
        self.device_maps.lock().get(&cluster).cloned()
    }

    /// Number of clusters currently mirrored.
    pub fn mirrored_clusters(&self) -> usize {
        self.device_maps.lock().len()
    }
}

impl ComputeBackend for StagedDeviceBackend {
    fn backend_name(&self) -> &str {
        "StagedDevice"
    }

    fn copy_index_maps_to_device(
        &mut self,
        cluster: ClusterId,
        maps: &ClusterIndexMaps,
    ) -> Result<MirrorHandle> {
        // Snapshot while the caller still guarantees the maps are stable.
        let staged = maps.clone();
        let device_maps = Arc::clone(&self.device_maps);
        let (handle, completer) = MirrorHandle::pending();

        let spawned = std::thread::Builder::new()
            .name(format!("mirror-{}", cluster.0))
            .spawn(move || {
                let packed = DeviceIndexMaps::from_host(&staged);
                debug!(
                    %cluster,
                    incoming = packed.incoming_slots.len(),
                    outgoing = packed.outgoing_targets.len(),
                    "cluster maps packed for device"
                );
                device_maps.lock().insert(cluster, packed);
                completer.complete();
            });

        match spawned {
            Ok(_) => Ok(handle),
            Err(e) => {
                warn!(%cluster, error = %e, "mirror staging thread failed to start");
                Err(EngineError::MirrorFailed(format!(
                    "could not start staging thread for {}: {}",
                    cluster, e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikemesh_neural::{CombinedSynapseIndex, SlotOffset};
    use spikemesh_runtime::{IncomingIndexMap, OutgoingIndexMap};

    fn sample_maps() -> ClusterIndexMaps {
        let mut incoming = IncomingIndexMap::default();
        incoming.push_row(&[SlotOffset(1)]);
        incoming.push_row(&[SlotOffset(3), SlotOffset(4)]);

        let mut outgoing = OutgoingIndexMap::default();
        outgoing.push_row(&[CombinedSynapseIndex::new(ClusterId(0), SlotOffset(1))]);
        outgoing.push_row(&[]);

        ClusterIndexMaps {
            incoming: Some(incoming),
            outgoing: Some(outgoing),
        }
    }

    #[test]
    fn mirrored_cluster_is_retained_in_device_format() {
        let mut backend = StagedDeviceBackend::new();
        let maps = sample_maps();

        let handle = backend
            .copy_index_maps_to_device(ClusterId(0), &maps)
            .expect("staging thread starts");
        handle.wait().expect("packing succeeds");

        let device = backend
            .device_maps(ClusterId(0))
            .expect("cluster was mirrored");
        assert_eq!(device, DeviceIndexMaps::from_host(&maps));
        assert_eq!(backend.mirrored_clusters(), 1);
    }

    #[test]
    fn remirroring_replaces_the_previous_copy() {
        let mut backend = StagedDeviceBackend::new();

        backend
            .copy_index_maps_to_device(ClusterId(2), &sample_maps())
            .expect("staging thread starts")
            .wait()
            .expect("packing succeeds");

        let empty = ClusterIndexMaps::default();
        backend
            .copy_index_maps_to_device(ClusterId(2), &empty)
            .expect("staging thread starts")
            .wait()
            .expect("packing succeeds");

        let device = backend.device_maps(ClusterId(2)).expect("still mirrored");
        assert_eq!(device, DeviceIndexMaps::default());
        assert_eq!(backend.mirrored_clusters(), 1);
    }
}
