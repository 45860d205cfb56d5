// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Device mirror plumbing
//!
//! Mirroring is a one-shot bulk copy per cluster, issued after the host maps
//! are final. The copy may run off-thread; the returned [`MirrorHandle`] is
//! the synchronization point. Host maps must stay unmodified until the handle
//! reports completion.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use spikemesh_runtime::ClusterIndexMaps;

use crate::error::{EngineError, Result};

/// Index maps flattened into the device wire format: raw begin/count/value
/// arrays, outgoing entries packed with
/// [`CombinedSynapseIndex::encode`](spikemesh_neural::CombinedSynapseIndex::encode).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceIndexMaps {
    pub incoming_begins: Vec<u32>,
    pub incoming_counts: Vec<u32>,
    pub incoming_slots: Vec<u32>,
    pub outgoing_begins: Vec<u32>,
    pub outgoing_counts: Vec<u32>,
    pub outgoing_targets: Vec<u64>,
}

impl DeviceIndexMaps {
    /// Pack a cluster's host maps. An absent direction packs to empty arrays.
    pub fn from_host(maps: &ClusterIndexMaps) -> Self {
        let mut device = Self::default();

        if let Some(incoming) = &maps.incoming {
            let rows = incoming.neuron_rows() as u32;
            device.incoming_begins = (0..rows).map(|n| incoming.begin_for(n)).collect();
            device.incoming_counts = (0..rows).map(|n| incoming.count_for(n)).collect();
            device.incoming_slots = incoming.slots().iter().map(|s| s.0).collect();
        }

        if let Some(outgoing) = &maps.outgoing {
            let rows = outgoing.neuron_rows() as u32;
            device.outgoing_begins = (0..rows).map(|n| outgoing.begin_for(n)).collect();
            device.outgoing_counts = (0..rows).map(|n| outgoing.count_for(n)).collect();
            device.outgoing_targets = outgoing.targets().iter().map(|t| t.encode()).collect();
        }

        device
    }
}

enum MirrorState {
    Pending,
    Complete,
    Failed(String),
}

struct MirrorShared {
    state: Mutex<MirrorState>,
    ready: Condvar,
}

/// Completion handle for one cluster's mirror copy.
///
/// [`wait`](Self::wait) blocks until the copy lands (or surfaces the staging
/// failure). Backends whose clusters are host-resident hand back an
/// already-complete handle.
pub struct MirrorHandle {
    shared: Arc<MirrorShared>,
}

impl MirrorHandle {
    /// Handle that is complete from the start (no device copy needed).
    pub fn ready() -> Self {
        Self {
            shared: Arc::new(MirrorShared {
                state: Mutex::new(MirrorState::Complete),
                ready: Condvar::new(),
            }),
        }
    }

    pub(crate) fn pending() -> (Self, MirrorCompleter) {
        let shared = Arc::new(MirrorShared {
            state: Mutex::new(MirrorState::Pending),
            ready: Condvar::new(),
        });
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MirrorCompleter { shared },
        )
    }

    /// Block until the mirror copy has completed.
    pub fn wait(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        while matches!(*state, MirrorState::Pending) {
            self.shared.ready.wait(&mut state);
        }
        match &*state {
            MirrorState::Complete => Ok(()),
            MirrorState::Failed(reason) => Err(EngineError::MirrorFailed(reason.clone())),
            MirrorState::Pending => unreachable!("wait loop exits only on a final state"),
        }
    }

    /// Non-blocking completion probe.
    pub fn is_complete(&self) -> bool {
        matches!(*self.shared.state.lock(), MirrorState::Complete)
    }
}

/// Write end of a pending handle, moved into the staging thread.
pub(crate) struct MirrorCompleter {
    shared: Arc<MirrorShared>,
}

impl MirrorCompleter {
    pub(crate) fn complete(self) {
        *self.shared.state.lock() = MirrorState::Complete;
        self.shared.ready.notify_all();
    }

    pub(crate) fn fail(self, reason: String) {
        *self.shared.state.lock() = MirrorState::Failed(reason);
        self.shared.ready.notify_all();
    }
}
