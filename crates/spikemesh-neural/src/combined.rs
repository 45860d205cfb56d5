// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Partition-aware synapse addressing

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ClusterId, SlotOffset};

/// Address of one synapse slot anywhere in the network: the cluster that owns
/// the slot store plus the flat slot offset inside it.
///
/// Outgoing index maps are built from these so a source neuron can name slots
/// that live in other clusters. Host-side code works with the struct; only
/// device mirrors carry the packed form produced by [`encode`](Self::encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombinedSynapseIndex {
    pub cluster: ClusterId,
    pub slot: SlotOffset,
}

impl CombinedSynapseIndex {
    #[inline(always)]
    pub fn new(cluster: ClusterId, slot: SlotOffset) -> Self {
        Self { cluster, slot }
    }

    /// Pack into the device wire form: cluster in the high 32 bits, slot
    /// offset in the low 32.
    #[inline(always)]
    pub fn encode(self) -> u64 {
        ((self.cluster.0 as u64) << 32) | self.slot.0 as u64
    }

    /// Exact inverse of [`encode`](Self::encode).
    #[inline(always)]
    pub fn decode(raw: u64) -> Self {
        Self {
            cluster: ClusterId((raw >> 32) as u32),
            slot: SlotOffset(raw as u32),
        }
    }
}

impl fmt::Display for CombinedSynapseIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cluster, self.slot)
    }
}
