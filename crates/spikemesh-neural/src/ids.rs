// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Identity types shared across the workspace

use core::fmt;

use serde::{Deserialize, Serialize};

/// Global neuron index (unique across the entire network, `0..total_neurons`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NeuronLayoutIndex(pub u32);

impl fmt::Display for NeuronLayoutIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Neuron({})", self.0)
    }
}

/// Cluster ID (position of the cluster in the partition table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cluster({})", self.0)
    }
}

/// Flat slot offset within one cluster's synapse store
/// (`local_neuron * max_synapses_per_neuron + j`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotOffset(pub u32);

impl fmt::Display for SlotOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}
