// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Run-wide simulation parameters

use crate::partition::PartitionTable;

/// Static facts about the run that connectivity construction consumes:
/// the partition of the neuron population and the slot capacity shared by
/// every cluster store.
#[derive(Debug, Clone)]
pub struct SimulationInfo {
    pub partition: PartitionTable,
    pub max_synapses_per_neuron: u32,
    /// Simulation step length in seconds.
    pub delta_t: f32,
}

impl SimulationInfo {
    pub fn new(partition: PartitionTable, max_synapses_per_neuron: u32, delta_t: f32) -> Self {
        Self {
            partition,
            max_synapses_per_neuron,
            delta_t,
        }
    }

    #[inline(always)]
    pub fn total_neurons(&self) -> u32 {
        self.partition.total_neurons()
    }

    #[inline(always)]
    pub fn num_clusters(&self) -> usize {
        self.partition.num_clusters()
    }
}
