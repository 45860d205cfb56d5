// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Dense synapse slot store
//!
//! Structure-of-arrays layout: one capacity-sized array per property, flat
//! row-major over (destination-local neuron, slot). The same layout the
//! device mirrors use, so a host store can be copied out without repacking.

use serde::Serialize;
use spikemesh_neural::{ClusterId, NeuronLayoutIndex, SlotOffset, SynapseClass};

use crate::error::{Result, RuntimeError};
use crate::traits::SlotStore;

/// Dense per-cluster slot store for host execution.
///
/// Every row holds exactly `max_synapses_per_neuron` slots; a free slot keeps
/// placeholder values and `in_use = false`.
#[derive(Debug, Clone)]
pub struct DenseSlotStore {
    cluster: ClusterId,
    neuron_count: u32,
    max_synapses_per_neuron: u32,

    in_use: Vec<bool>,
    sources: Vec<NeuronLayoutIndex>,
    destinations: Vec<NeuronLayoutIndex>,
    weights: Vec<f32>,
    efficacies: Vec<f32>,
    classes: Vec<SynapseClass>,
    summation_targets: Vec<u32>,

    /// Live slots per destination-local neuron.
    synapse_counts: Vec<u32>,
    total: u32,
}

/// Aggregate occupancy figures for one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotStoreStats {
    pub live_slots: u32,
    pub slot_capacity: u32,
    pub occupied_neurons: u32,
    pub max_row_fill: u32,
}

impl DenseSlotStore {
    /// Allocate a store with `neuron_count * max_synapses_per_neuron` slots,
    /// all free.
    pub fn new(cluster: ClusterId, neuron_count: u32, max_synapses_per_neuron: u32) -> Self {
        let slots = neuron_count as usize * max_synapses_per_neuron as usize;
        Self {
            cluster,
            neuron_count,
            max_synapses_per_neuron,
            in_use: vec![false; slots],
            sources: vec![NeuronLayoutIndex(0); slots],
            destinations: vec![NeuronLayoutIndex(0); slots],
            weights: vec![0.0; slots],
            efficacies: vec![1.0; slots],
            classes: vec![SynapseClass::ExcToExc; slots],
            summation_targets: vec![0; slots],
            synapse_counts: vec![0; neuron_count as usize],
            total: 0,
        }
    }

    /// First slot offset of a local neuron's row.
    #[inline(always)]
    pub fn row_begin(&self, local_neuron: u32) -> u32 {
        local_neuron * self.max_synapses_per_neuron
    }

    pub fn stats(&self) -> SlotStoreStats {
        SlotStoreStats {
            live_slots: self.total,
            slot_capacity: self.in_use.len() as u32,
            occupied_neurons: self.synapse_counts.iter().filter(|&&c| c > 0).count() as u32,
            max_row_fill: self.synapse_counts.iter().copied().max().unwrap_or(0),
        }
    }
}

impl SlotStore for DenseSlotStore {
    fn cluster_id(&self) -> ClusterId {
        self.cluster
    }

    fn neuron_count(&self) -> u32 {
        self.neuron_count
    }

    fn max_synapses_per_neuron(&self) -> u32 {
        self.max_synapses_per_neuron
    }

    fn total_synapses(&self) -> u32 {
        self.total
    }

    fn synapse_counts(&self) -> &[u32] {
        &self.synapse_counts
    }

    fn in_use(&self) -> &[bool] {
        &self.in_use
    }

    fn sources(&self) -> &[NeuronLayoutIndex] {
        &self.sources
    }

    fn destinations(&self) -> &[NeuronLayoutIndex] {
        &self.destinations
    }

    fn weights(&self) -> &[f32] {
        &self.weights
    }

    fn efficacies(&self) -> &[f32] {
        &self.efficacies
    }

    fn classes(&self) -> &[SynapseClass] {
        &self.classes
    }

    fn summation_targets(&self) -> &[u32] {
        &self.summation_targets
    }

    fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    fn efficacies_mut(&mut self) -> &mut [f32] {
        &mut self.efficacies
    }

    fn allocate(
        &mut self,
        local_neuron: u32,
        source: NeuronLayoutIndex,
        destination: NeuronLayoutIndex,
        weight: f32,
        class: SynapseClass,
        summation_target: u32,
    ) -> Result<SlotOffset> {
        if local_neuron >= self.neuron_count {
            return Err(RuntimeError::OutOfRange {
                index: local_neuron,
                total: self.neuron_count,
            });
        }
        if self.synapse_counts[local_neuron as usize] >= self.max_synapses_per_neuron {
            return Err(RuntimeError::CapacityExceeded {
                cluster: self.cluster,
                neuron: local_neuron,
                capacity: self.max_synapses_per_neuron,
            });
        }

        // The count check above guarantees a free slot exists in this row.
        let begin = self.row_begin(local_neuron) as usize;
        let row = &self.in_use[begin..begin + self.max_synapses_per_neuron as usize];
        let free = row.iter().position(|&used| !used).ok_or_else(|| {
            RuntimeError::CorruptState {
                cluster: self.cluster,
                detail: format!(
                    "row of local neuron {} reports {} live slots but has no free slot",
                    local_neuron, self.synapse_counts[local_neuron as usize]
                ),
            }
        })?;

        let offset = begin + free;
        self.in_use[offset] = true;
        self.sources[offset] = source;
        self.destinations[offset] = destination;
        self.weights[offset] = weight;
        self.efficacies[offset] = 1.0;
        self.classes[offset] = class;
        self.summation_targets[offset] = summation_target;
        self.synapse_counts[local_neuron as usize] += 1;
        self.total += 1;

        Ok(SlotOffset(offset as u32))
    }

    fn release(&mut self, slot: SlotOffset) -> Result<()> {
        let offset = slot.0 as usize;
        if offset >= self.in_use.len() {
            return Err(RuntimeError::CorruptState {
                cluster: self.cluster,
                detail: format!(
                    "release of slot {} beyond store capacity {}",
                    slot.0,
                    self.in_use.len()
                ),
            });
        }
        if !self.in_use[offset] {
            return Err(RuntimeError::CorruptState {
                cluster: self.cluster,
                detail: format!("release of slot {} which is not in use", slot.0),
            });
        }

        self.in_use[offset] = false;
        let local_neuron = slot.0 / self.max_synapses_per_neuron;
        self.synapse_counts[local_neuron as usize] -= 1;
        self.total -= 1;
        Ok(())
    }
}
