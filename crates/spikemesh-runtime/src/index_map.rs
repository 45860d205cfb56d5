// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Per-cluster synapse index maps
//!
//! Both directions share the same shape: one flat value array plus per-neuron
//! `(begin, count)` ranges into it. Rows are appended in local-neuron order,
//! so contiguity and non-overlap hold by construction; builders only have to
//! get the row contents right.

use spikemesh_neural::{CombinedSynapseIndex, SlotOffset};

/// Incoming map: for each destination-local neuron, the slot offsets (in this
/// cluster's own store) that deliver to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncomingIndexMap {
    begins: Vec<u32>,
    counts: Vec<u32>,
    slots: Vec<SlotOffset>,
}

impl IncomingIndexMap {
    pub fn with_capacity(neuron_rows: usize, total_hint: usize) -> Self {
        Self {
            begins: Vec::with_capacity(neuron_rows),
            counts: Vec::with_capacity(neuron_rows),
            slots: Vec::with_capacity(total_hint),
        }
    }

    /// Append the next local neuron's row.
    pub fn push_row(&mut self, row: &[SlotOffset]) {
        self.begins.push(self.slots.len() as u32);
        self.counts.push(row.len() as u32);
        self.slots.extend_from_slice(row);
    }

    #[inline(always)]
    pub fn neuron_rows(&self) -> usize {
        self.begins.len()
    }

    #[inline(always)]
    pub fn begin_for(&self, local_neuron: u32) -> u32 {
        self.begins[local_neuron as usize]
    }

    #[inline(always)]
    pub fn count_for(&self, local_neuron: u32) -> u32 {
        self.counts[local_neuron as usize]
    }

    /// Slot offsets delivering to one local neuron.
    pub fn range_for(&self, local_neuron: u32) -> &[SlotOffset] {
        let begin = self.begins[local_neuron as usize] as usize;
        let count = self.counts[local_neuron as usize] as usize;
        &self.slots[begin..begin + count]
    }

    /// All slot offsets, flat.
    pub fn slots(&self) -> &[SlotOffset] {
        &self.slots
    }

    #[inline(always)]
    pub fn total_entries(&self) -> usize {
        self.slots.len()
    }
}

/// Outgoing map: for each source-local neuron, the combined (cluster, slot)
/// addresses of every slot it drives anywhere in the network.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutgoingIndexMap {
    begins: Vec<u32>,
    counts: Vec<u32>,
    targets: Vec<CombinedSynapseIndex>,
}

impl OutgoingIndexMap {
    pub fn with_capacity(neuron_rows: usize, total_hint: usize) -> Self {
        Self {
            begins: Vec::with_capacity(neuron_rows),
            counts: Vec::with_capacity(neuron_rows),
            targets: Vec::with_capacity(total_hint),
        }
    }

    /// Append the next local neuron's row.
    pub fn push_row(&mut self, row: &[CombinedSynapseIndex]) {
        self.begins.push(self.targets.len() as u32);
        self.counts.push(row.len() as u32);
        self.targets.extend_from_slice(row);
    }

    #[inline(always)]
    pub fn neuron_rows(&self) -> usize {
        self.begins.len()
    }

    #[inline(always)]
    pub fn begin_for(&self, local_neuron: u32) -> u32 {
        self.begins[local_neuron as usize]
    }

    #[inline(always)]
    pub fn count_for(&self, local_neuron: u32) -> u32 {
        self.counts[local_neuron as usize]
    }

    /// Combined addresses driven by one local neuron.
    pub fn range_for(&self, local_neuron: u32) -> &[CombinedSynapseIndex] {
        let begin = self.begins[local_neuron as usize] as usize;
        let count = self.counts[local_neuron as usize] as usize;
        &self.targets[begin..begin + count]
    }

    /// All combined addresses, flat.
    pub fn targets(&self) -> &[CombinedSynapseIndex] {
        &self.targets
    }

    #[inline(always)]
    pub fn total_entries(&self) -> usize {
        self.targets.len()
    }
}

/// Both direction maps for one cluster.
///
/// `None` means the direction has no entries at all for this cluster (built
/// but empty). Rebuilds replace the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusterIndexMaps {
    pub incoming: Option<IncomingIndexMap>,
    pub outgoing: Option<OutgoingIndexMap>,
}
