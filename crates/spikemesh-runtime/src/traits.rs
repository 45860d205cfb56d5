// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Slot store abstraction
//!
//! The index-map builder, consistency checker, and propagation step only ever
//! talk to a cluster's synapse storage through this trait, so alternative
//! layouts (pinned host memory, arena-backed stores) can be swapped in
//! without touching the mapping core.

use spikemesh_neural::{ClusterId, NeuronLayoutIndex, SlotOffset, SynapseClass};

use crate::error::Result;

/// Fixed-capacity per-neuron synapse slot storage for one cluster.
///
/// Slots are addressed by their flat offset
/// `local_neuron * max_synapses_per_neuron + j`; every slice accessor returns
/// the full capacity-sized array indexed by that offset, with
/// [`in_use`](Self::in_use) gating which entries are live.
pub trait SlotStore: Send + Sync {
    // === Metadata ===

    /// Cluster this store belongs to.
    fn cluster_id(&self) -> ClusterId;

    /// Number of destination-local neuron rows.
    fn neuron_count(&self) -> u32;

    /// Slot capacity of each row.
    fn max_synapses_per_neuron(&self) -> u32;

    /// Live synapses across all rows.
    fn total_synapses(&self) -> u32;

    /// Live synapses per destination-local neuron.
    fn synapse_counts(&self) -> &[u32];

    // === Slot Properties (Read-Only) ===

    /// Live-slot mask.
    fn in_use(&self) -> &[bool];

    /// Source neuron global indices.
    fn sources(&self) -> &[NeuronLayoutIndex];

    /// Destination neuron global indices.
    fn destinations(&self) -> &[NeuronLayoutIndex];

    /// Signed synaptic weights.
    fn weights(&self) -> &[f32];

    /// Short-term efficacy state (1.0 = baseline).
    fn efficacies(&self) -> &[f32];

    /// Synapse classifications.
    fn classes(&self) -> &[SynapseClass];

    /// Destination-local index of the summation entry each slot delivers to.
    fn summation_targets(&self) -> &[u32];

    // === Slot Properties (Mutable) ===

    /// Mutable weights (learning rules adjust these in place).
    fn weights_mut(&mut self) -> &mut [f32];

    /// Mutable efficacy state.
    fn efficacies_mut(&mut self) -> &mut [f32];

    // === Slot Lifecycle ===

    /// Claim a free slot in `local_neuron`'s row.
    ///
    /// Fails with `CapacityExceeded` when the row is full and `OutOfRange`
    /// when the row index is not a valid local neuron.
    fn allocate(
        &mut self,
        local_neuron: u32,
        source: NeuronLayoutIndex,
        destination: NeuronLayoutIndex,
        weight: f32,
        class: SynapseClass,
        summation_target: u32,
    ) -> Result<SlotOffset>;

    /// Free a live slot (growth and rewiring epochs remove synapses).
    fn release(&mut self, slot: SlotOffset) -> Result<()>;

    // === Derived helpers ===

    /// Row that owns a slot offset.
    #[inline(always)]
    fn local_neuron_of(&self, slot: SlotOffset) -> u32 {
        slot.0 / self.max_synapses_per_neuron()
    }
}
