// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Cluster: one partition's neurons, synapse store, and index maps

use spikemesh_neural::{ClusterId, NeuronLayoutIndex};

use crate::error::{Result, RuntimeError};
use crate::index_map::ClusterIndexMaps;
use crate::traits::SlotStore;

/// One partition of the network: a contiguous global neuron range, the slot
/// store holding every synapse that terminates in the range, the index maps
/// derived from that store, and the summation buffer deliveries land in.
#[derive(Debug)]
pub struct Cluster<S> {
    pub id: ClusterId,
    pub neurons_begin: u32,
    pub neuron_count: u32,
    pub store: S,
    pub maps: ClusterIndexMaps,
    /// Per-local-neuron accumulation buffer written by propagation.
    pub summation: Vec<f32>,
}

impl<S: SlotStore> Cluster<S> {
    /// Wrap a store, checking that it was sized for this cluster.
    pub fn new(id: ClusterId, neurons_begin: u32, neuron_count: u32, store: S) -> Result<Self> {
        if store.cluster_id() != id || store.neuron_count() != neuron_count {
            return Err(RuntimeError::CorruptState {
                cluster: id,
                detail: format!(
                    "store built for {} with {} rows attached to cluster with {} neurons",
                    store.cluster_id(),
                    store.neuron_count(),
                    neuron_count
                ),
            });
        }
        Ok(Self {
            id,
            neurons_begin,
            neuron_count,
            store,
            maps: ClusterIndexMaps::default(),
            summation: vec![0.0; neuron_count as usize],
        })
    }

    #[inline(always)]
    pub fn neurons_end(&self) -> u32 {
        self.neurons_begin + self.neuron_count
    }

    #[inline(always)]
    pub fn contains(&self, neuron: NeuronLayoutIndex) -> bool {
        neuron.0 >= self.neurons_begin && neuron.0 < self.neurons_end()
    }

    /// Local offset of a global neuron index that belongs to this cluster.
    pub fn local_index(&self, neuron: NeuronLayoutIndex) -> Result<u32> {
        if !self.contains(neuron) {
            return Err(RuntimeError::OutOfRange {
                index: neuron.0,
                total: self.neurons_end(),
            });
        }
        Ok(neuron.0 - self.neurons_begin)
    }

    #[inline(always)]
    pub fn global_index(&self, local_neuron: u32) -> NeuronLayoutIndex {
        NeuronLayoutIndex(self.neurons_begin + local_neuron)
    }

    /// Replace both index maps wholesale (rebuild after any topology change).
    pub fn install_maps(&mut self, maps: ClusterIndexMaps) {
        self.maps = maps;
    }

    /// Zero the summation buffer between steps.
    pub fn clear_summation(&mut self) {
        self.summation.fill(0.0);
    }
}
