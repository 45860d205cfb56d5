// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Global-to-cluster neuron resolution
//!
//! The neuron population is split into clusters, each owning one contiguous
//! range of global indices. The table is immutable for the lifetime of a run
//! and every resolution is a pure binary search over it.

use spikemesh_neural::{ClusterId, NeuronLayoutIndex};
use tracing::debug;

use crate::error::{Result, RuntimeError};

/// Contiguous range of global neuron indices owned by one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterRange {
    pub neurons_begin: u32,
    pub neuron_count: u32,
}

impl ClusterRange {
    #[inline(always)]
    pub fn neurons_end(&self) -> u32 {
        self.neurons_begin + self.neuron_count
    }

    #[inline(always)]
    pub fn contains(&self, neuron: NeuronLayoutIndex) -> bool {
        neuron.0 >= self.neurons_begin && neuron.0 < self.neurons_end()
    }
}

/// Validated cluster table: ranges are non-empty, ordered, and tile
/// `[0, total_neurons)` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable {
    ranges: Vec<ClusterRange>,
    total_neurons: u32,
}

impl PartitionTable {
    /// Build a table from explicit ranges, rejecting gaps, overlaps, and
    /// empty clusters.
    pub fn new(ranges: Vec<ClusterRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(RuntimeError::InvalidPartition(
                "partition has no clusters".into(),
            ));
        }

        let mut expected_begin = 0u32;
        for (i, range) in ranges.iter().enumerate() {
            if range.neuron_count == 0 {
                return Err(RuntimeError::InvalidPartition(format!(
                    "cluster {} is empty",
                    i
                )));
            }
            if range.neurons_begin != expected_begin {
                return Err(RuntimeError::InvalidPartition(format!(
                    "cluster {} begins at {} but neuron {} is the next unassigned index",
                    i, range.neurons_begin, expected_begin
                )));
            }
            expected_begin = range.neurons_end();
        }

        debug!(
            clusters = ranges.len(),
            total_neurons = expected_begin,
            "partition table validated"
        );

        Ok(Self {
            ranges,
            total_neurons: expected_begin,
        })
    }

    /// Build a table from per-cluster neuron counts, packed from index 0.
    pub fn from_counts(counts: &[u32]) -> Result<Self> {
        let mut ranges = Vec::with_capacity(counts.len());
        let mut begin = 0u32;
        for &count in counts {
            ranges.push(ClusterRange {
                neurons_begin: begin,
                neuron_count: count,
            });
            begin += count;
        }
        Self::new(ranges)
    }

    #[inline(always)]
    pub fn total_neurons(&self) -> u32 {
        self.total_neurons
    }

    #[inline(always)]
    pub fn num_clusters(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[ClusterRange] {
        &self.ranges
    }

    pub fn range_of(&self, cluster: ClusterId) -> Option<&ClusterRange> {
        self.ranges.get(cluster.0 as usize)
    }

    /// Resolve the cluster that owns a global neuron index.
    pub fn cluster_of(&self, neuron: NeuronLayoutIndex) -> Result<ClusterId> {
        if neuron.0 >= self.total_neurons {
            return Err(RuntimeError::OutOfRange {
                index: neuron.0,
                total: self.total_neurons,
            });
        }
        // Ranges tile [0, total), so the predecessor of the first range
        // beginning past the index is the owner.
        let pos = self
            .ranges
            .partition_point(|r| r.neurons_begin <= neuron.0);
        Ok(ClusterId((pos - 1) as u32))
    }

    /// Offset of a global neuron index within its owning cluster.
    pub fn local_offset_of(&self, neuron: NeuronLayoutIndex) -> Result<u32> {
        self.locate(neuron).map(|(_, local)| local)
    }

    /// Resolve a global neuron index to (owning cluster, local offset).
    pub fn locate(&self, neuron: NeuronLayoutIndex) -> Result<(ClusterId, u32)> {
        let cluster = self.cluster_of(neuron)?;
        let begin = self.ranges[cluster.0 as usize].neurons_begin;
        Ok((cluster, neuron.0 - begin))
    }
}
