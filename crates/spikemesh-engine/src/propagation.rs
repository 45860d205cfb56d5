// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! # Synaptic Propagation
//!
//! The per-step consumer of the outgoing index maps: fired source neurons are
//! resolved to the slots they drive (in any cluster), each slot's signed
//! weight is scaled by its short-term efficacy, and the results are grouped
//! per destination cluster and accumulated into that cluster's summation
//! buffer.
//!
//! Three phases, mirroring how the maps were meant to be read:
//! 1. **Gather** - outgoing entries of every fired source (parallel)
//! 2. **Compute** - per-slot contribution through the owning store (parallel)
//! 3. **Group** - bucket by destination cluster, then apply sequentially

use ahash::AHashMap;
use rayon::prelude::*;
use spikemesh_neural::{ClusterId, CombinedSynapseIndex, NeuronLayoutIndex};
use spikemesh_runtime::{Cluster, PartitionTable, RuntimeError, SlotStore};
use tracing::debug;

use crate::error::Result;

/// Explicit step counter threaded through the engine (no ambient globals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepState {
    step: u64,
}

impl StepState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn step(&self) -> u64 {
        self.step
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        self.step += 1;
    }
}

/// Per-step delivery statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropagationStats {
    /// Step this delivery belonged to.
    pub step: u64,
    /// Fired sources that were looked up.
    pub fired_sources: usize,
    /// Live slots that received a delivery.
    pub synapses_delivered: usize,
    /// Destination clusters touched.
    pub clusters_touched: usize,
}

/// Deliver one step's firings through the outgoing maps.
///
/// `clusters` must be ordered by cluster id (position `i` holds `ClusterId(i)`,
/// as produced by network construction) and must carry maps built from the
/// current stores. Contributions accumulate into `Cluster::summation`; the
/// caller clears those buffers between steps.
pub fn propagate<S: SlotStore>(
    clusters: &mut [Cluster<S>],
    partition: &PartitionTable,
    fired: &[NeuronLayoutIndex],
    state: &mut StepState,
) -> Result<PropagationStats> {
    let step = state.step();

    for (position, cluster) in clusters.iter().enumerate() {
        if cluster.id.0 as usize != position {
            return Err(RuntimeError::CorruptState {
                cluster: cluster.id,
                detail: format!("cluster found at position {} of the network", position),
            }
            .into());
        }
    }

    if fired.is_empty() {
        state.advance();
        return Ok(PropagationStats {
            step,
            ..PropagationStats::default()
        });
    }

    // Parallel phases read the network, the apply phase mutates it.
    let view: &[Cluster<S>] = clusters;

    // PHASE 1: GATHER - outgoing rows of every fired source (parallel)
    let rows = fired
        .par_iter()
        .map(|&neuron| -> core::result::Result<&[CombinedSynapseIndex], RuntimeError> {
            let (cluster_id, local) = partition.locate(neuron)?;
            let cluster = &view[cluster_id.0 as usize];
            Ok(cluster
                .maps
                .outgoing
                .as_ref()
                .map(|map| map.range_for(local))
                .unwrap_or(&[]))
        })
        .collect::<core::result::Result<Vec<_>, RuntimeError>>()?;

    let entries: Vec<CombinedSynapseIndex> = rows.into_iter().flatten().copied().collect();

    // PHASE 2: COMPUTE - contribution of each addressed slot (parallel)
    let contributions = entries
        .par_iter()
        .map(|&entry| -> core::result::Result<Option<(ClusterId, u32, f32)>, RuntimeError> {
            let cluster = view
                .get(entry.cluster.0 as usize)
                .ok_or_else(|| RuntimeError::CorruptState {
                    cluster: entry.cluster,
                    detail: format!("outgoing entry {} names a cluster that does not exist", entry),
                })?;
            let slot = entry.slot.0 as usize;
            if slot >= cluster.store.in_use().len() {
                return Err(RuntimeError::CorruptState {
                    cluster: entry.cluster,
                    detail: format!("outgoing entry {} is beyond the store capacity", entry),
                });
            }
            // Maps are rebuilt after topology changes; a slot freed since the
            // last rebuild contributes nothing.
            if !cluster.store.in_use()[slot] {
                return Ok(None);
            }

            let target = cluster.store.summation_targets()[slot];
            if target >= cluster.neuron_count {
                return Err(RuntimeError::CorruptState {
                    cluster: entry.cluster,
                    detail: format!(
                        "slot {} delivers to local neuron {} of {}",
                        entry.slot, target, cluster.neuron_count
                    ),
                });
            }

            let value = cluster.store.weights()[slot] * cluster.store.efficacies()[slot];
            Ok(Some((entry.cluster, target, value)))
        })
        .collect::<core::result::Result<Vec<_>, RuntimeError>>()?;

    // PHASE 3: GROUP - bucket by destination cluster, apply sequentially
    let mut grouped: AHashMap<ClusterId, Vec<(u32, f32)>> = AHashMap::new();
    for (cluster_id, target, value) in contributions.into_iter().flatten() {
        grouped.entry(cluster_id).or_default().push((target, value));
    }

    let clusters_touched = grouped.len();
    let mut synapses_delivered = 0usize;
    for (cluster_id, deliveries) in grouped {
        let cluster = &mut clusters[cluster_id.0 as usize];
        synapses_delivered += deliveries.len();
        for (target, value) in deliveries {
            cluster.summation[target as usize] += value;
        }
    }

    debug!(
        step,
        fired = fired.len(),
        delivered = synapses_delivered,
        clusters = clusters_touched,
        "propagation step applied"
    );

    state.advance();
    Ok(PropagationStats {
        step,
        fired_sources: fired.len(),
        synapses_delivered,
        clusters_touched,
    })
}
