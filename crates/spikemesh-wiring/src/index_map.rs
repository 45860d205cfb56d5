// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Two-pass index-map construction.
//!
//! Pass 1 scans every cluster's slot store in parallel and produces the
//! cluster's incoming map plus the raw (source, address) pairs it owns.
//! The pairs are then merged into a per-source table in cluster order,
//! and pass 2 slices that table back out into per-cluster outgoing maps.
//! No outgoing row is assembled until every incoming scan has finished,
//! so a source's row always lists its targets across the whole network
//! in (cluster, slot) order.

use rayon::prelude::*;
use spikemesh_neural::{CombinedSynapseIndex, SlotOffset};
use spikemesh_runtime::{
    Cluster, ClusterIndexMaps, IncomingIndexMap, OutgoingIndexMap, PartitionTable, RuntimeError,
    SlotStore,
};
use tracing::{debug, info};

use crate::error::Result;

/// Pass-1 product for one cluster: the finished incoming map plus the
/// (source, address) pairs feeding the outgoing pass.
struct IncomingScan {
    incoming: Option<IncomingIndexMap>,
    pairs: Vec<(u32, CombinedSynapseIndex)>,
}

/// Build fresh incoming and outgoing maps for every cluster.
///
/// Clusters must be ordered by id and agree with `partition`. The returned
/// vector is parallel to `clusters`; callers install each entry with
/// [`Cluster::install_maps`] (or use [`rebuild_index_maps`]). Building is
/// a pure read of the slot stores, so a rebuild over unchanged stores
/// yields maps equal to the previous ones.
pub fn build_index_maps<S: SlotStore>(
    clusters: &[Cluster<S>],
    partition: &PartitionTable,
) -> Result<Vec<ClusterIndexMaps>> {
    check_cluster_shape(clusters, partition)?;

    let scans: Vec<IncomingScan> = clusters
        .par_iter()
        .map(|cluster| scan_cluster(cluster))
        .collect::<Result<_>>()?;
    // collect() above is the synchronization point between the passes.

    let total_neurons = partition.total_neurons();
    let mut per_source: Vec<Vec<CombinedSynapseIndex>> = vec![Vec::new(); total_neurons as usize];
    for scan in &scans {
        for &(source, address) in &scan.pairs {
            match per_source.get_mut(source as usize) {
                Some(list) => list.push(address),
                None => {
                    return Err(RuntimeError::OutOfRange {
                        index: source,
                        total: total_neurons,
                    }
                    .into())
                }
            }
        }
    }

    let outgoing: Vec<Option<OutgoingIndexMap>> = clusters
        .par_iter()
        .map(|cluster| slice_outgoing(cluster, &per_source))
        .collect();

    let maps: Vec<ClusterIndexMaps> = scans
        .into_iter()
        .zip(outgoing)
        .map(|(scan, outgoing)| ClusterIndexMaps {
            incoming: scan.incoming,
            outgoing,
        })
        .collect();

    let incoming_entries: usize = maps
        .iter()
        .filter_map(|m| m.incoming.as_ref())
        .map(|m| m.total_entries())
        .sum();
    let outgoing_entries: usize = maps
        .iter()
        .filter_map(|m| m.outgoing.as_ref())
        .map(|m| m.total_entries())
        .sum();
    info!(
        clusters = clusters.len(),
        incoming_entries, outgoing_entries, "index maps built"
    );

    Ok(maps)
}

/// Build and install maps on every cluster in one step.
pub fn rebuild_index_maps<S: SlotStore>(
    clusters: &mut [Cluster<S>],
    partition: &PartitionTable,
) -> Result<()> {
    let maps = build_index_maps(clusters, partition)?;
    for (cluster, map) in clusters.iter_mut().zip(maps) {
        cluster.install_maps(map);
    }
    Ok(())
}

/// Scan one cluster's rows in local-neuron order.
///
/// Cross-checks the live slots found against the store's own counters;
/// a mismatch means the store was mutated behind our back.
fn scan_cluster<S: SlotStore>(cluster: &Cluster<S>) -> Result<IncomingScan> {
    let store = &cluster.store;
    let max = store.max_synapses_per_neuron() as usize;
    let in_use = store.in_use();
    let sources = store.sources();
    let counts = store.synapse_counts();
    let rows = store.neuron_count() as usize;
    let expected = store.total_synapses();

    let mut incoming = IncomingIndexMap::with_capacity(rows, expected as usize);
    let mut pairs: Vec<(u32, CombinedSynapseIndex)> = Vec::with_capacity(expected as usize);
    let mut row: Vec<SlotOffset> = Vec::with_capacity(max);
    let mut live = 0u32;

    for local in 0..rows {
        row.clear();
        let begin = local * max;
        for offset in begin..begin + max {
            if in_use[offset] {
                let slot = SlotOffset(offset as u32);
                row.push(slot);
                pairs.push((sources[offset].0, CombinedSynapseIndex::new(cluster.id, slot)));
            }
        }
        if row.len() as u32 != counts[local] {
            return Err(RuntimeError::CorruptState {
                cluster: cluster.id,
                detail: format!(
                    "local neuron {local} has {} live slots but a recorded count of {}",
                    row.len(),
                    counts[local]
                ),
            }
            .into());
        }
        live += row.len() as u32;
        incoming.push_row(&row);
    }

    if live != expected {
        return Err(RuntimeError::CorruptState {
            cluster: cluster.id,
            detail: format!("scanned {live} live slots but the store total is {expected}"),
        }
        .into());
    }

    debug!(cluster = %cluster.id, live, "incoming scan complete");
    Ok(IncomingScan {
        incoming: (live > 0).then_some(incoming),
        pairs,
    })
}

/// Slice the merged per-source table into one cluster's outgoing map.
fn slice_outgoing<S: SlotStore>(
    cluster: &Cluster<S>,
    per_source: &[Vec<CombinedSynapseIndex>],
) -> Option<OutgoingIndexMap> {
    let begin = cluster.neurons_begin as usize;
    let end = cluster.neurons_end() as usize;
    let total: usize = per_source[begin..end].iter().map(Vec::len).sum();
    if total == 0 {
        return None;
    }

    let mut outgoing = OutgoingIndexMap::with_capacity(cluster.neuron_count as usize, total);
    for list in &per_source[begin..end] {
        outgoing.push_row(list);
    }
    Some(outgoing)
}

/// Reject cluster slices that disagree with the partition table.
pub(crate) fn check_cluster_shape<S: SlotStore>(
    clusters: &[Cluster<S>],
    partition: &PartitionTable,
) -> Result<()> {
    if clusters.len() != partition.num_clusters() {
        return Err(RuntimeError::InvalidPartition(format!(
            "{} clusters handed in but the partition defines {}",
            clusters.len(),
            partition.num_clusters()
        ))
        .into());
    }
    for (position, cluster) in clusters.iter().enumerate() {
        if cluster.id.0 as usize != position {
            return Err(RuntimeError::CorruptState {
                cluster: cluster.id,
                detail: format!("cluster at position {position} carries id {}", cluster.id),
            }
            .into());
        }
        let range = partition.ranges()[position];
        if range.neurons_begin != cluster.neurons_begin
            || range.neuron_count != cluster.neuron_count
        {
            return Err(RuntimeError::CorruptState {
                cluster: cluster.id,
                detail: format!(
                    "cluster spans [{}, {}) but the partition says [{}, {})",
                    cluster.neurons_begin,
                    cluster.neurons_end(),
                    range.neurons_begin,
                    range.neurons_end()
                ),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WiringError;
    use spikemesh_neural::{ClusterId, NeuronLayoutIndex, SynapseClass};
    use spikemesh_runtime::DenseSlotStore;

    fn two_cluster_fixture() -> (Vec<Cluster<DenseSlotStore>>, PartitionTable) {
        let partition = PartitionTable::from_counts(&[2, 2]).expect("partition");
        let clusters = vec![
            Cluster::new(ClusterId(0), 0, 2, DenseSlotStore::new(ClusterId(0), 2, 2))
                .expect("cluster 0"),
            Cluster::new(ClusterId(1), 2, 2, DenseSlotStore::new(ClusterId(1), 2, 2))
                .expect("cluster 1"),
        ];
        (clusters, partition)
    }

    #[test]
    fn cross_cluster_maps_point_both_ways() {
        let (mut clusters, partition) = two_cluster_fixture();

        // Global 0 (cluster 0) drives global 2 (cluster 1, local 0).
        clusters[1]
            .store
            .allocate(0, NeuronLayoutIndex(0), NeuronLayoutIndex(2), 0.5, SynapseClass::ExcToExc, 0)
            .expect("allocate");
        // Global 3 (cluster 1) drives global 1 (cluster 0, local 1).
        clusters[0]
            .store
            .allocate(1, NeuronLayoutIndex(3), NeuronLayoutIndex(1), 0.25, SynapseClass::ExcToExc, 1)
            .expect("allocate");

        let maps = build_index_maps(&clusters, &partition).expect("build");

        let incoming0 = maps[0].incoming.as_ref().expect("cluster 0 incoming");
        assert!(incoming0.range_for(0).is_empty());
        assert_eq!(incoming0.range_for(1), &[SlotOffset(2)]);

        let incoming1 = maps[1].incoming.as_ref().expect("cluster 1 incoming");
        assert_eq!(incoming1.range_for(0), &[SlotOffset(0)]);
        assert!(incoming1.range_for(1).is_empty());

        let outgoing0 = maps[0].outgoing.as_ref().expect("cluster 0 outgoing");
        assert_eq!(
            outgoing0.range_for(0),
            &[CombinedSynapseIndex::new(ClusterId(1), SlotOffset(0))]
        );
        assert!(outgoing0.range_for(1).is_empty());

        let outgoing1 = maps[1].outgoing.as_ref().expect("cluster 1 outgoing");
        assert!(outgoing1.range_for(0).is_empty());
        assert_eq!(
            outgoing1.range_for(1),
            &[CombinedSynapseIndex::new(ClusterId(0), SlotOffset(2))]
        );
    }

    #[test]
    fn empty_clusters_keep_null_maps() {
        let (clusters, partition) = two_cluster_fixture();
        let maps = build_index_maps(&clusters, &partition).expect("build");
        for map in &maps {
            assert!(map.incoming.is_none());
            assert!(map.outgoing.is_none());
        }
    }

    #[test]
    fn outgoing_rows_are_ordered_by_cluster_then_slot() {
        let (mut clusters, partition) = two_cluster_fixture();

        // Global 1 drives one slot in each cluster; cluster 0's address
        // must come first in its outgoing row.
        clusters[1]
            .store
            .allocate(1, NeuronLayoutIndex(1), NeuronLayoutIndex(3), 0.1, SynapseClass::ExcToExc, 1)
            .expect("allocate");
        clusters[0]
            .store
            .allocate(0, NeuronLayoutIndex(1), NeuronLayoutIndex(0), 0.1, SynapseClass::ExcToExc, 0)
            .expect("allocate");

        let maps = build_index_maps(&clusters, &partition).expect("build");
        let outgoing0 = maps[0].outgoing.as_ref().expect("outgoing");
        assert_eq!(
            outgoing0.range_for(1),
            &[
                CombinedSynapseIndex::new(ClusterId(0), SlotOffset(0)),
                CombinedSynapseIndex::new(ClusterId(1), SlotOffset(2)),
            ]
        );
    }

    #[test]
    fn rebuild_is_idempotent() {
        let (mut clusters, partition) = two_cluster_fixture();
        clusters[0]
            .store
            .allocate(0, NeuronLayoutIndex(2), NeuronLayoutIndex(0), 0.5, SynapseClass::ExcToExc, 0)
            .expect("allocate");

        rebuild_index_maps(&mut clusters, &partition).expect("first build");
        let first = (clusters[0].maps.clone(), clusters[1].maps.clone());

        rebuild_index_maps(&mut clusters, &partition).expect("second build");
        assert_eq!(clusters[0].maps, first.0);
        assert_eq!(clusters[1].maps, first.1);
    }

    #[test]
    fn misordered_cluster_slice_is_rejected() {
        let (mut clusters, partition) = two_cluster_fixture();
        clusters.swap(0, 1);
        match build_index_maps(&clusters, &partition) {
            Err(WiringError::Runtime(RuntimeError::CorruptState { .. })) => {}
            other => panic!("expected corrupt state, got {other:?}"),
        }
    }

    #[test]
    fn incoming_counts_match_store_totals() {
        let (mut clusters, partition) = two_cluster_fixture();
        for dest in 0..2u32 {
            clusters[0]
                .store
                .allocate(
                    dest,
                    NeuronLayoutIndex(3),
                    NeuronLayoutIndex(dest),
                    0.5,
                    SynapseClass::ExcToExc,
                    dest,
                )
                .expect("allocate");
        }

        let maps = build_index_maps(&clusters, &partition).expect("build");
        let incoming = maps[0].incoming.as_ref().expect("incoming");
        let total: u32 = (0..2).map(|n| incoming.count_for(n)).sum();
        assert_eq!(total, clusters[0].store.total_synapses());
        assert_eq!(incoming.total_entries() as u32, total);
    }
}
