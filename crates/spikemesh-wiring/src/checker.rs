// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Index-map consistency verification.
//!
//! Walks every cluster's maps against the slot stores and the partition
//! table and fails on the first violation. The checks are exhaustive
//! rather than fast; this runs after construction or when debugging a
//! suspected stale map, not inside the simulation loop.

use rayon::prelude::*;
use serde::Serialize;
use spikemesh_neural::{ClusterId, CombinedSynapseIndex, SlotOffset};
use spikemesh_runtime::{Cluster, PartitionTable, RuntimeError, SlotStore};
use tracing::info;

use crate::error::{Result, WiringError};
use crate::index_map::check_cluster_shape;

/// Totals from a successful verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConsistencyReport {
    pub clusters_checked: usize,
    pub live_slots_checked: usize,
    pub cross_cluster_entries: usize,
}

/// Verify every cluster's index maps against its slot store.
///
/// Confirms that each direction's map is present exactly when it has
/// entries, that incoming rows list each live slot of their neuron once
/// and nothing else, that slot destinations and summation targets
/// resolve back to the row they sit in, and that each live slot appears
/// exactly once in its source neuron's outgoing row with every outgoing
/// entry pointing at a live slot fed by that neuron.
pub fn verify_index_maps<S: SlotStore>(
    clusters: &[Cluster<S>],
    partition: &PartitionTable,
) -> Result<ConsistencyReport> {
    check_cluster_shape(clusters, partition)?;

    let live_counts: Vec<u32> = clusters
        .par_iter()
        .map(|cluster| verify_incoming(cluster, partition))
        .collect::<Result<_>>()?;

    let cross_cluster_entries = verify_outgoing(clusters, partition)?;

    let report = ConsistencyReport {
        clusters_checked: clusters.len(),
        live_slots_checked: live_counts.iter().map(|&n| n as usize).sum(),
        cross_cluster_entries,
    };
    info!(
        clusters = report.clusters_checked,
        live_slots = report.live_slots_checked,
        cross_cluster = report.cross_cluster_entries,
        "index maps verified"
    );
    Ok(report)
}

fn corrupt(cluster: ClusterId, detail: String) -> WiringError {
    RuntimeError::CorruptState { cluster, detail }.into()
}

/// Check one cluster's incoming map against its store.
fn verify_incoming<S: SlotStore>(cluster: &Cluster<S>, partition: &PartitionTable) -> Result<u32> {
    let store = &cluster.store;
    let total = store.total_synapses();
    let incoming = match cluster.maps.incoming.as_ref() {
        Some(map) => map,
        None => {
            if total != 0 {
                return Err(corrupt(
                    cluster.id,
                    format!("{total} live slots but no incoming map"),
                ));
            }
            return Ok(0);
        }
    };
    if total == 0 {
        return Err(corrupt(
            cluster.id,
            "incoming map present on a cluster with no live slots".into(),
        ));
    }
    if incoming.neuron_rows() != store.neuron_count() as usize {
        return Err(corrupt(
            cluster.id,
            format!(
                "incoming map has {} rows for {} neurons",
                incoming.neuron_rows(),
                store.neuron_count()
            ),
        ));
    }

    let in_use = store.in_use();
    let destinations = store.destinations();
    let summation_targets = store.summation_targets();
    let counts = store.synapse_counts();
    let capacity = in_use.len();
    let mut seen = vec![false; capacity];

    for local in 0..store.neuron_count() {
        let row = incoming.range_for(local);
        if row.len() as u32 != counts[local as usize] {
            return Err(corrupt(
                cluster.id,
                format!(
                    "incoming row {local} lists {} slots but the store counts {}",
                    row.len(),
                    counts[local as usize]
                ),
            ));
        }
        for &slot in row {
            let offset = slot.0 as usize;
            if offset >= capacity {
                return Err(corrupt(
                    cluster.id,
                    format!("incoming row {local} references {slot} beyond capacity {capacity}"),
                ));
            }
            if !in_use[offset] {
                return Err(corrupt(
                    cluster.id,
                    format!("incoming row {local} references free {slot}"),
                ));
            }
            if store.local_neuron_of(slot) != local {
                return Err(corrupt(
                    cluster.id,
                    format!(
                        "{slot} sits in row {} but is mapped under row {local}",
                        store.local_neuron_of(slot)
                    ),
                ));
            }
            if seen[offset] {
                return Err(corrupt(cluster.id, format!("{slot} is mapped twice")));
            }
            seen[offset] = true;

            let (dest_cluster, dest_local) = partition.locate(destinations[offset])?;
            if dest_cluster != cluster.id || dest_local != local {
                return Err(corrupt(
                    cluster.id,
                    format!(
                        "{slot} claims destination {} which resolves to {dest_cluster} local {dest_local}",
                        destinations[offset]
                    ),
                ));
            }
            if summation_targets[offset] != local {
                return Err(corrupt(
                    cluster.id,
                    format!(
                        "{slot} delivers to summation entry {} instead of {local}",
                        summation_targets[offset]
                    ),
                ));
            }
        }
    }

    for (offset, (&used, &was_seen)) in in_use.iter().zip(&seen).enumerate() {
        if used && !was_seen {
            return Err(corrupt(
                cluster.id,
                format!("live slot {offset} appears in no incoming row"),
            ));
        }
    }
    let mapped = seen.iter().filter(|&&s| s).count() as u32;
    if mapped != total {
        return Err(corrupt(
            cluster.id,
            format!("{mapped} slots mapped but the store total is {total}"),
        ));
    }
    Ok(total)
}

/// Cross-check outgoing maps network-wide. Returns the number of
/// entries whose target lives in a different cluster than the source.
fn verify_outgoing<S: SlotStore>(
    clusters: &[Cluster<S>],
    partition: &PartitionTable,
) -> Result<usize> {
    // Forward direction: every live slot appears exactly once in its
    // source neuron's outgoing row.
    for cluster in clusters {
        let store = &cluster.store;
        let in_use = store.in_use();
        let sources = store.sources();
        for (offset, &used) in in_use.iter().enumerate() {
            if !used {
                continue;
            }
            let address = CombinedSynapseIndex::new(cluster.id, SlotOffset(offset as u32));
            let (source_cluster, source_local) = partition.locate(sources[offset])?;
            let owner = &clusters[source_cluster.0 as usize];
            let row = owner
                .maps
                .outgoing
                .as_ref()
                .map(|map| map.range_for(source_local))
                .unwrap_or(&[]);
            let appearances = row.iter().filter(|&&entry| entry == address).count();
            if appearances != 1 {
                return Err(corrupt(
                    source_cluster,
                    format!(
                        "{address} driven by {} appears {appearances} times in its outgoing row",
                        sources[offset]
                    ),
                ));
            }
        }
    }

    // Reverse direction: every outgoing entry resolves to a live slot
    // fed by the neuron whose row contains it.
    let mut cross_cluster_entries = 0usize;
    for cluster in clusters {
        let outgoing = match cluster.maps.outgoing.as_ref() {
            Some(map) => map,
            None => continue,
        };
        if outgoing.neuron_rows() != cluster.neuron_count as usize {
            return Err(corrupt(
                cluster.id,
                format!(
                    "outgoing map has {} rows for {} neurons",
                    outgoing.neuron_rows(),
                    cluster.neuron_count
                ),
            ));
        }
        if outgoing.total_entries() == 0 {
            return Err(corrupt(cluster.id, "outgoing map present but empty".into()));
        }
        for local in 0..cluster.neuron_count {
            let source = cluster.global_index(local);
            for &entry in outgoing.range_for(local) {
                let target = clusters.get(entry.cluster.0 as usize).ok_or_else(|| {
                    corrupt(
                        cluster.id,
                        format!("outgoing entry {entry} names a cluster that does not exist"),
                    )
                })?;
                let target_store = &target.store;
                let offset = entry.slot.0 as usize;
                if offset >= target_store.in_use().len() {
                    return Err(corrupt(
                        cluster.id,
                        format!("outgoing entry {entry} is beyond the target store capacity"),
                    ));
                }
                if !target_store.in_use()[offset] {
                    return Err(corrupt(
                        cluster.id,
                        format!("outgoing entry {entry} references a free slot"),
                    ));
                }
                if target_store.sources()[offset] != source {
                    return Err(corrupt(
                        cluster.id,
                        format!(
                            "outgoing entry {entry} is driven by {} but sits in the row of {source}",
                            target_store.sources()[offset]
                        ),
                    ));
                }
                if entry.cluster != cluster.id {
                    cross_cluster_entries += 1;
                }
            }
        }
    }

    Ok(cross_cluster_entries)
}
