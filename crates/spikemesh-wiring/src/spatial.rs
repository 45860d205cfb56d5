// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Distance-based connectivity construction.
//!
//! Each destination neuron receives synapses from its nearest sources
//! within a fixed radius, capped at a configured fan-in. Candidate
//! selection is pure geometry and runs in parallel across destinations;
//! slot allocation then runs in one deterministic pass so that a given
//! seed, layout, and partition always reproduce the same connectome.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use spikemesh_engine::ComputeBackend;
use spikemesh_neural::{ClusterId, NeuronKind, NeuronLayoutIndex, SynapseClass};
use spikemesh_runtime::{Cluster, DenseSlotStore, SimulationInfo, SlotStore, SlotStoreStats};
use tracing::{debug, info};

use crate::checker::{verify_index_maps, ConsistencyReport};
use crate::config::{validate_config, WiringConfig};
use crate::error::{Result, WiringError};
use crate::index_map::rebuild_index_maps;
use crate::layout::Layout;

/// Summary of one construction run.
#[derive(Debug, Clone, Serialize)]
pub struct WiringReport {
    pub total_neurons: u32,
    pub synapses_created: u32,
    /// Synapses whose source lives in a different cluster than the
    /// destination.
    pub cross_cluster_synapses: u32,
    /// Size of a subsequent small-world rewiring pass. Computed from the
    /// rewiring probability; no synapses are rewired here.
    pub planned_rewires: u32,
    /// Present when the config asked for post-build verification.
    pub verified: Option<ConsistencyReport>,
    pub clusters: Vec<ClusterWiringStats>,
}

/// Per-cluster construction totals.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterWiringStats {
    pub cluster: ClusterId,
    pub incoming_entries: usize,
    pub outgoing_entries: usize,
    pub store: SlotStoreStats,
}

/// One candidate source for a destination neuron.
struct Candidate {
    source: u32,
    dist: f32,
}

/// Builds clusters, wires them by spatial proximity, and derives the
/// index maps.
#[derive(Debug)]
pub struct SpatialConnectionBuilder<'a> {
    layout: &'a Layout,
    sim: &'a SimulationInfo,
    config: &'a WiringConfig,
}

impl<'a> SpatialConnectionBuilder<'a> {
    /// Validate the config against the simulation geometry.
    pub fn new(
        layout: &'a Layout,
        sim: &'a SimulationInfo,
        config: &'a WiringConfig,
    ) -> Result<Self> {
        validate_config(config, sim.max_synapses_per_neuron)?;
        if layout.len() != sim.total_neurons() as usize {
            return Err(WiringError::Layout(format!(
                "layout describes {} neurons but the partition covers {}",
                layout.len(),
                sim.total_neurons()
            )));
        }
        Ok(Self { layout, sim, config })
    }

    /// Construct the full connectome and its index maps.
    ///
    /// When a backend is supplied, every cluster's maps are mirrored to
    /// it and the call blocks until all transfers complete; the host
    /// copies stay authoritative either way.
    pub fn build(
        &self,
        mut backend: Option<&mut dyn ComputeBackend>,
    ) -> Result<(Vec<Cluster<DenseSlotStore>>, WiringReport)> {
        let partition = &self.sim.partition;
        let total = self.sim.total_neurons();

        let mut clusters: Vec<Cluster<DenseSlotStore>> =
            Vec::with_capacity(partition.num_clusters());
        for (i, range) in partition.ranges().iter().enumerate() {
            let id = ClusterId(i as u32);
            let store =
                DenseSlotStore::new(id, range.neuron_count, self.sim.max_synapses_per_neuron);
            clusters.push(Cluster::new(id, range.neurons_begin, range.neuron_count, store)?);
        }

        // Candidate selection is pure geometry, independent per destination.
        let chosen: Vec<Vec<u32>> = (0..total)
            .into_par_iter()
            .map(|dest| self.sources_for(dest))
            .collect();

        // Allocation mutates the stores; a single pass in destination order
        // keeps the RNG stream and the slot layout reproducible.
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut created = 0u32;
        let mut cross_cluster = 0u32;
        for dest in 0..total {
            let destination = NeuronLayoutIndex(dest);
            let (dest_cluster, local) = partition.locate(destination)?;
            for &source in &chosen[dest as usize] {
                let source = NeuronLayoutIndex(source);
                let class = SynapseClass::classify(
                    self.layout.kind_of(source),
                    self.layout.kind_of(destination),
                );
                let weight = self.sample_weight(&mut rng, class.source_kind());
                clusters[dest_cluster.0 as usize]
                    .store
                    .allocate(local, source, destination, weight, class, local)?;
                created += 1;
                if partition.cluster_of(source)? != dest_cluster {
                    cross_cluster += 1;
                }
            }
        }

        let planned_rewires = (created as f64 * self.config.rewiring_probability) as u32;

        rebuild_index_maps(&mut clusters, partition)?;

        let verified = if self.config.verify_after_build {
            Some(verify_index_maps(&clusters, partition)?)
        } else {
            None
        };

        if let Some(backend) = backend.as_deref_mut() {
            mirror_all(backend, &clusters)?;
        }

        let cluster_stats: Vec<ClusterWiringStats> = clusters
            .iter()
            .map(|cluster| {
                let incoming_entries =
                    cluster.maps.incoming.as_ref().map_or(0, |m| m.total_entries());
                let outgoing_entries =
                    cluster.maps.outgoing.as_ref().map_or(0, |m| m.total_entries());
                debug!(cluster = %cluster.id, incoming_entries, outgoing_entries, "cluster wired");
                ClusterWiringStats {
                    cluster: cluster.id,
                    incoming_entries,
                    outgoing_entries,
                    store: cluster.store.stats(),
                }
            })
            .collect();

        info!(
            total_neurons = total,
            synapses_created = created,
            cross_cluster_synapses = cross_cluster,
            planned_rewires,
            "spatial wiring complete"
        );

        let report = WiringReport {
            total_neurons: total,
            synapses_created: created,
            cross_cluster_synapses: cross_cluster,
            planned_rewires,
            verified,
            clusters: cluster_stats,
        };
        Ok((clusters, report))
    }

    /// Nearest sources within the radius, capped at the fan-in.
    ///
    /// Candidates sort by distance with ties broken by ascending source
    /// index, so the result is a total order and independent of scan
    /// direction.
    fn sources_for(&self, dest: u32) -> Vec<u32> {
        let destination = NeuronLayoutIndex(dest);
        let mut candidates: Vec<Candidate> = Vec::new();
        for source in 0..self.sim.total_neurons() {
            if source == dest {
                continue;
            }
            let dist = self.layout.dist(NeuronLayoutIndex(source), destination);
            if dist <= self.config.radius {
                candidates.push(Candidate { source, dist });
            }
        }
        candidates
            .sort_unstable_by(|a, b| a.dist.total_cmp(&b.dist).then(a.source.cmp(&b.source)));
        candidates.truncate(self.config.conns_per_neuron as usize);
        candidates.into_iter().map(|c| c.source).collect()
    }

    fn sample_weight(&self, rng: &mut StdRng, source_kind: NeuronKind) -> f32 {
        let w = &self.config.weights;
        match source_kind {
            NeuronKind::Inhibitory => rng.gen_range(w.inh_min..=w.inh_max),
            NeuronKind::Excitatory => rng.gen_range(w.exc_min..=w.exc_max),
        }
    }
}

/// Issue one mirror per cluster, then await them all.
fn mirror_all(
    backend: &mut dyn ComputeBackend,
    clusters: &[Cluster<DenseSlotStore>],
) -> Result<()> {
    let mut handles = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        handles.push((
            cluster.id,
            backend.copy_index_maps_to_device(cluster.id, &cluster.maps)?,
        ));
    }
    for (cluster, handle) in handles {
        handle.wait()?;
        debug!(cluster = %cluster, backend = backend.backend_name(), "device mirror complete");
    }
    Ok(())
}
