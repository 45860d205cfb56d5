// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Spike delivery through the outgoing index maps.
//!
//! Wires a small two-cluster network with fixed weights and checks that
//! firing neurons lands the right contributions in the right summation
//! buffers, including across the cluster boundary, and that map staleness
//! after a release is caught and curable by a rebuild.

use spikemesh::engine::DeviceIndexMaps;
use spikemesh::prelude::*;

/// Three neurons on a line, split [2, 1], every weight exactly 0.5.
///
/// With a fan-in of 1 and radius 1 this wires 1 -> 0, 0 -> 1, 1 -> 2,
/// so neuron 1 is the only multi-target source and its second target
/// sits in the other cluster.
fn wired_line() -> (Vec<Cluster<DenseSlotStore>>, SimulationInfo) {
    let partition = PartitionTable::from_counts(&[2, 1]).unwrap();
    let sim = SimulationInfo::new(partition, 2, 0.1);
    let positions = (0..3).map(|i| [i as f32, 0.0, 0.0]).collect();
    let layout = Layout::new(positions, vec![NeuronKind::Excitatory; 3]).unwrap();

    let mut config = WiringConfig {
        conns_per_neuron: 1,
        radius: 1.0,
        seed: 3,
        verify_after_build: true,
        ..WiringConfig::default()
    };
    config.weights.exc_min = 0.5;
    config.weights.exc_max = 0.5;

    let builder = SpatialConnectionBuilder::new(&layout, &sim, &config).unwrap();
    let (clusters, report) = builder.build(None).unwrap();
    assert_eq!(report.synapses_created, 3);
    (clusters, sim)
}

#[test]
fn test_fired_neuron_delivers_across_clusters() {
    let (mut clusters, sim) = wired_line();

    let fired = vec![NeuronLayoutIndex(1)];
    let mut state = StepState::new();
    let stats = propagate(&mut clusters, &sim.partition, &fired, &mut state).unwrap();

    assert_eq!(stats.step, 0);
    assert_eq!(stats.fired_sources, 1);
    assert_eq!(stats.synapses_delivered, 2);
    assert_eq!(stats.clusters_touched, 2);

    assert_eq!(clusters[0].summation, vec![0.5, 0.0]);
    assert_eq!(clusters[1].summation, vec![0.5]);
    assert_eq!(state.step(), 1);
}

#[test]
fn test_deliveries_accumulate_until_cleared() {
    let (mut clusters, sim) = wired_line();
    let mut state = StepState::new();

    for _ in 0..2 {
        propagate(
            &mut clusters,
            &sim.partition,
            &[NeuronLayoutIndex(0)],
            &mut state,
        )
        .unwrap();
    }
    // Neuron 0 drives only the middle neuron.
    assert_eq!(clusters[0].summation, vec![0.0, 1.0]);
    assert_eq!(clusters[1].summation, vec![0.0]);

    for cluster in &mut clusters {
        cluster.clear_summation();
    }
    assert_eq!(clusters[0].summation, vec![0.0, 0.0]);
}

#[test]
fn test_quiet_step_still_advances() {
    let (mut clusters, sim) = wired_line();
    let mut state = StepState::new();

    let stats = propagate(&mut clusters, &sim.partition, &[], &mut state).unwrap();
    assert_eq!(stats.synapses_delivered, 0);
    assert_eq!(state.step(), 1);
    assert_eq!(clusters[0].summation, vec![0.0, 0.0]);
}

#[test]
fn test_release_is_skipped_then_cured_by_rebuild() {
    let (mut clusters, sim) = wired_line();

    // Free the slot that delivers to the middle neuron (row 1 of cluster 0).
    let stale_slot = clusters[0].maps.incoming.as_ref().unwrap().range_for(1)[0];
    clusters[0].store.release(stale_slot).unwrap();

    // The maps now disagree with the store.
    assert!(verify_index_maps(&clusters, &sim.partition).is_err());

    // Propagation reads the stale outgoing entry but the freed slot
    // contributes nothing.
    let mut state = StepState::new();
    let stats = propagate(
        &mut clusters,
        &sim.partition,
        &[NeuronLayoutIndex(0)],
        &mut state,
    )
    .unwrap();
    assert_eq!(stats.synapses_delivered, 0);
    assert_eq!(clusters[0].summation, vec![0.0, 0.0]);

    // A rebuild restores consistency and drops the dead address.
    rebuild_index_maps(&mut clusters, &sim.partition).unwrap();
    verify_index_maps(&clusters, &sim.partition).unwrap();
    let outgoing = clusters[0].maps.outgoing.as_ref().unwrap();
    assert!(outgoing.range_for(0).is_empty());
}

#[test]
fn test_staged_backend_holds_packed_copies() {
    let partition = PartitionTable::from_counts(&[2, 1]).unwrap();
    let sim = SimulationInfo::new(partition, 2, 0.1);
    let positions = (0..3).map(|i| [i as f32, 0.0, 0.0]).collect();
    let layout = Layout::new(positions, vec![NeuronKind::Excitatory; 3]).unwrap();
    let config = WiringConfig {
        conns_per_neuron: 1,
        radius: 1.0,
        seed: 3,
        ..WiringConfig::default()
    };

    let mut backend = StagedDeviceBackend::new();
    let builder = SpatialConnectionBuilder::new(&layout, &sim, &config).unwrap();
    let (clusters, _) = builder.build(Some(&mut backend)).unwrap();

    assert_eq!(backend.mirrored_clusters(), 2);
    for cluster in &clusters {
        let device = backend.device_maps(cluster.id).unwrap();
        assert_eq!(device, DeviceIndexMaps::from_host(&cluster.maps));
    }
}

#[test]
fn test_cpu_backend_mirror_completes_inline() {
    let (clusters, _sim) = wired_line();

    let mut backend = create_backend(BackendKind::Cpu);
    let handle = backend
        .copy_index_maps_to_device(clusters[0].id, &clusters[0].maps)
        .unwrap();
    assert!(handle.is_complete());
    handle.wait().unwrap();
}
