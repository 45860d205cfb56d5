// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Index-map construction and verification benchmarks
//!
//! Measures the two-pass map build and the consistency checker over
//! grid networks of increasing size, plus the full wiring path once.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use spikemesh_neural::NeuronKind;
use spikemesh_runtime::{Cluster, DenseSlotStore, PartitionTable, SimulationInfo};
use spikemesh_wiring::{
    build_index_maps, rebuild_index_maps, verify_index_maps, Layout, SpatialConnectionBuilder,
    WiringConfig,
};

const MAX_SYNAPSES_PER_NEURON: u32 = 16;

fn grid_config() -> WiringConfig {
    WiringConfig {
        conns_per_neuron: 8,
        radius: 1.5,
        seed: 42,
        ..WiringConfig::default()
    }
}

/// Wire a side x side grid split into four clusters.
fn wired_grid(side: u32) -> (Vec<Cluster<DenseSlotStore>>, SimulationInfo) {
    let total = side * side;
    let quarter = total / 4;
    let counts = [quarter, quarter, quarter, total - 3 * quarter];
    let partition = PartitionTable::from_counts(&counts).expect("partition");
    let sim = SimulationInfo::new(partition, MAX_SYNAPSES_PER_NEURON, 0.1);

    // Every tenth neuron inhibitory, like a rough cortical ratio.
    let layout = Layout::grid(side, side, |i| {
        if i % 10 == 0 {
            NeuronKind::Inhibitory
        } else {
            NeuronKind::Excitatory
        }
    });

    let config = grid_config();
    let builder = SpatialConnectionBuilder::new(&layout, &sim, &config).expect("builder");
    let (clusters, _) = builder.build(None).expect("build");
    (clusters, sim)
}

fn bench_index_maps(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_maps");
    group.sample_size(20);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(3));

    for side in [32u32, 64, 128].iter() {
        let (clusters, sim) = wired_grid(*side);
        let neurons = side * side;

        group.bench_with_input(BenchmarkId::new("build", neurons), &neurons, |b, _| {
            b.iter(|| black_box(build_index_maps(&clusters, &sim.partition).expect("build")));
        });

        group.bench_with_input(BenchmarkId::new("verify", neurons), &neurons, |b, _| {
            b.iter(|| black_box(verify_index_maps(&clusters, &sim.partition).expect("verify")));
        });
    }

    group.finish();
}

fn bench_full_wiring(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_wiring");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(5));

    let side = 64u32;
    let total = side * side;
    let quarter = total / 4;
    let partition =
        PartitionTable::from_counts(&[quarter, quarter, quarter, total - 3 * quarter])
            .expect("partition");
    let sim = SimulationInfo::new(partition, MAX_SYNAPSES_PER_NEURON, 0.1);
    let layout = Layout::grid(side, side, |_| NeuronKind::Excitatory);
    let config = grid_config();

    group.bench_function("build_4096_neurons", |b| {
        b.iter(|| {
            let builder =
                SpatialConnectionBuilder::new(&layout, &sim, &config).expect("builder");
            black_box(builder.build(None).expect("build"))
        });
    });

    group.bench_function("rebuild_after_no_change", |b| {
        let builder = SpatialConnectionBuilder::new(&layout, &sim, &config).expect("builder");
        let (mut clusters, _) = builder.build(None).expect("build");
        b.iter(|| {
            rebuild_index_maps(black_box(&mut clusters), &sim.partition).expect("rebuild");
        });
    });

    group.finish();
}

criterion_group!(benches, bench_index_maps, bench_full_wiring);
criterion_main!(benches);
