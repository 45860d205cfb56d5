//! # Spikemesh - Cluster-Partitioned Connectivity for Spiking Networks
//!
//! Spikemesh builds and maintains the connectome of a distributed spiking
//! neural network simulation: it partitions the neuron population into
//! clusters, creates synapses by spatial proximity, and derives the
//! bidirectional index maps that let spike propagation jump from any
//! firing neuron straight to the synapse slots it drives, anywhere in
//! the network.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! spikemesh = "0.1"
//! ```
//!
//! ```rust,no_run
//! use spikemesh::prelude::*;
//!
//! // Two clusters of 128 neurons on a 16x16 grid.
//! let partition = PartitionTable::from_counts(&[128, 128])?;
//! let sim = SimulationInfo::new(partition, 16, 0.1);
//! let layout = Layout::grid(16, 16, |_| NeuronKind::Excitatory);
//! let config = WiringConfig::default();
//!
//! // Wire it and derive the index maps.
//! let builder = SpatialConnectionBuilder::new(&layout, &sim, &config)?;
//! let (mut clusters, report) = builder.build(None)?;
//! println!("created {} synapses", report.synapses_created);
//!
//! // Deliver one neuron's spikes through the outgoing maps.
//! let fired = vec![NeuronLayoutIndex(3)];
//! let mut state = StepState::new();
//! let stats = propagate(&mut clusters, &sim.partition, &fired, &mut state)?;
//! println!("delivered {} synapses", stats.synapses_delivered);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: spikemesh-neural                           │
//! │  (ids, neuron kinds, synapse classes, combined indices) │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Runtime model: spikemesh-runtime                       │
//! │  (partition table, slot stores, clusters, index maps)   │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Execution: spikemesh-engine                            │
//! │  (compute backends, device mirroring, propagation)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Construction: spikemesh-wiring                         │
//! │  (config, spatial wiring, map building, verification)   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Member Crates
//!
//! - **spikemesh-neural**: shared vocabulary types
//! - **spikemesh-runtime**: partition model and synapse storage
//! - **spikemesh-engine**: backends and synaptic propagation
//! - **spikemesh-wiring**: connectivity construction and checking
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use spikemesh_neural as neural;

// Re-export runtime model
pub use spikemesh_runtime as runtime;

// Re-export execution layer
pub use spikemesh_engine as engine;

// Re-export construction layer
pub use spikemesh_wiring as wiring;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::neural::{
        ClusterId, CombinedSynapseIndex, NeuronKind, NeuronLayoutIndex, SlotOffset, SynapseClass,
    };

    pub use crate::runtime::{
        Cluster, ClusterIndexMaps, ClusterRange, DenseSlotStore, PartitionTable, RuntimeError,
        SimulationInfo, SlotStore, SlotStoreStats,
    };

    pub use crate::engine::{
        create_backend, propagate, BackendKind, ComputeBackend, CpuBackend, EngineError,
        MirrorHandle, PropagationStats, StagedDeviceBackend, StepState,
    };

    pub use crate::wiring::{
        build_index_maps, load_config, rebuild_index_maps, verify_index_maps, ConfigError,
        ConsistencyReport, Layout, SpatialConnectionBuilder, WiringConfig, WiringError,
        WiringReport,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        // Just test that re-exports work
        use crate::prelude::*;
        let _neuron = NeuronLayoutIndex(0);
        let _cluster = ClusterId(0);
    }
}
