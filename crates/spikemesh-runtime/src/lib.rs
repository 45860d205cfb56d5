// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! # Spikemesh Runtime
//!
//! Host-side state model for a cluster-partitioned spiking network:
//! - **Partition**: validated cluster table and global→local resolution
//! - **Slot stores**: fixed-capacity per-neuron synapse storage
//!   ([`SlotStore`] contract, [`DenseSlotStore`] implementation)
//! - **Clusters**: neuron range + store + index maps + summation buffer
//! - **Index maps**: the incoming/outgoing containers wiring builds and
//!   propagation consumes

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cluster;
pub mod error;
pub mod index_map;
pub mod partition;
pub mod sim_info;
pub mod slot_store;
pub mod traits;

pub use cluster::Cluster;
pub use error::{Result, RuntimeError};
pub use index_map::{ClusterIndexMaps, IncomingIndexMap, OutgoingIndexMap};
pub use partition::{ClusterRange, PartitionTable};
pub use sim_info::SimulationInfo;
pub use slot_store::{DenseSlotStore, SlotStoreStats};
pub use traits::SlotStore;
