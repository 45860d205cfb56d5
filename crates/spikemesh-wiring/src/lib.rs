// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Connectivity construction for cluster-partitioned spiking networks.
//!
//! This crate owns everything between "a partition and a layout" and "a
//! wired network the engine can step": TOML-backed configuration,
//! distance-based synapse creation, two-pass index-map construction,
//! and the consistency checker that validates maps against the stores
//! they were derived from.

pub mod checker;
pub mod config;
pub mod error;
pub mod index_map;
pub mod layout;
pub mod spatial;

pub use checker::{verify_index_maps, ConsistencyReport};
pub use config::{apply_env_overrides, load_config, validate_config, WeightRanges, WiringConfig};
pub use error::{ConfigError, ConfigValidationError, Result, WiringError};
pub use index_map::{build_index_maps, rebuild_index_maps};
pub use layout::Layout;
pub use spatial::{ClusterWiringStats, SpatialConnectionBuilder, WiringReport};

/// Version of the wiring crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
