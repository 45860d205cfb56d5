// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! # Spikemesh Neural Vocabulary
//!
//! Identity and classification types shared by every crate in the workspace:
//! - **Ids**: [`NeuronLayoutIndex`], [`ClusterId`], [`SlotOffset`]
//! - **Kinds**: [`NeuronKind`] and the [`SynapseClass`] a kind pairing induces
//! - **Addressing**: [`CombinedSynapseIndex`] for slots in foreign clusters

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod combined;
pub mod ids;
pub mod kinds;

pub use combined::CombinedSynapseIndex;
pub use ids::{ClusterId, NeuronLayoutIndex, SlotOffset};
pub use kinds::{NeuronKind, SynapseClass};
