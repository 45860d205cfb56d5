// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Neuron geometry: positions and excitatory/inhibitory kinds.
//!
//! The layout is global. Wiring looks up any neuron by its
//! [`NeuronLayoutIndex`] regardless of which cluster owns it.

use spikemesh_neural::{NeuronKind, NeuronLayoutIndex};

use crate::error::WiringError;

/// Positions and kinds for every neuron in the simulation, indexed by
/// global layout index.
#[derive(Debug, Clone)]
pub struct Layout {
    positions: Vec<[f32; 3]>,
    kinds: Vec<NeuronKind>,
}

impl Layout {
    /// Build a layout from parallel position and kind vectors.
    pub fn new(positions: Vec<[f32; 3]>, kinds: Vec<NeuronKind>) -> Result<Self, WiringError> {
        if positions.len() != kinds.len() {
            return Err(WiringError::Layout(format!(
                "{} positions but {} kinds",
                positions.len(),
                kinds.len()
            )));
        }
        Ok(Layout { positions, kinds })
    }

    /// Arrange `width * height` neurons on a unit grid in the z=0 plane.
    ///
    /// `kind_of` assigns a kind to each global index, letting callers
    /// sprinkle inhibitory neurons however they like.
    pub fn grid(width: u32, height: u32, kind_of: impl Fn(u32) -> NeuronKind) -> Self {
        let count = width * height;
        let mut positions = Vec::with_capacity(count as usize);
        let mut kinds = Vec::with_capacity(count as usize);
        for i in 0..count {
            positions.push([(i % width) as f32, (i / width) as f32, 0.0]);
            kinds.push(kind_of(i));
        }
        Layout { positions, kinds }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position_of(&self, neuron: NeuronLayoutIndex) -> [f32; 3] {
        self.positions[neuron.0 as usize]
    }

    pub fn kind_of(&self, neuron: NeuronLayoutIndex) -> NeuronKind {
        self.kinds[neuron.0 as usize]
    }

    /// Euclidean distance between two neurons.
    pub fn dist(&self, a: NeuronLayoutIndex, b: NeuronLayoutIndex) -> f32 {
        let pa = self.positions[a.0 as usize];
        let pb = self.positions[b.0 as usize];
        let dx = pa[0] - pb[0];
        let dy = pa[1] - pb[1];
        let dz = pa[2] - pb[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_positions_and_distance() {
        let layout = Layout::grid(3, 2, |_| NeuronKind::Excitatory);
        assert_eq!(layout.len(), 6);
        assert_eq!(layout.position_of(NeuronLayoutIndex(0)), [0.0, 0.0, 0.0]);
        assert_eq!(layout.position_of(NeuronLayoutIndex(4)), [1.0, 1.0, 0.0]);
        assert_eq!(layout.dist(NeuronLayoutIndex(0), NeuronLayoutIndex(1)), 1.0);
        assert_eq!(layout.dist(NeuronLayoutIndex(0), NeuronLayoutIndex(3)), 1.0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = Layout::new(vec![[0.0; 3]; 3], vec![NeuronKind::Excitatory; 2]);
        assert!(matches!(result, Err(WiringError::Layout(_))));
    }

    #[test]
    fn kind_assignment_by_index() {
        let layout = Layout::grid(2, 2, |i| {
            if i % 2 == 0 {
                NeuronKind::Excitatory
            } else {
                NeuronKind::Inhibitory
            }
        });
        assert_eq!(layout.kind_of(NeuronLayoutIndex(0)), NeuronKind::Excitatory);
        assert_eq!(layout.kind_of(NeuronLayoutIndex(1)), NeuronKind::Inhibitory);
    }
}
