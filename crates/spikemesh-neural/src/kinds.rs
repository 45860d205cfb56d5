// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Neuron kinds and the synapse classification they induce

use serde::{Deserialize, Serialize};

/// Electrophysiological class of a neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeuronKind {
    Excitatory,
    Inhibitory,
}

impl NeuronKind {
    #[inline(always)]
    pub fn is_inhibitory(self) -> bool {
        matches!(self, NeuronKind::Inhibitory)
    }
}

/// Synapse classification derived from its endpoint kinds.
///
/// The effect sign follows the *source* kind: inhibitory sources depress
/// their targets regardless of the target's own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynapseClass {
    InhToInh,
    InhToExc,
    ExcToInh,
    ExcToExc,
}

impl SynapseClass {
    /// Classify a synapse from the kinds of its source and destination neurons.
    #[inline]
    pub fn classify(source: NeuronKind, destination: NeuronKind) -> Self {
        match (source, destination) {
            (NeuronKind::Inhibitory, NeuronKind::Inhibitory) => SynapseClass::InhToInh,
            (NeuronKind::Inhibitory, NeuronKind::Excitatory) => SynapseClass::InhToExc,
            (NeuronKind::Excitatory, NeuronKind::Inhibitory) => SynapseClass::ExcToInh,
            (NeuronKind::Excitatory, NeuronKind::Excitatory) => SynapseClass::ExcToExc,
        }
    }

    /// Sign of the synaptic effect: `-1.0` for inhibitory sources, `+1.0` otherwise.
    #[inline(always)]
    pub fn sign(self) -> f32 {
        match self {
            SynapseClass::InhToInh | SynapseClass::InhToExc => -1.0,
            SynapseClass::ExcToInh | SynapseClass::ExcToExc => 1.0,
        }
    }

    /// Kind of the source neuron this class implies.
    #[inline(always)]
    pub fn source_kind(self) -> NeuronKind {
        match self {
            SynapseClass::InhToInh | SynapseClass::InhToExc => NeuronKind::Inhibitory,
            SynapseClass::ExcToInh | SynapseClass::ExcToExc => NeuronKind::Excitatory,
        }
    }
}
