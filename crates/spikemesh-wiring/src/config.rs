// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

//! Wiring configuration: TOML loading, environment overrides, validation.
//!
//! Configuration is loaded from a TOML file, then selectively overridden
//! by `SPIKEMESH_*` environment variables. Validation is a separate step
//! so callers can construct configs programmatically and still get the
//! same range checks.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigValidationError};

/// Options controlling spatial connectivity construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    /// Fan-in cap: synapses created per destination neuron.
    pub conns_per_neuron: u32,
    /// Candidate radius in layout distance units. Only sources within
    /// this distance of a destination are considered.
    pub radius: f32,
    /// Fraction of created synapses planned for a small-world rewiring
    /// pass. The count is reported, not applied.
    pub rewiring_probability: f64,
    /// Seed for the weight-sampling RNG. Identical seeds over identical
    /// layouts produce identical connectomes.
    pub seed: u64,
    /// Run the consistency checker on the freshly built index maps.
    pub verify_after_build: bool,
    /// Weight sampling ranges by synapse polarity.
    pub weights: WeightRanges,
}

/// Uniform sampling ranges for initial synapse weights.
///
/// Excitatory weights are non-negative, inhibitory weights non-positive.
/// The sign is baked into the stored weight at creation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightRanges {
    pub exc_min: f32,
    pub exc_max: f32,
    pub inh_min: f32,
    pub inh_max: f32,
}

impl Default for WiringConfig {
    fn default() -> Self {
        WiringConfig {
            conns_per_neuron: 8,
            radius: 1.5,
            rewiring_probability: 0.0,
            seed: 0,
            verify_after_build: false,
            weights: WeightRanges::default(),
        }
    }
}

impl Default for WeightRanges {
    fn default() -> Self {
        WeightRanges {
            exc_min: 0.0,
            exc_max: 1.0,
            inh_min: -1.0,
            inh_max: 0.0,
        }
    }
}

/// Load a wiring configuration from a TOML file.
///
/// Missing keys take their defaults, so a partial file is fine.
/// Environment overrides are applied after parsing.
pub fn load_config(path: &Path) -> Result<WiringConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: WiringConfig = toml::from_str(&content)?;
    apply_env_overrides(&mut config);
    debug!(path = %path.display(), "loaded wiring config");
    Ok(config)
}

/// Apply `SPIKEMESH_*` environment variable overrides.
///
/// Unparseable values are ignored rather than treated as errors, so a
/// stray variable cannot take down a run; validation still catches
/// out-of-range results.
pub fn apply_env_overrides(config: &mut WiringConfig) {
    if let Ok(value) = env::var("SPIKEMESH_CONNS_PER_NEURON") {
        if let Ok(parsed) = value.parse::<u32>() {
            config.conns_per_neuron = parsed;
        }
    }
    if let Ok(value) = env::var("SPIKEMESH_RADIUS") {
        if let Ok(parsed) = value.parse::<f32>() {
            config.radius = parsed;
        }
    }
    if let Ok(value) = env::var("SPIKEMESH_REWIRING_PROBABILITY") {
        if let Ok(parsed) = value.parse::<f64>() {
            config.rewiring_probability = parsed;
        }
    }
    if let Ok(value) = env::var("SPIKEMESH_SEED") {
        if let Ok(parsed) = value.parse::<u64>() {
            config.seed = parsed;
        }
    }
    if let Ok(value) = env::var("SPIKEMESH_VERIFY_AFTER_BUILD") {
        if let Ok(parsed) = value.parse::<bool>() {
            config.verify_after_build = parsed;
        }
    }
}

/// Validate a configuration against the simulation's slot capacity.
///
/// Collects every violation before failing so a bad file can be fixed
/// in one pass.
pub fn validate_config(
    config: &WiringConfig,
    max_synapses_per_neuron: u32,
) -> Result<(), ConfigError> {
    let mut errors: Vec<ConfigValidationError> = Vec::new();

    if config.conns_per_neuron > max_synapses_per_neuron {
        errors.push(ConfigValidationError::FanInExceedsCapacity {
            conns_per_neuron: config.conns_per_neuron,
            capacity: max_synapses_per_neuron,
        });
    }

    if !config.radius.is_finite() || config.radius < 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "radius",
            reason: format!("must be finite and >= 0, got {}", config.radius),
        });
    }

    if !config.rewiring_probability.is_finite()
        || !(0.0..=1.0).contains(&config.rewiring_probability)
    {
        errors.push(ConfigValidationError::InvalidValue {
            field: "rewiring_probability",
            reason: format!("must be in [0, 1], got {}", config.rewiring_probability),
        });
    }

    validate_weights(&config.weights, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Err(ConfigError::Validation(joined))
    }
}

fn validate_weights(weights: &WeightRanges, errors: &mut Vec<ConfigValidationError>) {
    let all_finite = weights.exc_min.is_finite()
        && weights.exc_max.is_finite()
        && weights.inh_min.is_finite()
        && weights.inh_max.is_finite();
    if !all_finite {
        errors.push(ConfigValidationError::InvalidValue {
            field: "weights",
            reason: "all bounds must be finite".to_string(),
        });
        return;
    }

    if weights.exc_min < 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "weights.exc_min",
            reason: format!("excitatory weights are non-negative, got {}", weights.exc_min),
        });
    }
    if weights.exc_min > weights.exc_max {
        errors.push(ConfigValidationError::InvalidValue {
            field: "weights.exc_max",
            reason: format!(
                "range is inverted: exc_min {} > exc_max {}",
                weights.exc_min, weights.exc_max
            ),
        });
    }
    if weights.inh_max > 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "weights.inh_max",
            reason: format!("inhibitory weights are non-positive, got {}", weights.inh_max),
        });
    }
    if weights.inh_min > weights.inh_max {
        errors.push(ConfigValidationError::InvalidValue {
            field: "weights.inh_min",
            reason: format!(
                "range is inverted: inh_min {} > inh_max {}",
                weights.inh_min, weights.inh_max
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            "SPIKEMESH_CONNS_PER_NEURON",
            "SPIKEMESH_RADIUS",
            "SPIKEMESH_REWIRING_PROBABILITY",
            "SPIKEMESH_SEED",
            "SPIKEMESH_VERIFY_AFTER_BUILD",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = WiringConfig::default();
        validate_config(&config, config.conns_per_neuron).expect("defaults must validate");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        clear_env();

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "conns_per_neuron = 2\n\n[weights]\nexc_max = 0.5").expect("write");

        let config = load_config(file.path()).expect("load");
        assert_eq!(config.conns_per_neuron, 2);
        assert_eq!(config.weights.exc_max, 0.5);
        // Untouched fields keep their defaults.
        assert_eq!(config.radius, WiringConfig::default().radius);
        assert_eq!(config.weights.inh_min, -1.0);
    }

    #[test]
    fn env_overrides_win_over_file() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        clear_env();

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "seed = 1\nradius = 2.0").expect("write");

        env::set_var("SPIKEMESH_SEED", "42");
        env::set_var("SPIKEMESH_RADIUS", "not-a-number");
        let config = load_config(file.path()).expect("load");
        clear_env();

        assert_eq!(config.seed, 42);
        // Unparseable override is ignored, file value stands.
        assert_eq!(config.radius, 2.0);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        clear_env();

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "conns_per_neuron = [").expect("write");

        match load_config(file.path()) {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn validation_collects_every_violation() {
        let mut config = WiringConfig::default();
        config.radius = -1.0;
        config.rewiring_probability = 2.0;
        config.weights.inh_max = 0.5;
        config.conns_per_neuron = 100;

        let err = validate_config(&config, 10).expect_err("must fail");
        let message = err.to_string();
        assert!(message.contains("radius"));
        assert!(message.contains("rewiring_probability"));
        assert!(message.contains("inh_max"));
        assert!(message.contains("fan-in 100 exceeds slot capacity 10"));
    }

    #[test]
    fn inverted_weight_ranges_are_rejected() {
        let mut config = WiringConfig::default();
        config.weights = WeightRanges {
            exc_min: 0.8,
            exc_max: 0.2,
            inh_min: -0.1,
            inh_max: -0.4,
        };

        let err = validate_config(&config, 8).expect_err("must fail");
        let message = err.to_string();
        assert!(message.contains("exc_min 0.8 > exc_max 0.2"));
        assert!(message.contains("inh_min -0.1 > inh_max -0.4"));
    }

    #[test]
    fn nan_radius_is_rejected() {
        let mut config = WiringConfig::default();
        config.radius = f32::NAN;
        assert!(validate_config(&config, 8).is_err());
    }
}
