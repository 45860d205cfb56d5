// Copyright 2025 Spikemesh Developers
// SPDX-License-Identifier: Apache-2.0

/*!
Wiring Report Tool

Wires a square grid network from a TOML config and prints the
construction report as JSON.

Usage:
  cargo run --bin wiring_report -- <config.toml> <grid_side> <clusters> [backend]

  config.toml   wiring configuration (see spikemesh-wiring)
  grid_side     neurons per grid edge; the network has grid_side^2 neurons
  clusters      number of partitions, split as evenly as possible
  backend       cpu (default) | staged

Example:
  cargo run --bin wiring_report -- wiring.toml 64 4 staged
*/

use std::env;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use spikemesh::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 || args.len() > 5 {
        eprintln!(
            "Usage: {} <config.toml> <grid_side> <clusters> [backend]",
            args[0]
        );
        eprintln!("\nExample:");
        eprintln!("  {} wiring.toml 64 4 staged", args[0]);
        std::process::exit(1);
    }

    let config_path = &args[1];
    let side: u32 = args[2]
        .parse()
        .with_context(|| format!("grid_side '{}' is not a number", args[2]))?;
    let num_clusters: u32 = args[3]
        .parse()
        .with_context(|| format!("clusters '{}' is not a number", args[3]))?;
    let backend_kind = match args.get(4) {
        Some(name) => BackendKind::from_str(name)?,
        None => BackendKind::Cpu,
    };

    let total = side
        .checked_mul(side)
        .context("grid_side^2 overflows u32")?;
    if num_clusters == 0 || num_clusters > total {
        bail!("clusters must be between 1 and {total}");
    }

    let config = load_config(Path::new(config_path))
        .with_context(|| format!("loading config from {config_path}"))?;

    eprintln!("Spikemesh Wiring Report");
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("  config:   {config_path}");
    eprintln!("  network:  {side}x{side} grid, {num_clusters} clusters");
    eprintln!("  backend:  {backend_kind}");
    eprintln!();

    // Split the population as evenly as the cluster count allows.
    let base = total / num_clusters;
    let remainder = total % num_clusters;
    let counts: Vec<u32> = (0..num_clusters)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect();
    let partition = PartitionTable::from_counts(&counts)?;
    let sim = SimulationInfo::new(partition, config.conns_per_neuron.max(1), 0.1);

    // Every tenth neuron inhibitory.
    let layout = Layout::grid(side, side, |i| {
        if i % 10 == 0 {
            NeuronKind::Inhibitory
        } else {
            NeuronKind::Excitatory
        }
    });

    let mut backend = create_backend(backend_kind);
    let builder = SpatialConnectionBuilder::new(&layout, &sim, &config)?;
    let (_clusters, report) = builder.build(Some(backend.as_mut()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    eprintln!();
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!(
        "✅ wired {} synapses across {} clusters",
        report.synapses_created,
        report.clusters.len()
    );
    Ok(())
}
