// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pathtool: replay a gesture script and print the resulting document

use anyhow::{Context, Result, bail};
use pathtool::script::Script;

fn main() -> Result<()> {
    // Verbosity is controlled via RUST_LOG
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pathtool=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        bail!("Usage: pathtool <script.toml>");
    }

    let path = std::path::PathBuf::from(&args[1]);
    tracing::info!("Replaying gesture script {}", path.display());
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let script =
        Script::from_toml(&text).with_context(|| format!("failed to parse {}", path.display()))?;

    let report = script.replay();
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}
