//! Footprint Tool
//!
//! Lays out the subresources of each configured resource and prints the
//! placement of every subresource:
//!
//! ```text
//! footprint [CONFIG.toml]     evaluate a config (built-in scenarios if omitted)
//! footprint --init PATH       write the built-in config to PATH
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use copyable_footprint::config::{Config, ResourceConfig};
use copyable_footprint::get_copyable_footprints;

#[derive(Parser, Debug)]
#[command(
    name = "footprint",
    about = "Print the copyable subresource footprints of configured resources"
)]
struct Args {
    /// TOML configuration to evaluate (built-in scenarios if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the built-in configuration to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with = "config")]
    init: Option<PathBuf>,
}

/// Resolve the configuration to evaluate, or `None` once `--init` has
/// written the defaults out.
fn load_config(args: &Args) -> Result<Option<Config>> {
    if let Some(path) = &args.init {
        Config::default().save(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(None);
    }
    match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))
            .map(Some),
        None => Ok(Some(Config::default())),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Compute and print the footprints of one resource.
fn report(resource: &ResourceConfig, base_offset: u64) -> Result<()> {
    let desc = resource.to_desc()?;
    let (first, count) = resource.range(&desc)?;
    let batch = get_copyable_footprints(&desc, first, count, base_offset)
        .with_context(|| format!("{}: computing footprints", resource.name))?;

    println!(
        "{}: {:?} {} {}x{}x{} mips={} subresources {}..{}",
        resource.name,
        desc.dimension,
        desc.format,
        desc.width,
        desc.height,
        desc.depth_or_array_size,
        desc.resolved_mip_levels(),
        first,
        first + count
    );
    for (i, layout) in batch.iter().enumerate() {
        println!(
            "  [{:>3}] {} rows={} row_size={}",
            first as usize + i,
            layout.placed,
            layout.num_rows,
            layout.row_size_in_bytes
        );
    }
    println!("  total_bytes={}", batch.total_bytes);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let Some(config) = load_config(&args)? else {
        return Ok(());
    };

    init_logging(&config.log_level);
    info!(
        "Evaluating {} resources (base offset {})",
        config.resources.len(),
        config.base_offset
    );

    let mut failed = 0usize;
    for resource in &config.resources {
        if let Err(e) = report(resource, config.base_offset) {
            error!("{:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(anyhow!(
            "{} of {} resources failed",
            failed,
            config.resources.len()
        ));
    }
    Ok(())
}
