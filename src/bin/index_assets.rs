//! Asset index builder
//!
//! Walks the LPC asset tree and writes the searchable JSON index the
//! generators consume.

use std::path::PathBuf;

use clap::Parser;
use spriteforge::core::Result;
use spriteforge::index::builder::build_index;

#[derive(Parser, Debug)]
#[command(name = "index_assets")]
#[command(about = "Index the LPC asset tree into a searchable JSON catalog")]
struct Args {
    /// Root of the LPC asset tree (contains spritesheets/)
    #[arg(long, default_value = "assets/lpc")]
    assets: PathBuf,

    /// Output index path
    #[arg(long, default_value = "lpc_index.json")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let index = build_index(&args.assets)?;
    let layer_count: usize = index.layers.values().map(|v| v.len()).sum();
    tracing::info!(
        bodies = index.bodies.len(),
        layers = layer_count,
        "index built"
    );
    index.save(&args.out)?;
    println!("Index written to {}", args.out.display());
    Ok(())
}
