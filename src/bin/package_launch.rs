//! Launch packager
//!
//! Bundles portraits and metadata into a marketplace-ready layout with
//! the standard on-chain schema.

use std::path::PathBuf;

use clap::Parser;
use spriteforge::core::Result;
use spriteforge::ops::package::{package_collection, LaunchConfig};

#[derive(Parser, Debug)]
#[command(name = "package_launch")]
#[command(about = "Package portraits and metadata into a launch bundle")]
struct Args {
    /// Directory of idle portraits (N.png)
    #[arg(long, default_value = "out/portraits")]
    images: PathBuf,

    /// Directory of metadata side-cars (N.json)
    #[arg(long, default_value = "out/metadata")]
    metadata: PathBuf,

    /// Bundle output directory
    #[arg(long, default_value = "launch_package")]
    out: PathBuf,

    /// Number of ids to package (0..count)
    #[arg(long, default_value_t = 1000)]
    count: u64,

    /// Collection symbol
    #[arg(long, default_value = "TAGA")]
    symbol: String,

    /// Royalty in basis points
    #[arg(long, default_value_t = 500)]
    seller_fee: u32,

    /// Creator wallet address
    #[arg(long)]
    creator: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let cfg = LaunchConfig {
        symbol: args.symbol.clone(),
        seller_fee_basis_points: args.seller_fee,
        creator_address: args.creator.clone(),
    };
    let packaged = package_collection(&args.images, &args.metadata, &args.out, args.count, &cfg)?;
    println!(
        "Packaged {packaged}/{} assets into {}",
        args.count,
        args.out.display()
    );
    Ok(())
}
