//! Sprite blob extractor
//!
//! Pulls individual sprites out of loosely laid-out sheets by connected-
//! component analysis, for AI output that does not align to a grid.

use std::path::PathBuf;

use clap::Parser;
use spriteforge::core::Result;
use spriteforge::ops::blobs::extract_blobs;

#[derive(Parser, Debug)]
#[command(name = "extract_blobs")]
#[command(about = "Extract sprites from a sheet by connected components")]
struct Args {
    /// Sheet image to scan
    input: PathBuf,

    /// Output directory
    #[arg(long, default_value = "out/blobs")]
    out: PathBuf,

    /// Output filename prefix
    #[arg(long, default_value = "sprite")]
    prefix: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let count = extract_blobs(&args.input, &args.out, &args.prefix)?;
    println!("Extracted {count} sprites to {}", args.out.display());
    Ok(())
}
