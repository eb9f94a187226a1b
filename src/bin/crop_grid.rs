//! Grid asset cropper
//!
//! Splits a packed grid image (AI output sheets, tile strips) into its
//! individual cells.

use std::path::PathBuf;

use clap::Parser;
use spriteforge::core::Result;
use spriteforge::ops::grid::crop_grid_files;

#[derive(Parser, Debug)]
#[command(name = "crop_grid")]
#[command(about = "Crop a grid image into individual cell PNGs")]
struct Args {
    /// Grid image to split
    image: PathBuf,

    /// Grid rows
    #[arg(long, default_value_t = 12)]
    rows: u32,

    /// Grid columns
    #[arg(long, default_value_t = 12)]
    cols: u32,

    /// Output directory
    #[arg(long, default_value = "out/grid")]
    out: PathBuf,

    /// Output filename prefix
    #[arg(long, default_value = "grid_char")]
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
    let count = crop_grid_files(&args.image, args.rows, args.cols, &args.out, &args.prefix)?;
    println!("Wrote {count} cells to {}", args.out.display());
    Ok(())
}
