//! Matte finisher
//!
//! Heavy cleanup for AI-extracted sprites still carrying magenta matte
//! and grid-line residue: clears the matte, floods out border-connected
//! lines, and recenters each sprite on a square transparent canvas.
//! Files are rewritten in place.

use std::path::PathBuf;

use clap::Parser;
use walkdir::WalkDir;

use spriteforge::core::Result;
use spriteforge::ops::matte::finish_matte_file;

#[derive(Parser, Debug)]
#[command(name = "matte_finish")]
#[command(about = "Strip matte residue and recenter extracted sprites")]
struct Args {
    /// Directory of sprite PNGs to finish in place
    dir: PathBuf,

    /// Output canvas size (square)
    #[arg(long, default_value_t = 128)]
    target: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mut finished = 0u32;
    let mut empty = 0u32;
    for entry in WalkDir::new(&args.dir).into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("png")) {
            if finish_matte_file(p, args.target)? {
                finished += 1;
            } else {
                empty += 1;
            }
        }
    }
    println!("Finished {finished} sprites ({empty} had no surviving content)");
    Ok(())
}
