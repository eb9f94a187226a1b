//! Background keyer
//!
//! Detects each image's flat background from its corners and keys it to
//! transparent, writing `<stem>_clean.png` next to the source.

use std::path::PathBuf;

use clap::Parser;
use walkdir::WalkDir;

use spriteforge::core::Result;
use spriteforge::ops::matte::clean_file;

#[derive(Parser, Debug)]
#[command(name = "clean_background")]
#[command(about = "Key flat backgrounds to transparent")]
struct Args {
    /// Image files or directories to process (directories are walked
    /// recursively for .png files)
    paths: Vec<PathBuf>,

    /// RGB distance below which a pixel counts as background
    #[arg(long, default_value_t = 30.0)]
    threshold: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let mut cleaned = 0u32;
    for path in &args.paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                let is_png = p.extension().is_some_and(|e| e.eq_ignore_ascii_case("png"));
                let is_output = p
                    .file_stem()
                    .is_some_and(|s| s.to_string_lossy().ends_with("_clean"));
                if p.is_file() && is_png && !is_output {
                    clean_file(p, args.threshold)?;
                    cleaned += 1;
                }
            }
        } else {
            clean_file(path, args.threshold)?;
            cleaned += 1;
        }
    }
    println!("Cleaned {cleaned} images");
    Ok(())
}
