//! Procedural monster generator
//!
//! Draws seeded pixel-art monster sheets (4 animations x 4 frames) with
//! no external assets. The seed fully determines the monster.

use std::path::PathBuf;

use clap::Parser;
use spriteforge::core::Result;
use spriteforge::generate::monster::generate_monster_sheet;

#[derive(Parser, Debug)]
#[command(name = "generate_monsters")]
#[command(about = "Generate procedural pixel-art monster sheets")]
struct Args {
    /// Number of monsters to generate
    #[arg(long, default_value_t = 100)]
    count: u64,

    /// First seed; monster N uses seed + N
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output directory
    #[arg(long, default_value = "out/monsters")]
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
    std::fs::create_dir_all(&args.out)?;

    for n in 0..args.count {
        let seed = args.seed + n;
        let sheet = generate_monster_sheet(seed);
        sheet.save(args.out.join(format!("monster_{seed:03}.png")))?;
        if n % 25 == 0 {
            tracing::info!(n, seed, "progress");
        }
    }

    tracing::info!(count = args.count, out = %args.out.display(), "monster batch complete");
    println!("Generated {} monsters in {}", args.count, args.out.display());
    Ok(())
}
