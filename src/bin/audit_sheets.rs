//! Batch sheet auditor
//!
//! Scans a generated batch for broken sheets (wrong dimensions, empty
//! or headless rows, clipped frames) and writes a JSON report of the
//! offenders.

use std::path::PathBuf;

use clap::Parser;
use spriteforge::config::SheetConfig;
use spriteforge::core::Result;
use spriteforge::ops::audit::audit_directory;

#[derive(Parser, Debug)]
#[command(name = "audit_sheets")]
#[command(about = "Audit generated sheets and report offenders")]
struct Args {
    /// Directory of npc_NNN.png sheets
    #[arg(long, default_value = "out/sheets")]
    dir: PathBuf,

    /// Number of ids to audit (0..count)
    #[arg(long, default_value_t = 1000)]
    count: u64,

    /// Report output path
    #[arg(long, default_value = "audit_report.json")]
    report: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let cfg = SheetConfig::default();
    let broken = audit_directory(&args.dir, args.count, &cfg, &args.report)?;
    println!(
        "Audited {} sheets: {} with issues, report at {}",
        args.count,
        broken.len(),
        args.report.display()
    );
    Ok(())
}
