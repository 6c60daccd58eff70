use clap::Parser;
use pathfill_infer::{expand_user, FsOracle};
use pathfill_sweep::{sweep_dir, SweepOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pathfill",
    version,
    about = "Backfill project_path in zagent context files"
)]
struct Cli {
    /// Path to the zagent config directory (default: ~/.config/zagent)
    #[arg(long)]
    config_dir: Option<String>,
    /// Write changes in place (default is dry-run)
    #[arg(long)]
    write: bool,
    /// Print each updated file and its resolved path
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_dir: PathBuf = match &cli.config_dir {
        Some(dir) => expand_user(dir),
        None => pathfill_store::config_root(),
    };

    let opts = SweepOptions {
        write: cli.write,
        verbose: cli.verbose,
    };
    let report = sweep_dir(&config_dir, &opts, &FsOracle)?;
    println!("{}", report.summary_line(cli.write));

    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
