use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sessionstat::{aggregate_file, write_report_file, AggregatorConfig};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "data.txt";
const OUTPUT: &str = "result.json";

#[derive(Parser, Debug)]
#[command(
    name = "sessionstat",
    about = "Aggregate a session log into result.json in a single pass"
)]
struct Cli {
    /// Session log (`user,...` and `session,...` lines).
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = AggregatorConfig::default().with_space_profiling(tracing::enabled!(Level::DEBUG));
    let outcome = aggregate_file(&cli.input, config)
        .with_context(|| format!("failed to aggregate {}", cli.input.display()))?;

    if let Some(profile) = &outcome.space_profile {
        debug!("{}", profile.report());
    }

    write_report_file(OUTPUT, &outcome.report)
        .with_context(|| format!("failed to write report to {}", OUTPUT))?;

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
