mod bridge;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bridge::Action;

#[derive(Parser, Debug)]
#[command(name = "harmony-bridge")]
#[command(about = "Generate HarmonyHub practice exercises as MusicXML", long_about = None)]
struct Args {
    /// What to produce: generate (JSON response), musicxml or metadata
    #[arg(short, long)]
    action: Action,

    /// Exercise parameters as a JSON object (default: all defaults)
    #[arg(short, long)]
    params: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for reproducible exercises
    #[arg(short, long, env = "HARMONY_SEED")]
    seed: Option<u64>,

    /// How many spaces to use for indentation in XML output
    #[arg(short, long, default_value = "2")]
    indent: usize,

    /// Suppress informational messages (only errors)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let params = bridge::parse_params(args.params.as_deref())?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let output = bridge::run(args.action, &params, args.indent, &mut rng)?;
    let output = output.trim_end();

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{}\n", output))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Output saved");
        }
        None => println!("{}", output),
    }

    Ok(())
}
