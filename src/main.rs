use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod comparison;
mod config;
mod correctness;
mod error;
mod index;
mod matcher;
mod models;
mod output;
mod session;
mod store;

use crate::comparison::Selection;
use crate::config::Config;
use crate::output::{OutputFormat, Renderer};
use crate::session::Session;

/// AI Model Battle Arena - Compare two models' evaluation results side by side
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the results JSON document (overrides the config file)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: plain or json (overrides the config file)
    #[arg(short, long)]
    output: Option<OutputFormat>,

    /// Verbose output - log loading, indexing and matching
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available models, datasets and problem ids
    List,
    /// Compare two models on one dataset problem
    Compare {
        #[arg(long)]
        model_a: String,
        #[arg(long)]
        model_b: String,
        #[arg(long)]
        dataset: String,
        #[arg(long)]
        problem_id: i64,
    },
    /// Read selections from stdin, one `<model_a> <model_b> <dataset> <problem_id>` per line
    Interactive,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = resolve_config(&args)?;
    let session = Session::open(&config)?;
    let renderer = Renderer::new(config.output, &config.placeholder);
    let mut out = io::stdout().lock();

    match args.command {
        Command::List => renderer.write_options(&mut out, session.index())?,
        Command::Compare {
            model_a,
            model_b,
            dataset,
            problem_id,
        } => {
            let selection = Selection::new(model_a, model_b, dataset, problem_id);
            if !session.respond(&mut out, &renderer, &selection)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Interactive => {
            info!("reading selections from stdin");
            session.run_interactive(io::stdin().lock(), &mut out, &renderer)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Config file values with command-line overrides applied
fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
