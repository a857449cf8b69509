//! qsim Command-Line Interface
//!
//! Translate circuits to the engine format and run them through a native
//! qsim library.
//!
//! ```text
//! qsim translate -i bell.json
//! qsim run -i bell.json -r 1000 --seed 7
//! qsim run -i rx.json -r 100 --sweep theta=0:3.14:5
//! qsim amplitudes -i bell.json -b 0,3
//! qsim state -i bell.json --initial 1
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::EngineArgs;
use commands::{amplitudes, run, state, translate, version};

/// qsim - simulate moment-based circuits on the qsim engine
#[derive(Parser)]
#[command(name = "qsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the native qsim library
    #[arg(long, global = true, env = "QSIM_LIBRARY")]
    library: Option<String>,

    /// YAML file with engine options
    #[arg(long, global = true)]
    config: Option<String>,

    /// Number of engine threads (overrides the config file)
    #[arg(long, global = true)]
    threads: Option<u32>,

    /// Maximum fused gate size (overrides the config file)
    #[arg(long, global = true)]
    fuse: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the engine circuit a circuit translates to
    Translate {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Sample the circuit's measurements
    Run {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Number of repetitions
        #[arg(short, long, default_value = "1024")]
        repetitions: usize,

        /// Seed for the simulator's random source
        #[arg(long)]
        seed: Option<u64>,

        /// Parameter sweep, key=start:stop:length (repeatable)
        #[arg(long)]
        sweep: Vec<String>,
    },

    /// Compute amplitudes of basis states
    Amplitudes {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Comma-separated basis states, big-endian over the qubit order
        #[arg(short, long, value_delimiter = ',', required = true)]
        bitstrings: Vec<u64>,

        /// Parameter sweep, key=start:stop:length (repeatable)
        #[arg(long)]
        sweep: Vec<String>,
    },

    /// Compute the final state vector
    State {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Initial basis state, big-endian over the qubit order
        #[arg(long, default_value = "0")]
        initial: u64,

        /// Decimal places in the printed state
        #[arg(long, default_value = "3")]
        decimals: usize,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let engine_args = EngineArgs {
        library: cli.library,
        config: cli.config,
        threads: cli.threads,
        fuse: cli.fuse,
    };

    let result = match cli.command {
        Commands::Translate {
            input,
            format,
            output,
        } => translate::execute(&input, &format, output.as_deref()),

        Commands::Run {
            input,
            repetitions,
            seed,
            sweep,
        } => run::execute(&engine_args, &input, repetitions, seed, &sweep),

        Commands::Amplitudes {
            input,
            bitstrings,
            sweep,
        } => amplitudes::execute(&engine_args, &input, &bitstrings, &sweep),

        Commands::State {
            input,
            initial,
            decimals,
        } => state::execute(&engine_args, &input, initial, decimals),

        Commands::Version => {
            version::execute(&engine_args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
