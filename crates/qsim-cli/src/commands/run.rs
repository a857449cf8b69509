//! Run command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::common::{EngineArgs, create_simulator, load_circuit, parse_sweeps, print_record};

/// Execute the run command.
pub fn execute(
    args: &EngineArgs,
    input: &str,
    repetitions: usize,
    seed: Option<u64>,
    sweep: &[String],
) -> Result<()> {
    println!(
        "{} Running {} ({} repetitions)",
        style("→").cyan().bold(),
        style(input).green(),
        repetitions
    );

    let circuit = load_circuit(input)?;
    println!(
        "  Loaded: {} qubits, depth {}",
        circuit.num_qubits(),
        circuit.depth()
    );

    let sweep = parse_sweeps(sweep)?;
    let mut simulator = create_simulator(args)?;
    if let Some(seed) = seed {
        simulator = simulator.with_seed(seed);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Sampling {} parameter assignment(s)...", sweep.len()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let trials = simulator.run_sweep(&circuit, sweep, repetitions);
    spinner.finish_and_clear();

    for trial in trials? {
        if !trial.params.is_empty() {
            println!("\n{} {}", style("Parameters:").bold(), trial.params);
        }
        if trial.measurements.is_empty() {
            println!("  (no measurements)");
        }
        print_record(&trial.measurements);
    }

    Ok(())
}
