//! Amplitudes command implementation.

use anyhow::Result;
use console::style;

use qsim_ir::QubitOrder;

use super::common::{EngineArgs, create_simulator, load_circuit, parse_sweeps};

/// Execute the amplitudes command.
pub fn execute(args: &EngineArgs, input: &str, bitstrings: &[u64], sweep: &[String]) -> Result<()> {
    let circuit = load_circuit(input)?;
    let num_qubits = circuit.num_qubits();
    let sweep = parse_sweeps(sweep)?;
    let resolvers = sweep.to_resolvers()?;

    let mut simulator = create_simulator(args)?;
    let results = simulator.compute_amplitudes_sweep(
        &circuit,
        bitstrings,
        resolvers.clone(),
        &QubitOrder::Default,
    )?;

    for (params, amplitudes) in resolvers.iter().zip(&results) {
        if !params.is_empty() {
            println!("{} {}", style("Parameters:").bold(), params);
        }
        for (value, amplitude) in bitstrings.iter().zip(amplitudes) {
            println!(
                "  |{}⟩  {:>8.4} {:+.4}i  (p = {:.4})",
                style(format!("{value:0num_qubits$b}")).cyan(),
                amplitude.re,
                amplitude.im,
                amplitude.norm_sqr()
            );
        }
    }

    Ok(())
}
