//! State command implementation.

use anyhow::Result;
use console::style;

use qsim_engine::InitialState;
use qsim_ir::{ParamResolver, QubitOrder};

use super::common::{EngineArgs, create_simulator, load_circuit};

/// Execute the state command.
pub fn execute(args: &EngineArgs, input: &str, initial: u64, decimals: usize) -> Result<()> {
    let circuit = load_circuit(input)?;

    let mut simulator = create_simulator(args)?;
    let result = simulator.simulate(
        &circuit,
        &ParamResolver::new(),
        &QubitOrder::Default,
        &InitialState::Basis(initial),
    )?;

    let state = &result.final_state;
    println!(
        "{} Final state ({} qubits):",
        style("✓").green().bold(),
        state.num_qubits()
    );
    let order: Vec<String> = {
        let mut qubits: Vec<_> = state.qubit_map.iter().collect();
        qubits.sort_by_key(|(_, position)| **position);
        qubits.into_iter().map(|(q, _)| q.to_string()).collect()
    };
    println!("  Qubit order: {}", style(order.join(", ")).dim());
    println!("  {}", state.dirac_notation(decimals));

    Ok(())
}
