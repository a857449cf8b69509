//! Translate command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use qsim_bridge::translate;
use qsim_ir::QubitOrder;

use super::common::load_circuit;

/// Execute the translate command.
pub fn execute(input: &str, format: &str, output: Option<&str>) -> Result<()> {
    let circuit = load_circuit(input)?;
    let engine_circuit = translate(&circuit, &QubitOrder::Default)?;

    let rendered = match format.to_lowercase().as_str() {
        "table" => engine_circuit.to_string(),
        "json" => serde_json::to_string_pretty(&engine_circuit)?,
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    };

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output: {path}"))?;
            eprintln!(
                "{} {} qubits, {} gates, {} time steps -> {}",
                style("✓").green().bold(),
                engine_circuit.num_qubits,
                engine_circuit.gates.len(),
                engine_circuit.max_time().map_or(0, |t| t + 1),
                style(path).green()
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
