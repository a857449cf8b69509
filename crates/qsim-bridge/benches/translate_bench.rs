//! Benchmarks for circuit translation
//!
//! Run with: cargo bench -p qsim-bridge

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsim_bridge::translate;
use qsim_ir::{Circuit, Gate, Qubit, QubitOrder};

/// Layers of Hadamards followed by a CZ ladder, as in random circuit
/// sampling.
fn layered_circuit(num_qubits: i32, depth: usize) -> Circuit {
    let qubits = Qubit::line_range(num_qubits);
    let mut circuit = Circuit::new();
    for layer in 0..depth {
        for q in &qubits {
            circuit.apply(Gate::rx(0.1 * layer as f64), [q.clone()]).unwrap();
        }
        for pair in qubits.chunks_exact(2) {
            circuit.apply(Gate::cz(), [pair[0].clone(), pair[1].clone()]).unwrap();
        }
    }
    circuit
}

/// Toffoli-heavy circuit, dominated by decomposition.
fn toffoli_circuit(num_qubits: i32, depth: usize) -> Circuit {
    let qubits = Qubit::line_range(num_qubits);
    let mut circuit = Circuit::new();
    for _ in 0..depth {
        for triple in qubits.windows(3).step_by(3) {
            circuit.apply(Gate::ccx(), triple.iter().cloned()).unwrap();
        }
    }
    circuit
}

fn bench_translate_layered(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_layered");

    for num_qubits in &[4, 12, 24] {
        let circuit = layered_circuit(*num_qubits, 20);
        group.bench_with_input(
            BenchmarkId::new("qubits", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| translate(black_box(circuit), &QubitOrder::Default).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_translate_decomposed(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_decomposed");

    for depth in &[5, 20, 50] {
        let circuit = toffoli_circuit(12, *depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &circuit, |b, circuit| {
            b.iter(|| translate(black_box(circuit), &QubitOrder::Default).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_translate_layered, bench_translate_decomposed);
criterion_main!(benches);
