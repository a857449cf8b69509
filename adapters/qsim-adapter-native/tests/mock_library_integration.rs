// SPDX-License-Identifier: Apache-2.0
//! Integration tests against the compiled mock qsim library.
//!
//! build.rs compiles `mock/mock_qsim.c` and exports its path via
//! `MOCK_QSIM_LIBRARY_PATH`. Without a C compiler the tests return early.

use std::collections::BTreeMap;
use std::path::Path;

use num_complex::Complex64;
use qsim_adapter_native::{NativeEngine, NativeError};
use qsim_bridge::{BridgeError, QsimSimulator};
use qsim_engine::{EngineCircuit, EngineError, InitialState, Opcode, QsimEngine, RunOptions};
use qsim_ir::{Circuit, Gate, ParamResolver, Qubit, QubitOrder};

fn load_mock() -> Option<NativeEngine> {
    let path = option_env!("MOCK_QSIM_LIBRARY_PATH")?;
    Some(NativeEngine::load(Path::new(path)).expect("failed to load mock qsim library"))
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_mock_library() {
    let Some(engine) = load_mock() else { return };
    assert_eq!(engine.name(), "qsim-native");
    assert_eq!(engine.library().version().as_deref(), Some("mock-qsim 0.1"));
    assert!(engine.library().library_path().contains("mock_qsim"));
}

#[test]
fn test_load_nonexistent_library() {
    let err = NativeEngine::load(Path::new("/nonexistent/libqsim_bridge.so")).unwrap_err();
    assert!(matches!(err, NativeError::LoadFailed { .. }));
}

// ---------------------------------------------------------------------------
// Raw engine calls
// ---------------------------------------------------------------------------

#[test]
fn test_sample_deterministic_bits() {
    let Some(engine) = load_mock() else { return };
    let mut circuit = EngineCircuit::new(2);
    circuit
        .add_gate(Opcode::X, 0, vec![1], BTreeMap::new())
        .unwrap()
        .add_gate(Opcode::Measurement, 1, vec![1, 0], BTreeMap::new())
        .unwrap();

    let bits = engine.sample(&circuit, &RunOptions::default()).unwrap();
    assert_eq!(bits, vec![1, 0]);
}

#[test]
fn test_fullstate_bell() {
    let Some(engine) = load_mock() else { return };
    let mut circuit = EngineCircuit::new(2);
    circuit
        .add_gate(Opcode::H, 0, vec![1], BTreeMap::new())
        .unwrap()
        .add_gate(Opcode::CX, 1, vec![1, 0], BTreeMap::new())
        .unwrap();

    let state = engine
        .simulate_fullstate(&circuit, &RunOptions::default(), &InitialState::default())
        .unwrap();
    assert_eq!(state.len(), 4);
    let h = std::f32::consts::FRAC_1_SQRT_2;
    assert!(close(state[0].re, h));
    assert!(close(state[3].re, h));
    assert!(close(state[1].norm(), 0.0));
    assert!(close(state[2].norm(), 0.0));
}

#[test]
fn test_fullstate_from_vector() {
    let Some(engine) = load_mock() else { return };
    let mut circuit = EngineCircuit::new(1);
    circuit
        .add_matrix1(
            0,
            vec![0],
            &[
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
            ],
        )
        .unwrap();

    let initial = InitialState::from_interleaved(&[0.6, 0.0, 0.0, 0.8]).unwrap();
    let state = engine
        .simulate_fullstate(&circuit, &RunOptions::default(), &initial)
        .unwrap();
    assert!(close(state[0].im, 0.8));
    assert!(close(state[1].re, 0.6));
}

#[test]
fn test_amplitudes_use_engine_bit_order() {
    let Some(engine) = load_mock() else { return };
    let mut circuit = EngineCircuit::new(2);
    circuit
        .add_gate(Opcode::X, 0, vec![0], BTreeMap::new())
        .unwrap();

    // Character k is engine qubit k.
    let amps = engine
        .simulate_amplitudes(
            &circuit,
            &RunOptions::default(),
            &["10".to_string(), "01".to_string()],
        )
        .unwrap();
    assert!(close(amps[0].re, 1.0));
    assert!(close(amps[1].re, 0.0));
}

#[test]
fn test_unsupported_gate() {
    let Some(engine) = load_mock() else { return };
    let mut circuit = EngineCircuit::new(1);
    circuit
        .add_gate(Opcode::T, 0, vec![0], BTreeMap::new())
        .unwrap();

    let err = engine
        .simulate_fullstate(&circuit, &RunOptions::default(), &InitialState::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::Unsupported(_)));
}

// ---------------------------------------------------------------------------
// Through the bridge
// ---------------------------------------------------------------------------

fn bell(a: &Qubit, b: &Qubit) -> Circuit {
    let mut circuit = Circuit::new();
    circuit
        .apply(Gate::h(), [a.clone()])
        .unwrap()
        .apply(Gate::cnot(), [a.clone(), b.clone()])
        .unwrap()
        .apply(Gate::measure("m", 2), [a.clone(), b.clone()])
        .unwrap();
    circuit
}

#[test]
fn test_bridge_bell_samples_are_correlated() {
    let Some(engine) = load_mock() else { return };
    let (a, b) = (Qubit::line(0), Qubit::line(1));
    let mut sim = QsimSimulator::new(engine).with_seed(7);

    let record = sim.run(&bell(&a, &b), &ParamResolver::new(), 64).unwrap();
    let bits = record.get("m").unwrap();
    assert_eq!(bits.dim(), (64, 2));
    for row in bits.rows() {
        assert_eq!(row[0], row[1]);
    }
}

#[test]
fn test_bridge_intermediate_measurement() {
    let Some(engine) = load_mock() else { return };
    let q = Qubit::line(0);
    let mut circuit = Circuit::new();
    circuit
        .apply(Gate::x(), [q.clone()])
        .unwrap()
        .apply(Gate::measure("before", 1), [q.clone()])
        .unwrap()
        .apply(Gate::x(), [q.clone()])
        .unwrap()
        .apply(Gate::measure("after", 1), [q.clone()])
        .unwrap();

    let mut sim = QsimSimulator::new(engine).with_seed(1);
    let record = sim.run(&circuit, &ParamResolver::new(), 3).unwrap();
    assert!(record.get("before").unwrap().iter().all(|&b| b == 1));
    assert!(record.get("after").unwrap().iter().all(|&b| b == 0));
}

#[test]
fn test_bridge_amplitudes_big_endian() {
    let Some(engine) = load_mock() else { return };
    let (a, b) = (Qubit::line(0), Qubit::line(1));
    let mut circuit = Circuit::new();
    circuit
        .apply(Gate::x(), [a.clone()])
        .unwrap()
        .apply(Gate::i(), [b.clone()])
        .unwrap();

    let mut sim = QsimSimulator::new(engine);
    let amps = sim
        .compute_amplitudes(
            &circuit,
            &[0b10, 0b01],
            &ParamResolver::new(),
            &QubitOrder::Default,
        )
        .unwrap();
    assert!(close(amps[0].re, 1.0));
    assert!(close(amps[1].re, 0.0));
}

#[test]
fn test_bridge_simulate_from_basis_state() {
    let Some(engine) = load_mock() else { return };
    let (a, b) = (Qubit::line(0), Qubit::line(1));
    let mut circuit = Circuit::new();
    circuit
        .apply(Gate::i(), [a.clone()])
        .unwrap()
        .apply(Gate::x(), [b.clone()])
        .unwrap();

    let mut sim = QsimSimulator::new(engine);
    let result = sim
        .simulate(
            &circuit,
            &ParamResolver::new(),
            &QubitOrder::Default,
            &InitialState::Basis(0b10),
        )
        .unwrap();
    let state = &result.final_state;
    assert_eq!(state.qubit_map[&a], 0);
    assert!(close(state.state_vector[0b11].re, 1.0));
    assert_eq!(state.amplitude("11").map(|c| c.re), Some(1.0));
}

#[test]
fn test_bridge_reports_engine_errors() {
    let Some(engine) = load_mock() else { return };
    let mut circuit = Circuit::new();
    circuit.apply(Gate::t(), [Qubit::line(0)]).unwrap();

    let mut sim = QsimSimulator::new(engine);
    let err = sim
        .simulate(
            &circuit,
            &ParamResolver::new(),
            &QubitOrder::Default,
            &InitialState::default(),
        )
        .unwrap_err();
    assert!(matches!(err, BridgeError::Engine(EngineError::Unsupported(_))));
}
