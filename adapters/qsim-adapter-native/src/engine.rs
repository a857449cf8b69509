// SPDX-License-Identifier: Apache-2.0
//! [`QsimEngine`] implementation backed by the native library.

use std::path::Path;
use std::ptr;

use num_complex::Complex32;
use qsim_engine::{EngineCircuit, EngineError, EngineResult, InitialState, QsimEngine, RunOptions};
use tracing::{debug, instrument};

use crate::error::{NativeError, NativeResult};
use crate::ffi;
use crate::loader::{QsimLibrary, locate_library};
use crate::marshal::{MarshalledBitstrings, MarshalledCircuit, MarshalledOptions};

/// A qsim engine living in a dynamically loaded library.
#[derive(Debug)]
pub struct NativeEngine {
    library: QsimLibrary,
}

impl NativeEngine {
    /// Load the library at `path`.
    pub fn load(path: &Path) -> NativeResult<Self> {
        let library = QsimLibrary::load(path)?;
        Ok(Self { library })
    }

    /// Locate and load the library, see [`locate_library`].
    pub fn discover(explicit: Option<&Path>) -> NativeResult<Self> {
        let path = locate_library(explicit)?;
        Self::load(&path)
    }

    /// The loaded library.
    pub fn library(&self) -> &QsimLibrary {
        &self.library
    }
}

fn check(code: i32) -> NativeResult<()> {
    if ffi::is_success(code) {
        Ok(())
    } else {
        Err(NativeError::from_code(code))
    }
}

fn check_written(expected: usize, written: usize) -> EngineResult<()> {
    if written == expected {
        Ok(())
    } else {
        Err(EngineError::OutputSizeMismatch {
            expected,
            got: written,
        })
    }
}

fn interleave(values: &[Complex32]) -> Vec<f32> {
    values.iter().flat_map(|c| [c.re, c.im]).collect()
}

fn deinterleave(values: &[f32]) -> Vec<Complex32> {
    values
        .chunks_exact(2)
        .map(|pair| Complex32::new(pair[0], pair[1]))
        .collect()
}

impl QsimEngine for NativeEngine {
    fn name(&self) -> &str {
        "qsim-native"
    }

    #[instrument(skip(self, circuit, options), fields(gates = circuit.gates.len()))]
    fn sample(&self, circuit: &EngineCircuit, options: &RunOptions) -> EngineResult<Vec<u8>> {
        let raw_circuit = MarshalledCircuit::new(circuit)?;
        let raw_options = MarshalledOptions::new(options)?;

        let expected = circuit.num_measured_qubits();
        let mut out = vec![0u8; expected];
        let mut written = 0usize;

        // SAFETY: every pointer refers to a buffer owned above, alive for the
        // whole call; `out` has room for `expected` bytes.
        let code = unsafe {
            (self.library.fn_sample)(
                raw_circuit.as_raw(),
                raw_options.as_raw(),
                out.as_mut_ptr(),
                out.len(),
                &mut written,
            )
        };
        check(code)?;
        check_written(expected, written)?;

        debug!("sampled {expected} measured qubit(s)");
        Ok(out)
    }

    #[instrument(skip(self, circuit, options, bitstrings), fields(count = bitstrings.len()))]
    fn simulate_amplitudes(
        &self,
        circuit: &EngineCircuit,
        options: &RunOptions,
        bitstrings: &[String],
    ) -> EngineResult<Vec<Complex32>> {
        let raw_circuit = MarshalledCircuit::new(circuit)?;
        let raw_options = MarshalledOptions::new(options)?;
        let raw_bitstrings = MarshalledBitstrings::new(bitstrings)?;

        let mut out = vec![0f32; 2 * raw_bitstrings.len()];
        let mut written = 0usize;

        // SAFETY: see `sample`.
        let code = unsafe {
            (self.library.fn_simulate)(
                raw_circuit.as_raw(),
                raw_options.as_raw(),
                raw_bitstrings.as_ptr(),
                raw_bitstrings.len(),
                out.as_mut_ptr(),
                out.len(),
                &mut written,
            )
        };
        check(code)?;
        check_written(out.len(), written)?;

        Ok(deinterleave(&out))
    }

    #[instrument(skip(self, circuit, options, initial), fields(qubits = circuit.num_qubits))]
    fn simulate_fullstate(
        &self,
        circuit: &EngineCircuit,
        options: &RunOptions,
        initial: &InitialState,
    ) -> EngineResult<Vec<Complex32>> {
        initial.validate(circuit.num_qubits)?;
        let dim = 1usize
            .checked_shl(circuit.num_qubits)
            .and_then(|d| d.checked_mul(2))
            .ok_or_else(|| {
                EngineError::Unsupported(format!(
                    "{} qubits exceed the addressable state size",
                    circuit.num_qubits
                ))
            })?;

        let raw_circuit = MarshalledCircuit::new(circuit)?;
        let raw_options = MarshalledOptions::new(options)?;
        let (basis, vector) = match initial {
            InitialState::Basis(index) => (*index, Vec::new()),
            InitialState::Vector(v) => (0, interleave(v)),
        };
        let vector_ptr = if vector.is_empty() {
            ptr::null()
        } else {
            vector.as_ptr()
        };

        let mut out = vec![0f32; dim];
        let mut written = 0usize;

        // SAFETY: see `sample`; `vector` outlives the call.
        let code = unsafe {
            (self.library.fn_simulate_fullstate)(
                raw_circuit.as_raw(),
                raw_options.as_raw(),
                basis,
                vector_ptr,
                vector.len(),
                out.as_mut_ptr(),
                out.len(),
                &mut written,
            )
        };
        check(code)?;
        check_written(dim, written)?;

        Ok(deinterleave(&out))
    }
}
