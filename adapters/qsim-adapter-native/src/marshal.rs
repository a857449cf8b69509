// SPDX-License-Identifier: Apache-2.0
//! Owned C-layout copies of engine circuits and options.
//!
//! Each marshalled value owns every buffer its raw records point into, so
//! the pointers returned by `as_raw()` stay valid for as long as the owner
//! is alive. Moving the owner is fine: only heap buffers are referenced.

use std::ffi::CString;
use std::ptr;

use qsim_engine::{EngineCircuit, RunOptions};

use crate::error::NativeResult;
use crate::ffi::{QsimCircuit, QsimGate, QsimOption, QsimOptions, QsimParam};

struct GateBuffers {
    qubits: Vec<u32>,
    // Keeps the names alive; `params` points into them.
    _names: Vec<CString>,
    params: Vec<QsimParam>,
    matrix: Vec<f32>,
}

/// A circuit laid out for the C ABI.
pub struct MarshalledCircuit {
    _buffers: Vec<GateBuffers>,
    gates: Vec<QsimGate>,
    raw: QsimCircuit,
}

impl MarshalledCircuit {
    pub fn new(circuit: &EngineCircuit) -> NativeResult<Self> {
        let mut buffers = Vec::with_capacity(circuit.gates.len());
        for gate in &circuit.gates {
            let names = gate
                .params
                .keys()
                .map(|k| CString::new(k.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            let params = names
                .iter()
                .zip(gate.params.values())
                .map(|(name, value)| QsimParam {
                    name: name.as_ptr(),
                    value: *value,
                })
                .collect();
            buffers.push(GateBuffers {
                qubits: gate.qubits.clone(),
                _names: names,
                params,
                matrix: gate.matrix.clone(),
            });
        }

        let gates: Vec<QsimGate> = circuit
            .gates
            .iter()
            .zip(&buffers)
            .map(|(gate, buf)| QsimGate {
                kind: gate.opcode.id(),
                time: gate.time,
                qubits: buf.qubits.as_ptr(),
                num_qubits: buf.qubits.len(),
                params: if buf.params.is_empty() {
                    ptr::null()
                } else {
                    buf.params.as_ptr()
                },
                num_params: buf.params.len(),
                matrix: if buf.matrix.is_empty() {
                    ptr::null()
                } else {
                    buf.matrix.as_ptr()
                },
                matrix_len: buf.matrix.len(),
            })
            .collect();

        let raw = QsimCircuit {
            num_qubits: circuit.num_qubits,
            gates: gates.as_ptr(),
            num_gates: gates.len(),
        };

        Ok(Self {
            _buffers: buffers,
            gates,
            raw,
        })
    }

    pub fn as_raw(&self) -> &QsimCircuit {
        &self.raw
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }
}

/// Run options laid out for the C ABI.
pub struct MarshalledOptions {
    _keys: Vec<CString>,
    _extra: Vec<QsimOption>,
    raw: QsimOptions,
}

impl MarshalledOptions {
    pub fn new(options: &RunOptions) -> NativeResult<Self> {
        let keys = options
            .extra
            .keys()
            .map(|k| CString::new(k.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let extra: Vec<QsimOption> = keys
            .iter()
            .zip(options.extra.values())
            .map(|(key, value)| QsimOption {
                key: key.as_ptr(),
                value: *value,
            })
            .collect();

        let raw = QsimOptions {
            num_threads: options.num_threads,
            max_fused_size: options.max_fused_size,
            verbosity: options.verbosity,
            seed: options.seed,
            extra: if extra.is_empty() {
                ptr::null()
            } else {
                extra.as_ptr()
            },
            num_extra: extra.len(),
        };

        Ok(Self {
            _keys: keys,
            _extra: extra,
            raw,
        })
    }

    pub fn as_raw(&self) -> &QsimOptions {
        &self.raw
    }
}

/// Bitstrings as NUL-terminated C strings plus a pointer array.
pub struct MarshalledBitstrings {
    _strings: Vec<CString>,
    ptrs: Vec<*const std::os::raw::c_char>,
}

impl MarshalledBitstrings {
    pub fn new(bitstrings: &[String]) -> NativeResult<Self> {
        let strings = bitstrings
            .iter()
            .map(|s| CString::new(s.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let ptrs = strings.iter().map(|s| s.as_ptr()).collect();
        Ok(Self {
            _strings: strings,
            ptrs,
        })
    }

    pub fn as_ptr(&self) -> *const *const std::os::raw::c_char {
        self.ptrs.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.ptrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ptrs.is_empty()
    }
}
