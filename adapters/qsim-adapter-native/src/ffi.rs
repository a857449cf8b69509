// SPDX-License-Identifier: Apache-2.0
//! Raw C ABI of the native qsim bridge library.
//!
//! The library exports three simulation entry points plus an optional
//! version query:
//!
//! ```text
//! int qsim_bridge_sample(const qsim_circuit_t*, const qsim_options_t*,
//!                        uint8_t* out, size_t out_len, size_t* written);
//! int qsim_bridge_simulate(const qsim_circuit_t*, const qsim_options_t*,
//!                          const char* const* bitstrings, size_t num_bitstrings,
//!                          float* out, size_t out_len, size_t* written);
//! int qsim_bridge_simulate_fullstate(const qsim_circuit_t*, const qsim_options_t*,
//!                                    uint64_t initial_basis,
//!                                    const float* initial_state, size_t initial_len,
//!                                    float* out, size_t out_len, size_t* written);
//! const char* qsim_bridge_version(void);
//! ```
//!
//! Complex values cross the boundary as interleaved `(re, im)` `float`
//! pairs. Output buffers are owned and sized by the caller; the library
//! reports how many elements it wrote.

use std::os::raw::{c_char, c_int};

// ===========================================================================
// Status codes
// ===========================================================================

pub const QSIM_SUCCESS: c_int = 0;
pub const QSIM_ERROR_INVALID_ARGUMENT: c_int = -1;
pub const QSIM_ERROR_OUT_OF_MEMORY: c_int = -2;
pub const QSIM_ERROR_BUFFER_TOO_SMALL: c_int = -3;
pub const QSIM_ERROR_UNSUPPORTED: c_int = -4;
pub const QSIM_ERROR_INTERNAL: c_int = -5;

/// Returns `true` if the return code indicates success.
#[inline]
pub fn is_success(code: c_int) -> bool {
    code == QSIM_SUCCESS
}

// ===========================================================================
// Records
// ===========================================================================

/// Named gate parameter (`qsim_param_t`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct QsimParam {
    pub name: *const c_char,
    pub value: f64,
}

/// One gate (`qsim_gate_t`). `matrix` is null for non-matrix gates.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct QsimGate {
    pub kind: u32,
    pub time: u32,
    pub qubits: *const u32,
    pub num_qubits: usize,
    pub params: *const QsimParam,
    pub num_params: usize,
    pub matrix: *const f32,
    pub matrix_len: usize,
}

/// A whole circuit (`qsim_circuit_t`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct QsimCircuit {
    pub num_qubits: u32,
    pub gates: *const QsimGate,
    pub num_gates: usize,
}

/// Pass-through integer option (`qsim_option_t`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct QsimOption {
    pub key: *const c_char,
    pub value: i64,
}

/// Run options (`qsim_options_t`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct QsimOptions {
    pub num_threads: u32,
    pub max_fused_size: u32,
    pub verbosity: u32,
    pub seed: u64,
    pub extra: *const QsimOption,
    pub num_extra: usize,
}

// ===========================================================================
// Function signatures
// ===========================================================================

pub type FnSample = unsafe extern "C" fn(
    circuit: *const QsimCircuit,
    options: *const QsimOptions,
    out: *mut u8,
    out_len: usize,
    written: *mut usize,
) -> c_int;

pub type FnSimulate = unsafe extern "C" fn(
    circuit: *const QsimCircuit,
    options: *const QsimOptions,
    bitstrings: *const *const c_char,
    num_bitstrings: usize,
    out: *mut f32,
    out_len: usize,
    written: *mut usize,
) -> c_int;

pub type FnSimulateFullstate = unsafe extern "C" fn(
    circuit: *const QsimCircuit,
    options: *const QsimOptions,
    initial_basis: u64,
    initial_state: *const f32,
    initial_len: usize,
    out: *mut f32,
    out_len: usize,
    written: *mut usize,
) -> c_int;

pub type FnVersion = unsafe extern "C" fn() -> *const c_char;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(is_success(QSIM_SUCCESS));
        assert!(!is_success(QSIM_ERROR_INVALID_ARGUMENT));
        assert!(!is_success(1));
    }
}
