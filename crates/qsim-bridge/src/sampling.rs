//! Sampling measurement outcomes from a state vector.

use ndarray::Array2;
use num_complex::Complex32;
use rand::Rng;

use crate::error::{BridgeError, BridgeResult};

/// Draw `repetitions` basis states from `state`.
///
/// Row `r` of the result holds the bits of the `r`-th draw; column `k` is
/// qubit `k` of a big-endian basis index, so column 0 is the most
/// significant bit. The state does not need to be normalized.
pub fn sample_state_vector<R: Rng>(
    state: &[Complex32],
    num_qubits: usize,
    repetitions: usize,
    rng: &mut R,
) -> BridgeResult<Array2<u8>> {
    let mut cumulative = Vec::with_capacity(state.len());
    let mut total = 0.0f64;
    for amp in state {
        total += f64::from(amp.norm_sqr());
        cumulative.push(total);
    }
    if total <= 0.0 || !total.is_finite() {
        return Err(BridgeError::DegenerateState);
    }

    let mut samples = Array2::zeros((repetitions, num_qubits));
    for mut row in samples.rows_mut() {
        let r: f64 = rng.r#gen::<f64>() * total;
        let index = cumulative
            .partition_point(|&c| c <= r)
            .min(state.len() - 1);
        for (k, bit) in row.iter_mut().enumerate() {
            *bit = ((index >> (num_qubits - 1 - k)) & 1) as u8;
        }
    }
    Ok(samples)
}
