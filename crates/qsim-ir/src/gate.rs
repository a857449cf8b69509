//! Gate kinds.
//!
//! Most gates follow the "power gate" convention: a gate `G` with exponent
//! `e` and global shift `s` has the unitary `exp(iπ e s) G^e`, so
//! `XPow { exponent: 1, global_shift: 0 }` is Pauli X and
//! `XPow { exponent: θ/π, global_shift: -0.5 }` is `Rx(θ)`.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::parameter::{ParamResolver, ParameterExpression};

/// Exponent and global shift shared by all power gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowGate {
    /// Exponent of the gate.
    pub exponent: ParameterExpression,
    /// Global phase shift, in half turns.
    #[serde(default)]
    pub global_shift: f64,
}

impl PowGate {
    /// A power gate with no global shift.
    pub fn new(exponent: impl Into<ParameterExpression>) -> Self {
        Self {
            exponent: exponent.into(),
            global_shift: 0.0,
        }
    }

    /// A power gate with a global shift.
    pub fn shifted(exponent: impl Into<ParameterExpression>, global_shift: f64) -> Self {
        Self {
            exponent: exponent.into(),
            global_shift,
        }
    }

    fn resolve(&self, resolver: &ParamResolver) -> Self {
        Self {
            exponent: self.exponent.resolve(resolver),
            global_shift: self.global_shift,
        }
    }
}

/// A gate given directly by its unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrixGate")]
pub struct MatrixGate {
    num_qubits: u32,
    /// Row-major unitary, `2^n × 2^n` entries.
    matrix: Vec<Complex64>,
}

impl MatrixGate {
    /// Create a matrix gate, checking that the matrix is `2^n × 2^n`.
    pub fn new(num_qubits: u32, matrix: Vec<Complex64>) -> IrResult<Self> {
        let expected = 1usize
            .checked_shl(num_qubits)
            .and_then(|dim| dim.checked_mul(dim));
        if expected != Some(matrix.len()) {
            return Err(IrError::InvalidMatrix {
                num_qubits,
                expected,
                got: matrix.len(),
            });
        }
        Ok(Self { num_qubits, matrix })
    }

    /// Number of qubits the matrix acts on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Row-major entries of the unitary.
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }
}

#[derive(Deserialize)]
struct RawMatrixGate {
    num_qubits: u32,
    matrix: Vec<Complex64>,
}

impl TryFrom<RawMatrixGate> for MatrixGate {
    type Error = IrError;

    fn try_from(raw: RawMatrixGate) -> IrResult<Self> {
        Self::new(raw.num_qubits, raw.matrix)
    }
}

/// A computational-basis measurement recorded under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementGate {
    /// Key the results are recorded under.
    pub key: String,
    /// Number of measured qubits.
    pub num_qubits: u32,
    /// Bits to flip after measuring, by operand position. Shorter masks
    /// leave the remaining bits untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invert_mask: Vec<bool>,
}

impl MeasurementGate {
    /// Create a measurement without inversion.
    pub fn new(key: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            key: key.into(),
            num_qubits,
            invert_mask: vec![],
        }
    }

    /// Set the inversion mask.
    #[must_use]
    pub fn with_invert_mask(mut self, mask: Vec<bool>) -> Self {
        self.invert_mask = mask;
        self
    }

    /// Whether the bit at operand position `index` is inverted.
    pub fn is_inverted(&self, index: usize) -> bool {
        self.invert_mask.get(index).copied().unwrap_or(false)
    }
}

/// A user gate, optionally expanded into other gates on local qubit
/// indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Decomposition as `(gate, local qubit indices)` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decomposition: Option<Vec<(Gate, Vec<usize>)>>,
}

impl CustomGate {
    /// Create an opaque custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            decomposition: None,
        }
    }

    /// Attach a decomposition.
    #[must_use]
    pub fn with_decomposition(mut self, decomposition: Vec<(Gate, Vec<usize>)>) -> Self {
        self.decomposition = Some(decomposition);
        self
    }
}

/// A quantum gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Identity on `num_qubits` qubits.
    Identity {
        /// Number of qubits.
        num_qubits: u32,
    },
    /// Power of Pauli X.
    XPow(PowGate),
    /// Power of Pauli Y.
    YPow(PowGate),
    /// Power of Pauli Z.
    ZPow(PowGate),
    /// Power of Hadamard.
    HPow(PowGate),
    /// Power of controlled Z.
    CZPow(PowGate),
    /// Power of controlled X.
    CXPow(PowGate),
    /// Power of X⊗X.
    XXPow(PowGate),
    /// Power of Y⊗Y.
    YYPow(PowGate),
    /// Power of Z⊗Z.
    ZZPow(PowGate),
    /// Power of SWAP.
    SwapPow(PowGate),
    /// Power of iSWAP.
    ISwapPow(PowGate),
    /// X power conjugated by a Z rotation.
    PhasedXPow {
        /// Phase of the rotation axis, in half turns.
        phase_exponent: ParameterExpression,
        /// Exponent of the X power.
        exponent: ParameterExpression,
        /// Global phase shift, in half turns.
        global_shift: f64,
    },
    /// `Z^z · Z^a · X^x · Z^-a`.
    PhasedXZ {
        /// X exponent.
        x_exponent: ParameterExpression,
        /// Z exponent.
        z_exponent: ParameterExpression,
        /// Axis phase exponent.
        axis_phase_exponent: ParameterExpression,
    },
    /// iSWAP power conjugated by opposite Z rotations.
    PhasedISwapPow {
        /// Phase exponent.
        phase_exponent: ParameterExpression,
        /// Exponent of the iSWAP power.
        exponent: ParameterExpression,
    },
    /// Fermionic simulation gate.
    FSim {
        /// Swap angle, in radians.
        theta: ParameterExpression,
        /// Controlled phase angle, in radians.
        phi: ParameterExpression,
    },
    /// Explicit unitary.
    Matrix(MatrixGate),
    /// Measurement.
    Measurement(MeasurementGate),
    /// Power of doubly controlled Z.
    CCZPow(PowGate),
    /// Power of doubly controlled X (Toffoli).
    CCXPow(PowGate),
    /// Controlled SWAP (Fredkin).
    CSwap,
    /// User-defined gate.
    Custom(CustomGate),
}

impl Gate {
    /// Single-qubit identity.
    pub fn i() -> Self {
        Gate::Identity { num_qubits: 1 }
    }

    /// Pauli X.
    pub fn x() -> Self {
        Gate::XPow(PowGate::new(1.0))
    }

    /// Pauli Y.
    pub fn y() -> Self {
        Gate::YPow(PowGate::new(1.0))
    }

    /// Pauli Z.
    pub fn z() -> Self {
        Gate::ZPow(PowGate::new(1.0))
    }

    /// Hadamard.
    pub fn h() -> Self {
        Gate::HPow(PowGate::new(1.0))
    }

    /// S = Z^0.5.
    pub fn s() -> Self {
        Gate::ZPow(PowGate::new(0.5))
    }

    /// T = Z^0.25.
    pub fn t() -> Self {
        Gate::ZPow(PowGate::new(0.25))
    }

    /// Controlled Z.
    pub fn cz() -> Self {
        Gate::CZPow(PowGate::new(1.0))
    }

    /// Controlled NOT.
    pub fn cnot() -> Self {
        Gate::CXPow(PowGate::new(1.0))
    }

    /// SWAP.
    pub fn swap() -> Self {
        Gate::SwapPow(PowGate::new(1.0))
    }

    /// iSWAP.
    pub fn iswap() -> Self {
        Gate::ISwapPow(PowGate::new(1.0))
    }

    /// Toffoli.
    pub fn ccx() -> Self {
        Gate::CCXPow(PowGate::new(1.0))
    }

    /// Doubly controlled Z.
    pub fn ccz() -> Self {
        Gate::CCZPow(PowGate::new(1.0))
    }

    /// Fredkin.
    pub fn cswap() -> Self {
        Gate::CSwap
    }

    /// X rotation by `rads` radians.
    pub fn rx(rads: impl Into<ParameterExpression>) -> Self {
        Gate::XPow(PowGate::shifted(half_turns(rads), -0.5))
    }

    /// Y rotation by `rads` radians.
    pub fn ry(rads: impl Into<ParameterExpression>) -> Self {
        Gate::YPow(PowGate::shifted(half_turns(rads), -0.5))
    }

    /// Z rotation by `rads` radians.
    pub fn rz(rads: impl Into<ParameterExpression>) -> Self {
        Gate::ZPow(PowGate::shifted(half_turns(rads), -0.5))
    }

    /// Fermionic simulation gate.
    pub fn fsim(theta: impl Into<ParameterExpression>, phi: impl Into<ParameterExpression>) -> Self {
        Gate::FSim {
            theta: theta.into(),
            phi: phi.into(),
        }
    }

    /// Measurement of `num_qubits` qubits under `key`.
    pub fn measure(key: impl Into<String>, num_qubits: u32) -> Self {
        Gate::Measurement(MeasurementGate::new(key, num_qubits))
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        match self {
            Gate::Identity { .. } => "I",
            Gate::XPow(_) => "XPow",
            Gate::YPow(_) => "YPow",
            Gate::ZPow(_) => "ZPow",
            Gate::HPow(_) => "HPow",
            Gate::CZPow(_) => "CZPow",
            Gate::CXPow(_) => "CXPow",
            Gate::XXPow(_) => "XXPow",
            Gate::YYPow(_) => "YYPow",
            Gate::ZZPow(_) => "ZZPow",
            Gate::SwapPow(_) => "SwapPow",
            Gate::ISwapPow(_) => "ISwapPow",
            Gate::PhasedXPow { .. } => "PhasedXPow",
            Gate::PhasedXZ { .. } => "PhasedXZ",
            Gate::PhasedISwapPow { .. } => "PhasedISwapPow",
            Gate::FSim { .. } => "FSim",
            Gate::Matrix(_) => "Matrix",
            Gate::Measurement(_) => "Measure",
            Gate::CCZPow(_) => "CCZPow",
            Gate::CCXPow(_) => "CCXPow",
            Gate::CSwap => "CSwap",
            Gate::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits this gate operates on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Identity { num_qubits } => *num_qubits,
            Gate::XPow(_)
            | Gate::YPow(_)
            | Gate::ZPow(_)
            | Gate::HPow(_)
            | Gate::PhasedXPow { .. }
            | Gate::PhasedXZ { .. } => 1,
            Gate::CZPow(_)
            | Gate::CXPow(_)
            | Gate::XXPow(_)
            | Gate::YYPow(_)
            | Gate::ZZPow(_)
            | Gate::SwapPow(_)
            | Gate::ISwapPow(_)
            | Gate::PhasedISwapPow { .. }
            | Gate::FSim { .. } => 2,
            Gate::CCZPow(_) | Gate::CCXPow(_) | Gate::CSwap => 3,
            Gate::Matrix(m) => m.num_qubits(),
            Gate::Measurement(m) => m.num_qubits,
            Gate::Custom(g) => g.num_qubits,
        }
    }

    /// The power-gate part of this gate, if it is a power gate.
    pub fn as_pow(&self) -> Option<&PowGate> {
        match self {
            Gate::XPow(p)
            | Gate::YPow(p)
            | Gate::ZPow(p)
            | Gate::HPow(p)
            | Gate::CZPow(p)
            | Gate::CXPow(p)
            | Gate::XXPow(p)
            | Gate::YYPow(p)
            | Gate::ZZPow(p)
            | Gate::SwapPow(p)
            | Gate::ISwapPow(p)
            | Gate::CCZPow(p)
            | Gate::CCXPow(p) => Some(p),
            _ => None,
        }
    }

    /// The measurement gate, if this is one.
    pub fn as_measurement(&self) -> Option<&MeasurementGate> {
        match self {
            Gate::Measurement(m) => Some(m),
            _ => None,
        }
    }

    /// Whether this gate is a measurement.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measurement(_))
    }

    /// The symbolic parameters of this gate with their names.
    fn named_parameters(&self) -> Vec<(&'static str, &ParameterExpression)> {
        match self {
            Gate::PhasedXPow {
                phase_exponent,
                exponent,
                ..
            } => vec![("phase_exponent", phase_exponent), ("exponent", exponent)],
            Gate::PhasedXZ {
                x_exponent,
                z_exponent,
                axis_phase_exponent,
            } => vec![
                ("x_exponent", x_exponent),
                ("z_exponent", z_exponent),
                ("axis_phase_exponent", axis_phase_exponent),
            ],
            Gate::PhasedISwapPow {
                phase_exponent,
                exponent,
            } => vec![("phase_exponent", phase_exponent), ("exponent", exponent)],
            Gate::FSim { theta, phi } => vec![("theta", theta), ("phi", phi)],
            other => other
                .as_pow()
                .map(|p| vec![("exponent", &p.exponent)])
                .unwrap_or_default(),
        }
    }

    /// Check if any parameter of this gate is symbolic.
    pub fn is_parameterized(&self) -> bool {
        match self {
            Gate::Custom(CustomGate {
                decomposition: Some(parts),
                ..
            }) => parts.iter().any(|(g, _)| g.is_parameterized()),
            _ => self.named_parameters().iter().any(|(_, p)| p.is_symbolic()),
        }
    }

    /// Numeric parameters handed to the engine, by name.
    ///
    /// Fails with [`IrError::UnboundParameter`] if a symbol is left.
    pub fn numeric_params(&self) -> IrResult<Vec<(&'static str, f64)>> {
        let mut params = self
            .named_parameters()
            .into_iter()
            .map(|(name, p)| Ok((name, p.try_f64()?)))
            .collect::<IrResult<Vec<_>>>()?;
        match self {
            Gate::PhasedXPow { global_shift, .. } => params.push(("global_shift", *global_shift)),
            other => {
                if let Some(p) = other.as_pow() {
                    params.push(("global_shift", p.global_shift));
                }
            }
        }
        Ok(params)
    }

    /// Substitute parameter values from a resolver.
    pub fn resolve_parameters(&self, resolver: &ParamResolver) -> Self {
        let r = |p: &ParameterExpression| p.resolve(resolver);
        match self {
            Gate::XPow(p) => Gate::XPow(p.resolve(resolver)),
            Gate::YPow(p) => Gate::YPow(p.resolve(resolver)),
            Gate::ZPow(p) => Gate::ZPow(p.resolve(resolver)),
            Gate::HPow(p) => Gate::HPow(p.resolve(resolver)),
            Gate::CZPow(p) => Gate::CZPow(p.resolve(resolver)),
            Gate::CXPow(p) => Gate::CXPow(p.resolve(resolver)),
            Gate::XXPow(p) => Gate::XXPow(p.resolve(resolver)),
            Gate::YYPow(p) => Gate::YYPow(p.resolve(resolver)),
            Gate::ZZPow(p) => Gate::ZZPow(p.resolve(resolver)),
            Gate::SwapPow(p) => Gate::SwapPow(p.resolve(resolver)),
            Gate::ISwapPow(p) => Gate::ISwapPow(p.resolve(resolver)),
            Gate::CCZPow(p) => Gate::CCZPow(p.resolve(resolver)),
            Gate::CCXPow(p) => Gate::CCXPow(p.resolve(resolver)),
            Gate::PhasedXPow {
                phase_exponent,
                exponent,
                global_shift,
            } => Gate::PhasedXPow {
                phase_exponent: r(phase_exponent),
                exponent: r(exponent),
                global_shift: *global_shift,
            },
            Gate::PhasedXZ {
                x_exponent,
                z_exponent,
                axis_phase_exponent,
            } => Gate::PhasedXZ {
                x_exponent: r(x_exponent),
                z_exponent: r(z_exponent),
                axis_phase_exponent: r(axis_phase_exponent),
            },
            Gate::PhasedISwapPow {
                phase_exponent,
                exponent,
            } => Gate::PhasedISwapPow {
                phase_exponent: r(phase_exponent),
                exponent: r(exponent),
            },
            Gate::FSim { theta, phi } => Gate::FSim {
                theta: r(theta),
                phi: r(phi),
            },
            Gate::Custom(custom) => Gate::Custom(CustomGate {
                name: custom.name.clone(),
                num_qubits: custom.num_qubits,
                decomposition: custom.decomposition.as_ref().map(|parts| {
                    parts
                        .iter()
                        .map(|(g, qs)| (g.resolve_parameters(resolver), qs.clone()))
                        .collect()
                }),
            }),
            Gate::Identity { .. } | Gate::Matrix(_) | Gate::Measurement(_) | Gate::CSwap => {
                self.clone()
            }
        }
    }
}

fn half_turns(rads: impl Into<ParameterExpression>) -> ParameterExpression {
    let rads = rads.into();
    match rads.as_f64() {
        Some(v) => ParameterExpression::Constant(v / std::f64::consts::PI),
        None => rads / ParameterExpression::Pi,
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Identity { num_qubits } => write!(f, "I({num_qubits})"),
            Gate::Measurement(m) => write!(f, "Measure('{}')", m.key),
            Gate::FSim { theta, phi } => write!(f, "FSim({theta}, {phi})"),
            other => match other.as_pow() {
                Some(p) if p.exponent.is_exactly(1.0) => {
                    write!(f, "{}", other.name().trim_end_matches("Pow"))
                }
                Some(p) => write!(f, "{}**{}", other.name().trim_end_matches("Pow"), p.exponent),
                None => write!(f, "{}", other.name()),
            },
        }
    }
}
