//! Qubit identifiers and qubit orderings.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{IrError, IrResult};

/// A qubit identifier.
///
/// Qubits are totally ordered: line qubits by index, then grid qubits by
/// `(row, col)`, then named qubits by name. The default qubit order of a
/// circuit is this ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Qubit {
    /// A qubit on a line, addressed by position.
    Line(i32),
    /// A qubit on a 2D grid.
    Grid {
        /// Row of the qubit.
        row: i32,
        /// Column of the qubit.
        col: i32,
    },
    /// A qubit identified only by name.
    Named(String),
}

impl Qubit {
    /// Create a line qubit.
    pub fn line(index: i32) -> Self {
        Qubit::Line(index)
    }

    /// Create `count` consecutive line qubits starting at 0.
    pub fn line_range(count: i32) -> Vec<Self> {
        (0..count).map(Qubit::Line).collect()
    }

    /// Create a grid qubit.
    pub fn grid(row: i32, col: i32) -> Self {
        Qubit::Grid { row, col }
    }

    /// Create a named qubit.
    pub fn named(name: impl Into<String>) -> Self {
        Qubit::Named(name.into())
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qubit::Line(i) => write!(f, "q({i})"),
            Qubit::Grid { row, col } => write!(f, "q({row}, {col})"),
            Qubit::Named(name) => write!(f, "{name}"),
        }
    }
}

impl From<i32> for Qubit {
    fn from(index: i32) -> Self {
        Qubit::Line(index)
    }
}

/// How the qubits of a circuit are laid out along the basis-state index.
///
/// The first qubit of the resolved order is the most significant bit of a
/// basis-state index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QubitOrder {
    /// Ascending qubit order.
    #[default]
    Default,
    /// A fixed order. Every circuit qubit must appear in it.
    Explicit(Vec<Qubit>),
}

impl QubitOrder {
    /// Resolve the order for a set of qubits.
    pub fn order_for<'a>(&self, qubits: impl IntoIterator<Item = &'a Qubit>) -> IrResult<Vec<Qubit>> {
        match self {
            QubitOrder::Default => {
                let sorted: BTreeSet<&Qubit> = qubits.into_iter().collect();
                Ok(sorted.into_iter().cloned().collect())
            }
            QubitOrder::Explicit(fixed) => {
                let mut seen = FxHashSet::default();
                for q in fixed {
                    if !seen.insert(q) {
                        return Err(IrError::DuplicateQubit {
                            qubit: q.clone(),
                            gate_name: None,
                        });
                    }
                }
                for q in qubits {
                    if !seen.contains(q) {
                        return Err(IrError::QubitNotInOrder(q.clone()));
                    }
                }
                Ok(fixed.clone())
            }
        }
    }
}

impl From<Vec<Qubit>> for QubitOrder {
    fn from(qubits: Vec<Qubit>) -> Self {
        QubitOrder::Explicit(qubits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", Qubit::line(3)), "q(3)");
        assert_eq!(format!("{}", Qubit::grid(1, 2)), "q(1, 2)");
        assert_eq!(format!("{}", Qubit::named("anc")), "anc");
    }

    #[test]
    fn test_qubit_ordering() {
        let mut qubits = vec![
            Qubit::named("a"),
            Qubit::grid(0, 1),
            Qubit::line(2),
            Qubit::grid(0, 0),
            Qubit::line(-1),
        ];
        qubits.sort();
        assert_eq!(
            qubits,
            vec![
                Qubit::line(-1),
                Qubit::line(2),
                Qubit::grid(0, 0),
                Qubit::grid(0, 1),
                Qubit::named("a"),
            ]
        );
    }

    #[test]
    fn test_default_order_sorts_and_dedups() {
        let qubits = [Qubit::line(2), Qubit::line(0), Qubit::line(2)];
        let order = QubitOrder::Default.order_for(qubits.iter()).unwrap();
        assert_eq!(order, vec![Qubit::line(0), Qubit::line(2)]);
    }

    #[test]
    fn test_explicit_order() {
        let order = QubitOrder::Explicit(vec![Qubit::line(1), Qubit::line(0), Qubit::line(5)]);
        let resolved = order
            .order_for([Qubit::line(0), Qubit::line(1)].iter())
            .unwrap();
        assert_eq!(resolved, vec![Qubit::line(1), Qubit::line(0), Qubit::line(5)]);

        let err = order.order_for([Qubit::line(3)].iter()).unwrap_err();
        assert!(matches!(err, IrError::QubitNotInOrder(q) if q == Qubit::line(3)));
    }

    #[test]
    fn test_explicit_order_rejects_duplicates() {
        let order = QubitOrder::Explicit(vec![Qubit::line(0), Qubit::line(0)]);
        assert!(matches!(
            order.order_for([Qubit::line(0)].iter()),
            Err(IrError::DuplicateQubit { .. })
        ));
    }
}
