//! Parameter sweeps.
//!
//! A [`Sweep`] describes a list of [`ParamResolver`]s. Sweeps compose: a
//! [`Sweep::Zip`] walks its factors in lockstep, a [`Sweep::Product`] takes
//! the cartesian product with the last factor varying fastest.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::parameter::ParamResolver;

/// A description of the parameter values to run a circuit with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Sweep {
    /// A single empty resolver.
    Unit,
    /// Explicit values for one symbol.
    Points {
        /// Symbol name.
        key: String,
        /// Values to assign, in order.
        values: Vec<f64>,
    },
    /// Evenly spaced values for one symbol, both endpoints included.
    Linspace {
        /// Symbol name.
        key: String,
        /// First value.
        start: f64,
        /// Last value.
        stop: f64,
        /// Number of values.
        length: usize,
    },
    /// Lockstep combination of equally long sweeps.
    Zip(Vec<Sweep>),
    /// Cartesian product of sweeps.
    Product(Vec<Sweep>),
}

impl Sweep {
    /// Create a sweep over explicit points.
    pub fn points(key: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Sweep::Points {
            key: key.into(),
            values: values.into_iter().collect(),
        }
    }

    /// Create a linearly spaced sweep.
    pub fn linspace(key: impl Into<String>, start: f64, stop: f64, length: usize) -> Self {
        Sweep::Linspace {
            key: key.into(),
            start,
            stop,
            length,
        }
    }

    /// Number of resolvers this sweep expands to.
    pub fn len(&self) -> usize {
        match self {
            Sweep::Unit => 1,
            Sweep::Points { values, .. } => values.len(),
            Sweep::Linspace { length, .. } => *length,
            Sweep::Zip(parts) => parts.iter().map(Sweep::len).min().unwrap_or(1),
            Sweep::Product(parts) => parts.iter().map(Sweep::len).product(),
        }
    }

    /// Whether this sweep expands to no resolvers at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbol names assigned by this sweep.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Sweep::Unit => vec![],
            Sweep::Points { key, .. } | Sweep::Linspace { key, .. } => vec![key.as_str()],
            Sweep::Zip(parts) | Sweep::Product(parts) => {
                parts.iter().flat_map(Sweep::keys).collect()
            }
        }
    }

    /// Expand into the list of resolvers.
    pub fn to_resolvers(&self) -> IrResult<Vec<ParamResolver>> {
        match self {
            Sweep::Unit => Ok(vec![ParamResolver::new()]),
            Sweep::Points { key, values } => Ok(values
                .iter()
                .map(|&v| ParamResolver::new().with(key.clone(), v))
                .collect()),
            Sweep::Linspace {
                key,
                start,
                stop,
                length,
            } => Ok((0..*length)
                .map(|i| {
                    let value = if *length == 1 {
                        *start
                    } else {
                        let p = i as f64 / (*length - 1) as f64;
                        start * (1.0 - p) + stop * p
                    };
                    ParamResolver::new().with(key.clone(), value)
                })
                .collect()),
            Sweep::Zip(parts) => {
                if parts.is_empty() {
                    return Ok(vec![ParamResolver::new()]);
                }
                let expanded = parts
                    .iter()
                    .map(Sweep::to_resolvers)
                    .collect::<IrResult<Vec<_>>>()?;
                let lengths: Vec<usize> = expanded.iter().map(Vec::len).collect();
                if lengths.windows(2).any(|w| w[0] != w[1]) {
                    return Err(IrError::SweepLengthMismatch(lengths));
                }
                Ok((0..lengths[0])
                    .map(|i| merge(expanded.iter().map(|list| &list[i])))
                    .collect())
            }
            Sweep::Product(parts) => {
                let mut acc = vec![ParamResolver::new()];
                for part in parts {
                    let factor = part.to_resolvers()?;
                    acc = acc
                        .iter()
                        .flat_map(|outer| factor.iter().map(move |inner| merge([outer, inner])))
                        .collect();
                }
                Ok(acc)
            }
        }
    }
}

fn merge<'a>(resolvers: impl IntoIterator<Item = &'a ParamResolver>) -> ParamResolver {
    let mut merged = ParamResolver::new();
    for resolver in resolvers {
        for (k, v) in resolver.iter() {
            merged.set(k, v);
        }
    }
    merged
}

/// Anything a simulator can sweep over.
#[derive(Debug, Clone, PartialEq)]
pub enum Sweepable {
    /// One resolver.
    Resolver(ParamResolver),
    /// An explicit list of resolvers.
    Resolvers(Vec<ParamResolver>),
    /// A sweep description.
    Sweep(Sweep),
}

impl Sweepable {
    /// Expand into the list of resolvers.
    pub fn to_resolvers(&self) -> IrResult<Vec<ParamResolver>> {
        match self {
            Sweepable::Resolver(r) => Ok(vec![r.clone()]),
            Sweepable::Resolvers(list) => Ok(list.clone()),
            Sweepable::Sweep(sweep) => sweep.to_resolvers(),
        }
    }
}

impl Default for Sweepable {
    fn default() -> Self {
        Sweepable::Sweep(Sweep::Unit)
    }
}

impl From<ParamResolver> for Sweepable {
    fn from(r: ParamResolver) -> Self {
        Sweepable::Resolver(r)
    }
}

impl From<Vec<ParamResolver>> for Sweepable {
    fn from(list: Vec<ParamResolver>) -> Self {
        Sweepable::Resolvers(list)
    }
}

impl From<Sweep> for Sweepable {
    fn from(sweep: Sweep) -> Self {
        Sweepable::Sweep(sweep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(resolvers: &[ParamResolver], key: &str) -> Vec<f64> {
        resolvers.iter().filter_map(|r| r.value_of(key)).collect()
    }

    #[test]
    fn test_linspace() {
        let resolvers = Sweep::linspace("t", 0.0, 1.0, 5).to_resolvers().unwrap();
        assert_eq!(values(&resolvers, "t"), vec![0.0, 0.25, 0.5, 0.75, 1.0]);

        let single = Sweep::linspace("t", 3.0, 9.0, 1).to_resolvers().unwrap();
        assert_eq!(values(&single, "t"), vec![3.0]);
    }

    #[test]
    fn test_product_varies_last_fastest() {
        let sweep = Sweep::Product(vec![
            Sweep::points("a", [0.0, 1.0]),
            Sweep::points("b", [10.0, 20.0, 30.0]),
        ]);
        assert_eq!(sweep.len(), 6);
        let resolvers = sweep.to_resolvers().unwrap();
        assert_eq!(values(&resolvers, "a"), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            values(&resolvers, "b"),
            vec![10.0, 20.0, 30.0, 10.0, 20.0, 30.0]
        );
    }

    #[test]
    fn test_zip() {
        let sweep = Sweep::Zip(vec![
            Sweep::points("a", [0.0, 1.0]),
            Sweep::linspace("b", 0.0, 2.0, 2),
        ]);
        let resolvers = sweep.to_resolvers().unwrap();
        assert_eq!(resolvers.len(), 2);
        assert_eq!(resolvers[1].value_of("a"), Some(1.0));
        assert_eq!(resolvers[1].value_of("b"), Some(2.0));
        assert_eq!(sweep.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_zip_length_mismatch() {
        let sweep = Sweep::Zip(vec![
            Sweep::points("a", [0.0, 1.0]),
            Sweep::points("b", [0.0]),
        ]);
        assert!(matches!(
            sweep.to_resolvers(),
            Err(IrError::SweepLengthMismatch(lengths)) if lengths == vec![2, 1]
        ));
    }

    #[test]
    fn test_sweepable_conversions() {
        let one: Sweepable = ParamResolver::new().with("x", 1.0).into();
        assert_eq!(one.to_resolvers().unwrap().len(), 1);

        let unit = Sweepable::default();
        assert_eq!(unit.to_resolvers().unwrap(), vec![ParamResolver::new()]);
    }
}
