// src/circuit.rs
//! Tree-shaped probabilistic circuits over fitted univariate distributions.
//!
//! A circuit node is a fitted `Mixture`, a discrete `Categorical`, or a
//! decomposable product of independent sub-circuits. Evaluation maps
//! variable names to observed `Evidence` and returns a joint log likelihood.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::nyga::Mixture;
use crate::variable::Variable;
use crate::{NygaError, NygaResult};

/// A discrete distribution over integer-coded outcomes.
///
/// Symbolic domains are expected to be coded to integers by the caller;
/// unknown outcomes carry zero mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorical {
    variable: Variable,
    probabilities: BTreeMap<i64, f64>,
}

impl Categorical {
    pub fn new(variable: Variable, probabilities: BTreeMap<i64, f64>) -> NygaResult<Self> {
        if probabilities.values().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(NygaError::InvalidParameter {
                what: "categorical mass must be finite and >= 0",
            });
        }
        Ok(Categorical {
            variable,
            probabilities,
        })
    }

    #[inline]
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn pmf(&self, value: i64) -> f64 {
        self.probabilities.get(&value).copied().unwrap_or(0.0)
    }

    pub fn log_likelihood(&self, value: i64) -> f64 {
        self.pmf(value).ln()
    }

    /// Outcomes with positive mass, ascending.
    pub fn support(&self) -> Vec<i64> {
        self.probabilities
            .iter()
            .filter(|(_, &p)| p > 0.0)
            .map(|(&v, _)| v)
            .collect()
    }
}

/// One observed value for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Evidence {
    Real(f64),
    Symbol(i64),
}

/// A circuit node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Mixture(Mixture),
    Categorical(Categorical),
    Product(ProductUnit),
}

impl Node {
    /// Joint log likelihood of the evidence under this subtree.
    pub fn log_likelihood(&self, event: &BTreeMap<String, Evidence>) -> NygaResult<f64> {
        match self {
            Node::Mixture(mixture) => match event.get(mixture.variable().name()) {
                Some(Evidence::Real(v)) => mixture.log_likelihood(*v),
                Some(Evidence::Symbol(_)) => Err(NygaError::EvidenceMismatch {
                    expected: "a real value for a continuous factor",
                }),
                None => Err(NygaError::EvidenceMismatch {
                    expected: "an assignment for every circuit variable",
                }),
            },
            Node::Categorical(categorical) => match event.get(categorical.variable().name()) {
                Some(Evidence::Symbol(v)) => Ok(categorical.log_likelihood(*v)),
                Some(Evidence::Real(_)) => Err(NygaError::EvidenceMismatch {
                    expected: "a symbol for a discrete factor",
                }),
                None => Err(NygaError::EvidenceMismatch {
                    expected: "an assignment for every circuit variable",
                }),
            },
            Node::Product(product) => product.log_likelihood(event),
        }
    }

    /// The distinct variable names of this subtree.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Node::Mixture(m) => {
                out.insert(m.variable().name().to_string());
            }
            Node::Categorical(c) => {
                out.insert(c.variable().name().to_string());
            }
            Node::Product(p) => {
                for factor in &p.factors {
                    factor.collect_variables(out);
                }
            }
        }
    }
}

/// A decomposable product: factors over independent variables, evaluated as
/// the sum of their log likelihoods.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductUnit {
    factors: Vec<Node>,
}

impl ProductUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_factor(&mut self, factor: Node) {
        self.factors.push(factor);
    }

    #[inline]
    pub fn factors(&self) -> &[Node] {
        &self.factors
    }

    pub fn log_likelihood(&self, event: &BTreeMap<String, Evidence>) -> NygaResult<f64> {
        let mut total = 0.0;
        for factor in &self.factors {
            total += factor.log_likelihood(event)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nyga::test_helpers::{assert_close, assert_point};
    use crate::nyga::Nyga;

    fn coin() -> Categorical {
        let mut table = BTreeMap::new();
        table.insert(0, 0.25);
        table.insert(1, 0.75);
        table.insert(2, 0.0);
        Categorical::new(Variable::new("side"), table).unwrap()
    }

    fn event(pairs: &[(&str, Evidence)]) -> BTreeMap<String, Evidence> {
        pairs
            .iter()
            .map(|(name, e)| (name.to_string(), *e))
            .collect()
    }

    #[test]
    fn categorical_mass_and_support() {
        let c = coin();
        assert_point("pmf known", 0.75, c.pmf(1));
        assert_point("pmf unknown", 0.0, c.pmf(7));
        assert_eq!(c.log_likelihood(7), f64::NEG_INFINITY);
        assert_eq!(c.support(), vec![0, 1]);
    }

    #[test]
    fn categorical_rejects_bad_mass() {
        let mut table = BTreeMap::new();
        table.insert(0, -0.1);
        assert!(matches!(
            Categorical::new(Variable::new("side"), table).unwrap_err(),
            NygaError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn product_sums_factor_log_likelihoods() {
        let mixture = Nyga::with_parameters(Variable::new("x"), 4, 0.01)
            .fit(vec![1.0, 2.0, 3.0, 4.0, 7.0, 9.0])
            .unwrap();

        let mut product = ProductUnit::new();
        product.add_factor(Node::Mixture(mixture));
        product.add_factor(Node::Categorical(coin()));
        let circuit = Node::Product(product);

        let e = event(&[("x", Evidence::Real(4.0)), ("side", Evidence::Symbol(1))]);
        // Single uniform over [1, 9] times pmf(1).
        let expected = -(8.0f64.ln()) + 0.75f64.ln();
        assert_close("joint", expected, circuit.log_likelihood(&e).unwrap(), 1e-12);

        let vars: Vec<String> = circuit.variables().into_iter().collect();
        assert_eq!(vars, vec!["side".to_string(), "x".to_string()]);
    }

    #[test]
    fn zero_mass_factor_drives_the_product_to_negative_infinity() {
        let mut product = ProductUnit::new();
        product.add_factor(Node::Categorical(coin()));
        let e = event(&[("side", Evidence::Symbol(2))]);
        assert_eq!(
            product.log_likelihood(&e).unwrap(),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn missing_or_mistyped_evidence_is_rejected() {
        let circuit = Node::Categorical(coin());
        assert!(matches!(
            circuit.log_likelihood(&event(&[])).unwrap_err(),
            NygaError::EvidenceMismatch { .. }
        ));
        assert!(matches!(
            circuit
                .log_likelihood(&event(&[("side", Evidence::Real(1.0))]))
                .unwrap_err(),
            NygaError::EvidenceMismatch { .. }
        ));
    }

    #[test]
    fn products_nest() {
        let mut inner = ProductUnit::new();
        inner.add_factor(Node::Categorical(coin()));
        let mut outer = ProductUnit::new();
        outer.add_factor(Node::Product(inner));
        let e = event(&[("side", Evidence::Symbol(0))]);
        assert_close(
            "nested",
            0.25f64.ln(),
            outer.log_likelihood(&e).unwrap(),
            1e-12,
        );
    }
}
