//! Piecewise-uniform mixture induction.
//!
//! `Nyga` holds the induction parameters and fits a `Mixture`: a normalized
//! weighted sum of uniform quantiles whose supports tile the observed data
//! range. A sample with a single distinct value collapses to one `Dirac`.

pub(crate) mod induction;
pub mod leaves;
mod likelihood;
pub mod test_helpers;

use std::collections::VecDeque;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::nyga::induction::{Expansion, Frame, Inducer, SampleTable};
use crate::nyga::leaves::{Dirac, Leaf};
use crate::variable::Variable;
use crate::{NygaError, NygaResult};

/// One weighted mixture component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Component {
    weight: f64,
    leaf: Leaf,
}

impl Component {
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn leaf(&self) -> &Leaf {
        &self.leaf
    }
}

/// A fitted mixture: the variable it models and its components in ascending
/// support order. Frozen once `fit` returns; queries never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mixture {
    variable: Variable,
    components: Vec<Component>,
}

impl Mixture {
    fn new(variable: Variable) -> Self {
        Mixture {
            variable,
            components: Vec::new(),
        }
    }

    /// Append one component. Induction-internal; weights are raw sample
    /// counts until the final normalization pass.
    pub(crate) fn add(&mut self, weight: f64, leaf: Leaf) {
        assert!(
            weight > 0.0,
            "mixture component weight must be positive"
        );
        self.components.push(Component { weight, leaf });
    }

    /// Normalize weights by the total sample count and order components by
    /// support. Called once, after the induction queue drains.
    fn freeze(&mut self, total_samples: u64) {
        let n = total_samples as f64;
        for component in &mut self.components {
            component.weight /= n;
        }
        self.components
            .sort_by(|a, b| a.leaf.support().lower().total_cmp(&b.leaf.support().lower()));
        debug_assert!(
            self.components
                .windows(2)
                .all(|w| w[0].leaf.support().upper() == w[1].leaf.support().lower()),
            "quantile supports must tile the data range"
        );
    }

    #[inline]
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Induction parameters plus the variable the fit will model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nyga {
    variable: Variable,
    min_samples_per_quantile: usize,
    min_likelihood_improvement: f64,
}

impl Nyga {
    /// Defaults: at least one unique sample per quantile, 10% minimum
    /// relative likelihood gain per accepted split.
    pub fn new(variable: Variable) -> Self {
        Self::with_parameters(variable, 1, 0.1)
    }

    pub fn with_parameters(
        variable: Variable,
        min_samples_per_quantile: usize,
        min_likelihood_improvement: f64,
    ) -> Self {
        Nyga {
            variable,
            min_samples_per_quantile,
            min_likelihood_improvement,
        }
    }

    #[inline]
    pub fn min_samples_per_quantile(&self) -> usize {
        self.min_samples_per_quantile
    }

    #[inline]
    pub fn min_likelihood_improvement(&self) -> f64 {
        self.min_likelihood_improvement
    }

    /// Fit a mixture to `samples`.
    ///
    /// Sorts and deduplicates the sample, then greedily partitions the
    /// distinct values into adjacent quantiles while each split improves the
    /// log likelihood by more than `ln(1 + min_likelihood_improvement)`.
    pub fn fit(&self, samples: Vec<f64>) -> NygaResult<Mixture> {
        if samples.is_empty() {
            return Err(NygaError::EmptyInput);
        }
        if self.min_samples_per_quantile == 0 {
            return Err(NygaError::InvalidParameter {
                what: "min_samples_per_quantile must be >= 1",
            });
        }
        if !(self.min_likelihood_improvement >= 0.0) {
            return Err(NygaError::InvalidParameter {
                what: "min_likelihood_improvement must be >= 0",
            });
        }
        if samples.iter().any(|v| !v.is_finite()) {
            return Err(NygaError::NonFiniteInput {
                context: "sample value",
            });
        }

        let mut sorted: Vec<OrderedFloat<f64>> =
            samples.into_iter().map(OrderedFloat::from).collect();
        sorted.sort();
        let sorted: Vec<f64> = sorted.into_iter().map(|f| f.into_inner()).collect();

        let table = SampleTable::from_sorted(&sorted);
        let mut result = Mixture::new(self.variable.clone());

        // All samples equal: a point mass, already normalized.
        if table.len() == 1 {
            result.add(1.0, Leaf::Dirac(Dirac::new(table.value(0))));
            return Ok(result);
        }

        let inducer = Inducer::new(
            &table,
            self.min_samples_per_quantile,
            self.min_likelihood_improvement,
        );

        let mut pending: VecDeque<Frame> = VecDeque::new();
        pending.push_back(Frame {
            begin: 0,
            end: table.len(),
        });
        while let Some(frame) = pending.pop_front() {
            match inducer.expand(frame) {
                Expansion::Split(left, right) => {
                    pending.push_back(left);
                    pending.push_back(right);
                }
                Expansion::Leaf { weight, uniform } => {
                    result.add(weight as f64, Leaf::Uniform(uniform));
                }
            }
        }

        result.freeze(table.total());
        Ok(result)
    }
}
