// src/nyga/likelihood.rs
//! Likelihood queries on a frozen mixture.

use crate::interval::Interval;
use crate::nyga::Mixture;
use crate::{NygaError, NygaResult};

impl Mixture {
    /// `ln Σ w_i · pdf_i(value)`, computed in log space.
    ///
    /// Total over all reals: values outside every support yield `−∞`, a hit
    /// on an uncapped point mass yields `+∞`.
    pub fn log_likelihood(&self, value: f64) -> NygaResult<f64> {
        if self.is_empty() {
            return Err(NygaError::EmptyMixture);
        }

        let mut top = f64::NEG_INFINITY;
        for component in self.components() {
            let term = component.weight().ln() + component.leaf().log_pdf(value);
            if term > top {
                top = term;
            }
        }
        if top == f64::NEG_INFINITY || top == f64::INFINITY {
            return Ok(top);
        }

        let mut acc = 0.0;
        for component in self.components() {
            let term = component.weight().ln() + component.leaf().log_pdf(value);
            acc += (term - top).exp();
        }
        Ok(top + acc.ln())
    }

    /// `Σ w_i · pdf_i(value)`; zero outside every support.
    pub fn likelihood(&self, value: f64) -> NygaResult<f64> {
        Ok(self.log_likelihood(value)?.exp())
    }

    /// Evaluate `log_likelihood` over a slice of query values.
    pub fn log_likelihoods(&self, values: &[f64]) -> NygaResult<Vec<f64>> {
        if self.is_empty() {
            return Err(NygaError::EmptyMixture);
        }
        values
            .iter()
            .map(|&v| self.log_likelihood(v))
            .collect()
    }

    /// The leaf supports in ascending order. For a uniform fit they tile the
    /// data range without gaps and only the last one is right-closed.
    pub fn support(&self) -> Vec<Interval> {
        self.components()
            .iter()
            .map(|c| c.leaf().support())
            .collect()
    }
}
