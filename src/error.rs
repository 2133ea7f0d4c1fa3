// src/error.rs
use core::fmt;

/// Library-wide error for nyga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NygaError {
    /// `fit` was called with zero samples.
    EmptyInput,

    /// A sample is NaN/±inf. `context` pinpoints where it came from
    /// (e.g., "sample value", "query value").
    NonFiniteInput { context: &'static str },

    /// A fit parameter is outside its domain. `what` names the parameter
    /// and the constraint it violated.
    InvalidParameter { what: &'static str },

    /// An interval was constructed with `lower > upper`. Raised by the
    /// `Interval` constructors; the inducer itself never produces one.
    DegenerateInterval,

    /// Likelihood was queried on a mixture with zero components.
    EmptyMixture,

    /// A circuit was evaluated against evidence of the wrong shape
    /// (missing variable, or a real where a symbol is needed).
    EvidenceMismatch { expected: &'static str },
}

impl fmt::Display for NygaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NygaError::EmptyInput => write!(
                f,
                "nyga: cannot fit an empty sample. \
hint: pass at least one observation"
            ),
            NygaError::NonFiniteInput { context } => write!(
                f,
                "nyga: non-finite values are not allowed ({}). \
hint: clean your data or drop NaN/±inf before fitting",
                context
            ),
            NygaError::InvalidParameter { what } => {
                write!(f, "nyga: invalid parameter: {}", what)
            }
            NygaError::DegenerateInterval => write!(
                f,
                "nyga: interval lower bound exceeds upper bound"
            ),
            NygaError::EmptyMixture => write!(
                f,
                "nyga: likelihood of an empty mixture is undefined. \
hint: fit the mixture before querying it"
            ),
            NygaError::EvidenceMismatch { expected } => write!(
                f,
                "nyga: evidence does not match the circuit (expected {})",
                expected
            ),
        }
    }
}

impl std::error::Error for NygaError {}

pub type NygaResult<T> = Result<T, NygaError>;
