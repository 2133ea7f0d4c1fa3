//! Leaf densities of a fitted mixture.
//!
//! A mixture component is either a `Uniform` over one quantile interval or,
//! for the degenerate all-samples-equal fit, a `Dirac` point mass.

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// A uniform density over one interval.
///
/// Density is `1 / width` on membership and zero outside; the support is
/// never empty because the inducer always places at least one unique sample
/// strictly inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uniform {
    interval: Interval,
}

impl Uniform {
    pub fn new(interval: Interval) -> Self {
        assert!(
            interval.width() > 0.0,
            "uniform support must have positive width"
        );
        Uniform { interval }
    }

    #[inline]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// The constant density inside the support.
    #[inline]
    pub fn pdf_value(&self) -> f64 {
        1.0 / self.interval.width()
    }

    pub fn pdf(&self, value: f64) -> f64 {
        if self.interval.contains(value) {
            self.pdf_value()
        } else {
            0.0
        }
    }

    pub fn log_pdf(&self, value: f64) -> f64 {
        if self.interval.contains(value) {
            -self.interval.width().ln()
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// A point mass at `location` with a finite (or infinite) density cap.
///
/// Equality against `location` is exact: the location always comes from a
/// datum of the fitted sample, so the query either is that datum or it is
/// not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dirac {
    location: f64,
    density_cap: f64,
}

impl Dirac {
    pub fn new(location: f64) -> Self {
        Dirac {
            location,
            density_cap: f64::INFINITY,
        }
    }

    pub fn with_density_cap(location: f64, density_cap: f64) -> Self {
        Dirac {
            location,
            density_cap,
        }
    }

    #[inline]
    pub fn location(&self) -> f64 {
        self.location
    }

    #[inline]
    pub fn density_cap(&self) -> f64 {
        self.density_cap
    }

    pub fn pdf(&self, value: f64) -> f64 {
        if value == self.location {
            self.density_cap
        } else {
            0.0
        }
    }

    pub fn log_pdf(&self, value: f64) -> f64 {
        self.pdf(value).ln()
    }
}

/// A mixture component body: uniform quantile or degenerate point mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Leaf {
    Uniform(Uniform),
    Dirac(Dirac),
}

impl Leaf {
    pub fn log_pdf(&self, value: f64) -> f64 {
        match self {
            Leaf::Uniform(u) => u.log_pdf(value),
            Leaf::Dirac(d) => d.log_pdf(value),
        }
    }

    /// The support as an interval; a Dirac support is its singleton.
    pub fn support(&self) -> Interval {
        match self {
            Leaf::Uniform(u) => u.interval(),
            Leaf::Dirac(d) => Interval::singleton(d.location()),
        }
    }
}
