use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::nyga::Nyga;
use crate::variable::Variable;
use crate::NygaResult;

/// Seeded fit-quality probe: fit a standard-normal sample and compare the
/// mixture's mean log likelihood on its own data against the single
/// uniform-over-the-range baseline.
#[derive(Debug, Clone)]
pub struct Quality {
    pub n: usize,
    pub min_samples_per_quantile: usize,
    pub min_likelihood_improvement: f64,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct QualityReport {
    pub n: usize,
    pub leaves: usize,
    pub mean_log_likelihood: f64,
    pub baseline_log_likelihood: f64,
}

impl QualityReport {
    /// Mean log-likelihood advantage over the uniform baseline. Positive
    /// means the partition actually bought something.
    pub fn gain(&self) -> f64 {
        self.mean_log_likelihood - self.baseline_log_likelihood
    }

    pub fn to_line(&self) -> String {
        format!(
            "QualityReport(n={}, leaves={}, mean_ll={:.6}, baseline_ll={:.6}, gain={:.6})",
            self.n,
            self.leaves,
            self.mean_log_likelihood,
            self.baseline_log_likelihood,
            self.gain()
        )
    }

    pub fn log(&self) {
        eprintln!("{}", self.to_line());
    }
}

impl Quality {
    pub fn new(
        n: usize,
        min_samples_per_quantile: usize,
        min_likelihood_improvement: f64,
        seed: u64,
    ) -> Self {
        Self {
            n,
            min_samples_per_quantile,
            min_likelihood_improvement,
            seed,
        }
    }

    pub fn run(&self) -> NygaResult<QualityReport> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let normal = Normal::new(0.0, 1.0).expect("unit normal parameters are valid");
        let samples: Vec<f64> = (0..self.n).map(|_| normal.sample(&mut rng)).collect();

        let model = Nyga::with_parameters(
            Variable::new("quality"),
            self.min_samples_per_quantile,
            self.min_likelihood_improvement,
        );
        let mixture = model.fit(samples.clone())?;

        let lls = mixture.log_likelihoods(&samples)?;
        let mean = lls.iter().sum::<f64>() / samples.len() as f64;

        let min = samples.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = samples.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let baseline = -(max - min).ln();

        Ok(QualityReport {
            n: self.n,
            leaves: mixture.len(),
            mean_log_likelihood: mean,
            baseline_log_likelihood: baseline,
        })
    }
}
