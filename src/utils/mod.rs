//! Development utilities: uniform sampling in bounds and an opt-in
//! gradient-check diagnostic.
//!
//! The gradient checker is a development aid for acquisition functions with
//! hand-written gradients. It is never called from the optimize path:
//! invoke it explicitly from tests or a debugging session and inspect the
//! offending points it reports.

use finitediff::FiniteDiff;
use ndarray::{Array1, Array2};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::types::{Domain, Objective};

/// Env variable controlling the log level
pub const ACQOPT_LOG: &str = "ACQOPT_LOG";

/// Relative error above which a gradient sample is flagged
pub const DEFAULT_GRADIENT_TOLERANCE: f64 = 0.01;

/// Draws one uniform random point inside the domain bounds
pub fn random_sample(domain: &Domain, rng: &mut impl Rng) -> Array1<f64> {
    domain
        .bounds()
        .iter()
        .map(|&(lo, hi)| rng.gen_range(lo..hi))
        .collect()
}

/// One sampled comparison of analytic against numerical gradient
#[derive(Debug, Clone)]
pub struct GradientCheckRecord {
    /// Sampled location
    pub x: Array1<f64>,
    /// Analytic gradient at `x`
    pub analytic: Array1<f64>,
    /// Central finite-difference estimate at `x`
    pub numeric: Array1<f64>,
    /// Norm of the componentwise relative error
    pub relative_error: f64,
}

/// Report of a gradient-check run, for manual inspection
#[derive(Debug, Clone)]
pub struct GradientCheckReport {
    /// All sampled comparisons
    pub records: Vec<GradientCheckRecord>,
    /// Threshold used to flag offenders
    pub tolerance: f64,
}

impl GradientCheckReport {
    /// Records whose relative error exceeds the tolerance
    pub fn offenders(&self) -> Vec<&GradientCheckRecord> {
        self.records
            .iter()
            .filter(|r| r.relative_error > self.tolerance)
            .collect()
    }

    /// Returns true when every sampled gradient matched
    pub fn all_within_tolerance(&self) -> bool {
        self.offenders().is_empty()
    }

    /// Mean relative error over the samples
    pub fn mean_error(&self) -> f64 {
        if self.records.is_empty() {
            return 0.;
        }
        self.records.iter().map(|r| r.relative_error).sum::<f64>() / self.records.len() as f64
    }
}

/// Compares the analytic gradient of `obj` against central finite
/// differences at `n_samples` uniform random points in the domain bounds.
///
/// The combined value+gradient callable takes priority over the bare
/// gradient, matching the optimizer adapter. When `obj` carries no analytic
/// gradient there is nothing to check and the report is empty. Pass a seed
/// for a reproducible sample.
pub fn check_gradients(
    domain: &Domain,
    obj: &Objective,
    n_samples: usize,
    tolerance: f64,
    seed: Option<u64>,
) -> GradientCheckReport {
    let mut rng = match seed {
        Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
        None => Xoshiro256Plus::from_entropy(),
    };
    let dim = domain.dim();
    let mut records = Vec::with_capacity(n_samples);
    if !obj.has_analytic_grad() {
        return GradientCheckReport { records, tolerance };
    }

    let fvec = |v: &Vec<f64>| {
        let x_arr = Array2::from_shape_vec((1, dim), v.clone()).unwrap();
        obj.value(&x_arr.view())
    };
    for _ in 0..n_samples {
        let x = random_sample(domain, &mut rng);
        let x_arr = Array2::from_shape_vec((1, dim), x.to_vec()).unwrap();
        let analytic = obj.analytic_grad(&x_arr.view()).unwrap();
        let numeric = Array1::from(x.to_vec().central_diff(&fvec));
        let relative_error = (&analytic - &numeric)
            .iter()
            .zip(analytic.iter())
            .map(|(diff, a)| {
                let denom = if a.abs() > f64::EPSILON { *a } else { 1. };
                (diff / denom).powi(2)
            })
            .sum::<f64>()
            .sqrt();
        records.push(GradientCheckRecord {
            x,
            analytic,
            numeric,
            relative_error,
        });
    }
    GradientCheckReport { records, tolerance }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, ArrayView2};

    fn rosenbrock(x: &ArrayView2<f64>) -> Array2<f64> {
        let (a, b) = (x[[0, 0]], x[[0, 1]]);
        array![[(1. - a).powi(2) + 100. * (b - a * a).powi(2)]]
    }

    fn rosenbrock_grad(x: &ArrayView2<f64>) -> Array2<f64> {
        let (a, b) = (x[[0, 0]], x[[0, 1]]);
        array![[
            -2. * (1. - a) - 400. * a * (b - a * a),
            200. * (b - a * a)
        ]]
    }

    fn wrong_grad(x: &ArrayView2<f64>) -> Array2<f64> {
        rosenbrock_grad(x) * 1.5
    }

    #[test]
    fn test_correct_gradient_passes() {
        let domain = Domain::continuous(&[(-2., 2.), (-2., 2.)]);
        let obj = Objective::new(&rosenbrock).with_grad(&rosenbrock_grad);
        let report = check_gradients(&domain, &obj, 100, DEFAULT_GRADIENT_TOLERANCE, Some(42));
        assert_eq!(report.records.len(), 100);
        assert!(
            report.all_within_tolerance(),
            "mean error {}",
            report.mean_error()
        );
    }

    #[test]
    fn test_wrong_gradient_flagged() {
        let domain = Domain::continuous(&[(-2., 2.), (-2., 2.)]);
        let obj = Objective::new(&rosenbrock).with_grad(&wrong_grad);
        let report = check_gradients(&domain, &obj, 100, DEFAULT_GRADIENT_TOLERANCE, Some(42));
        assert!(!report.offenders().is_empty());
    }

    #[test]
    fn test_no_gradient_empty_report() {
        let domain = Domain::continuous(&[(-2., 2.)]);
        let obj = Objective::new(&rosenbrock);
        let report = check_gradients(&domain, &obj, 10, DEFAULT_GRADIENT_TOLERANCE, Some(0));
        assert!(report.records.is_empty());
        assert!(report.all_within_tolerance());
    }

    #[test]
    fn test_random_sample_in_bounds() {
        let domain = Domain::continuous(&[(-5., 5.), (0., 1.)]);
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        for _ in 0..100 {
            let x = random_sample(&domain, &mut rng);
            assert!(domain.contains(x.as_slice().unwrap()));
        }
    }
}
