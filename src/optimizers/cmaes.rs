//! Evolutionary optimizer wrapping a CMA-ES routine.
//!
//! CMA-ES searches with an adapted multivariate Gaussian sampling
//! distribution seeded at the domain midpoint. It only needs the objective
//! and the box constraints: the initial point and any supplied gradients
//! are ignored. The backend is compiled in under the `cmaes` cargo feature.

use log::warn;
use ndarray::ArrayView2;

use crate::errors::{AcqError, Result};
use crate::optimizers::{AcqOptimizer, OptimOutcome, DEFAULT_MAX_EVALS};
use crate::types::{Domain, Objective};

/// Initial standard deviation of the sampling distribution
pub const INITIAL_STEP_SIZE: f64 = 0.6;

/// Stochastic covariance-adaptation optimizer (CMA-ES).
///
/// The backend has no native box-constraint option, so samples are
/// projected onto the domain bounds before evaluation and the returned
/// point is projected likewise.
#[derive(Debug)]
pub struct CmaesOptimizer<'a> {
    domain: &'a Domain,
    max_evals: usize,
}

impl<'a> CmaesOptimizer<'a> {
    /// Constructor over an all-continuous domain
    pub fn try_new(domain: &'a Domain) -> Result<Self> {
        if !domain.is_continuous() {
            return Err(AcqError::NonContinuousDomain);
        }
        Ok(CmaesOptimizer {
            domain,
            max_evals: DEFAULT_MAX_EVALS,
        })
    }

    /// Sets the maximum number of objective evaluations
    pub fn max_evals(mut self, max_evals: usize) -> Self {
        self.max_evals = max_evals;
        self
    }
}

impl AcqOptimizer for CmaesOptimizer<'_> {
    fn name(&self) -> &str {
        "CMA-ES"
    }

    #[cfg(feature = "cmaes")]
    fn optimize(&self, _x0: &ArrayView2<f64>, obj: &Objective) -> OptimOutcome {
        use cmaes::{CMAESOptions, DVector};
        use log::debug;
        use ndarray::Array2;

        use crate::optimizers::Optimum;

        let dim = self.domain.dim();
        let bounds = self.domain.bounds();
        let project = |x: &[f64]| -> Vec<f64> {
            x.iter()
                .zip(&bounds)
                .map(|(&v, &(lo, hi))| v.clamp(lo, hi))
                .collect()
        };
        let eval = |x: &DVector<f64>| -> f64 {
            let projected = project(x.as_slice());
            let x_arr = Array2::from_shape_vec((1, dim), projected).unwrap();
            obj.value(&x_arr.view())
        };

        // printing stays disabled, the backend is silent by default
        let mut state = match CMAESOptions::new(self.domain.midpoint().to_vec(), INITIAL_STEP_SIZE)
            .max_function_evals(self.max_evals)
            .build(eval)
        {
            Ok(state) => state,
            Err(e) => {
                warn!("CMA-ES does not work on this domain: {e:?}");
                return OptimOutcome::Failed(format!("CMA-ES rejected the problem: {e:?}"));
            }
        };

        let results = state.run();
        match results.overall_best {
            Some(best) => {
                debug!("CMA-ES terminated at f = {}", best.value);
                let projected = project(best.point.as_slice());
                let x_opt = Array2::from_shape_vec((1, dim), projected).unwrap();
                let y_opt = (obj.f)(&x_opt.view());
                OptimOutcome::Optimum(Optimum { x_opt, y_opt })
            }
            None => {
                warn!("CMA-ES terminated without a candidate");
                OptimOutcome::Failed("CMA-ES terminated without a candidate".to_string())
            }
        }
    }

    #[cfg(not(feature = "cmaes"))]
    fn optimize(&self, _x0: &ArrayView2<f64>, _obj: &Objective) -> OptimOutcome {
        warn!("CMA-ES library not found, please install it (enable the `cmaes` feature)");
        OptimOutcome::Unavailable("cmaes")
    }
}
