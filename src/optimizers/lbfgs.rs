//! Local gradient optimizer wrapping the NLopt bounded L-BFGS routine.
//!
//! The backend consumes true gradients when the objective carries them and
//! central finite differences otherwise. The combined value+gradient
//! callable takes priority over a bare gradient; a bare gradient is usable
//! standalone.

use finitediff::FiniteDiff;
use log::{debug, warn};
use ndarray::{Array2, ArrayView2};
use nlopt::{Algorithm, FailState, Nlopt, Target};

use crate::errors::{AcqError, Result};
use crate::optimizers::{AcqOptimizer, OptimOutcome, Optimum, DEFAULT_MAX_EVALS};
use crate::types::{Domain, Objective};

/// Bounded quasi-Newton line-search optimizer (L-BFGS).
///
/// The only optimizer of the set that uses the initial point and the
/// supplied gradients. Returns the solver's terminal point and terminal
/// value, forced to (1, d) / (1, 1) shape for interface uniformity.
#[derive(Debug)]
pub struct LbfgsOptimizer<'a> {
    domain: &'a Domain,
    max_iters: usize,
}

impl<'a> LbfgsOptimizer<'a> {
    /// Constructor over an all-continuous domain
    pub fn try_new(domain: &'a Domain) -> Result<Self> {
        if !domain.is_continuous() {
            return Err(AcqError::NonContinuousDomain);
        }
        Ok(LbfgsOptimizer {
            domain,
            max_iters: DEFAULT_MAX_EVALS,
        })
    }

    /// Sets the maximum number of objective evaluations
    pub fn max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }
}

impl AcqOptimizer for LbfgsOptimizer<'_> {
    fn name(&self) -> &str {
        "L-BFGS"
    }

    fn optimize(&self, x0: &ArrayView2<f64>, obj: &Objective) -> OptimOutcome {
        let dim = self.domain.dim();
        let approx_grad = !obj.has_analytic_grad();

        // Adapter invoked by the solver: value from `f`, gradient from the
        // combined callable, the bare gradient or finite differences.
        let eval = |x: &[f64], gradient: Option<&mut [f64]>, _: &mut ()| -> f64 {
            let x_arr = Array2::from_shape_vec((1, dim), x.to_vec()).unwrap();
            if let Some(gradient) = gradient {
                if approx_grad {
                    let fvec = |v: &Vec<f64>| {
                        let v_arr = Array2::from_shape_vec((1, dim), v.clone()).unwrap();
                        obj.value(&v_arr.view())
                    };
                    gradient.copy_from_slice(&x.to_vec().central_diff(&fvec));
                } else {
                    // gradient rows may be batched, row 0 matches x
                    let g = obj.analytic_grad(&x_arr.view()).unwrap();
                    gradient.copy_from_slice(g.as_slice().unwrap());
                }
            }
            obj.value(&x_arr.view())
        };

        let mut solver = Nlopt::new(Algorithm::Lbfgs, dim, eval, Target::Minimize, ());
        if let Err(e) = solver.set_lower_bounds(&self.domain.lower().to_vec()) {
            return OptimOutcome::Failed(format!("L-BFGS rejected lower bounds: {e:?}"));
        }
        if let Err(e) = solver.set_upper_bounds(&self.domain.upper().to_vec()) {
            return OptimOutcome::Failed(format!("L-BFGS rejected upper bounds: {e:?}"));
        }
        if let Err(e) = solver.set_maxeval(self.max_iters as u32) {
            return OptimOutcome::Failed(format!("L-BFGS rejected evaluation cap: {e:?}"));
        }
        if let Err(e) = solver.set_ftol_abs(1e-12) {
            return OptimOutcome::Failed(format!("L-BFGS rejected tolerance: {e:?}"));
        }

        let mut x_opt = x0.row(0).to_vec();
        match solver.optimize(&mut x_opt) {
            // Roundoff-limited termination still carries a usable point
            Ok((_, y_opt)) | Err((FailState::RoundoffLimited, y_opt)) => {
                debug!("L-BFGS terminated at f = {y_opt}");
                OptimOutcome::Optimum(Optimum {
                    x_opt: Array2::from_shape_vec((1, dim), x_opt).unwrap(),
                    y_opt: Array2::from_elem((1, 1), y_opt),
                })
            }
            Err((status, y_opt)) => {
                warn!("L-BFGS failed with {status:?} at f = {y_opt}");
                OptimOutcome::Failed(format!("L-BFGS failed with {status:?}"))
            }
        }
    }
}
