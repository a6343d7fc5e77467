//! Global partitioning optimizer wrapping the NLopt DIRECT routine.
//!
//! DIRECT (DIviding RECTangles) recursively subdivides the search box to
//! bound the global optimum. It only needs the objective and the box
//! constraints: the initial point and any supplied gradients are ignored.
//! The backend is compiled in under the `direct` cargo feature.

use log::warn;
use ndarray::ArrayView2;

use crate::errors::{AcqError, Result};
use crate::optimizers::{AcqOptimizer, OptimOutcome, DEFAULT_MAX_EVALS};
use crate::types::{Domain, Objective};

/// Deterministic space-partitioning global optimizer (DIRECT).
#[derive(Debug)]
pub struct DirectOptimizer<'a> {
    domain: &'a Domain,
    max_evals: usize,
}

impl<'a> DirectOptimizer<'a> {
    /// Constructor over an all-continuous domain
    pub fn try_new(domain: &'a Domain) -> Result<Self> {
        if !domain.is_continuous() {
            return Err(AcqError::NonContinuousDomain);
        }
        Ok(DirectOptimizer {
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

impl AcqOptimizer for DirectOptimizer<'_> {
    fn name(&self) -> &str {
        "DIRECT"
    }

    #[cfg(feature = "direct")]
    fn optimize(&self, _x0: &ArrayView2<f64>, obj: &Objective) -> OptimOutcome {
        use log::debug;
        use ndarray::Array2;
        use nlopt::{Algorithm, Nlopt, Target};

        use crate::optimizers::Optimum;

        let dim = self.domain.dim();
        let eval = |x: &[f64], _gradient: Option<&mut [f64]>, _: &mut ()| -> f64 {
            let x_arr = Array2::from_shape_vec((1, dim), x.to_vec()).unwrap();
            obj.value(&x_arr.view())
        };

        let mut solver = Nlopt::new(Algorithm::Direct, dim, eval, Target::Minimize, ());
        if let Err(e) = solver.set_lower_bounds(&self.domain.lower().to_vec()) {
            warn!("DIRECT rejected lower bounds: {e:?}");
            return OptimOutcome::Failed(format!("DIRECT rejected lower bounds: {e:?}"));
        }
        if let Err(e) = solver.set_upper_bounds(&self.domain.upper().to_vec()) {
            warn!("DIRECT rejected upper bounds: {e:?}");
            return OptimOutcome::Failed(format!("DIRECT rejected upper bounds: {e:?}"));
        }
        if let Err(e) = solver.set_maxeval(self.max_evals as u32) {
            warn!("DIRECT rejected evaluation cap: {e:?}");
            return OptimOutcome::Failed(format!("DIRECT rejected evaluation cap: {e:?}"));
        }

        // the partitioning search works from the bounds, not the point
        let mut x_opt = self.domain.midpoint().to_vec();
        match solver.optimize(&mut x_opt) {
            Ok((status, _)) => {
                debug!("DIRECT terminated with {status:?}");
                let x_opt = Array2::from_shape_vec((1, dim), x_opt).unwrap();
                let y_opt = (obj.f)(&x_opt.view());
                OptimOutcome::Optimum(Optimum { x_opt, y_opt })
            }
            Err((status, _)) => {
                warn!("DIRECT failed with {status:?}");
                OptimOutcome::Failed(format!("DIRECT failed with {status:?}"))
            }
        }
    }

    #[cfg(not(feature = "direct"))]
    fn optimize(&self, _x0: &ArrayView2<f64>, _obj: &Objective) -> OptimOutcome {
        warn!("DIRECT library not found, please install it (enable the `direct` feature)");
        OptimOutcome::Unavailable("direct")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, ArrayView2};

    fn sphere(x: &ArrayView2<f64>) -> Array2<f64> {
        let sum = x.row(0).iter().map(|v| v * v).sum::<f64>();
        array![[sum]]
    }

    #[cfg(feature = "direct")]
    #[test]
    fn test_sphere_global_search() {
        // asymmetric bounds so the box midpoint is not already the optimum
        let domain = Domain::continuous(&[(-5., 7.), (-5., 7.)]);
        let optimizer = DirectOptimizer::try_new(&domain).unwrap();
        let obj = Objective::new(&sphere);
        let opt = optimizer
            .optimize(&array![[3., 3.]].view(), &obj)
            .optimum()
            .expect("DIRECT should return a candidate");
        assert!(domain.contains(opt.x_opt.row(0).as_slice().unwrap()));
        assert!(opt.x_opt[[0, 0]].abs() < 0.2);
        assert!(opt.x_opt[[0, 1]].abs() < 0.2);
        // re-evaluated value matches the objective at the returned point
        assert_eq!(opt.y_opt, sphere(&opt.x_opt.view()));
    }

    #[cfg(feature = "direct")]
    #[test]
    fn test_deterministic_across_runs() {
        let domain = Domain::continuous(&[(-5., 7.)]);
        let obj = Objective::new(&sphere);
        let optimizer = DirectOptimizer::try_new(&domain).unwrap();
        let first = optimizer
            .optimize(&array![[0.]].view(), &obj)
            .optimum()
            .unwrap();
        let second = optimizer
            .optimize(&array![[0.]].view(), &obj)
            .optimum()
            .unwrap();
        assert_eq!(first.x_opt, second.x_opt);
        assert_eq!(first.y_opt, second.y_opt);
    }

    #[cfg(not(feature = "direct"))]
    #[test]
    fn test_unavailable_backend() {
        let domain = Domain::continuous(&[(-5., 5.)]);
        let optimizer = DirectOptimizer::try_new(&domain).unwrap();
        let obj = Objective::new(&sphere);
        assert!(matches!(
            optimizer.optimize(&array![[0.]].view(), &obj),
            OptimOutcome::Unavailable("direct")
        ));
    }

    #[test]
    fn test_discrete_domain_rejected() {
        let domain = Domain::new(vec![crate::types::XType::Enum(4)]);
        assert!(matches!(
            DirectOptimizer::try_new(&domain),
            Err(AcqError::NonContinuousDomain)
        ));
    }
}
