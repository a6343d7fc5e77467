//! This library implements the acquisition-function optimization layer of a
//! Bayesian optimization loop: given a bounded continuous domain and an
//! acquisition function (with optional analytic gradients), it selects and
//! invokes one of several black-box numerical backends and adapts their
//! calling conventions to a single uniform interface.
//!
//! No optimization algorithm lives here; the backends are opaque
//! collaborators:
//!
//! * **L-BFGS** (local, gradient-based), bounded quasi-Newton line search,
//! * **DIRECT** (global, deterministic), recursive space partitioning,
//! * **CMA-ES** (global, stochastic), covariance-adapted Gaussian sampling.
//!
//! The outer loop selects a backend by name, builds it over the domain and
//! calls [`AcqOptimizer::optimize`] once per acquisition-maximization
//! request:
//!
//! ```no_run
//! use acqopt::{AcqOptimizer, Domain, Objective, OptimizerName};
//! use ndarray::{array, ArrayView2, Array2};
//!
//! // Acquisition function to minimize, (1, d) point in, (1, 1) value out
//! let f = |x: &ArrayView2<f64>| -> Array2<f64> {
//!     array![[x[[0, 0]] * x[[0, 0]]]]
//! };
//!
//! let domain = Domain::continuous(&[(-5.0, 5.0)]);
//! let optimizer = "local-gradient"
//!     .parse::<OptimizerName>()
//!     .unwrap()
//!     .build(&domain)
//!     .unwrap();
//!
//! match optimizer.optimize(&array![[3.0]].view(), &Objective::new(&f)).optimum() {
//!     Some(opt) => println!("minimum f(x) = {} at x = {}", opt.y_opt, opt.x_opt),
//!     None => println!("no improvement found, try another optimizer"),
//! }
//! ```
//!
//! Unknown optimizer names and domains with discrete dimensions are
//! configuration errors and fail fast. A backend that is compiled out or
//! fails on a given input logs a diagnostic and reports a missing result
//! ([`OptimOutcome::Unavailable`] / [`OptimOutcome::Failed`]) instead of
//! crashing, so the outer loop can fall back to another candidate.

mod errors;
mod optimizers;
mod types;
pub mod utils;

pub use crate::errors::*;
pub use crate::optimizers::*;
pub use crate::types::*;
