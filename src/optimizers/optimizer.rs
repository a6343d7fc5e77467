use std::fmt;
use std::str::FromStr;

use env_logger::{Builder, Env};
use ndarray::{Array2, ArrayView2};

use crate::errors::{AcqError, Result};
use crate::optimizers::{CmaesOptimizer, DirectOptimizer, LbfgsOptimizer};
use crate::types::{Domain, Objective};
use crate::utils::ACQOPT_LOG;

/// Default iteration/evaluation budget handed to every backend
pub const DEFAULT_MAX_EVALS: usize = 1000;

/// A candidate returned by an acquisition optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct Optimum {
    /// Best point found, as a (1, d) row vector
    pub x_opt: Array2<f64>,
    /// Acquisition value at `x_opt`, as a (1, 1) array
    pub y_opt: Array2<f64>,
}

/// Outcome of a single acquisition optimization run.
///
/// Backend problems are data, not errors: the outer loop treats anything
/// but [`OptimOutcome::Optimum`] as "no improvement found" and moves on to
/// another candidate or restart.
#[derive(Debug, Clone)]
pub enum OptimOutcome {
    /// The solver terminated and returned a candidate
    Optimum(Optimum),
    /// The backend is compiled out of this build (cargo feature disabled)
    Unavailable(&'static str),
    /// The backend is present but failed on this input
    Failed(String),
}

impl OptimOutcome {
    /// Consumes the outcome, keeping the candidate if any
    pub fn optimum(self) -> Option<Optimum> {
        match self {
            OptimOutcome::Optimum(opt) => Some(opt),
            _ => None,
        }
    }

    /// Returns true if the run produced a candidate
    pub fn is_optimum(&self) -> bool {
        matches!(self, OptimOutcome::Optimum(_))
    }
}

/// A single-operation capability: minimize an acquisition function over the
/// bounded domain the optimizer was built with.
///
/// Implementations must not mutate the domain. Gradients and the initial
/// point are contract inputs that a given backend is free to ignore.
pub trait AcqOptimizer: fmt::Debug {
    /// Returns the name of the wrapped backend
    fn name(&self) -> &str;

    /// Minimizes `obj` starting (for local methods) from the (1, d)
    /// initial point `x0`.
    fn optimize(&self, x0: &ArrayView2<f64>, obj: &Objective) -> OptimOutcome;
}

/// The closed set of acquisition optimizers.
///
/// Selection is a tagged-variant dispatch: parse a name with [`FromStr`]
/// then instantiate over a domain with [`OptimizerName::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerName {
    /// Bounded quasi-Newton line search (L-BFGS), uses gradients
    LocalGradient,
    /// Deterministic space partitioning (DIRECT), derivative-free
    GlobalPartition,
    /// Stochastic covariance adaptation (CMA-ES), derivative-free
    Evolutionary,
}

impl OptimizerName {
    /// Recognized identifier of the optimizer
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerName::LocalGradient => "local-gradient",
            OptimizerName::GlobalPartition => "global-partition",
            OptimizerName::Evolutionary => "evolutionary",
        }
    }

    /// Instantiates the selected optimizer over `domain`.
    ///
    /// Fails with [`AcqError::NonContinuousDomain`] when the domain has
    /// discrete dimensions; the check runs before any solver is touched.
    pub fn build<'a>(&self, domain: &'a Domain) -> Result<Box<dyn AcqOptimizer + 'a>> {
        let env = Env::new().filter_or(ACQOPT_LOG, "info");
        let mut builder = Builder::from_env(env);
        let builder = builder.target(env_logger::Target::Stdout);
        builder.try_init().ok();
        Ok(match self {
            OptimizerName::LocalGradient => Box::new(LbfgsOptimizer::try_new(domain)?),
            OptimizerName::GlobalPartition => Box::new(DirectOptimizer::try_new(domain)?),
            OptimizerName::Evolutionary => Box::new(CmaesOptimizer::try_new(domain)?),
        })
    }
}

impl FromStr for OptimizerName {
    type Err = AcqError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "local-gradient" => Ok(OptimizerName::LocalGradient),
            "global-partition" => Ok(OptimizerName::GlobalPartition),
            "evolutionary" => Ok(OptimizerName::Evolutionary),
            _ => Err(AcqError::InvalidOptimizer(name.to_string())),
        }
    }
}

impl fmt::Display for OptimizerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
