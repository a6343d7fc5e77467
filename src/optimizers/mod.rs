//! # Optimizers Module
//!
//! This module provides the optimization backends for the acquisition
//! function maximization step of a Bayesian optimization loop.
//!
//! ## Architecture
//!
//! - **Single Responsibility**: Each backend wrapper handles one algorithm
//! - **Open/Closed**: New optimizers can be added by implementing [`AcqOptimizer`]
//! - **Dependency Inversion**: The outer loop depends on the trait abstraction
//!
//! ## Available Optimizers
//!
//! - **L-BFGS** - bounded quasi-Newton line search (gradient-based, uses the
//!   initial point; true or finite-difference gradients)
//! - **DIRECT** - deterministic space partitioning (derivative-free, global)
//! - **CMA-ES** - stochastic covariance adaptation (derivative-free, global)
//!
//! ## Feature Flags
//!
//! - `direct`: compile in the DIRECT backend (default)
//! - `cmaes`: compile in the CMA-ES backend (default)
//!
//! A disabled backend still selects and builds; its `optimize` logs a
//! diagnostic and reports [`OptimOutcome::Unavailable`] so the outer loop
//! can skip it and continue.

mod cmaes;
mod direct;
mod lbfgs;
mod optimizer;

pub use self::cmaes::*;
pub use self::direct::*;
pub use self::lbfgs::*;
pub use self::optimizer::*;
