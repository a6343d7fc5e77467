//! Domain and objective types
//!
//! This module defines the `XType` enum for specifying variable domains,
//! the `Domain` over which acquisition functions are optimized and the
//! `Objective` bundle grouping an acquisition function with its optional
//! analytic gradients.

use ndarray::{Array1, Array2, ArrayView2};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// An enumeration to define the type of an input variable component
/// with its domain definition
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum XType {
    /// Continuous variable in [lower bound, upper bound]
    Float(f64, f64),
    /// Integer variable in lower bound .. upper bound
    Int(i32, i32),
    /// An Ordered variable in { float_1, float_2, ..., float_n }
    Ord(Vec<f64>),
    /// An Enum variable in { 1, 2, ..., int_n }
    Enum(usize),
}

/// Returns true if xtypes contains at least one discrete type (Int, Ord, or Enum)
pub fn discrete(xtypes: &[XType]) -> bool {
    xtypes
        .iter()
        .any(|t| matches!(t, &XType::Int(_, _) | &XType::Ord(_) | &XType::Enum(_)))
}

/// The bounded design space an acquisition function is optimized over.
///
/// A domain is an ordered sequence of variable types, one per dimension.
/// It is immutable for the duration of an optimization call; optimizers
/// hold a non-owning reference and only ever read from it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Domain {
    xtypes: Vec<XType>,
}

impl Domain {
    /// Constructor from a list of variable types
    pub fn new(xtypes: Vec<XType>) -> Self {
        Domain { xtypes }
    }

    /// Constructor of an all-continuous domain from (lower, upper) pairs
    pub fn continuous(bounds: &[(f64, f64)]) -> Self {
        Domain {
            xtypes: bounds.iter().map(|&(lo, hi)| XType::Float(lo, hi)).collect(),
        }
    }

    /// Number of dimensions of the domain
    pub fn dim(&self) -> usize {
        self.xtypes.len()
    }

    /// Variable types of the domain, one per dimension
    pub fn xtypes(&self) -> &[XType] {
        &self.xtypes
    }

    /// Returns true if every dimension is continuous (`Float`)
    pub fn is_continuous(&self) -> bool {
        !discrete(&self.xtypes)
    }

    /// Per-dimension (lower, upper) pairs
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.xtypes
            .iter()
            .map(|xtype| match xtype {
                XType::Float(lo, hi) => (*lo, *hi),
                XType::Int(lo, hi) => (*lo as f64, *hi as f64),
                XType::Ord(values) => values.iter().fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), &v| (lo.min(v), hi.max(v)),
                ),
                XType::Enum(n) => (0., (*n as f64) - 1.),
            })
            .collect()
    }

    /// Lower bound vector
    pub fn lower(&self) -> Array1<f64> {
        self.bounds().iter().map(|&(lo, _)| lo).collect()
    }

    /// Upper bound vector
    pub fn upper(&self) -> Array1<f64> {
        self.bounds().iter().map(|&(_, hi)| hi).collect()
    }

    /// Elementwise midpoint of the bounds
    pub fn midpoint(&self) -> Array1<f64> {
        self.bounds().iter().map(|&(lo, hi)| 0.5 * (lo + hi)).collect()
    }

    /// Returns true if `x` lies within the bounds, componentwise
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dim()
            && x.iter()
                .zip(self.bounds())
                .all(|(&v, (lo, hi))| v >= lo && v <= hi)
    }
}

/// Acquisition function evaluated at a batch of points: (n, d) -> (n, 1)
pub type AcqFn<'a> = &'a dyn Fn(&ArrayView2<f64>) -> Array2<f64>;
/// Acquisition gradient at a batch of points: (n, d) -> (n, d)
pub type AcqGradFn<'a> = &'a dyn Fn(&ArrayView2<f64>) -> Array2<f64>;
/// Acquisition value and gradient computed in a single call
pub type AcqValGradFn<'a> = &'a dyn Fn(&ArrayView2<f64>) -> (Array2<f64>, Array2<f64>);

/// An acquisition function together with its optional analytic gradients.
///
/// The function maps a (1, d) row vector to a (1, 1) value array. A bare
/// gradient, a combined value+gradient callable, both or neither may be
/// attached; optimizers that cannot use gradients simply ignore them.
#[derive(Clone, Copy)]
pub struct Objective<'a> {
    /// Acquisition function to minimize
    pub f: AcqFn<'a>,
    /// Analytic gradient of `f`, if available
    pub grad: Option<AcqGradFn<'a>>,
    /// Combined value+gradient callable, takes priority over `grad`
    pub f_grad: Option<AcqValGradFn<'a>>,
}

impl<'a> Objective<'a> {
    /// Constructor from the acquisition function alone
    pub fn new(f: AcqFn<'a>) -> Self {
        Objective {
            f,
            grad: None,
            f_grad: None,
        }
    }

    /// Attaches an analytic gradient
    pub fn with_grad(mut self, grad: AcqGradFn<'a>) -> Self {
        self.grad = Some(grad);
        self
    }

    /// Attaches a combined value+gradient callable
    pub fn with_f_grad(mut self, f_grad: AcqValGradFn<'a>) -> Self {
        self.f_grad = Some(f_grad);
        self
    }

    /// Scalar value of the acquisition at a single (1, d) point
    pub fn value(&self, x: &ArrayView2<f64>) -> f64 {
        (self.f)(x)[[0, 0]]
    }

    /// Returns true when an analytic gradient source is attached
    pub fn has_analytic_grad(&self) -> bool {
        self.f_grad.is_some() || self.grad.is_some()
    }

    /// Analytic gradient at a single (1, d) point.
    ///
    /// The combined callable takes priority over the bare gradient. Gradient
    /// arrays may be batched; the first row is the one matching `x`.
    pub fn analytic_grad(&self, x: &ArrayView2<f64>) -> Option<Array1<f64>> {
        if let Some(f_grad) = self.f_grad {
            let (_, dx) = f_grad(x);
            Some(dx.row(0).to_owned())
        } else {
            self.grad.map(|grad| grad(x).row(0).to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_discrete_with_float_only() {
        let xtypes = vec![XType::Float(0.0, 1.0), XType::Float(-1.0, 1.0)];
        assert!(!discrete(&xtypes));
    }

    #[test]
    fn test_discrete_with_int() {
        let xtypes = vec![XType::Float(0.0, 1.0), XType::Int(0, 10)];
        assert!(discrete(&xtypes));
    }

    #[test]
    fn test_domain_queries() {
        let domain = Domain::continuous(&[(-5., 5.), (0., 10.)]);
        assert_eq!(domain.dim(), 2);
        assert!(domain.is_continuous());
        assert_eq!(domain.bounds(), vec![(-5., 5.), (0., 10.)]);
        assert_eq!(domain.lower(), array![-5., 0.]);
        assert_eq!(domain.upper(), array![5., 10.]);
        assert_eq!(domain.midpoint(), array![0., 5.]);
        assert!(domain.contains(&[1., 2.]));
        assert!(!domain.contains(&[6., 2.]));
        assert!(!domain.contains(&[1.]));
    }

    #[test]
    fn test_mixed_domain_not_continuous() {
        let domain = Domain::new(vec![XType::Float(0., 1.), XType::Enum(3)]);
        assert!(!domain.is_continuous());
        assert_eq!(domain.bounds(), vec![(0., 1.), (0., 2.)]);
    }

    #[test]
    fn test_objective_grad_priority() {
        let f = |x: &ArrayView2<f64>| array![[x[[0, 0]] * x[[0, 0]]]];
        let df = |x: &ArrayView2<f64>| array![[2. * x[[0, 0]]]];
        let f_df = |x: &ArrayView2<f64>| (array![[x[[0, 0]] * x[[0, 0]]]], array![[-1.]]);

        let obj = Objective::new(&f).with_grad(&df).with_f_grad(&f_df);
        let x = array![[3.]];
        assert_eq!(obj.value(&x.view()), 9.);
        // combined callable wins over the bare gradient
        assert_eq!(obj.analytic_grad(&x.view()).unwrap(), array![-1.]);

        let obj = Objective::new(&f).with_grad(&df);
        assert_eq!(obj.analytic_grad(&x.view()).unwrap(), array![6.]);

        let obj = Objective::new(&f);
        assert!(obj.analytic_grad(&x.view()).is_none());
        assert!(!obj.has_analytic_grad());
    }
}
