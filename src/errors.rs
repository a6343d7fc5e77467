use thiserror::Error;

/// An error when optimizing an acquisition function
#[derive(Error, Debug)]
pub enum AcqError {
    /// When an unknown optimizer name is selected
    #[error(
        "invalid optimizer selected: '{0}' \
         (expected one of: local-gradient, global-partition, evolutionary)"
    )]
    InvalidOptimizer(String),
    /// When an optimizer is built over a domain with discrete variables
    #[error("optimizer requires a fully continuous domain")]
    NonContinuousDomain,
}

/// A result type for acquisition optimization configuration
pub type Result<T> = std::result::Result<T, AcqError>;
