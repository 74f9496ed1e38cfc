//! Error types for loading, configuring and running the solver.
//!
//! The search engine itself never fails: infeasible placements are predicate
//! outcomes and unplaceable events stay unassigned. Only reading instances,
//! validating configuration and writing output can go wrong.

use thiserror::Error;

/// Malformed or size-mismatched instance data.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of input while reading {what}")]
    MissingValue { what: &'static str },

    #[error("Invalid token '{token}' at position {position}: expected a non-negative integer")]
    InvalidToken { token: String, position: usize },

    #[error("Entry {index} of the {what} is {value}, expected 0 or 1")]
    NotBinary {
        what: &'static str,
        index: usize,
        value: u64,
    },

    #[error("{count} unexpected value(s) after the end of the instance")]
    TrailingData { count: usize },

    #[error("The {what} would exceed the supported maximum of {limit} entries")]
    DimensionOverflow { what: &'static str, limit: usize },

    #[error("The {what} has {actual} entries, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Anything that can stop a solve run before it produces output.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
