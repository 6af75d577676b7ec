//! Error types and result utilities for augmentation operations.
//!
//! Errors are grouped the same way the operations fail: bad configuration
//! ([`ParameterError`]), inputs that violate an algorithm's precondition
//! ([`ProcessingError`]), and misuse of the sample-then-apply lifecycle
//! ([`AugmentError::NotSampled`]).

use thiserror::Error;

/// Convenience type alias for results that may contain an [`AugmentError`].
pub type AugmentResult<T> = Result<T, AugmentError>;

/// Top-level error returned by every fallible operation in this crate.
#[derive(Error, Debug)]
pub enum AugmentError {
    /// A configuration value or explicit argument is invalid.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// The input does not satisfy what an algorithm needs to run.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// `apply` was called on a stochastic transform before `sample`.
    #[error("transform `{transform}` was applied before its parameters were sampled")]
    NotSampled {
        /// Name of the offending transform.
        transform: &'static str,
    },

    /// An ndarray buffer could not be built with the requested shape.
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Errors caused by invalid configuration or call arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A string did not name any member of a closed option set.
    #[error("Valid options for {parameter} are {}, not '{value}'", format_options(.valid))]
    InvalidOption {
        /// The option being parsed, e.g. `pad_mode`.
        parameter: &'static str,
        /// The rejected value, as given.
        value: String,
        /// Every accepted spelling.
        valid: &'static [&'static str],
    },

    /// A numeric argument lies outside the range allowed for the current input.
    #[error("{parameter} value {value} out of range: {valid_range}")]
    OutOfRange {
        /// The argument name.
        parameter: &'static str,
        /// The rejected value, formatted.
        value: String,
        /// Human readable description of the accepted range, with shape context.
        valid_range: String,
    },

    /// Any other invalid argument.
    #[error("Invalid {parameter}: {reason}")]
    InvalidValue {
        /// The argument name.
        parameter: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ParameterError {
    /// Builds an [`ParameterError::InvalidOption`].
    pub fn invalid_option(
        parameter: &'static str,
        value: impl Into<String>,
        valid: &'static [&'static str],
    ) -> Self {
        Self::InvalidOption {
            parameter,
            value: value.into(),
            valid,
        }
    }

    /// Builds an [`ParameterError::OutOfRange`].
    pub fn out_of_range(
        parameter: &'static str,
        value: impl ToString,
        valid_range: impl Into<String>,
    ) -> Self {
        Self::OutOfRange {
            parameter,
            value: value.to_string(),
            valid_range: valid_range.into(),
        }
    }

    /// Builds an [`ParameterError::InvalidValue`].
    pub fn invalid_value(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Errors raised while running an algorithm on otherwise valid arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    /// The input is too small or otherwise unsuitable for the operation.
    #[error("{operation} not possible with current settings: {reason}")]
    Precondition {
        /// The operation that refused to run.
        operation: &'static str,
        /// What is missing and how to fix it upstream.
        reason: String,
    },

    /// A numeric backend failed.
    #[error("{algorithm} failed: {reason}")]
    AlgorithmFailure {
        /// The failing algorithm or backend.
        algorithm: &'static str,
        /// Backend error message.
        reason: String,
    },
}

impl ProcessingError {
    /// Builds a [`ProcessingError::Precondition`].
    pub fn precondition(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Precondition {
            operation,
            reason: reason.into(),
        }
    }

    /// Builds a [`ProcessingError::AlgorithmFailure`].
    pub fn algorithm_failure(algorithm: &'static str, reason: impl Into<String>) -> Self {
        Self::AlgorithmFailure {
            algorithm,
            reason: reason.into(),
        }
    }
}

fn format_options(valid: &[&str]) -> String {
    valid
        .iter()
        .map(|o| format!("'{o}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
