//! Error types for channel mode tracking.
//!
//! This module defines the construction-time configuration errors and the
//! failure reasons reported by the mode-change parser.

use thiserror::Error;

/// Convenience type alias for Results using [`ModeChangeError`].
pub type Result<T, E = ModeChangeError> = std::result::Result<T, E>;

/// Reasons a mode-change string could not be split into operations.
///
/// Parsing is all-or-nothing: the first failure discards every operation
/// produced so far for that input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModeChangeError {
    /// A mode letter appeared before any `+` or `-`.
    #[error("no operation found before mode '{mode}'")]
    MissingSign {
        /// The offending mode letter.
        mode: char,
    },

    /// The mode letter is not in the mode type map in effect.
    #[error("mode '{mode}' not recognized")]
    UnknownMode {
        /// The unrecognized mode letter.
        mode: char,
    },

    /// A parameter-consuming mode ran out of parameters.
    #[error("not enough params for mode '{mode}'")]
    NotEnoughParams {
        /// The mode letter that needed a parameter.
        mode: char,
    },

    /// Parameters were left over after every mode was consumed.
    #[error("too many params: {unused} left unconsumed")]
    TooManyParams {
        /// Number of parameter tokens left over.
        unused: usize,
    },
}

/// Errors in the default-map configuration.
///
/// These are fatal: a tracker is never built from an invalid configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A default mode type key was not exactly one character.
    #[error("the default mode type map provided is invalid: key {key:?} is not a single character")]
    InvalidModeTypes {
        /// The rejected key.
        key: String,
    },

    /// A default prefix key or value was not exactly one character.
    #[error("the default prefix map provided is invalid: {prefix:?} => {mode:?}")]
    InvalidPrefixes {
        /// The rejected prefix key.
        prefix: String,
        /// The mode value paired with it.
        mode: String,
    },
}
