//! Configuration errors.
//!
//! Every failure in this crate happens while building a model from its
//! configuration. Once constructed, predictors and caches are total over
//! their inputs.

use thiserror::Error;

/// Errors raised while constructing predictors and caches.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A cache geometry parameter is not a power of two.
    #[error("{name}: {parameter} must be a power of two (got {value})")]
    NotPowerOfTwo {
        /// Cache name.
        name: String,
        /// Offending parameter (`line_bytes`, `sets` or `ways`).
        parameter: &'static str,
        /// Value supplied.
        value: usize,
    },

    /// The associativity is not supported by the chosen replacement policy.
    #[error("{name}: policy {policy} cannot be built with {assoc} ways")]
    InvalidAssociativity {
        /// Cache name.
        name: String,
        /// Policy that rejected the geometry.
        policy: &'static str,
        /// Associativity supplied.
        assoc: usize,
    },

    /// The cache geometry spans more address bits than a 64-bit address has.
    #[error("{name}: geometry spans {bits} address bits (at most {max})")]
    AddressWidth {
        /// Cache name.
        name: String,
        /// log2 of line size, set count and associativity combined.
        bits: u32,
        /// Largest supported width.
        max: u32,
    },

    /// A predictor table size is outside the supported range.
    #[error("predictor {predictor}: log2 table size {lg} is out of range (1..={max})")]
    TableSize {
        /// Predictor name.
        predictor: &'static str,
        /// Requested log2 size.
        lg: u32,
        /// Largest supported log2 size.
        max: u32,
    },

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result alias for model construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
