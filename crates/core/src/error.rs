//! Error types for the configuration and orchestration boundary.
//!
//! The per-cell numeric kernel never fails; everything that can go wrong is
//! a malformed input detected before a batch is dispatched.

use thiserror::Error;

/// Errors raised while validating inputs or scheduling a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnowSimError {
    /// A simulation constant is non-finite or outside its physical range.
    #[error("invalid constant {name}: {reason}")]
    InvalidConstant {
        /// Field name in `SimulationConstants`
        name: &'static str,
        /// Human-readable constraint that was violated
        reason: String,
    },

    /// Two thresholds that bound a linear or quadratic ramp are equal or inverted.
    #[error("threshold {lower} ({lower_value}) must be strictly below {upper} ({upper_value})")]
    InvertedThresholds {
        /// Name of the lower threshold
        lower: &'static str,
        /// Value of the lower threshold
        lower_value: f32,
        /// Name of the upper threshold
        upper: &'static str,
        /// Value of the upper threshold
        upper_value: f32,
    },

    /// The requested weather window does not lie within the series.
    #[error("weather window [{offset}, {offset}+{len}) exceeds series of {available} samples")]
    WeatherWindow {
        /// Absolute timestep of the first sample in the window
        offset: usize,
        /// Requested batch length
        len: usize,
        /// Samples held by the series
        available: usize,
    },

    /// Grid, terrain, or buffer dimensions disagree.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which buffer or grid was mismatched
        what: &'static str,
        /// Expected element count
        expected: usize,
        /// Actual element count
        actual: usize,
    },

    /// Terrain construction parameter is not finite and positive.
    #[error("invalid terrain parameter {name}: {value}")]
    InvalidTerrain {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },
}

/// Convenience alias used throughout the crate.
pub type SnowSimResult<T> = Result<T, SnowSimError>;
