//! Error handling for StarSync
//!
//! Provides the error taxonomy for the alignment engine:
//! - Alignment errors (degenerate geometry, missing points, bad configuration)
//! - Kinematics errors (axis/horizon conversion failures)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Alignment error type
///
/// Represents failures raised while building or configuring the
/// alignment model. Degenerate geometry and insufficient points are
/// recovered inside the mapping engine and only surface through the
/// assembler and selector APIs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    /// Calibration triple is collinear or coincident
    #[error("Degenerate geometry for points {ids:?} (determinant {determinant})")]
    DegenerateGeometry {
        /// Ids of the points forming the triple, when known.
        ids: Vec<u32>,
        /// The determinant that failed the inversion.
        determinant: f64,
    },

    /// Not enough calibration points for the requested operation
    #[error("Insufficient points: {available} available, {required} required")]
    InsufficientPoints {
        /// Number of points currently usable.
        available: usize,
        /// Number of points the operation needs.
        required: usize,
    },

    /// Configuration value rejected
    #[error("Invalid configuration '{field}': {reason}")]
    InvalidConfiguration {
        /// The offending configuration field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Kinematics error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Site latitude outside [-90, 90]
    #[error("Latitude {latitude} out of range")]
    LatitudeOutOfRange {
        /// The rejected latitude in degrees.
        latitude: f64,
    },

    /// Non-finite coordinate supplied
    #[error("Non-finite coordinate: {what}")]
    NonFinite {
        /// Description of the coordinate.
        what: String,
    },
}

/// Main error type for StarSync
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Alignment error
    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    /// Kinematics error
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}

impl Error {
    /// Check if this is a degenerate geometry error
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Error::Alignment(AlignmentError::DegenerateGeometry { .. })
        )
    }

    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::Alignment(AlignmentError::InvalidConfiguration { .. })
        )
    }

    /// Check if this is an alignment error
    pub fn is_alignment_error(&self) -> bool {
        matches!(self, Error::Alignment(_))
    }

    /// Check if this is a kinematics error
    pub fn is_kinematics_error(&self) -> bool {
        matches!(self, Error::Kinematics(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
