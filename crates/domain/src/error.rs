//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SecurityError`] via `#[from]` or the collaborator helpers.

use std::fmt;

use crate::id::SensorId;

/// Boxed, thread-safe error used at collaborator boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by every security use-case.
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    /// The operation referenced a sensor that is not registered.
    #[error("invalid sensor reference")]
    InvalidSensorReference(#[from] InvalidSensorReference),

    /// Input failed a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A repository or image-analysis call failed.
    #[error("{0} unavailable")]
    CollaboratorUnavailable(Collaborator, #[source] BoxError),
}

impl SecurityError {
    /// Wrap a failure coming from the persistence collaborator.
    pub fn repository(err: impl Into<BoxError>) -> Self {
        Self::CollaboratorUnavailable(Collaborator::Repository, err.into())
    }

    /// Wrap a failure coming from the image-analysis collaborator.
    pub fn image_analysis(err: impl Into<BoxError>) -> Self {
        Self::CollaboratorUnavailable(Collaborator::ImageAnalysis, err.into())
    }

    /// Which collaborator failed, if this error came from one.
    #[must_use]
    pub fn collaborator(&self) -> Option<Collaborator> {
        match self {
            Self::CollaboratorUnavailable(collaborator, _) => Some(*collaborator),
            _ => None,
        }
    }
}

/// External components the core depends on but does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    Repository,
    ImageAnalysis,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repository => f.write_str("repository"),
            Self::ImageAnalysis => f.write_str("image analysis"),
        }
    }
}

/// A sensor id that is not part of the managed sensor set.
#[derive(Debug, thiserror::Error)]
#[error("sensor {id} is not registered")]
pub struct InvalidSensorReference {
    pub id: SensorId,
}

/// A string that names no variant of a domain enum.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind} {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("image of {width}x{height} holds {len} bytes")]
    InvalidImage { width: u32, height: u32, len: usize },
}
