use posekit_assets::LoadError;
use serde::Serialize;

use crate::pose::ValidationError;

/// Any error that aborts an upload. All of them leave the active model as
/// it was.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Flat error category for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedFormat,
    ReadFailure,
    MalformedJson,
    SchemaViolation,
    DecodeFailure,
}

impl ViewerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ViewerError::Load(LoadError::UnsupportedFormat(_)) => ErrorKind::UnsupportedFormat,
            ViewerError::Load(LoadError::ReadFailure(..)) => ErrorKind::ReadFailure,
            ViewerError::Load(LoadError::DecodeFailure { .. }) => ErrorKind::DecodeFailure,
            ViewerError::Validation(ValidationError::MalformedJson(_)) => ErrorKind::MalformedJson,
            ViewerError::Validation(ValidationError::SchemaViolation(_)) => ErrorKind::SchemaViolation,
        }
    }
}
