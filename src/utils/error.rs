//! Error types for resload

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResloadError {
    #[error("Invalid resource name: {0:?}")]
    InvalidResourceName(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Unable to link {resource}: cannot create temporary directory")]
    DirectoryCreationFailed {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to link {resource}: cannot extract resource")]
    CopyFailed {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to link {resource} from {}: {message}", path.display())]
    LoaderRejected {
        resource: String,
        path: PathBuf,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Coarse classification of a [`ResloadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resource name is malformed or does not resolve.
    InvalidArgument,
    /// The native library could not be made available to the process.
    LinkageFailure,
    /// Configuration could not be read or is invalid.
    Configuration,
}

impl ResloadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResloadError::InvalidResourceName(_) | ResloadError::ResourceNotFound(_) => {
                ErrorKind::InvalidArgument
            }
            ResloadError::DirectoryCreationFailed { .. }
            | ResloadError::CopyFailed { .. }
            | ResloadError::LoaderRejected { .. } => ErrorKind::LinkageFailure,
            ResloadError::ConfigError(_)
            | ResloadError::ValidationError(_)
            | ResloadError::Io(_)
            | ResloadError::TomlParse(_)
            | ResloadError::TomlSerialize(_) => ErrorKind::Configuration,
        }
    }

    pub fn is_linkage_failure(&self) -> bool {
        self.kind() == ErrorKind::LinkageFailure
    }
}

pub type Result<T> = std::result::Result<T, ResloadError>;
