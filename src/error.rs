//! Error types for everything around the numeric core: configuration, files, setup.

use std::path::PathBuf;
use thiserror::Error;

use crate::feedforward::{CaseError, NewNetError, ProcessError, TopologyError, TrainError, WeightsError};

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Malformed data file
    #[error("Failed to parse {path} line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error("{path}: {source}")]
    Weights {
        path: PathBuf,
        #[source]
        source: WeightsError,
    },

    #[error(transparent)]
    Net(#[from] NewNetError),

    #[error(transparent)]
    Cases(#[from] CaseError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Train(#[from] TrainError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
