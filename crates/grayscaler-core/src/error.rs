//! Error types for the Grayscaler pipeline.
//!
//! Errors are organized by pipeline stage. Every failure carries a
//! human-readable cause that is safe to return to the client, and maps to an
//! HTTP status class through [`PipelineError::status_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Message returned when an upload carries no filename.
pub const NO_FILE_SELECTED: &str = "No file selected";

/// Message returned when an upload's extension is not in the allow-set.
pub const INVALID_FILE_FORMAT: &str = "Invalid file format. Only PNG, JPG, JPEG allowed";

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Why an upload was rejected before any processing happened.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    /// One of the uploads has no (or an empty) filename
    #[error("{}", NO_FILE_SELECTED)]
    NoFileSelected,

    /// One of the uploads has a disallowed extension
    #[error("{}", INVALID_FILE_FORMAT)]
    InvalidFormat,
}

/// Decode or encode failure inside the transformer.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Bytes could not be decoded into a pixel grid
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The grayscale grid could not be encoded as PNG
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Transform did not finish within the configured limit
    #[error("Image processing timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The blocking worker running the transform died
    #[error("Image processing task failed: {0}")]
    Task(String),
}

/// Failure persisting a processed image.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Output directory could not be created
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes could not be written to their final location
    #[error("Failed to save output {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline errors, one variant per failure class.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Client-caused: bad or missing filename or extension
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// Decode/encode failure
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// I/O failure writing output
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PipelineError {
    /// HTTP status code for this error class.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Processing(_) | Self::Storage(_) => 500,
        }
    }

    /// Short machine-readable name of the error class, recorded on error events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Processing(_) => "processing_failed",
            Self::Storage(_) => "storage_failed",
        }
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
