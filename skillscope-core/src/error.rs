//! Error types for skillscope-core

use thiserror::Error;

/// Main error type for the skillscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML front-matter parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Parse error for a specific source file
    #[error("parse error in {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Project session folder could not be resolved
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// Project name matched more than one session folder
    #[error("ambiguous project '{name}': matches {candidates:?}")]
    AmbiguousProject {
        name: String,
        candidates: Vec<String>,
    },
}

/// Result type alias for skillscope-core
pub type Result<T> = std::result::Result<T, Error>;
