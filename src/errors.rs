use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum KconfigGraphError {
    #[error("Failed to read assignment file {file}: {source}")]
    AssignedConfig { file: PathBuf, source: ParseError },

    #[error("The directory '{0}' does not exist")]
    MissingRoot(PathBuf),

    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("'{marker}' file not found in the directory '{root}'")]
    MissingMarker { root: PathBuf, marker: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Graph JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Serve(String),
}
