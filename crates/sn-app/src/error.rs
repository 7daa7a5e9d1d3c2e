//! Error types for the sn-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read input file: {path}")]
    InputFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output file: {path}")]
    OutputFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Export error: {0}")]
    Export(String),
}

/// Result type for sn-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<sn_project::ProjectError> for AppError {
    fn from(err: sn_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<sn_project::ValidationError> for AppError {
    fn from(err: sn_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sn_graph::GraphError> for AppError {
    fn from(err: sn_graph::GraphError) -> Self {
        AppError::Graph(err.to_string())
    }
}

impl From<sn_routing::RoutingError> for AppError {
    fn from(err: sn_routing::RoutingError) -> Self {
        AppError::Routing(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Export(err.to_string())
    }
}
