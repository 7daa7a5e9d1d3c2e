//! sn-project: network and configuration file formats and validation.

pub mod edits;
pub mod migrate;
pub mod schema;
pub mod validate;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use edits::{AddedFlowline, EditScript, EditSummary, apply_edits};
pub use migrate::{LATEST_VERSION, Versioned, migrate_to_latest};
pub use schema::*;
pub use validate::{
    ValidationError, validate_config, validate_known_connections, validate_network,
};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A versioned file the loaders know how to check.
pub trait Document: Serialize + DeserializeOwned + Versioned {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Document for NetworkDef {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_network(self)
    }
}

impl Document for PreprocessConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_config(self)
    }
}

pub fn load_yaml<T: Document>(path: &Path) -> ProjectResult<T> {
    let content = std::fs::read_to_string(path)?;
    let doc: T = serde_yaml::from_str(&content)?;
    let doc = migrate_to_latest(doc)?;
    doc.validate()?;
    Ok(doc)
}

pub fn save_yaml<T: Document>(path: &Path, doc: &T) -> ProjectResult<()> {
    doc.validate()?;
    let content = serde_yaml::to_string(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json<T: Document>(path: &Path) -> ProjectResult<T> {
    let content = std::fs::read_to_string(path)?;
    let doc: T = serde_json::from_str(&content)?;
    let doc = migrate_to_latest(doc)?;
    doc.validate()?;
    Ok(doc)
}

pub fn save_json<T: Document>(path: &Path, doc: &T) -> ProjectResult<()> {
    doc.validate()?;
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a YAML or JSON document, choosing the format by file extension.
pub fn load_document<T: Document>(path: &Path) -> ProjectResult<T> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

/// Edit scripts have no version; they are parsed as-is.
pub fn load_edits(path: &Path) -> ProjectResult<EditScript> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
