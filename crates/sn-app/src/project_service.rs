//! Network and configuration loading, saving, validation, and introspection.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use sn_project::schema::{NetworkDef, PreprocessConfig};
use sn_project::{EditScript, validate_config, validate_known_connections, validate_network};

use crate::error::{AppError, AppResult};

/// Summary of a network for listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSummary {
    pub name: Option<String>,
    pub flowline_count: usize,
    pub edge_count: usize,
    pub active_count: usize,
    pub outlet_count: usize,
    pub divergence_count: usize,
}

fn ensure_exists(path: &Path) -> AppResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(AppError::InputFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        })
    }
}

/// Load a network from a YAML or JSON file.
pub fn load_network(path: &Path) -> AppResult<NetworkDef> {
    ensure_exists(path)?;
    Ok(sn_project::load_document(path)?)
}

/// Load a preprocessing configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> AppResult<PreprocessConfig> {
    match path {
        Some(path) => {
            ensure_exists(path)?;
            Ok(sn_project::load_document(path)?)
        }
        None => Ok(PreprocessConfig::default()),
    }
}

pub fn load_edits(path: &Path) -> AppResult<EditScript> {
    ensure_exists(path)?;
    Ok(sn_project::load_edits(path)?)
}

/// Save a network; the format follows the file extension.
pub fn save_network(path: &Path, network: &NetworkDef) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => sn_project::save_json(path, network)?,
        _ => sn_project::save_yaml(path, network)?,
    }
    Ok(())
}

/// Validate a network and a configuration against each other.
pub fn validate_inputs(network: &NetworkDef, config: &PreprocessConfig) -> AppResult<()> {
    validate_network(network)?;
    validate_config(config)?;
    validate_known_connections(config, network)?;

    if network.flowlines.is_empty() {
        return Err(AppError::Validation(
            "Network must have at least one flowline".to_string(),
        ));
    }
    Ok(())
}

pub fn summarize_network(network: &NetworkDef) -> NetworkSummary {
    let mut per_source: BTreeMap<_, BTreeSet<_>> = BTreeMap::new();
    let mut outlet_count = 0;
    for edge in &network.edges {
        match edge.to_id {
            Some(to) => {
                per_source.entry(edge.from_id).or_default().insert(to);
            }
            None => outlet_count += 1,
        }
    }

    NetworkSummary {
        name: network.name.clone(),
        flowline_count: network.flowlines.len(),
        edge_count: network.edges.len(),
        active_count: network.flowlines.iter().filter(|f| f.in_active_set).count(),
        outlet_count,
        divergence_count: per_source.values().filter(|t| t.len() > 1).count(),
    }
}
