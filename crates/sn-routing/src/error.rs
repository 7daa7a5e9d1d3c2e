//! Error types for network resolution.

use sn_core::FlowlineId;
use sn_graph::GraphError;
use thiserror::Error;

/// Errors that abort a resolution run.
#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Flowline {id} is missing required attribute {attribute}")]
    MissingAttribute {
        id: FlowlineId,
        attribute: &'static str,
    },

    #[error("Flowline {id} has invalid {attribute}: {value}")]
    InvalidAttribute {
        id: FlowlineId,
        attribute: &'static str,
        value: f64,
    },

    #[error("Flowline {id} appears more than once in the flowline table")]
    DuplicateFlowline { id: FlowlineId },

    #[error("Known connection {from} -> {to} conflicts with routing: {reason}")]
    OverrideConflict {
        from: FlowlineId,
        to: FlowlineId,
        reason: &'static str,
    },

    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
