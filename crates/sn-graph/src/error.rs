//! Graph-specific error types.

use sn_core::FlowlineId;

/// Result type for graph construction and validation.
pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge row uses the outlet sentinel as its source.
    OutletAsSource { to: u64 },

    /// An edge refers to a source flowline that is not in the node table.
    UnknownFromId { from: FlowlineId },

    /// A resolved target is neither the outlet nor an active flowline.
    DanglingTarget { from: FlowlineId, to: FlowlineId },

    /// An active flowline has no entry in the resolved graph.
    MissingEntry { id: FlowlineId },

    /// The resolved graph has an entry for a flowline outside the active set.
    InactiveEntry { id: FlowlineId },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::OutletAsSource { to } => {
                write!(f, "Edge 0 -> {} starts at the outlet sentinel", to)
            }
            GraphError::UnknownFromId { from } => {
                write!(f, "Edge source {} is not in the flowline table", from)
            }
            GraphError::DanglingTarget { from, to } => {
                write!(
                    f,
                    "Flowline {} routes to {} which is not in the active set",
                    from, to
                )
            }
            GraphError::MissingEntry { id } => {
                write!(f, "Active flowline {} has no resolved routing", id)
            }
            GraphError::InactiveEntry { id } => {
                write!(f, "Resolved routing lists inactive flowline {}", id)
            }
        }
    }
}

impl std::error::Error for GraphError {}
