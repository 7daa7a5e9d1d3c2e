//! Graph validation logic.

use std::collections::BTreeSet;

use sn_core::FlowlineId;

use crate::error::{GraphError, GraphResult};
use crate::graph::ResolvedGraph;

/// Every edge source must be a flowline from the node table.
pub(crate) fn validate_sources(
    sources: impl Iterator<Item = FlowlineId>,
    known: &BTreeSet<FlowlineId>,
) -> GraphResult<()> {
    for from in sources {
        if !known.contains(&from) {
            return Err(GraphError::UnknownFromId { from });
        }
    }
    Ok(())
}

/// Check the resolved-graph contract against the active set.
///
/// - every active flowline has exactly one entry
/// - no entry exists for an inactive flowline
/// - every target is the outlet or an active flowline
pub fn validate_resolved(graph: &ResolvedGraph, active: &BTreeSet<FlowlineId>) -> GraphResult<()> {
    for &id in active {
        if graph.target(id).is_none() {
            return Err(GraphError::MissingEntry { id });
        }
    }

    for (from, to) in graph.iter() {
        if !active.contains(&from) {
            return Err(GraphError::InactiveEntry { id: from });
        }
        if let Some(to) = to {
            if !active.contains(&to) {
                return Err(GraphError::DanglingTarget { from, to });
            }
        }
    }

    Ok(())
}
