//! Incremental graph builder.

use std::collections::{BTreeMap, BTreeSet};

use sn_core::FlowlineId;

use crate::error::{GraphError, GraphResult};
use crate::graph::RawGraph;
use crate::validate;

/// Builder for constructing a raw routing graph from edge rows.
///
/// NHDPlus encodes each branch of a divergence as its own edge row, so
/// repeated rows with the same source accumulate into one candidate list.
/// Use `add_edge` for each row, then call `build()` to freeze it into an
/// immutable `RawGraph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    candidates: BTreeMap<FlowlineId, Vec<FlowlineId>>,
    edge_rows: usize,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from raw `(from_id, to_id)` rows, where `to_id == 0` is an outlet.
    pub fn from_raw_edges<I>(edges: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut builder = Self::new();
        for (from, to) in edges {
            let from = FlowlineId::new(from).ok_or(GraphError::OutletAsSource { to })?;
            builder.add_edge(from, FlowlineId::new(to));
        }
        Ok(builder)
    }

    /// Add one routing row. A `None` target registers `from` as an outlet.
    pub fn add_edge(&mut self, from: FlowlineId, to: Option<FlowlineId>) -> &mut Self {
        self.edge_rows += 1;
        let candidates = self.candidates.entry(from).or_default();
        if let Some(to) = to {
            // Repeated rows are collapsed; the first occurrence keeps its position.
            if !candidates.contains(&to) {
                candidates.push(to);
            }
        }
        self
    }

    /// Number of rows added so far (duplicates included).
    pub fn edge_rows(&self) -> usize {
        self.edge_rows
    }

    /// Freeze into a `RawGraph`.
    pub fn build(self) -> RawGraph {
        RawGraph {
            candidates: self.candidates,
        }
    }

    /// Freeze into a `RawGraph`, rejecting sources missing from `known`.
    pub fn build_checked(self, known: &BTreeSet<FlowlineId>) -> GraphResult<RawGraph> {
        validate::validate_sources(self.candidates.keys().copied(), known)?;
        Ok(self.build())
    }
}
