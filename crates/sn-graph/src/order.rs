//! Processing order over resolved routing.
//!
//! Elevation and accumulation passes need every upstream flowline handled
//! before the flowline it drains into. `upstream_first` produces that order
//! with Kahn's algorithm; anything caught in a routing cycle is reported
//! separately instead of being dropped.

use std::collections::{BTreeMap, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use sn_core::FlowlineId;

use crate::graph::{ResolvedGraph, Routing};

/// Upstream-first ordering of a resolved graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopoOrder {
    /// Flowlines whose whole upstream network is acyclic, upstream first.
    pub order: Vec<FlowlineId>,
    /// Flowlines on a cycle or downstream of one, ascending.
    pub leftover: Vec<FlowlineId>,
}

impl TopoOrder {
    pub fn is_complete(&self) -> bool {
        self.leftover.is_empty()
    }
}

/// Order flowlines so each comes after every flowline routing into it.
///
/// Ties are broken by ascending id, so the order is deterministic.
pub fn upstream_first(graph: &ResolvedGraph) -> TopoOrder {
    let mut pending: BTreeMap<FlowlineId, usize> = graph.ids().map(|id| (id, 0)).collect();
    for (_, to) in graph.edges() {
        if let Some(count) = pending.get_mut(&to) {
            *count += 1;
        }
    }

    let mut ready: VecDeque<FlowlineId> = pending
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(id) = ready.pop_front() {
        order.push(id);
        if let Some(next) = graph.step(id) {
            if let Some(count) = pending.get_mut(&next) {
                *count -= 1;
                if *count == 0 {
                    ready.push_back(next);
                }
            }
        }
    }

    let leftover = pending
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .map(|(id, _)| id)
        .collect();

    TopoOrder { order, leftover }
}

/// Routing cycles, as strongly connected components.
///
/// Each cycle is listed in ascending id order; cycles are sorted by their
/// smallest id. A flowline routing to itself is a cycle of one.
pub fn cycles<R: Routing>(graph: &R) -> Vec<Vec<FlowlineId>> {
    let mut g: DiGraphMap<FlowlineId, ()> = DiGraphMap::new();
    for (from, to) in graph.edges() {
        g.add_edge(from, to, ());
    }

    let mut found: Vec<Vec<FlowlineId>> = tarjan_scc(&g)
        .into_iter()
        .filter(|scc| scc.len() > 1 || g.contains_edge(scc[0], scc[0]))
        .map(|mut scc| {
            scc.sort_unstable();
            scc
        })
        .collect();
    found.sort_unstable();
    found
}
