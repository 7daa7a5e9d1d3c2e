//! Bounded downstream path walking.

use std::collections::HashSet;

use sn_core::FlowlineId;

use crate::graph::Routing;

/// Maximum number of downstream steps a walk may take.
///
/// Callers always choose the limit; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkLimit {
    Steps(usize),
    /// Walk until the outlet or a cycle.
    Unbounded,
}

impl WalkLimit {
    fn allows(self, steps_taken: usize) -> bool {
        match self {
            WalkLimit::Steps(n) => steps_taken < n,
            WalkLimit::Unbounded => true,
        }
    }
}

/// Why a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStop {
    /// The last node routes to the outlet (or is not in the graph).
    Outlet,
    /// The step budget ran out before the outlet was reached.
    Limit,
    /// The next node was already on the path.
    Cycle,
}

/// A downstream path and the reason it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    /// Visited flowlines, starting with the start node. Never empty.
    pub path: Vec<FlowlineId>,
    pub stop: WalkStop,
}

impl Walk {
    /// Last flowline on the path.
    pub fn last(&self) -> FlowlineId {
        // path always holds at least the start node
        self.path[self.path.len() - 1]
    }

    /// True if the walk ran out of steps.
    pub fn is_exhausted(&self) -> bool {
        self.stop == WalkStop::Limit
    }
}

/// Walk downstream from `start`.
///
/// Each step follows [`Routing::step`]; over a multi-valued graph that is the
/// last candidate in input order. The walk ends at the outlet, after `limit`
/// steps, or when it would revisit a node. A cycle never errors; the repeated
/// node is not appended a second time.
pub fn walk<R: Routing + ?Sized>(graph: &R, start: FlowlineId, limit: WalkLimit) -> Walk {
    let mut path = vec![start];
    let mut seen: HashSet<FlowlineId> = HashSet::from([start]);
    let mut current = start;

    loop {
        let Some(next) = graph.step(current) else {
            return Walk {
                path,
                stop: WalkStop::Outlet,
            };
        };
        if !limit.allows(path.len() - 1) {
            return Walk {
                path,
                stop: WalkStop::Limit,
            };
        }
        if !seen.insert(next) {
            return Walk {
                path,
                stop: WalkStop::Cycle,
            };
        }
        path.push(next);
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::graph::ResolvedGraph;

    fn id(raw: u64) -> FlowlineId {
        FlowlineId::new(raw).unwrap()
    }

    fn chain(n: u64) -> ResolvedGraph {
        (1..=n)
            .map(|i| (id(i), if i < n { Some(id(i + 1)) } else { None }))
            .collect()
    }

    #[test]
    fn walk_to_outlet() {
        let w = walk(&chain(4), id(1), WalkLimit::Unbounded);
        assert_eq!(w.path, vec![id(1), id(2), id(3), id(4)]);
        assert_eq!(w.stop, WalkStop::Outlet);
        assert_eq!(w.last(), id(4));
    }

    #[test]
    fn walk_stops_at_limit() {
        let w = walk(&chain(20), id(1), WalkLimit::Steps(3));
        assert_eq!(w.path, vec![id(1), id(2), id(3), id(4)]);
        assert!(w.is_exhausted());
    }

    #[test]
    fn reaching_outlet_on_last_step_is_not_exhausted() {
        let w = walk(&chain(4), id(1), WalkLimit::Steps(3));
        assert_eq!(w.path.len(), 4);
        assert_eq!(w.stop, WalkStop::Outlet);
    }

    #[test]
    fn zero_step_limit_returns_start() {
        let w = walk(&chain(4), id(2), WalkLimit::Steps(0));
        assert_eq!(w.path, vec![id(2)]);
        assert_eq!(w.stop, WalkStop::Limit);
    }

    #[test]
    fn cycle_terminates_without_repeating() {
        let graph = GraphBuilder::from_raw_edges([(1, 2), (2, 3), (3, 1)])
            .unwrap()
            .build();
        let w = walk(&graph, id(1), WalkLimit::Unbounded);
        assert_eq!(w.path, vec![id(1), id(2), id(3)]);
        assert_eq!(w.stop, WalkStop::Cycle);
    }

    #[test]
    fn unknown_start_is_an_outlet() {
        let w = walk(&chain(2), id(50), WalkLimit::Steps(10));
        assert_eq!(w.path, vec![id(50)]);
        assert_eq!(w.stop, WalkStop::Outlet);
    }
}
