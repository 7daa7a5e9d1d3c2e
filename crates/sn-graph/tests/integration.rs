//! Integration tests for sn-graph.

use std::collections::BTreeSet;

use proptest::prelude::*;
use sn_core::FlowlineId;
use sn_graph::validate::validate_resolved;
use sn_graph::{
    GraphBuilder, ResolvedGraph, ReverseGraph, Routing, WalkLimit, WalkStop, cycles,
    upstream_first, walk,
};

fn id(raw: u64) -> FlowlineId {
    FlowlineId::new(raw).unwrap()
}

#[test]
fn build_network_with_diversion() {
    // 1 splits into 2 and 3, both rejoin at 4, which drains to the outlet.
    let graph = GraphBuilder::from_raw_edges([(1, 2), (1, 3), (2, 4), (3, 4), (4, 0)])
        .unwrap()
        .build();

    assert_eq!(graph.len(), 4);
    assert_eq!(graph.candidates(id(1)), &[id(2), id(3)]);
    assert_eq!(graph.divergence_count(), 1);

    let rev = ReverseGraph::of(&graph);
    assert_eq!(rev.upstream(id(4)), &[id(2), id(3)]);
    assert_eq!(rev.upstream(id(2)), &[id(1)]);
    assert_eq!(rev.upstream(id(3)), &[id(1)]);

    // walks over raw routing take the last candidate
    let w = walk(&graph, id(1), WalkLimit::Steps(10));
    assert_eq!(w.path, vec![id(1), id(3), id(4)]);
    assert_eq!(w.stop, WalkStop::Outlet);
    assert!(cycles(&graph).is_empty());
}

#[test]
fn resolved_graph_round_trip_through_reverse() {
    let resolved: ResolvedGraph = [
        (id(10), Some(id(12))),
        (id(11), Some(id(12))),
        (id(12), None),
    ]
    .into_iter()
    .collect();

    let active: BTreeSet<_> = resolved.ids().collect();
    validate_resolved(&resolved, &active).unwrap();

    let rev = ReverseGraph::of(&resolved);
    assert!(rev.is_junction(id(12)));
    assert_eq!(rev.contributor_count(id(10)), 0);

    let topo = upstream_first(&resolved);
    assert!(topo.is_complete());
    assert_eq!(topo.order.last(), Some(&id(12)));
}

#[test]
fn unbounded_walk_terminates_on_cycle() {
    let graph = GraphBuilder::from_raw_edges([(1, 2), (2, 3), (3, 4), (4, 2)])
        .unwrap()
        .build();
    let w = walk(&graph, id(1), WalkLimit::Unbounded);
    assert_eq!(w.stop, WalkStop::Cycle);
    assert_eq!(w.path, vec![id(1), id(2), id(3), id(4)]);
    assert_eq!(cycles(&graph), vec![vec![id(2), id(3), id(4)]]);
}

/// Random single-valued routing over ids 1..=n (0 maps to the outlet).
fn arb_resolved() -> impl Strategy<Value = ResolvedGraph> {
    (2_u64..40).prop_flat_map(|n| {
        prop::collection::vec(0..=n, n as usize).prop_map(move |targets| {
            targets
                .into_iter()
                .enumerate()
                .map(|(i, to)| (id(i as u64 + 1), FlowlineId::new(to)))
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn walks_never_repeat_and_respect_limit(graph in arb_resolved(), limit in 0_usize..12) {
        for start in graph.ids() {
            let w = walk(&graph, start, WalkLimit::Steps(limit));
            prop_assert_eq!(w.path[0], start);
            prop_assert!(w.path.len() <= limit + 1);
            let unique: BTreeSet<_> = w.path.iter().copied().collect();
            prop_assert_eq!(unique.len(), w.path.len());
        }
    }

    #[test]
    fn topo_order_partitions_ids(graph in arb_resolved()) {
        let topo = upstream_first(&graph);
        prop_assert_eq!(topo.order.len() + topo.leftover.len(), graph.len());

        let position: std::collections::BTreeMap<_, _> =
            topo.order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        for (from, to) in graph.edges() {
            if let (Some(a), Some(b)) = (position.get(&from), position.get(&to)) {
                prop_assert!(a < b);
            }
        }
        // leftover is exactly what cycles feed
        prop_assert_eq!(topo.is_complete(), cycles(&graph).is_empty());
    }
}
