//! Core routing graph data structures.

use std::collections::{BTreeMap, BTreeSet};

use sn_core::FlowlineId;

/// Anything a downstream walk can traverse.
pub trait Routing {
    /// True if `id` has an entry (possibly an outlet) in the graph.
    fn contains(&self, id: FlowlineId) -> bool;

    /// The single downstream step a walk takes from `id`.
    ///
    /// `None` means the outlet, or that `id` is not in the graph.
    fn step(&self, id: FlowlineId) -> Option<FlowlineId>;

    /// Every `(from, to)` connection; outlet connections are not listed.
    fn edges(&self) -> impl Iterator<Item = (FlowlineId, FlowlineId)> + '_;
}

/// Multi-valued routing as read from the edge table.
///
/// Each flowline maps to its ordered, de-duplicated list of downstream
/// candidates. An empty list is an outlet; two or more is a divergence.
/// Candidate order is input order and is the tie-break order at divergences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGraph {
    pub(crate) candidates: BTreeMap<FlowlineId, Vec<FlowlineId>>,
}

impl RawGraph {
    /// Number of flowlines with an entry.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Flowline ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = FlowlineId> + '_ {
        self.candidates.keys().copied()
    }

    /// Iterate `(id, candidates)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (FlowlineId, &[FlowlineId])> + '_ {
        self.candidates.iter().map(|(&id, c)| (id, c.as_slice()))
    }

    /// Downstream candidates of `id` (empty for outlets and unknown ids).
    pub fn candidates(&self, id: FlowlineId) -> &[FlowlineId] {
        self.candidates.get(&id).map_or(&[], Vec::as_slice)
    }

    /// True if `id` routes to more than one candidate.
    pub fn is_divergence(&self, id: FlowlineId) -> bool {
        self.candidates(id).len() > 1
    }

    /// Number of divergences in the graph.
    pub fn divergence_count(&self) -> usize {
        self.candidates.values().filter(|c| c.len() > 1).count()
    }

    /// Copy of the graph limited to `keep`.
    ///
    /// Entries outside `keep` are removed and candidates outside `keep` are
    /// pruned, so a walk treats them as the outlet.
    pub fn restricted(&self, keep: &BTreeSet<FlowlineId>) -> RawGraph {
        let candidates = self
            .candidates
            .iter()
            .filter(|(id, _)| keep.contains(id))
            .map(|(&id, c)| {
                let kept = c.iter().copied().filter(|to| keep.contains(to)).collect();
                (id, kept)
            })
            .collect();
        RawGraph { candidates }
    }
}

impl Routing for RawGraph {
    fn contains(&self, id: FlowlineId) -> bool {
        self.candidates.contains_key(&id)
    }

    /// Walks over a multi-valued graph follow the last candidate in input order.
    fn step(&self, id: FlowlineId) -> Option<FlowlineId> {
        self.candidates(id).last().copied()
    }

    fn edges(&self) -> impl Iterator<Item = (FlowlineId, FlowlineId)> + '_ {
        self.candidates
            .iter()
            .flat_map(|(&from, c)| c.iter().map(move |&to| (from, to)))
    }
}

/// Single-valued routing: every flowline has exactly one target.
///
/// A target of `None` is the outlet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedGraph {
    pub(crate) targets: BTreeMap<FlowlineId, Option<FlowlineId>>,
}

impl ResolvedGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target of `id`, replacing any previous one.
    pub fn insert(&mut self, id: FlowlineId, target: Option<FlowlineId>) {
        self.targets.insert(id, target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Flowline ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = FlowlineId> + '_ {
        self.targets.keys().copied()
    }

    /// Iterate `(id, target)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (FlowlineId, Option<FlowlineId>)> + '_ {
        self.targets.iter().map(|(&id, &to)| (id, to))
    }

    /// Target of `id`: `None` if `id` is unknown, `Some(None)` for an outlet.
    pub fn target(&self, id: FlowlineId) -> Option<Option<FlowlineId>> {
        self.targets.get(&id).copied()
    }

    /// Copy of the graph limited to `keep`; targets outside `keep` become outlets.
    pub fn restricted(&self, keep: &BTreeSet<FlowlineId>) -> ResolvedGraph {
        let targets = self
            .targets
            .iter()
            .filter(|(id, _)| keep.contains(id))
            .map(|(&id, &to)| (id, to.filter(|t| keep.contains(t))))
            .collect();
        ResolvedGraph { targets }
    }
}

impl FromIterator<(FlowlineId, Option<FlowlineId>)> for ResolvedGraph {
    fn from_iter<I: IntoIterator<Item = (FlowlineId, Option<FlowlineId>)>>(iter: I) -> Self {
        ResolvedGraph {
            targets: iter.into_iter().collect(),
        }
    }
}

impl Routing for ResolvedGraph {
    fn contains(&self, id: FlowlineId) -> bool {
        self.targets.contains_key(&id)
    }

    fn step(&self, id: FlowlineId) -> Option<FlowlineId> {
        self.targets.get(&id).copied().flatten()
    }

    fn edges(&self) -> impl Iterator<Item = (FlowlineId, FlowlineId)> + '_ {
        self.targets
            .iter()
            .filter_map(|(&from, &to)| to.map(|to| (from, to)))
    }
}

/// Upstream view of a routing graph: id -> flowlines that route into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseGraph {
    upstream: BTreeMap<FlowlineId, Vec<FlowlineId>>,
}

impl ReverseGraph {
    /// Invert a single- or multi-valued graph.
    pub fn of<R: Routing>(graph: &R) -> Self {
        let mut upstream: BTreeMap<FlowlineId, Vec<FlowlineId>> = BTreeMap::new();
        for (from, to) in graph.edges() {
            upstream.entry(to).or_default().push(from);
        }
        Self { upstream }
    }

    /// Flowlines routing into `id`, in ascending order.
    pub fn upstream(&self, id: FlowlineId) -> &[FlowlineId] {
        self.upstream.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Number of flowlines routing into `id`.
    pub fn contributor_count(&self, id: FlowlineId) -> usize {
        self.upstream(id).len()
    }

    /// True if more than one flowline routes into `id`.
    pub fn is_junction(&self, id: FlowlineId) -> bool {
        self.contributor_count(id) > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;

    fn id(raw: u64) -> FlowlineId {
        FlowlineId::new(raw).unwrap()
    }

    #[test]
    fn raw_step_follows_last_candidate() {
        let graph = GraphBuilder::from_raw_edges([(1, 2), (1, 3), (1, 4)])
            .unwrap()
            .build();
        assert_eq!(graph.step(id(1)), Some(id(4)));
        assert!(graph.is_divergence(id(1)));
        assert_eq!(graph.divergence_count(), 1);
    }

    #[test]
    fn restricted_prunes_candidates_and_keys() {
        let graph = GraphBuilder::from_raw_edges([(1, 2), (1, 3), (2, 0), (3, 0)])
            .unwrap()
            .build();
        let keep: BTreeSet<_> = [id(1), id(2)].into_iter().collect();
        let sub = graph.restricted(&keep);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.candidates(id(1)), &[id(2)]);
        assert!(!sub.contains(id(3)));
    }

    #[test]
    fn reverse_of_raw_lists_every_candidate_pair() {
        let graph = GraphBuilder::from_raw_edges([(1, 3), (2, 3), (1, 4)])
            .unwrap()
            .build();
        let rev = ReverseGraph::of(&graph);
        assert_eq!(rev.upstream(id(3)), &[id(1), id(2)]);
        assert_eq!(rev.upstream(id(4)), &[id(1)]);
        assert!(rev.is_junction(id(3)));
        assert_eq!(rev.contributor_count(id(1)), 0);
    }

    #[test]
    fn resolved_restricted_reroutes_to_outlet() {
        let resolved: ResolvedGraph = [(id(1), Some(id(2))), (id(2), Some(id(3))), (id(3), None)]
            .into_iter()
            .collect();
        let keep: BTreeSet<_> = [id(1), id(2)].into_iter().collect();
        let sub = resolved.restricted(&keep);
        assert_eq!(sub.target(id(2)), Some(None));
        assert_eq!(sub.target(id(1)), Some(Some(id(2))));
        assert_eq!(sub.target(id(3)), None);
    }
}
