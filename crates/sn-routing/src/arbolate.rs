//! Arbolate sums for minor distributaries.
//!
//! NHDPlus carries the full upstream length onto both branches of a split, so
//! a minor distributary inherits the arbolate sum of the main stem. Along each
//! minor branch the sum is rebuilt from the branch's own lengths, up to the
//! first junction where other flow joins.

use std::collections::{BTreeMap, BTreeSet};

use sn_core::{FlowlineId, Real};
use sn_graph::{ResolvedGraph, ReverseGraph, WalkLimit, walk};
use tracing::{debug, info};

use crate::error::{RoutingError, RoutingResult};
use crate::flowline::FlowlineTable;

/// Recomputed arbolate sums, km. Flowlines without an entry keep the NHDPlus value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArbolateSums {
    recomputed: BTreeMap<FlowlineId, Real>,
}

impl ArbolateSums {
    pub fn recomputed(&self, id: FlowlineId) -> Option<Real> {
        self.recomputed.get(&id).copied()
    }

    /// Arbolate sum to use for `id`, km.
    pub fn value(&self, id: FlowlineId, table: &FlowlineTable) -> Option<Real> {
        self.recomputed(id)
            .or_else(|| table.get(id).map(|f| f.nhd_arbolate_sum_km))
    }

    pub fn len(&self) -> usize {
        self.recomputed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recomputed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlowlineId, Real)> + '_ {
        self.recomputed.iter().map(|(&id, &v)| (id, v))
    }
}

/// Rebuild arbolate sums downstream of every minor distributary.
///
/// From each minor flowline, in ascending id order, the resolved routing is
/// followed downstream accumulating `length_km`. The walk stops, without
/// assigning, at the first flowline with more than one contributor. A flowline
/// reached from several minor branches keeps the largest sum.
pub fn recompute_arbolate_sums(
    resolved: &ResolvedGraph,
    reverse: &ReverseGraph,
    minor: &BTreeSet<FlowlineId>,
    table: &FlowlineTable,
) -> RoutingResult<ArbolateSums> {
    let mut recomputed: BTreeMap<FlowlineId, Real> = BTreeMap::new();

    for &start in minor {
        let path = walk(resolved, start, WalkLimit::Unbounded).path;
        let mut sum = 0.0;
        for id in path {
            if reverse.contributor_count(id) > 1 {
                debug!(%start, junction = %id, "minor branch reached a junction");
                break;
            }
            sum += table.require(id)?.length_km;
            recomputed
                .entry(id)
                .and_modify(|v| *v = v.max(sum))
                .or_insert(sum);
        }
    }

    info!(
        minor = minor.len(),
        recomputed = recomputed.len(),
        "recomputed arbolate sums"
    );

    Ok(ArbolateSums { recomputed })
}

/// Drop flowlines whose arbolate sum is below `threshold_km`.
///
/// Returns the pruned routing and the removed ids. Survivors draining into a
/// removed flowline are routed to the outlet.
pub fn prune_below_threshold(
    resolved: &ResolvedGraph,
    sums: &ArbolateSums,
    table: &FlowlineTable,
    threshold_km: Real,
) -> RoutingResult<(ResolvedGraph, BTreeSet<FlowlineId>)> {
    if !threshold_km.is_finite() || threshold_km < 0.0 {
        return Err(RoutingError::InvalidParameter {
            what: format!("arbolate sum threshold must be finite and >= 0, got {threshold_km}"),
        });
    }

    let mut keep = BTreeSet::new();
    let mut removed = BTreeSet::new();
    for id in resolved.ids() {
        let asum = sums.value(id, table).ok_or(RoutingError::MissingAttribute {
            id,
            attribute: "arbolate sum",
        })?;
        if asum < threshold_km {
            removed.insert(id);
        } else {
            keep.insert(id);
        }
    }

    info!(
        removed = removed.len(),
        threshold_km, "pruned flowlines below arbolate sum threshold"
    );

    Ok((resolved.restricted(&keep), removed))
}
