//! Attribute-based culling ahead of graph resolution.

use std::collections::BTreeSet;

use sn_core::{ElevationBounds, FlowlineId, Real};
use sn_graph::{RawGraph, Routing};
use tracing::{debug, info};

use crate::error::RoutingResult;
use crate::flowline::{FCODE_INTERMITTENT, FlowlineTable};
use crate::report::{DropReason, DropReport};

/// Thresholds for culling flowlines by their attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullParams {
    /// Drop flowlines that never appear as an edge source.
    pub cull_invalid: bool,
    /// Minimum NHDPlus arbolate sum to keep, km.
    pub asum_thresh_km: Option<Real>,
    /// Minimum NHDPlus arbolate sum to keep for intermittent streams, km.
    pub intermittent_asum_thresh_km: Option<Real>,
    /// Drop flowlines whose NHDPlus elevation is under the lower bound.
    pub cull_invalid_elevations: bool,
}

/// Active set left after culling, and what was removed.
#[derive(Debug, Clone, Default)]
pub struct CullOutcome {
    pub active: BTreeSet<FlowlineId>,
    pub dropped: DropReport,
}

/// Remove active flowlines that fail the attribute checks.
///
/// Checks run in a fixed order and each flowline is reported under the
/// first check it fails.
pub fn cull_flowlines(
    graph: &RawGraph,
    table: &FlowlineTable,
    active: &BTreeSet<FlowlineId>,
    params: &CullParams,
    bounds: ElevationBounds,
) -> RoutingResult<CullOutcome> {
    let mut dropped = DropReport::new();

    for &id in active {
        let flowline = table.require(id)?;

        let reason = if params.cull_invalid && !graph.contains(id) {
            Some(DropReason::Invalid)
        } else if params
            .asum_thresh_km
            .is_some_and(|t| flowline.nhd_arbolate_sum_km < t)
        {
            Some(DropReason::BelowAsumThreshold)
        } else if params.intermittent_asum_thresh_km.is_some_and(|t| {
            flowline.fcode == FCODE_INTERMITTENT && flowline.nhd_arbolate_sum_km < t
        }) {
            Some(DropReason::Intermittent)
        } else if params.cull_invalid_elevations
            && flowline.nhd_min_elev.is_some_and(|e| e <= bounds.min)
        {
            Some(DropReason::InvalidElevation)
        } else {
            None
        };

        if let Some(reason) = reason {
            debug!(%id, %reason, "culling flowline");
            dropped.record(id, reason);
        }
    }

    let active: BTreeSet<FlowlineId> = active
        .iter()
        .copied()
        .filter(|&id| dropped.reason(id).is_none())
        .collect();

    info!(
        kept = active.len(),
        dropped = dropped.len(),
        "culled flowlines by attributes"
    );

    Ok(CullOutcome { active, dropped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowline::Flowline;
    use sn_graph::GraphBuilder;

    fn id(raw: u64) -> FlowlineId {
        FlowlineId::new(raw).unwrap()
    }

    fn flowline(raw: u64, asum: Real, fcode: u32) -> Flowline {
        Flowline {
            nhd_arbolate_sum_km: asum,
            fcode,
            ..Flowline::new(id(raw), 1.0)
        }
    }

    #[test]
    fn thresholds_applied_in_order() {
        let table = FlowlineTable::from_rows([
            flowline(1, 50.0, 46006),
            flowline(2, 5.0, 46006),
            flowline(3, 15.0, FCODE_INTERMITTENT),
            flowline(4, 50.0, FCODE_INTERMITTENT),
            flowline(5, 50.0, 46006),
        ])
        .unwrap();
        // 5 has no routing rows
        let graph = GraphBuilder::from_raw_edges([(1, 0), (2, 1), (3, 1), (4, 1)])
            .unwrap()
            .build();
        let params = CullParams {
            cull_invalid: true,
            asum_thresh_km: Some(10.0),
            intermittent_asum_thresh_km: Some(20.0),
            cull_invalid_elevations: false,
        };

        let out = cull_flowlines(
            &graph,
            &table,
            &table.active_set(),
            &params,
            ElevationBounds::default(),
        )
        .unwrap();

        assert_eq!(out.active, [id(1), id(4)].into_iter().collect());
        assert_eq!(out.dropped.reason(id(2)), Some(DropReason::BelowAsumThreshold));
        assert_eq!(out.dropped.reason(id(3)), Some(DropReason::Intermittent));
        assert_eq!(out.dropped.reason(id(5)), Some(DropReason::Invalid));
    }

    #[test]
    fn invalid_nhd_elevation_culled() {
        let mut low = flowline(2, 50.0, 46006);
        low.nhd_min_elev = Some(-9998.0);
        let table = FlowlineTable::from_rows([flowline(1, 50.0, 46006), low]).unwrap();
        let graph = GraphBuilder::from_raw_edges([(1, 0), (2, 1)]).unwrap().build();
        let params = CullParams {
            cull_invalid_elevations: true,
            ..CullParams::default()
        };

        let out = cull_flowlines(
            &graph,
            &table,
            &table.active_set(),
            &params,
            ElevationBounds::default(),
        )
        .unwrap();
        assert_eq!(out.dropped.reason(id(2)), Some(DropReason::InvalidElevation));
        assert!(out.active.contains(&id(1)));
    }

    #[test]
    fn default_params_keep_everything() {
        let table = FlowlineTable::from_rows([flowline(1, 0.1, FCODE_INTERMITTENT)]).unwrap();
        let graph = RawGraph::default();
        let out = cull_flowlines(
            &graph,
            &table,
            &table.active_set(),
            &CullParams::default(),
            ElevationBounds::default(),
        )
        .unwrap();
        assert_eq!(out.active.len(), 1);
        assert!(out.dropped.is_empty());
    }
}
