//! Downstream-monotonic flowline end elevations.
//!
//! NHDPlus elevation attributes are biased high near diversions, so end
//! elevations come from the sampled elevation metric and are smoothed so that
//! water never runs uphill along the resolved routing.

use std::collections::BTreeMap;

use sn_core::{ElevationBounds, FlowlineId, Real};
use sn_graph::{ResolvedGraph, ReverseGraph, Routing, upstream_first};
use tracing::{info, warn};

use crate::error::{RoutingError, RoutingResult};
use crate::flowline::FlowlineTable;

/// Raw and smoothed end elevations of one flowline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeElevations {
    /// Upstream-end elevation before smoothing.
    pub elevup: Real,
    /// Downstream-end elevation before smoothing.
    pub elevdn: Real,
    /// Smoothed upstream-end elevation.
    pub elevupsmo: Real,
    /// Smoothed downstream-end elevation.
    pub elevdnsmo: Real,
}

/// End elevations for every flowline in a resolved graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElevationProfile {
    pub nodes: BTreeMap<FlowlineId, NodeElevations>,
    /// Flowlines on or below a routing cycle, settled by fixed-point relaxation.
    pub cyclic: usize,
}

impl ElevationProfile {
    pub fn get(&self, id: FlowlineId) -> Option<&NodeElevations> {
        self.nodes.get(&id)
    }
}

/// Smooth end elevations along `resolved`.
///
/// For each flowline `c`, with `e` the valid sampled elevation:
/// - `elevdn(c)` is `e(c)`, falling back to the NHDPlus minimum elevation
/// - `elevup(c)` is the lowest `e` of its contributors, else `e(c)`, else `elevdn(c)`
/// - `elevupsmo(c)` is `elevup(c)` clipped to every contributor's `elevdnsmo`
/// - `elevdnsmo(c)` is `elevdn(c)` clipped to `elevupsmo(c)`
///
/// Flowlines are processed upstream first, so for every edge `u -> d`:
/// `elevdnsmo(u) >= elevupsmo(d) >= elevdnsmo(d)`.
pub fn smooth_elevations(
    resolved: &ResolvedGraph,
    table: &FlowlineTable,
    bounds: ElevationBounds,
) -> RoutingResult<ElevationProfile> {
    let reverse = ReverseGraph::of(resolved);
    let sampled = |id: FlowlineId| table.get(id).and_then(|f| bounds.filter(f.elevation_metric));

    let mut raw: BTreeMap<FlowlineId, (Real, Real)> = BTreeMap::new();
    for id in resolved.ids() {
        let flowline = table.require(id)?;
        let elevdn = sampled(id)
            .or(flowline.nhd_min_elev)
            .ok_or(RoutingError::MissingAttribute {
                id,
                attribute: "elevation_metric",
            })?;
        let elevup = reverse
            .upstream(id)
            .iter()
            .filter_map(|&u| sampled(u))
            .reduce(Real::min)
            .or_else(|| sampled(id))
            .unwrap_or(elevdn);
        raw.insert(id, (elevup, elevdn));
    }

    let topo = upstream_first(resolved);
    let mut smoothed: BTreeMap<FlowlineId, (Real, Real)> = BTreeMap::new();

    for &id in &topo.order {
        let (elevup, elevdn) = raw[&id];
        let up = reverse
            .upstream(id)
            .iter()
            .filter_map(|u| smoothed.get(u).map(|&(_, dn)| dn))
            .fold(elevup, Real::min);
        smoothed.insert(id, (up, elevdn.min(up)));
    }

    if !topo.is_complete() {
        for &id in &topo.leftover {
            let (elevup, elevdn) = raw[&id];
            smoothed.insert(id, (elevup, elevdn.min(elevup)));
        }
        // values only decrease and are drawn from a finite set, so this settles
        loop {
            let mut changed = false;
            for &id in &topo.leftover {
                let (up0, dn0) = smoothed[&id];
                let up = reverse
                    .upstream(id)
                    .iter()
                    .filter_map(|u| smoothed.get(u).map(|&(_, dn)| dn))
                    .fold(up0, Real::min);
                let dn = dn0.min(up);
                if up < up0 || dn < dn0 {
                    smoothed.insert(id, (up, dn));
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        warn!(
            count = topo.leftover.len(),
            "flowlines on or below routing cycles; elevations relaxed to a fixed point"
        );
    }

    let nodes = raw
        .into_iter()
        .map(|(id, (elevup, elevdn))| {
            let (elevupsmo, elevdnsmo) = smoothed[&id];
            (
                id,
                NodeElevations {
                    elevup,
                    elevdn,
                    elevupsmo,
                    elevdnsmo,
                },
            )
        })
        .collect();

    info!(flowlines = resolved.len(), "smoothed elevations");

    Ok(ElevationProfile {
        nodes,
        cyclic: topo.leftover.len(),
    })
}

/// Edges `u -> d` along which smoothed elevation rises, plus flowlines whose
/// smoothed downstream end is above their upstream end (reported as `(c, c)`).
pub fn monotonic_violations(
    resolved: &ResolvedGraph,
    profile: &ElevationProfile,
) -> Vec<(FlowlineId, FlowlineId)> {
    let mut bad = Vec::new();
    for (id, node) in &profile.nodes {
        if node.elevdnsmo > node.elevupsmo {
            bad.push((*id, *id));
        }
    }
    for (u, d) in resolved.edges() {
        if let (Some(up), Some(down)) = (profile.get(u), profile.get(d)) {
            if down.elevupsmo > up.elevdnsmo || down.elevdnsmo > up.elevdnsmo {
                bad.push((u, d));
            }
        }
    }
    bad
}
