//! Removal of flowline chains cut off from the network.
//!
//! After culling, a perennial segment that only drains into a dropped
//! intermittent segment no longer reaches the modeled network. Such chains
//! are found by walking downstream from every active flowline: reaching a
//! flowline that is inside the domain but not in the active set means the
//! connection was severed, and the whole traced path goes.

use std::collections::BTreeSet;

use sn_core::FlowlineId;
use sn_graph::{RawGraph, WalkLimit, WalkStop, walk};
use tracing::{debug, info, warn};

use crate::flowline::{FCODE_COASTLINE, FlowlineTable};

/// Settings for the isolation filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolationParams {
    /// Downstream steps examined per flowline.
    pub walk_limit: WalkLimit,
    /// FCODEs that never count as a severed connection (e.g. coastline).
    pub excluded_fcodes: BTreeSet<u32>,
}

impl Default for IsolationParams {
    fn default() -> Self {
        Self {
            walk_limit: WalkLimit::Steps(10),
            excluded_fcodes: BTreeSet::from([FCODE_COASTLINE]),
        }
    }
}

/// Result of the isolation filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsolationOutcome {
    /// Active set with isolated flowlines removed.
    pub active: BTreeSet<FlowlineId>,
    /// Active flowlines removed by this run.
    pub removed: BTreeSet<FlowlineId>,
    /// Walks that used up the step limit without deciding (kept).
    pub unresolved: usize,
    /// Walks that ended in a routing loop without deciding (kept).
    pub cycles: usize,
    /// Sweeps over the active set until nothing more was dropped.
    pub passes: usize,
}

/// Drop active flowlines whose downstream path leaves the network inside the domain.
///
/// `drop_set` is the running DropSet: flowlines already in it are never
/// re-walked, and reaching one marks the path as severed. It is extended with
/// every node on each severed path, including the inactive node that severed
/// it. Sweeps repeat until one adds nothing, so the filter is idempotent.
///
/// A walk that ends on the step limit or in a loop without meeting a severed
/// node keeps its flowlines. Because later sweeps treat dropped flowlines as
/// severed, a chain longer than the limit still goes once the flowlines
/// within reach of its start have been dropped.
pub fn filter_isolated(
    graph: &RawGraph,
    table: &FlowlineTable,
    active: &BTreeSet<FlowlineId>,
    drop_set: &mut BTreeSet<FlowlineId>,
    params: &IsolationParams,
) -> IsolationOutcome {
    // ids missing from the flowline table behave as the outlet
    let routing = graph.restricted(&table.ids());

    let is_severed = |id: FlowlineId, drop_set: &BTreeSet<FlowlineId>| {
        if drop_set.contains(&id) {
            return true;
        }
        if active.contains(&id) {
            return false;
        }
        table
            .get(id)
            .is_some_and(|f| f.in_domain && !params.excluded_fcodes.contains(&f.fcode))
    };

    let mut passes = 0;
    let (unresolved, cycles) = loop {
        passes += 1;
        let mut added = 0;
        let mut unresolved = 0;
        let mut cycles = 0;

        for &start in active {
            if drop_set.contains(&start) {
                continue;
            }
            let w = walk(&routing, start, params.walk_limit);
            let cut = w
                .path
                .iter()
                .skip(1)
                .position(|&id| is_severed(id, drop_set))
                .map(|j| j + 1);

            match cut {
                Some(j) => {
                    debug!(%start, severed_at = %w.path[j], "dropping isolated path");
                    for &id in &w.path[..=j] {
                        if drop_set.insert(id) {
                            added += 1;
                        }
                    }
                }
                None => match w.stop {
                    WalkStop::Limit => unresolved += 1,
                    WalkStop::Cycle => cycles += 1,
                    WalkStop::Outlet => {}
                },
            }
        }

        if added == 0 {
            break (unresolved, cycles);
        }
    };

    let removed: BTreeSet<FlowlineId> = active
        .iter()
        .copied()
        .filter(|id| drop_set.contains(id))
        .collect();
    let kept: BTreeSet<FlowlineId> = active.difference(&removed).copied().collect();

    info!(
        removed = removed.len(),
        of = active.len(),
        passes,
        "removed isolated flowlines"
    );
    if unresolved > 0 {
        warn!(
            count = unresolved,
            "isolation walks hit the step limit; flowlines kept"
        );
    }
    if cycles > 0 {
        warn!(count = cycles, "isolation walks ended in routing loops; flowlines kept");
    }

    IsolationOutcome {
        active: kept,
        removed,
        unresolved,
        cycles,
        passes,
    }
}
