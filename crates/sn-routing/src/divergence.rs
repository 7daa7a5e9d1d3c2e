//! Main-channel selection at divergences.
//!
//! NHDPlus main/minor path codes are often wrong where flow splits, so the
//! main channel is chosen from sampled elevations instead: the candidate with
//! the lowest elevation metric is the hydraulically preferred path. Known
//! connections override the elevation ranking.

use std::collections::{BTreeMap, BTreeSet};

use sn_core::{ElevationBounds, FlowlineId, Real};
use sn_graph::validate::validate_resolved;
use sn_graph::{RawGraph, ResolvedGraph, Routing};
use tracing::{debug, info, warn};

use crate::error::{RoutingError, RoutingResult};
use crate::flowline::FlowlineTable;

/// Forced routing at divergences: `from -> to`.
pub type KnownConnections = BTreeMap<FlowlineId, FlowlineId>;

/// Single-valued routing and the distributaries that lost out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: ResolvedGraph,
    /// Non-primary distributaries (MinorSet), limited to the active set.
    pub minor: BTreeSet<FlowlineId>,
    /// Divergences encountered.
    pub divergences: usize,
    /// Divergences settled by a known connection.
    pub overridden: usize,
    /// Candidates ranked without a valid elevation.
    pub missing_elevations: usize,
}

impl Resolution {
    /// Main-channel flag: anything that is not a minor distributary.
    pub fn is_main_channel(&self, id: FlowlineId) -> bool {
        !self.minor.contains(&id)
    }
}

/// Pick one downstream target for every active flowline.
///
/// Per flowline, in priority order:
/// 1. a single candidate is the target
/// 2. no candidates means the outlet
/// 3. a known connection picks the target
/// 4. otherwise the candidate with the strictly lowest valid elevation wins,
///    ties going to the earliest candidate; a missing elevation ranks last
///
/// Losing candidates become minor distributaries. Targets outside the active
/// set are rewritten to the outlet.
pub fn resolve_divergences(
    graph: &RawGraph,
    table: &FlowlineTable,
    active: &BTreeSet<FlowlineId>,
    known: &KnownConnections,
    bounds: ElevationBounds,
) -> RoutingResult<Resolution> {
    check_known_connections(graph, active, known)?;

    let elevation = |id: FlowlineId| table.get(id).and_then(|f| bounds.filter(f.elevation_metric));

    let mut out = Resolution::default();
    let mut minor = BTreeSet::new();

    for &id in active {
        let candidates = graph.candidates(id);
        let target = match candidates {
            [] => None,
            [only] => Some(*only),
            _ => {
                out.divergences += 1;
                let chosen = if let Some(&forced) = known.get(&id) {
                    out.overridden += 1;
                    debug!(%id, to = %forced, "divergence routed by known connection");
                    forced
                } else {
                    let (chosen, missing) = lowest_candidate(candidates, elevation);
                    out.missing_elevations += missing;
                    debug!(%id, to = %chosen, "divergence routed to lowest candidate");
                    chosen
                };
                minor.extend(candidates.iter().copied().filter(|&c| c != chosen));
                Some(chosen)
            }
        };

        let target = target.filter(|t| active.contains(t));
        out.resolved.insert(id, target);
    }

    out.minor = minor.intersection(active).copied().collect();
    validate_resolved(&out.resolved, active)?;

    info!(
        divergences = out.divergences,
        overridden = out.overridden,
        minor = out.minor.len(),
        "resolved divergences"
    );
    if out.missing_elevations > 0 {
        warn!(
            count = out.missing_elevations,
            "divergence candidates without a valid elevation"
        );
    }

    Ok(out)
}

/// Candidate with the strictly lowest elevation; ties keep the earlier one.
///
/// Returns the winner and how many candidates had no valid elevation.
fn lowest_candidate(
    candidates: &[FlowlineId],
    elevation: impl Fn(FlowlineId) -> Option<Real>,
) -> (FlowlineId, usize) {
    let mut missing = 0;
    let mut best = candidates[0];
    let mut best_elev = Real::INFINITY;
    for (i, &c) in candidates.iter().enumerate() {
        let elev = match elevation(c) {
            Some(e) => e,
            None => {
                missing += 1;
                Real::INFINITY
            }
        };
        if i == 0 || elev < best_elev {
            best = c;
            best_elev = elev;
        }
    }
    (best, missing)
}

/// Every known connection for an active flowline must name one of its candidates.
fn check_known_connections(
    graph: &RawGraph,
    active: &BTreeSet<FlowlineId>,
    known: &KnownConnections,
) -> RoutingResult<()> {
    for (&from, &to) in known {
        if !active.contains(&from) {
            debug!(%from, %to, "known connection for inactive flowline ignored");
            continue;
        }
        if !graph.contains(from) {
            return Err(RoutingError::OverrideConflict {
                from,
                to,
                reason: "source has no routing rows",
            });
        }
        if !graph.candidates(from).contains(&to) {
            return Err(RoutingError::OverrideConflict {
                from,
                to,
                reason: "target is not a downstream candidate",
            });
        }
    }
    Ok(())
}
