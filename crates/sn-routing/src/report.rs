//! Drop bookkeeping and non-fatal diagnostics.

use std::collections::BTreeMap;
use std::fmt;

use sn_core::FlowlineId;

/// Why a flowline was removed from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    /// No routing rows for the flowline.
    Invalid,
    /// NHDPlus arbolate sum under the general threshold.
    BelowAsumThreshold,
    /// Intermittent stream under the intermittent threshold.
    Intermittent,
    /// NHDPlus elevation attribute outside the valid range.
    InvalidElevation,
    /// Drains into flowlines that are no longer part of the network.
    Isolated,
    /// Recomputed arbolate sum under the minor-distributary threshold.
    BelowLengthThreshold,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::Invalid => "invalid",
            DropReason::BelowAsumThreshold => "below_asum_threshold",
            DropReason::Intermittent => "intermittent",
            DropReason::InvalidElevation => "invalid_elevation",
            DropReason::Isolated => "isolated",
            DropReason::BelowLengthThreshold => "below_length_threshold",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Removed flowlines with the first reason each was removed for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropReport {
    dropped: BTreeMap<FlowlineId, DropReason>,
}

impl DropReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a drop; a flowline keeps its first reason.
    pub fn record(&mut self, id: FlowlineId, reason: DropReason) -> bool {
        if self.dropped.contains_key(&id) {
            return false;
        }
        self.dropped.insert(id, reason);
        true
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = FlowlineId>, reason: DropReason) {
        for id in ids {
            self.record(id, reason);
        }
    }

    pub fn reason(&self, id: FlowlineId) -> Option<DropReason> {
        self.dropped.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.dropped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dropped.is_empty()
    }

    /// Number of flowlines dropped for `reason`.
    pub fn count(&self, reason: DropReason) -> usize {
        self.dropped.values().filter(|&&r| r == reason).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FlowlineId, DropReason)> + '_ {
        self.dropped.iter().map(|(&id, &r)| (id, r))
    }
}

/// Counts of non-fatal anomalies found during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Divergence candidates ranked without a valid elevation.
    pub missing_elevations: usize,
    /// Isolation walks that ran out of steps before deciding.
    pub unresolved_isolation_walks: usize,
    /// Isolation walks that ended in a routing loop.
    pub isolation_walk_cycles: usize,
    /// Routing cycles left in the resolved graph.
    pub resolved_cycles: usize,
}

impl Diagnostics {
    pub fn has_warnings(&self) -> bool {
        *self != Self::default()
    }
}
