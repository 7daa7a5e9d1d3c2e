//! Output tables of a preprocessing run.

use serde::Serialize;
use sn_core::{FlowlineId, downstream_to_raw};
use sn_graph::ResolvedGraph;
use sn_routing::{
    ArbolateSums, Diagnostics, DropReport, ElevationProfile, FlowlineTable, Resolution,
    WidthParams, width_from_arbolate_sum,
};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingRow {
    pub id: u64,
    /// 0 for an outlet.
    pub resolved_to_id: u64,
    pub is_main_channel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationRow {
    pub id: u64,
    pub elevup: f64,
    pub elevdn: f64,
    pub smoothed_upstream_elev: f64,
    pub smoothed_downstream_elev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbolateSumRow {
    pub id: u64,
    pub recomputed_asum_km: f64,
    pub nhd_asum_km: f64,
    pub asum_diff_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidthRow {
    pub id: u64,
    /// Width at the upstream end.
    pub width1: f64,
    /// Width at the downstream end.
    pub width2: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropRow {
    pub id: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticsRow {
    pub missing_elevations: usize,
    pub unresolved_isolation_walks: usize,
    pub isolation_walk_cycles: usize,
    pub resolved_cycles: usize,
    pub cyclic_elevation_nodes: usize,
}

/// Everything a run produces, one row per flowline in each table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreprocessOutput {
    pub length_units: String,
    pub routing: Vec<RoutingRow>,
    pub elevations: Vec<ElevationRow>,
    pub arbolate_sums: Vec<ArbolateSumRow>,
    pub widths: Vec<WidthRow>,
    pub dropped: Vec<DropRow>,
    pub diagnostics: DiagnosticsRow,
}

impl PreprocessOutput {
    pub fn routing_for(&self, id: FlowlineId) -> Option<&RoutingRow> {
        self.routing.iter().find(|r| r.id == id.get())
    }

    pub fn arbolate_sum_for(&self, id: FlowlineId) -> Option<&ArbolateSumRow> {
        self.arbolate_sums.iter().find(|r| r.id == id.get())
    }
}

/// Pass results the output tables are assembled from.
pub(crate) struct PassResults<'a> {
    pub table: &'a FlowlineTable,
    pub final_routing: &'a ResolvedGraph,
    pub resolution: &'a Resolution,
    pub profile: &'a ElevationProfile,
    pub sums: &'a ArbolateSums,
    pub dropped: &'a DropReport,
    pub diagnostics: Diagnostics,
    pub width: &'a WidthParams,
}

pub(crate) fn assemble(results: PassResults<'_>) -> AppResult<PreprocessOutput> {
    let PassResults {
        table,
        final_routing,
        resolution,
        profile,
        sums,
        dropped,
        diagnostics,
        width,
    } = results;

    let mut out = PreprocessOutput {
        length_units: width.output_units.to_string(),
        ..PreprocessOutput::default()
    };

    for (id, target) in final_routing.iter() {
        let flowline = table.require(id).map_err(AppError::from)?;
        out.routing.push(RoutingRow {
            id: id.get(),
            resolved_to_id: downstream_to_raw(target),
            is_main_channel: resolution.is_main_channel(id),
        });

        let node = profile.get(id).ok_or_else(|| {
            AppError::Routing(format!("no elevations computed for flowline {id}"))
        })?;
        out.elevations.push(ElevationRow {
            id: id.get(),
            elevup: node.elevup,
            elevdn: node.elevdn,
            smoothed_upstream_elev: node.elevupsmo,
            smoothed_downstream_elev: node.elevdnsmo,
        });

        let asum = sums
            .value(id, table)
            .unwrap_or(flowline.nhd_arbolate_sum_km);
        out.arbolate_sums.push(ArbolateSumRow {
            id: id.get(),
            recomputed_asum_km: asum,
            nhd_asum_km: flowline.nhd_arbolate_sum_km,
            asum_diff_km: flowline.nhd_arbolate_sum_km - asum,
        });

        out.widths.push(WidthRow {
            id: id.get(),
            width1: width_from_arbolate_sum(asum - flowline.length_km, width),
            width2: width_from_arbolate_sum(asum, width),
        });
    }

    out.dropped = dropped
        .iter()
        .map(|(id, reason)| DropRow {
            id: id.get(),
            reason: reason.to_string(),
        })
        .collect();

    out.diagnostics = DiagnosticsRow {
        missing_elevations: diagnostics.missing_elevations,
        unresolved_isolation_walks: diagnostics.unresolved_isolation_walks,
        isolation_walk_cycles: diagnostics.isolation_walk_cycles,
        resolved_cycles: diagnostics.resolved_cycles,
        cyclic_elevation_nodes: profile.cyclic,
    };

    Ok(out)
}
