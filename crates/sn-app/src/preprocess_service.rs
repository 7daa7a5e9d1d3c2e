//! Preprocessing pipeline service.
//!
//! Runs the resolution passes in order over one network and collects the
//! output tables:
//! edits -> graph -> culling -> isolation -> divergences -> cycles ->
//! elevations -> arbolate sums -> pruning -> widths.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use sn_core::LengthUnit;
use sn_graph::{ReverseGraph, cycles};
use sn_project::EditScript;
use sn_project::schema::{NetworkDef, PreprocessConfig};
use sn_routing::{
    ArbolateSums, Diagnostics, DropReason, cull_flowlines, filter_isolated, monotonic_violations,
    prune_below_threshold, recompute_arbolate_sums, resolve_divergences, smooth_elevations,
};
use tracing::{info, warn};

use crate::error::AppResult;
use crate::inputs::{NetworkInputs, RunSettings};
use crate::output::{PassResults, PreprocessOutput, assemble};
use crate::progress::{RunProgressEvent, RunStage, RunTimingSummary};
use crate::project_service;

/// Files for one run.
pub struct PreprocessRequest<'a> {
    pub network_path: &'a Path,
    pub config_path: Option<&'a Path>,
    pub edits_path: Option<&'a Path>,
    /// Replaces `output_length_units` from the configuration.
    pub output_units: Option<LengthUnit>,
}

#[derive(Debug, Clone)]
pub struct PreprocessResponse {
    pub output: PreprocessOutput,
    pub timing: RunTimingSummary,
}

struct StageClock<'a, 'cb> {
    progress_cb: &'a mut Option<&'cb mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
    stage_started: Instant,
    timing: RunTimingSummary,
}

impl<'a, 'cb> StageClock<'a, 'cb> {
    fn new(progress_cb: &'a mut Option<&'cb mut dyn FnMut(RunProgressEvent)>) -> Self {
        let now = Instant::now();
        Self {
            progress_cb,
            started: now,
            stage_started: now,
            timing: RunTimingSummary::default(),
        }
    }

    fn begin(&mut self, stage: RunStage) {
        self.stage_started = Instant::now();
        self.emit(stage, None);
    }

    fn end(&mut self, stage: RunStage, message: String) {
        self.timing
            .stages
            .push((stage, self.stage_started.elapsed().as_secs_f64()));
        self.emit(stage, Some(message));
    }

    fn emit(&mut self, stage: RunStage, message: Option<String>) {
        if let Some(cb) = self.progress_cb.as_deref_mut() {
            cb(RunProgressEvent::stage(
                stage,
                self.started.elapsed().as_secs_f64(),
                message,
            ));
        }
    }

    fn finish(mut self) -> RunTimingSummary {
        self.timing.total_time_s = self.started.elapsed().as_secs_f64();
        self.emit(RunStage::Completed, None);
        self.timing
    }
}

/// Load the request's files and run the pipeline.
pub fn run_preprocess_files(
    request: &PreprocessRequest<'_>,
    progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<PreprocessResponse> {
    let network = project_service::load_network(request.network_path)?;
    let mut config = project_service::load_config(request.config_path)?;
    if let Some(units) = request.output_units {
        config.output_length_units = units;
    }
    let edits = match request.edits_path {
        Some(path) => project_service::load_edits(path)?,
        None => EditScript::default(),
    };
    run_preprocess_with_progress(network, &config, &edits, progress_cb)
}

pub fn run_preprocess(
    network: NetworkDef,
    config: &PreprocessConfig,
) -> AppResult<PreprocessResponse> {
    run_preprocess_with_progress(network, config, &EditScript::default(), None)
}

/// Run every pass over `network` and stream stage events to `progress_cb`.
pub fn run_preprocess_with_progress(
    mut network: NetworkDef,
    config: &PreprocessConfig,
    edits: &EditScript,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<PreprocessResponse> {
    let mut clock = StageClock::new(&mut progress_cb);

    if !edits.is_empty() {
        clock.begin(RunStage::ApplyingEdits);
        let summary = sn_project::apply_edits(&mut network, edits)?;
        info!(
            added = summary.added,
            dropped = summary.dropped,
            rerouted = summary.rerouted,
            "applied flowline edits"
        );
        clock.end(
            RunStage::ApplyingEdits,
            format!(
                "{} added, {} dropped, {} rerouted",
                summary.added, summary.dropped, summary.rerouted
            ),
        );
    }

    project_service::validate_inputs(&network, config)?;
    let settings = RunSettings::from_config(config);
    settings.width.validate()?;

    clock.begin(RunStage::BuildingGraph);
    let NetworkInputs {
        table,
        graph,
        edge_rows,
    } = NetworkInputs::from_network(&network)?;
    info!(
        flowlines = table.len(),
        edge_rows,
        divergences = graph.divergence_count(),
        "built raw routing graph"
    );
    clock.end(
        RunStage::BuildingGraph,
        format!("{} flowlines, {} edge rows", table.len(), edge_rows),
    );

    clock.begin(RunStage::CullingAttributes);
    let culled = cull_flowlines(
        &graph,
        &table,
        &table.active_set(),
        &settings.cull,
        settings.bounds,
    )?;
    let mut dropped = culled.dropped;
    clock.end(
        RunStage::CullingAttributes,
        format!("{} culled", dropped.len()),
    );

    clock.begin(RunStage::FilteringIsolated);
    let mut drop_set = BTreeSet::new();
    let isolation = filter_isolated(
        &graph,
        &table,
        &culled.active,
        &mut drop_set,
        &settings.isolation,
    );
    dropped.extend(isolation.removed.iter().copied(), DropReason::Isolated);
    clock.end(
        RunStage::FilteringIsolated,
        format!("{} isolated", isolation.removed.len()),
    );

    clock.begin(RunStage::ResolvingDivergences);
    let resolution = resolve_divergences(
        &graph,
        &table,
        &isolation.active,
        &settings.known_connections,
        settings.bounds,
    )?;
    clock.end(
        RunStage::ResolvingDivergences,
        format!(
            "{} divergences, {} minor distributaries",
            resolution.divergences,
            resolution.minor.len()
        ),
    );

    clock.begin(RunStage::DetectingCycles);
    let loops = cycles(&resolution.resolved);
    if !loops.is_empty() {
        warn!(count = loops.len(), "routing cycles in resolved graph");
    }
    clock.end(RunStage::DetectingCycles, format!("{} cycles", loops.len()));

    clock.begin(RunStage::SmoothingElevations);
    let profile = smooth_elevations(&resolution.resolved, &table, settings.bounds)?;
    let rising = monotonic_violations(&resolution.resolved, &profile);
    if !rising.is_empty() {
        warn!(count = rising.len(), "smoothed elevations rise downstream");
    }
    clock.end(
        RunStage::SmoothingElevations,
        format!("{} flowlines", profile.nodes.len()),
    );

    clock.begin(RunStage::RecomputingArbolateSums);
    let reverse = ReverseGraph::of(&resolution.resolved);
    let sums: ArbolateSums =
        recompute_arbolate_sums(&resolution.resolved, &reverse, &resolution.minor, &table)?;
    clock.end(
        RunStage::RecomputingArbolateSums,
        format!("{} recomputed", sums.len()),
    );

    let final_routing = match settings.minor_asum_thresh_km {
        Some(threshold) => {
            clock.begin(RunStage::PruningBelowThreshold);
            let (pruned, removed) =
                prune_below_threshold(&resolution.resolved, &sums, &table, threshold)?;
            dropped.extend(removed.iter().copied(), DropReason::BelowLengthThreshold);
            clock.end(
                RunStage::PruningBelowThreshold,
                format!("{} below {threshold} km", removed.len()),
            );
            pruned
        }
        None => resolution.resolved.clone(),
    };

    let diagnostics = Diagnostics {
        missing_elevations: resolution.missing_elevations,
        unresolved_isolation_walks: isolation.unresolved,
        isolation_walk_cycles: isolation.cycles,
        resolved_cycles: loops.len(),
    };

    clock.begin(RunStage::EstimatingWidths);
    let output = assemble(PassResults {
        table: &table,
        final_routing: &final_routing,
        resolution: &resolution,
        profile: &profile,
        sums: &sums,
        dropped: &dropped,
        diagnostics,
        width: &settings.width,
    })?;
    clock.end(
        RunStage::EstimatingWidths,
        format!("{} flowlines", output.widths.len()),
    );

    info!(
        flowlines = output.routing.len(),
        dropped = output.dropped.len(),
        warnings = diagnostics.has_warnings(),
        "preprocessing finished"
    );

    let timing = clock.finish();
    Ok(PreprocessResponse { output, timing })
}
