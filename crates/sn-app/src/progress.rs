/// Pipeline stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    ApplyingEdits,
    BuildingGraph,
    CullingAttributes,
    FilteringIsolated,
    ResolvingDivergences,
    DetectingCycles,
    SmoothingElevations,
    RecomputingArbolateSums,
    PruningBelowThreshold,
    EstimatingWidths,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::ApplyingEdits => "applying edits",
            RunStage::BuildingGraph => "building graph",
            RunStage::CullingAttributes => "culling by attributes",
            RunStage::FilteringIsolated => "filtering isolated flowlines",
            RunStage::ResolvingDivergences => "resolving divergences",
            RunStage::DetectingCycles => "detecting routing cycles",
            RunStage::SmoothingElevations => "smoothing elevations",
            RunStage::RecomputingArbolateSums => "recomputing arbolate sums",
            RunStage::PruningBelowThreshold => "pruning below threshold",
            RunStage::EstimatingWidths => "estimating widths",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
        }
    }
}

/// Wall time spent in each stage of one run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub stages: Vec<(RunStage, f64)>,
    pub total_time_s: f64,
}

impl RunTimingSummary {
    pub fn stage_time_s(&self, stage: RunStage) -> Option<f64> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|&(_, t)| t)
    }
}
