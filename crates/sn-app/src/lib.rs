//! Shared application service layer for streamnet.
//!
//! Centralizes loading inputs, running the preprocessing pipeline, and
//! exporting its output tables, so frontends only parse arguments and print.

pub mod error;
pub mod export;
pub mod inputs;
pub mod output;
pub mod preprocess_service;
pub mod progress;
pub mod project_service;

// Re-export key types for convenience
pub use sn_core::LengthUnit;
pub use error::{AppError, AppResult};
pub use export::export_all;
pub use inputs::{NetworkInputs, RunSettings};
pub use output::{
    ArbolateSumRow, DiagnosticsRow, DropRow, ElevationRow, PreprocessOutput, RoutingRow,
    WidthRow,
};
pub use preprocess_service::{
    PreprocessRequest, PreprocessResponse, run_preprocess, run_preprocess_files,
    run_preprocess_with_progress,
};
pub use progress::{RunProgressEvent, RunStage, RunTimingSummary};
pub use project_service::{
    NetworkSummary, load_config, load_edits, load_network, save_network, summarize_network,
    validate_inputs,
};
