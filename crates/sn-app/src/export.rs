//! CSV and JSON export of run output.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::output::PreprocessOutput;

pub const ROUTING_CSV: &str = "routing.csv";
pub const ELEVATIONS_CSV: &str = "elevations.csv";
pub const ARBOLATE_SUMS_CSV: &str = "arbolate_sums.csv";
pub const WIDTHS_CSV: &str = "widths.csv";
pub const DROPPED_CSV: &str = "dropped.csv";
pub const DIAGNOSTICS_CSV: &str = "diagnostics.csv";
pub const OUTPUT_JSON: &str = "preprocess_output.json";

pub fn routing_csv(output: &PreprocessOutput) -> String {
    let mut csv = String::from("id,resolved_to_id,is_main_channel\n");
    for row in &output.routing {
        csv.push_str(&format!(
            "{},{},{}\n",
            row.id, row.resolved_to_id, row.is_main_channel
        ));
    }
    csv
}

pub fn elevations_csv(output: &PreprocessOutput) -> String {
    let mut csv =
        String::from("id,elevup,elevdn,smoothed_upstream_elev,smoothed_downstream_elev\n");
    for row in &output.elevations {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            row.id, row.elevup, row.elevdn, row.smoothed_upstream_elev, row.smoothed_downstream_elev
        ));
    }
    csv
}

pub fn arbolate_sums_csv(output: &PreprocessOutput) -> String {
    let mut csv = String::from("id,recomputed_asum_km,nhd_asum_km,asum_diff_km\n");
    for row in &output.arbolate_sums {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            row.id, row.recomputed_asum_km, row.nhd_asum_km, row.asum_diff_km
        ));
    }
    csv
}

pub fn widths_csv(output: &PreprocessOutput) -> String {
    let mut csv = String::from("id,width1,width2\n");
    for row in &output.widths {
        csv.push_str(&format!("{},{},{}\n", row.id, row.width1, row.width2));
    }
    csv
}

pub fn dropped_csv(output: &PreprocessOutput) -> String {
    let mut csv = String::from("id,reason\n");
    for row in &output.dropped {
        csv.push_str(&format!("{},{}\n", row.id, row.reason));
    }
    csv
}

pub fn diagnostics_csv(output: &PreprocessOutput) -> String {
    let d = &output.diagnostics;
    let mut csv = String::from("warning,count\n");
    for (name, count) in [
        ("missing_elevations", d.missing_elevations),
        ("unresolved_isolation_walks", d.unresolved_isolation_walks),
        ("isolation_walk_cycles", d.isolation_walk_cycles),
        ("resolved_cycles", d.resolved_cycles),
        ("cyclic_elevation_nodes", d.cyclic_elevation_nodes),
    ] {
        csv.push_str(&format!("{},{}\n", name, count));
    }
    csv
}

pub fn to_json(output: &PreprocessOutput) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

fn write_file(path: PathBuf, content: String) -> AppResult<PathBuf> {
    std::fs::write(&path, content).map_err(|e| AppError::OutputFileWrite {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

/// Write one CSV per table plus the full JSON output into `dir`.
///
/// Returns the paths written.
pub fn export_all(output: &PreprocessOutput, dir: &Path) -> AppResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| AppError::OutputFileWrite {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let files = [
        (ROUTING_CSV, routing_csv(output)),
        (ELEVATIONS_CSV, elevations_csv(output)),
        (ARBOLATE_SUMS_CSV, arbolate_sums_csv(output)),
        (WIDTHS_CSV, widths_csv(output)),
        (DROPPED_CSV, dropped_csv(output)),
        (DIAGNOSTICS_CSV, diagnostics_csv(output)),
        (OUTPUT_JSON, to_json(output)?),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        written.push(write_file(dir.join(name), content)?);
    }
    Ok(written)
}
