use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sn_app::{
    AppResult, LengthUnit, PreprocessRequest, RunProgressEvent, RunStage, RunTimingSummary,
    export_all, project_service, run_preprocess_files,
};

#[derive(Parser)]
#[command(name = "sn-cli")]
#[command(about = "streamnet CLI - stream network preprocessing for groundwater models", long_about = None)]
struct Cli {
    /// Log every routing decision (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate network and configuration files
    Validate {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
        /// Path to the preprocessing configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show a summary of a network
    Summary {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
    },
    /// Resolve the network and write the output tables
    Run {
        /// Path to the network YAML or JSON file
        network_path: PathBuf,
        /// Path to the preprocessing configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Flowline edit script applied before preprocessing
        #[arg(short, long)]
        edits: Option<PathBuf>,
        /// Directory for the CSV and JSON output
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,
        /// Output length units (m, ft, km, cm, mi), overriding the configuration
        #[arg(short, long)]
        units: Option<LengthUnit>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate {
            network_path,
            config,
        } => cmd_validate(&network_path, config.as_deref()),
        Commands::Summary { network_path } => cmd_summary(&network_path),
        Commands::Run {
            network_path,
            config,
            edits,
            output_dir,
            units,
        } => cmd_run(
            &network_path,
            config.as_deref(),
            edits.as_deref(),
            &output_dir,
            units,
        ),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_validate(network_path: &Path, config_path: Option<&Path>) -> AppResult<()> {
    println!("Validating network: {}", network_path.display());
    let network = project_service::load_network(network_path)?;
    let config = project_service::load_config(config_path)?;
    project_service::validate_inputs(&network, &config)?;
    println!("✓ Network is valid");
    if config_path.is_some() {
        println!("✓ Configuration is valid");
    }
    Ok(())
}

fn cmd_summary(network_path: &Path) -> AppResult<()> {
    let network = project_service::load_network(network_path)?;
    let summary = project_service::summarize_network(&network);

    match &summary.name {
        Some(name) => println!("Network: {}", name),
        None => println!("Network: {}", network_path.display()),
    }
    println!("  Flowlines:   {}", summary.flowline_count);
    println!("  Active:      {}", summary.active_count);
    println!("  Edge rows:   {}", summary.edge_count);
    println!("  Outlets:     {}", summary.outlet_count);
    println!("  Divergences: {}", summary.divergence_count);
    Ok(())
}

fn cmd_run(
    network_path: &Path,
    config_path: Option<&Path>,
    edits_path: Option<&Path>,
    output_dir: &Path,
    output_units: Option<LengthUnit>,
) -> AppResult<()> {
    println!("Preprocessing network: {}", network_path.display());

    let request = PreprocessRequest {
        network_path,
        config_path,
        edits_path,
        output_units,
    };

    let response = run_preprocess_files(
        &request,
        Some(&mut |event: RunProgressEvent| render_cli_progress(&event)),
    )?;
    clear_progress_line();

    let output = &response.output;
    println!("✓ Preprocessing completed");
    println!("  Flowlines routed: {}", output.routing.len());
    println!("  Flowlines dropped: {}", output.dropped.len());

    let d = &output.diagnostics;
    if d.missing_elevations > 0 {
        println!("  ! divergence candidates without elevation: {}", d.missing_elevations);
    }
    if d.unresolved_isolation_walks > 0 {
        println!(
            "  ! isolation walks that hit the step limit: {}",
            d.unresolved_isolation_walks
        );
    }
    if d.resolved_cycles > 0 || d.isolation_walk_cycles > 0 {
        println!(
            "  ! routing cycles: {} resolved, {} seen by isolation walks",
            d.resolved_cycles, d.isolation_walk_cycles
        );
    }

    print_timing_summary(&response.timing);

    let written = export_all(output, output_dir)?;
    tracing::info!(dir = %output_dir.display(), files = written.len(), "exported output tables");
    println!("✓ Wrote {} files to {}", written.len(), output_dir.display());
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    if event.stage == RunStage::Completed {
        return;
    }
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} {}  elapsed={:.2}s",
        spinner[spin_idx],
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{:<100}", line);
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &RunTimingSummary) {
    println!("  Total time: {:.3} s", timing.total_time_s);
    for (stage, seconds) in &timing.stages {
        println!("    {:<28} {:.3} s", stage.label(), seconds);
    }
}
