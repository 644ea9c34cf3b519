use anyhow::Result;
use clap::{Parser, Subcommand};
use ndarray::{Array1, Array2};
use ndarray_npy::write_npy;
use num_complex::Complex64;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use ringphase::config::AnalysisConfig;
use ringphase::constants::filenames;
use ringphase::plot::{render_diagram_figure, render_session_figure};
use ringphase::topology::{correlation_distances, downsample_rows, PersistenceEngine};
use ringphase::{align_phase_to_heading, compute_phase, ImagingSession, PersistenceDiagram};

// --- CLI Arguments ---
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the session archive (.npz)
    #[arg(short, long, default_value = "data/Fly_1/imaging_data.npz", global = true)]
    session: PathBuf,

    /// Directory for rendered output
    #[arg(short, long, default_value = "output", global = true)]
    out_dir: PathBuf,

    /// Optional TOML file with analysis knobs
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep every Nth frame for the homology computation
    #[arg(long, global = true)]
    downsample_by: Option<usize>,

    /// Leave the arbitrary phase/heading offset in place
    #[arg(long, global = true)]
    keep_offset: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Render both figures and print the homology summary
    Analyze,
    /// Render the heatmap + phase/heading overlay figure only
    Render,
    /// Compute pre/during persistence diagrams and render them
    Homology,
    /// Write the offset-corrected phase signal to an .npy file
    ExportPhase,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logging to stderr so stdout stays clean for JSON output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(step) = args.downsample_by {
        config.tda.downsample_by = step;
    }
    if args.keep_offset {
        config.alignment.subtract_offset = false;
    }

    let session = ImagingSession::load(&args.session)?;
    info!(
        regions = session.n_regions(),
        frames = session.n_frames(),
        "session loaded"
    );

    fs::create_dir_all(&args.out_dir)?;

    match args.command.clone().unwrap_or(Commands::Analyze) {
        Commands::Analyze => {
            run_render(&args, &config, &session)?;
            run_homology(&args, &config, &session)?;
        }
        Commands::Render => run_render(&args, &config, &session)?,
        Commands::Homology => run_homology(&args, &config, &session)?,
        Commands::ExportPhase => {
            let phase = corrected_phase(&config, &session)?;
            let out_path = args.out_dir.join(filenames::PHASE_EXPORT);
            write_npy(&out_path, &phase)?;
            info!(path = %out_path.display(), "corrected phase written");
        }
    }

    Ok(())
}

fn corrected_phase(
    config: &AnalysisConfig,
    session: &ImagingSession,
) -> Result<Array1<Complex64>> {
    let phase = compute_phase(&session.dfof)?;
    let aligned = align_phase_to_heading(
        &phase,
        &session.image_timestamps,
        &session.vr_heading,
        &session.vr_timestamps,
        &config.alignment,
    )?;
    Ok(aligned)
}

fn run_render(args: &Args, config: &AnalysisConfig, session: &ImagingSession) -> Result<()> {
    let phase = corrected_phase(config, session)?;
    let out_path = args.out_dir.join(filenames::SESSION_FIGURE);
    render_session_figure(&out_path, session, &phase, config)?;
    info!(path = %out_path.display(), "session figure written");
    Ok(())
}

fn run_homology(args: &Args, config: &AnalysisConfig, session: &ImagingSession) -> Result<()> {
    let engine = PersistenceEngine::new(config.tda.engine_config());
    let (pre, during) = session.split_at_stimulus();

    let pre_diagram = diagram_for(&engine, &pre, config.tda.downsample_by, "pre VR");
    let during_diagram = diagram_for(&engine, &during, config.tda.downsample_by, "during VR");

    let out_path = args.out_dir.join(filenames::DIAGRAM_FIGURE);
    render_diagram_figure(
        &out_path,
        &pre_diagram,
        &during_diagram,
        config.figure.diagram_width,
        config.figure.diagram_height,
    )?;
    info!(path = %out_path.display(), "persistence diagrams written");

    let summary = json!({
        "pre_vr": diagram_summary(&pre_diagram),
        "during_vr": diagram_summary(&during_diagram),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn diagram_for(
    engine: &PersistenceEngine,
    dfof: &Array2<f64>,
    downsample_by: usize,
    label: &str,
) -> PersistenceDiagram {
    if dfof.ncols() == 0 {
        warn!(label, "no frames on this side of the stimulus onset");
    }
    // Time samples become points in region-space.
    let points = downsample_rows(dfof.t(), downsample_by);
    let distances = correlation_distances(points.view());
    engine.compute_from_distances(&distances)
}

fn diagram_summary(diagram: &PersistenceDiagram) -> serde_json::Value {
    let per_dim: Vec<serde_json::Value> = (0..=diagram.max_dimension())
        .map(|dim| {
            let intervals = diagram.intervals(dim);
            let essential = intervals.iter().filter(|(_, d)| d.is_infinite()).count();
            json!({
                "dimension": dim,
                "intervals": intervals.len(),
                "essential": essential,
            })
        })
        .collect();

    json!({
        "features": per_dim,
        "total_persistence": diagram.total_persistence(),
    })
}
