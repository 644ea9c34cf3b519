//! Presentation layer: the session figure and the persistence-diagram
//! figure.

pub mod colormap;
mod diagrams;
mod heatmap;
mod overlay;

pub use diagrams::render_diagram_figure;
pub use heatmap::bin_edges;

use ndarray::Array1;
use num_complex::Complex64;
use plotters::prelude::*;
use std::path::Path;

use crate::config::AnalysisConfig;
use crate::session::ImagingSession;

/// Render the session overview: ΔF/F heatmap on top, phase/heading overlay
/// below, on a shared time axis in seconds into imaging.
pub fn render_session_figure(
    path: &Path,
    session: &ImagingSession,
    phase: &Array1<Complex64>,
    config: &AnalysisConfig,
) -> anyhow::Result<()> {
    let width = config.figure.session_width;
    let height = config.figure.session_height;

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (top, bottom) = root.split_vertically((height / 2) as i32);

    let time_sec = session.seconds_from_start().to_vec();
    let vr_time_sec = session.vr_seconds_from_start().to_vec();

    heatmap::draw_heatmap(&top, &time_sec, &session.dfof, &config.heatmap)?;
    overlay::draw_overlay(
        &bottom,
        &time_sec,
        phase,
        &vr_time_sec,
        &session.vr_heading.to_vec(),
    )?;

    root.present()?;
    Ok(())
}
