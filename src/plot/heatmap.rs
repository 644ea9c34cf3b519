//! ΔF/F heatmap panel: time on x, wedges ordered around the ring on y.

use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::PI;

use crate::config::HeatmapKnobs;
use crate::plot::colormap;

/// Edges of the time bins, one more than there are frames, so each pixel is
/// centered on its timestamp. Interior edges sit at the midpoints between
/// consecutive stamps; the outer edges extend half a mean gap beyond.
pub fn bin_edges(time: &[f64]) -> Vec<f64> {
    match time.len() {
        0 => Vec::new(),
        1 => vec![time[0] - 0.5, time[0] + 0.5],
        len => {
            let mean_gap = (time[len - 1] - time[0]) / (len - 1) as f64;
            let mut edges = Vec::with_capacity(len + 1);
            edges.push(time[0] - mean_gap / 2.0);
            for pair in time.windows(2) {
                edges.push((pair[0] + pair[1]) / 2.0);
            }
            edges.push(time[len - 1] + mean_gap / 2.0);
            edges
        }
    }
}

/// Draw the heatmap into `area`. Wedge rows span [-π, π] bottom to top; no
/// axes are drawn, matching the bare presentation of the raw data panel.
pub(crate) fn draw_heatmap(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    time_sec: &[f64],
    dfof: &Array2<f64>,
    knobs: &HeatmapKnobs,
) -> anyhow::Result<()> {
    let edges = bin_edges(time_sec);
    if edges.is_empty() || dfof.nrows() == 0 {
        return Ok(());
    }

    let x_range = edges[0]..edges[edges.len() - 1];
    let mut chart = ChartBuilder::on(area)
        .margin(5)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, -PI..PI)?;

    let n_regions = dfof.nrows();
    let row_height = 2.0 * PI / n_regions as f64;

    let mut cells = Vec::with_capacity(dfof.len());
    for (r, row) in dfof.rows().into_iter().enumerate() {
        let y_lo = -PI + r as f64 * row_height;
        let y_hi = y_lo + row_height;
        for (t, &value) in row.iter().enumerate() {
            let shade = colormap::blues(colormap::normalize(value, knobs.vmin, knobs.vmax));
            cells.push(Rectangle::new(
                [(edges[t], y_lo), (edges[t + 1], y_hi)],
                shade.filled(),
            ));
        }
    }
    chart.draw_series(cells)?;

    Ok(())
}
