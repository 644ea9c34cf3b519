//! Persistence-diagram scatter panels, pre- and during-stimulus side by
//! side.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use crate::topology::PersistenceDiagram;

/// matplotlib's C0, C1, C2, one per homology dimension.
const DIM_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

/// Render both diagrams into one bitmap with shared axes. Essential classes
/// are drawn at the axis ceiling.
pub fn render_diagram_figure(
    path: &Path,
    pre: &PersistenceDiagram,
    during: &PersistenceDiagram,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally((width / 2) as i32);

    let ceiling = axis_ceiling(&[pre, during]);
    draw_panel(&left, pre, "Pre VR", ceiling)?;
    draw_panel(&right, during, "During VR", ceiling)?;

    root.present()?;
    Ok(())
}

fn axis_ceiling(diagrams: &[&PersistenceDiagram]) -> f64 {
    let mut highest = 0.0f64;
    for diagram in diagrams {
        for dim in 0..=diagram.max_dimension() {
            for &(birth, death) in diagram.intervals(dim) {
                highest = highest.max(birth);
                if death.is_finite() {
                    highest = highest.max(death);
                }
            }
        }
    }
    if highest > 0.0 {
        highest * 1.05
    } else {
        1.0
    }
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    diagram: &PersistenceDiagram,
    title: &str,
    ceiling: f64,
) -> anyhow::Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(title, ("sans-serif", 16))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..ceiling, 0.0..ceiling)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Birth")
        .y_desc("Death")
        .draw()?;

    for dim in 0..=diagram.max_dimension() {
        let color = DIM_COLORS[dim % DIM_COLORS.len()];
        chart.draw_series(diagram.intervals(dim).iter().map(|&(birth, death)| {
            let death = if death.is_finite() { death } else { ceiling };
            Circle::new((birth, death), 2, color.filled())
        }))?;
    }

    Ok(())
}
