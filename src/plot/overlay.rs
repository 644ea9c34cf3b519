//! Phase/heading overlay panel: both angular signals as dot series on a
//! shared time axis.

use ndarray::Array1;
use num_complex::Complex64;
use plotters::coord::Shift;
use plotters::prelude::*;

/// matplotlib's C0, for the phase dots.
const PHASE_COLOR: RGBColor = RGBColor(31, 119, 180);

pub(crate) fn draw_overlay(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    time_sec: &[f64],
    phase: &Array1<Complex64>,
    vr_time_sec: &[f64],
    heading: &[f64],
) -> anyhow::Result<()> {
    let angles: Vec<f64> = phase.iter().map(|z| z.arg()).collect();

    let (x_min, x_max) = bounds(time_sec.iter().chain(vr_time_sec.iter()).copied());
    let (y_min, y_max) = bounds(angles.iter().chain(heading.iter()).copied());
    let y_pad = 0.05 * (y_max - y_min).max(1e-3);

    let mut chart = ChartBuilder::on(area)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, (y_min - y_pad)..(y_max + y_pad))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Time into imaging (sec)")
        .y_desc("Angle (rad)")
        .draw()?;

    chart
        .draw_series(
            vr_time_sec
                .iter()
                .zip(heading.iter())
                .map(|(&t, &h)| Circle::new((t, h), 1, BLACK.filled())),
        )?
        .label("VR heading")
        .legend(|(x, y)| Circle::new((x, y), 3, BLACK.filled()));

    chart
        .draw_series(
            time_sec
                .iter()
                .zip(angles.iter())
                .map(|(&t, &a)| Circle::new((t, a), 1, PHASE_COLOR.filled())),
        )?
        .label("EPG phase")
        .legend(|(x, y)| Circle::new((x, y), 3, PHASE_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.4))
        .draw()?;

    Ok(())
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        min = min.min(value);
        max = max.max(value);
    }
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_mixed_series() {
        let (lo, hi) = bounds([0.5, -1.2, 3.0].into_iter());
        assert_eq!(lo, -1.2);
        assert_eq!(hi, 3.0);
    }

    #[test]
    fn test_bounds_of_empty_series_fall_back() {
        let (lo, hi) = bounds(std::iter::empty());
        assert_eq!((lo, hi), (0.0, 1.0));
    }
}
