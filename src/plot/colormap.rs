//! White-to-blue ramp for the ΔF/F heatmap.

use plotters::style::RGBColor;

/// Anchor stops matching the endpoints and midpoint of matplotlib's
/// 'Blues' ramp.
const STOPS: [(f64, (u8, u8, u8)); 3] = [
    (0.0, (247, 251, 255)),
    (0.5, (106, 174, 214)),
    (1.0, (8, 48, 107)),
];

/// Map a normalized value in [0, 1] onto the ramp.
pub fn blues(value: f64) -> RGBColor {
    let v = value.clamp(0.0, 1.0);
    for pair in STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if v <= t1 {
            let f = if t1 > t0 { (v - t0) / (t1 - t0) } else { 0.0 };
            let lerp =
                |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8;
            return RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    let (_, last) = STOPS[STOPS.len() - 1];
    RGBColor(last.0, last.1, last.2)
}

/// Normalize a ΔF/F value onto [0, 1] against fixed scale bounds.
pub fn normalize(value: f64, vmin: f64, vmax: f64) -> f64 {
    if vmax <= vmin {
        return 0.0;
    }
    ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
}
