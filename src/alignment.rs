//! Rotational alignment of the population phase against VR heading.
//!
//! The phase read out of the ring and the heading measured in VR differ by
//! an arbitrary constant rotation (the offset varies from fly to fly). The
//! two signals also live on different time grids. Alignment resamples the
//! unwrapped phase angle onto the behavior grid, estimates the constant
//! offset as a circular mean of complex ratios, and divides it out of the
//! original imaging-grid signal.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::error::{Result, RingphaseError};
use crate::utils::mean_complex;

/// Knobs for the offset-removal step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Whether to remove the per-fly rotational offset at all
    pub subtract_offset: bool,

    /// Project the offset to the unit circle before dividing. Left off, the
    /// raw complex mean is the divisor, and its magnitude (below one
    /// whenever phase and heading disagree) inflates the corrected signal;
    /// enabling this applies a pure rotation instead.
    pub normalize_offset: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            subtract_offset: true,
            normalize_offset: false,
        }
    }
}

/// Remove 2π discontinuities from a wrapped angle sequence, yielding a
/// continuous angular trajectory.
pub fn unwrap_angles(angles: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(angles.len());
    let mut correction = 0.0;
    for (i, &theta) in angles.iter().enumerate() {
        if i == 0 {
            out.push(theta);
            continue;
        }
        let delta = theta - angles[i - 1];
        let mut wrapped = (delta + PI).rem_euclid(TAU) - PI;
        if wrapped == -PI && delta > 0.0 {
            wrapped = PI;
        }
        correction += wrapped - delta;
        out.push(theta + correction);
    }
    out
}

/// Linear interpolation of the samples (`xp`, `fp`) onto the points `x`.
/// Points outside the sample range clamp to the endpoint values. `xp` must
/// be non-decreasing and non-empty; callers validate both.
pub fn interp_linear(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    debug_assert_eq!(xp.len(), fp.len());
    debug_assert!(!xp.is_empty());

    x.iter()
        .map(|&xi| {
            if xi <= xp[0] {
                return fp[0];
            }
            if xi >= xp[xp.len() - 1] {
                return fp[fp.len() - 1];
            }
            let hi = xp.partition_point(|&p| p < xi);
            let lo = hi - 1;
            let span = xp[hi] - xp[lo];
            if span == 0.0 {
                fp[lo]
            } else {
                fp[lo] + (fp[hi] - fp[lo]) * (xi - xp[lo]) / span
            }
        })
        .collect()
}

/// Mean complex ratio between a resampled phase angle and the heading.
///
/// The angle of the result is the best-fit constant rotation taking phase
/// onto heading; the magnitude measures how consistently the two agree.
pub fn rotational_offset(resampled_angle: &[f64], heading: &[f64]) -> Complex64 {
    mean_complex(
        resampled_angle
            .iter()
            .zip(heading.iter())
            .map(|(&angle, &head)| Complex64::from_polar(1.0, angle - head)),
    )
}

/// Remove the constant rotational offset between a phase signal and an
/// independently sampled heading signal.
///
/// Returns a new array on the imaging grid; the caller's input is never
/// modified. With `subtract_offset` disabled the phase passes through
/// unchanged (validation still applies).
pub fn align_phase_to_heading(
    phase: &Array1<Complex64>,
    image_timestamps: &Array1<f64>,
    heading: &Array1<f64>,
    vr_timestamps: &Array1<f64>,
    config: &AlignmentConfig,
) -> Result<Array1<Complex64>> {
    if phase.is_empty() {
        return Err(RingphaseError::EmptyTimeSeries("phase"));
    }
    if heading.is_empty() {
        return Err(RingphaseError::EmptyTimeSeries("vr heading"));
    }
    if phase.len() != image_timestamps.len() {
        return Err(RingphaseError::ShapeMismatch {
            what: "image timestamps",
            expected: phase.len(),
            actual: image_timestamps.len(),
        });
    }
    if heading.len() != vr_timestamps.len() {
        return Err(RingphaseError::ShapeMismatch {
            what: "vr timestamps",
            expected: heading.len(),
            actual: vr_timestamps.len(),
        });
    }

    if !config.subtract_offset {
        return Ok(phase.clone());
    }

    check_monotonic("image timestamps", image_timestamps)?;
    check_monotonic("vr timestamps", vr_timestamps)?;

    let angles: Vec<f64> = phase.iter().map(|z| z.arg()).collect();
    let unwrapped = unwrap_angles(&angles);
    let resampled = interp_linear(
        &vr_timestamps.to_vec(),
        &image_timestamps.to_vec(),
        &unwrapped,
    );

    let mut offset = rotational_offset(&resampled, &heading.to_vec());
    if config.normalize_offset {
        offset = Complex64::from_polar(1.0, offset.arg());
    }

    Ok(phase.mapv(|z| z / offset))
}

fn check_monotonic(what: &'static str, timestamps: &Array1<f64>) -> Result<()> {
    for (i, pair) in timestamps.windows(2).into_iter().enumerate() {
        if pair[1] < pair[0] {
            return Err(RingphaseError::NonMonotonicTimestamps {
                what,
                index: i + 1,
            });
        }
    }
    Ok(())
}
