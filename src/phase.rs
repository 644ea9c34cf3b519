//! Population phase extraction from ring-arranged fluorescence channels.
//!
//! The imaged wedges tile a ring, so the population activity at each frame
//! collapses to a single complex number: a sum of unit vectors anchored at
//! each wedge's angular coordinate, weighted by that wedge's ΔF/F. The
//! complex angle of the result is the bump position.

use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{Result, RingphaseError};

/// Unit-vector set that projects ring-ordered fluorescence onto a phase.
///
/// The R anchor angles span the closed interval [-π, π], so the first and
/// last vectors coincide in direction. That duplication matches the
/// acquisition convention and is kept as-is.
///
/// Channels arrive split into two interleaved half-rings, so index order in
/// the raw data does not match physical angular order. The anchors are
/// re-interleaved (even indices, then odd) to compensate; this ordering is a
/// fixed property of the instrument.
#[derive(Debug, Clone)]
pub struct RingProjection {
    vectors: Array1<Complex64>,
}

impl RingProjection {
    /// Build the projection for `n_regions` wedge channels.
    pub fn new(n_regions: usize) -> Result<Self> {
        if n_regions < 2 {
            return Err(RingphaseError::InsufficientRegions(n_regions));
        }

        let step = 2.0 * PI / (n_regions - 1) as f64;
        let circ: Vec<Complex64> = (0..n_regions)
            .map(|k| Complex64::from_polar(1.0, -PI + k as f64 * step))
            .collect();

        // Split acquisition: [0, 2, 4, ..., 1, 3, 5, ...] restores the
        // physical angular order of the two half-rings.
        let vectors: Vec<Complex64> = circ
            .iter()
            .step_by(2)
            .chain(circ.iter().skip(1).step_by(2))
            .copied()
            .collect();

        Ok(Self {
            vectors: Array1::from_vec(vectors),
        })
    }

    /// Number of wedge channels this projection expects.
    pub fn n_regions(&self) -> usize {
        self.vectors.len()
    }

    /// The reordered anchor vectors.
    pub fn vectors(&self) -> ArrayView1<'_, Complex64> {
        self.vectors.view()
    }

    /// Project an (R, T) fluorescence matrix to a (T,) complex phase signal.
    ///
    /// Pure: the input is never modified.
    pub fn project(&self, dfof: &Array2<f64>) -> Result<Array1<Complex64>> {
        if dfof.nrows() != self.vectors.len() {
            return Err(RingphaseError::ShapeMismatch {
                what: "fluorescence regions",
                expected: self.vectors.len(),
                actual: dfof.nrows(),
            });
        }
        if dfof.ncols() == 0 {
            return Err(RingphaseError::EmptyTimeSeries("fluorescence"));
        }

        let mut phase = Array1::from_elem(dfof.ncols(), Complex64::new(0.0, 0.0));
        for (anchor, row) in self.vectors.iter().zip(dfof.rows()) {
            for (acc, &value) in phase.iter_mut().zip(row.iter()) {
                *acc += anchor * value;
            }
        }
        Ok(phase)
    }
}

/// Collapse an (R, T) fluorescence matrix into the (T,) population phase.
///
/// Builds the ring projection from the matrix's own row count and applies it.
pub fn compute_phase(dfof: &Array2<f64>) -> Result<Array1<Complex64>> {
    RingProjection::new(dfof.nrows())?.project(dfof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn anchor_sum(projection: &RingProjection) -> Complex64 {
        projection.vectors().iter().copied().sum()
    }

    #[test]
    fn test_unit_circle_energy() {
        for n_regions in [2, 3, 8, 16, 17] {
            let projection = RingProjection::new(n_regions).unwrap();
            let energy: f64 = projection.vectors().iter().map(|v| v.norm_sqr()).sum();
            assert!((energy / n_regions as f64 - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_reorder_recovers_interleaved_halves() {
        let projection = RingProjection::new(6).unwrap();
        let step = 2.0 * PI / 5.0;
        let raw: Vec<f64> = (0..6).map(|k| -PI + k as f64 * step).collect();
        let expected = [raw[0], raw[2], raw[4], raw[1], raw[3], raw[5]];

        for (vector, &angle) in projection.vectors().iter().zip(expected.iter()) {
            let diff = (*vector - Complex64::from_polar(1.0, angle)).norm();
            assert!(diff < 1e-12, "anchor off by {diff}");
        }
    }

    #[test]
    fn test_endpoints_coincide() {
        let projection = RingProjection::new(8).unwrap();
        // Raw indices 0 and 7 land at -π and π; after the re-interleave they
        // sit at positions 0 and 7 of the reordered set.
        let first = projection.vectors()[0];
        let last = projection.vectors()[7];
        assert!((first - last).norm() < 1e-12);
    }

    #[test]
    fn test_uniform_input_is_constant_anchor_sum() {
        let projection = RingProjection::new(8).unwrap();
        let dfof = Array2::<f64>::ones((8, 100));
        let phase = projection.project(&dfof).unwrap();
        let expected = anchor_sum(&projection);

        assert_eq!(phase.len(), 100);
        for value in phase.iter() {
            assert!((value - expected).norm() < 1e-12);
        }
    }

    #[test]
    fn test_uniform_input_scales_with_value() {
        let projection = RingProjection::new(8).unwrap();
        let dfof = Array2::<f64>::from_elem((8, 4), 1.7);
        let phase = projection.project(&dfof).unwrap();
        let expected = anchor_sum(&projection) * 1.7;
        for value in phase.iter() {
            assert!((value - expected).norm() < 1e-12);
        }
    }

    #[test]
    fn test_projection_is_linear() {
        let n_regions = 8;
        let n_frames = 25;
        let x = Array2::from_shape_fn((n_regions, n_frames), |(r, t)| {
            ((r * 7 + t) as f64 * 0.13).sin().abs()
        });
        let y = Array2::from_shape_fn((n_regions, n_frames), |(r, t)| {
            ((r + t * 3) as f64 * 0.29).cos().abs()
        });
        let (a, b) = (2.0, -0.5);

        let combined = compute_phase(&(&x * a + &y * b)).unwrap();
        let px = compute_phase(&x).unwrap();
        let py = compute_phase(&y).unwrap();

        for t in 0..n_frames {
            let expected = px[t] * a + py[t] * b;
            assert!((combined[t] - expected).norm() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_single_region() {
        assert!(matches!(
            RingProjection::new(1),
            Err(RingphaseError::InsufficientRegions(1))
        ));
    }

    #[test]
    fn test_rejects_region_mismatch() {
        let projection = RingProjection::new(8).unwrap();
        let dfof = Array2::<f64>::ones((6, 10));
        assert!(matches!(
            projection.project(&dfof),
            Err(RingphaseError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_recording() {
        let projection = RingProjection::new(8).unwrap();
        let dfof = Array2::<f64>::ones((8, 0));
        assert!(matches!(
            projection.project(&dfof),
            Err(RingphaseError::EmptyTimeSeries(_))
        ));
    }
}
