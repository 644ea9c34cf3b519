//! Pairwise correlation distances between observation rows.

use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

/// Thin an observation matrix by keeping every `step`-th row.
pub fn downsample_rows(points: ArrayView2<'_, f64>, step: usize) -> Array2<f64> {
    let step = step.max(1);
    let kept: Vec<usize> = (0..points.nrows()).step_by(step).collect();
    points.select(Axis(0), &kept)
}

/// Pairwise correlation distance `1 - ρ` between the rows of `points`.
///
/// Each row is centered on its own mean before the normalized dot product.
/// A zero-variance row correlates with nothing; its distance to every other
/// row is 1.
pub fn correlation_distances(points: ArrayView2<'_, f64>) -> Array2<f64> {
    let n = points.nrows();
    let centered: Vec<Vec<f64>> = points
        .rows()
        .into_iter()
        .map(|row| {
            let mean = row.mean().unwrap_or(0.0);
            row.iter().map(|&v| v - mean).collect()
        })
        .collect();
    let norms: Vec<f64> = centered
        .iter()
        .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        return 0.0;
                    }
                    let dot: f64 = centered[i]
                        .iter()
                        .zip(centered[j].iter())
                        .map(|(a, b)| a * b)
                        .sum();
                    let denom = norms[i] * norms[j];
                    if denom == 0.0 {
                        1.0
                    } else {
                        1.0 - dot / denom
                    }
                })
                .collect()
        })
        .collect();

    let mut distances = Array2::zeros((n, n));
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            distances[[i, j]] = value;
        }
    }
    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_correlation_is_zero_distance() {
        let points = array![[1.0, 2.0, 3.0], [10.0, 20.0, 30.0]];
        let distances = correlation_distances(points.view());
        assert!(distances[[0, 1]].abs() < 1e-12);
    }

    #[test]
    fn test_anticorrelation_is_distance_two() {
        let points = array![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]];
        let distances = correlation_distances(points.view());
        assert!((distances[[0, 1]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_with_zero_diagonal() {
        let points = array![
            [0.3, 1.7, 0.2, 0.9],
            [1.1, 0.4, 0.8, 0.5],
            [0.2, 0.2, 1.9, 0.7]
        ];
        let distances = correlation_distances(points.view());
        for i in 0..3 {
            assert_eq!(distances[[i, i]], 0.0);
            for j in 0..3 {
                assert!((distances[[i, j]] - distances[[j, i]]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_flat_row_is_maximally_distant() {
        let points = array![[1.0, 1.0, 1.0], [0.0, 1.0, 2.0]];
        let distances = correlation_distances(points.view());
        assert!((distances[[0, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_downsample_keeps_every_nth_row() {
        let points = Array2::from_shape_fn((10, 2), |(r, c)| (r * 2 + c) as f64);
        let thinned = downsample_rows(points.view(), 3);
        assert_eq!(thinned.nrows(), 4);
        assert_eq!(thinned[[1, 0]], points[[3, 0]]);
        assert_eq!(thinned[[3, 1]], points[[9, 1]]);
    }

    #[test]
    fn test_downsample_step_zero_keeps_all() {
        let points = Array2::from_shape_fn((5, 2), |(r, c)| (r + c) as f64);
        let thinned = downsample_rows(points.view(), 0);
        assert_eq!(thinned.nrows(), 5);
    }
}
