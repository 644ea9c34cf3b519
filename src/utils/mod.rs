//! Small numeric helpers shared across the analysis.

use num_complex::Complex64;
use std::f64::consts::{PI, TAU};

/// Arithmetic mean of complex values. An empty iterator yields zero rather
/// than a NaN, so callers can treat "no samples" as "no evidence".
pub fn mean_complex<I>(iter: I) -> Complex64
where
    I: Iterator<Item = Complex64>,
{
    let mut sum = Complex64::new(0.0, 0.0);
    let mut count = 0usize;
    for value in iter {
        sum += value;
        count += 1;
    }
    if count == 0 {
        Complex64::new(0.0, 0.0)
    } else {
        sum / count as f64
    }
}

/// Wrap an angle into (-π, π].
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_complex_of_unit_vectors() {
        let values = [0.0, PI / 2.0, PI, -PI / 2.0];
        let mean = mean_complex(values.iter().map(|&a| Complex64::from_polar(1.0, a)));
        assert!(mean.norm() < 1e-12);
    }

    #[test]
    fn test_mean_complex_empty_is_zero() {
        let mean = mean_complex(std::iter::empty());
        assert_eq!(mean, Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-12);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-12);
    }
}
