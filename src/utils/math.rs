// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::Vector3;

/// Absolute cosine of the angle between two vectors.
/// Returns 1.0 (fully aligned) if either vector has zero length.
pub fn abs_cosine(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let norms = a.norm() * b.norm();
    if norms <= f64::EPSILON {
        return 1.0;
    }
    (a.dot(b) / norms).abs()
}

/// Two directions are orthogonal when the cosine of their angle is below `cos_tolerance`
pub fn are_orthogonal(a: &Vector3<f64>, b: &Vector3<f64>, cos_tolerance: f64) -> bool {
    abs_cosine(a, b) < cos_tolerance
}

/// Normalized copy of `v`, or `None` for a zero-length vector
pub fn try_normalize(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    v.try_normalize(f64::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_abs_cosine() {
        let x = Vector3::new(2.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 3.0, 0.0);
        assert_abs_diff_eq!(abs_cosine(&x, &y), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(abs_cosine(&x, &-x), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(abs_cosine(&x, &Vector3::zeros()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_are_orthogonal_is_symmetric() {
        let a = Vector3::new(1.0, 0.05, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(are_orthogonal(&a, &b, 0.1), are_orthogonal(&b, &a, 0.1));
        assert!(are_orthogonal(&a, &b, 0.1));
        assert!(!are_orthogonal(&a, &b, 0.01));
    }

    #[test]
    fn test_try_normalize() {
        assert!(try_normalize(&Vector3::zeros()).is_none());
        let n = try_normalize(&Vector3::new(0.0, 0.0, 4.0)).unwrap();
        assert_abs_diff_eq!(n.z, 1.0, epsilon = 1e-12);
    }
}
