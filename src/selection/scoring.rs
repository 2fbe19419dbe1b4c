// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point containment voting

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::Rectangle;
use nalgebra::Point3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default tolerance band around a rectangle, relative to its edge lengths
pub const DEFAULT_RELATIVE_THRESHOLD: f64 = 0.01;

/// Result of voting a point cloud against one rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleScore {
    /// Fraction of sampled points inside the rectangle
    pub score: f64,
    /// Plane points (from the full index set) outside the rectangle
    pub unmatched: Vec<usize>,
}

/// Whether `point` falls inside `rect`, widened by `relative_threshold` on
/// every side (as a fraction of the edge along that side).
pub fn point_in_rectangle(point: &Point3<f64>, rect: &Rectangle, relative_threshold: f64) -> bool {
    let (a, b) = rect.local_coordinates(point);
    let band = -relative_threshold..=1.0 + relative_threshold;
    band.contains(&a) && band.contains(&b)
}

/// Score `rect` by drawing `n_samples` plane points with replacement.
///
/// The score is the fraction of drawn points inside the rectangle. The
/// unmatched list covers every index in `indices`, sampled or not.
pub fn score_rectangle<R: Rng + ?Sized>(
    rect: &Rectangle,
    cloud: &[Point3<f64>],
    indices: &[usize],
    n_samples: usize,
    relative_threshold: f64,
    rng: &mut R,
) -> GeometryResult<RectangleScore> {
    check_indices(cloud, indices)?;
    let samples = draw_samples(indices, n_samples, rng);
    Ok(RectangleScore {
        score: sample_score(rect, cloud, &samples, relative_threshold),
        unmatched: unmatched_points(rect, cloud, indices, relative_threshold),
    })
}

pub(crate) fn check_indices(cloud: &[Point3<f64>], indices: &[usize]) -> GeometryResult<()> {
    match indices.iter().find(|&&i| i >= cloud.len()) {
        Some(&index) => Err(GeometryError::PointIndexOutOfRange {
            index,
            len: cloud.len(),
        }),
        None => Ok(()),
    }
}

/// Draw `n` entries of `indices` uniformly, with replacement
pub(crate) fn draw_samples<R: Rng + ?Sized>(indices: &[usize], n: usize, rng: &mut R) -> Vec<usize> {
    if indices.is_empty() {
        return Vec::new();
    }
    (0..n)
        .map(|_| indices[rng.gen_range(0..indices.len())])
        .collect()
}

pub(crate) fn sample_score(
    rect: &Rectangle,
    cloud: &[Point3<f64>],
    samples: &[usize],
    relative_threshold: f64,
) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let matched = samples
        .iter()
        .filter(|&&i| point_in_rectangle(&cloud[i], rect, relative_threshold))
        .count();
    matched as f64 / samples.len() as f64
}

pub(crate) fn unmatched_points(
    rect: &Rectangle,
    cloud: &[Point3<f64>],
    indices: &[usize],
    relative_threshold: f64,
) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&i| !point_in_rectangle(&cloud[i], rect, relative_threshold))
        .collect()
}
