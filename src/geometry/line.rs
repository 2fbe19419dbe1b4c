// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Lines and vertices of the border graph

use crate::error::{GeometryError, GeometryResult};
use crate::utils::try_normalize;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Index of a line in a [`GeometricGraph`](super::GeometricGraph)
pub type LineId = usize;
/// Index of a vertex in a [`GeometricGraph`](super::GeometricGraph)
pub type VertexId = usize;

/// Raw border line as produced by plane segmentation: a point and a direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderLine {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl BorderLine {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Build from line model coefficients `[px, py, pz, dx, dy, dz]`
    pub fn from_coefficients(coeffs: &[f64]) -> GeometryResult<Self> {
        if coeffs.len() != 6 {
            return Err(GeometryError::invalid(format!(
                "line model needs 6 coefficients, got {}",
                coeffs.len()
            )));
        }
        Ok(Self {
            origin: Point3::new(coeffs[0], coeffs[1], coeffs[2]),
            direction: Vector3::new(coeffs[3], coeffs[4], coeffs[5]),
        })
    }
}

/// Parametric 3D line with the vertices lying on it
#[derive(Debug, Clone)]
pub struct Line {
    pub origin: Point3<f64>,
    /// Unit direction, fixed at creation
    pub direction: Vector3<f64>,
    /// Vertices on this line, in insertion order
    pub vertices: Vec<VertexId>,
}

impl Line {
    pub fn from_border(border: &BorderLine) -> GeometryResult<Self> {
        let direction = try_normalize(&border.direction)
            .ok_or_else(|| GeometryError::invalid("border line has a zero-length direction"))?;
        Ok(Self {
            origin: border.origin,
            direction,
            vertices: Vec::new(),
        })
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Orthogonal projection of `point` onto the line
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        self.point_at((point - self.origin).dot(&self.direction))
    }

    pub fn distance_to(&self, point: &Point3<f64>) -> f64 {
        (point - self.project(point)).norm()
    }
}

/// Intersection point of two or more lines
#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point3<f64>,
    /// Lines passing through this vertex (at least two)
    pub lines: Vec<LineId>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, lines: Vec<LineId>) -> Self {
        Self { position, lines }
    }

    pub fn lies_on(&self, line: LineId) -> bool {
        self.lines.contains(&line)
    }
}

/// Closest points between two lines, one on each.
/// Returns `None` when the lines are parallel.
pub fn closest_approach(a: &Line, b: &Line) -> Option<(Point3<f64>, Point3<f64>)> {
    let w0 = a.origin - b.origin;
    let ab = a.direction.dot(&b.direction);
    let d = a.direction.dot(&w0);
    let e = b.direction.dot(&w0);

    // Directions are unit length, so the denominator is sin² of the angle
    let denom = 1.0 - ab * ab;
    if denom <= f64::EPSILON {
        return None;
    }

    let t = (ab * e - d) / denom;
    let s = (e - ab * d) / denom;
    Some((a.point_at(t), b.point_at(s)))
}
