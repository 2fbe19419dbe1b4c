// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Oriented rectangles in 3D space

use super::transform::compute_transform;
use crate::error::{GeometryError, GeometryResult};
use crate::utils::abs_cosine;
use nalgebra::{Isometry3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Rectangle spanned by two orthogonal edges from an anchor corner.
///
/// Points of the rectangle are `anchor + a * edge_x + b * edge_y` with
/// `a, b` in `[0, 1]`. `edge_x × edge_y` points to the same side as the
/// reference vertical the rectangle was built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub anchor: Point3<f64>,
    pub edge_x: Vector3<f64>,
    pub edge_y: Vector3<f64>,
}

impl Rectangle {
    pub fn new(anchor: Point3<f64>, edge_x: Vector3<f64>, edge_y: Vector3<f64>) -> Self {
        Self {
            anchor,
            edge_x,
            edge_y,
        }
    }

    /// Build a rectangle from its four corners in walking order.
    ///
    /// The first corner is the anchor and its two neighbours give the edges.
    /// `tolerance` bounds both the cosine between the edges and the distance
    /// between the opposite corner and `anchor + edge_x + edge_y`, relative to
    /// the longest edge.
    pub fn from_vertices(
        corners: &[Point3<f64>],
        vertical: &Vector3<f64>,
        tolerance: f64,
    ) -> GeometryResult<Self> {
        let [anchor, next, opposite, previous] = <[Point3<f64>; 4]>::try_from(corners)
            .map_err(|_| {
                GeometryError::invalid(format!(
                    "a rectangle needs 4 corners, got {}",
                    corners.len()
                ))
            })?;

        let mut edge_x = next - anchor;
        let mut edge_y = previous - anchor;
        let longest = edge_x.norm().max(edge_y.norm());
        if edge_x.norm() <= f64::EPSILON || edge_y.norm() <= f64::EPSILON {
            return Err(GeometryError::invalid("rectangle has a zero-length edge"));
        }
        if abs_cosine(&edge_x, &edge_y) >= tolerance {
            return Err(GeometryError::invalid("rectangle edges are not orthogonal"));
        }
        let closure = (opposite - (anchor + edge_x + edge_y)).norm();
        if closure > tolerance * longest {
            return Err(GeometryError::invalid(format!(
                "opposite corner is {:.4} away from the parallelogram",
                closure
            )));
        }

        if edge_x.cross(&edge_y).dot(vertical) < 0.0 {
            std::mem::swap(&mut edge_x, &mut edge_y);
        }
        Ok(Self::new(anchor, edge_x, edge_y))
    }

    /// Corners in walking order, starting at the anchor
    pub fn corners(&self) -> [Point3<f64>; 4] {
        [
            self.anchor,
            self.anchor + self.edge_x,
            self.anchor + self.edge_x + self.edge_y,
            self.anchor + self.edge_y,
        ]
    }

    pub fn center(&self) -> Point3<f64> {
        self.anchor + (self.edge_x + self.edge_y) * 0.5
    }

    /// Lengths of `edge_x` and `edge_y`
    pub fn dimensions(&self) -> (f64, f64) {
        (self.edge_x.norm(), self.edge_y.norm())
    }

    pub fn area(&self) -> f64 {
        self.edge_x.cross(&self.edge_y).norm()
    }

    /// Unit normal `edge_x × edge_y`
    pub fn normal(&self) -> Vector3<f64> {
        self.edge_x.cross(&self.edge_y).normalize()
    }

    /// Coordinates `(a, b)` of `point` along the edges, where the rectangle
    /// spans `[0, 1]` on both axes. Out-of-plane offsets are ignored.
    pub fn local_coordinates(&self, point: &Point3<f64>) -> (f64, f64) {
        let offset = point - self.anchor;
        (
            offset.dot(&self.edge_x) / self.edge_x.norm_squared(),
            offset.dot(&self.edge_y) / self.edge_y.norm_squared(),
        )
    }

    /// Frame at the anchor with x along `edge_x` and z along the normal
    pub fn frame(&self) -> GeometryResult<Isometry3<f64>> {
        compute_transform(&self.anchor, &self.edge_x, &self.edge_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_unit_square() {
        let rect = Rectangle::from_vertices(&unit_square(), &Vector3::z(), 0.1).unwrap();
        assert_eq!(rect.anchor, Point3::origin());
        assert_relative_eq!(rect.edge_x.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(rect.edge_y.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(rect.edge_x.dot(&rect.edge_y), 0.0, epsilon = 1e-12);
        assert!(rect.edge_x.cross(&rect.edge_y).z > 0.0);
    }

    #[test]
    fn test_edges_swapped_for_opposite_vertical() {
        let rect = Rectangle::from_vertices(&unit_square(), &-Vector3::z(), 0.1).unwrap();
        assert_eq!(rect.edge_x, Vector3::y());
        assert_eq!(rect.edge_y, Vector3::x());
        assert!(rect.normal().z < 0.0);
    }

    #[test]
    fn test_reversed_walk_keeps_orientation() {
        let mut corners = unit_square();
        corners.reverse();
        let rect = Rectangle::from_vertices(&corners, &Vector3::z(), 0.1).unwrap();
        assert_eq!(rect.anchor, Point3::new(0.0, 1.0, 0.0));
        assert!(rect.normal().z > 0.0);
        assert_relative_eq!(rect.area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_corner_count() {
        let corners = &unit_square()[..3];
        assert!(matches!(
            Rectangle::from_vertices(corners, &Vector3::z(), 0.1),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_non_orthogonal_edges() {
        let corners = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.5, 1.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        assert!(Rectangle::from_vertices(&corners, &Vector3::z(), 0.1).is_err());
    }

    #[test]
    fn test_open_quadrilateral() {
        let mut corners = unit_square();
        corners[2] = Point3::new(2.0, 2.0, 0.0);
        assert!(Rectangle::from_vertices(&corners, &Vector3::z(), 0.1).is_err());
    }

    #[test]
    fn test_measurements() {
        let rect = Rectangle::new(
            Point3::new(1.0, 1.0, 0.5),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(rect.dimensions(), (2.0, 1.0));
        assert_eq!(rect.center(), Point3::new(2.0, 1.5, 0.5));
        assert_eq!(rect.corners()[2], Point3::new(3.0, 2.0, 0.5));
        assert_eq!(rect.local_coordinates(&Point3::new(2.0, 2.0, 0.9)), (0.5, 1.0));

        let frame = rect.frame().unwrap();
        assert_relative_eq!(frame * Point3::new(2.0, 1.0, 0.0), Point3::new(3.0, 2.0, 0.5), epsilon = 1e-12);
    }
}
