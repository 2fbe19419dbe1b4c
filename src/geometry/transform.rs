// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Frame construction from axis hints

use crate::error::{GeometryError, GeometryResult};
use crate::utils::try_normalize;
use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

/// Right-handed orthonormal frame at `origin` whose x axis follows `x_axis`
/// and whose y axis lies in the plane of `x_axis` and `y_axis`.
///
/// Axes need not be normalized nor exactly orthogonal. Fails when `x_axis` is
/// zero or parallel to `y_axis`.
pub fn compute_transform(
    origin: &Point3<f64>,
    x_axis: &Vector3<f64>,
    y_axis: &Vector3<f64>,
) -> GeometryResult<Isometry3<f64>> {
    let x = try_normalize(x_axis)
        .ok_or_else(|| GeometryError::invalid("frame x axis has zero length"))?;
    let z = try_normalize(&x.cross(y_axis))
        .ok_or_else(|| GeometryError::invalid("frame axes are parallel"))?;
    let y = z.cross(&x);

    let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
    Ok(Isometry3::from_parts(
        Translation3::from(origin.coords),
        UnitQuaternion::from_rotation_matrix(&rotation),
    ))
}
