// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - border graph, loop bookkeeping and rectangles

mod graph;
mod line;
mod loops;
mod rectangle;
mod transform;

pub use graph::{GeometricGraph, GraphTolerance, RECTANGLE_CORNERS};
pub use line::{closest_approach, BorderLine, Line, LineId, Vertex, VertexId};
pub use loops::{equal_loops, UniqueLoopCollection};
pub use rectangle::Rectangle;
pub use transform::compute_transform;
