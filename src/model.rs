// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Table model: border graph, candidate rectangles and selection state

use crate::config::ModelConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{
    BorderLine, GeometricGraph, LineId, Rectangle, VertexId, RECTANGLE_CORNERS,
};
use crate::selection::{select_best_with_report, Selection, SelectionPolicy, SelectionReport};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of one full modeling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// The chosen rectangle, if one met the selection policy
    pub rectangle: Option<Rectangle>,
    pub selection: Selection,
    pub borders: usize,
    pub vertices: usize,
    pub candidates: Vec<Rectangle>,
    pub scores: Vec<f64>,
    /// Plane points outside the best candidate
    pub unmatched: Vec<usize>,
}

/// Geometric model of a rectangular table.
///
/// Call [`TableModel::clear`] between modeling runs: it drops borders,
/// vertices and candidates but keeps the tolerance, the vertical line and the
/// previously selected rectangle.
#[derive(Debug, Clone)]
pub struct TableModel {
    graph: GeometricGraph,
    vertical: BorderLine,
    candidates: Vec<Rectangle>,
    previous_best: Option<Rectangle>,
}

impl TableModel {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            graph: GeometricGraph::new(config.graph_tolerance()),
            vertical: config.vertical,
            candidates: Vec::new(),
            previous_best: None,
        }
    }

    /// Model with the default configuration but the given vertical and tolerance.
    /// Fails with `InvalidGeometry` for a zero vertical direction.
    pub fn with_vertical(
        origin: Point3<f64>,
        direction: Vector3<f64>,
        cos_ortho_tolerance: f64,
    ) -> GeometryResult<Self> {
        let config = ModelConfig {
            cos_ortho_tolerance,
            ..ModelConfig::default()
        };
        let mut model = Self::new(&config);
        model.set_vertical_line(origin, direction)?;
        Ok(model)
    }

    /// Drop borders, vertices and candidate rectangles
    pub fn clear(&mut self) {
        self.graph.clear();
        self.candidates.clear();
    }

    pub fn graph(&self) -> &GeometricGraph {
        &self.graph
    }

    /// A zero direction would leave rectangle orientation undefined and is rejected
    pub fn set_vertical_line(
        &mut self,
        origin: Point3<f64>,
        direction: Vector3<f64>,
    ) -> GeometryResult<()> {
        if direction.norm() <= f64::EPSILON {
            return Err(GeometryError::invalid("vertical direction is zero"));
        }
        self.vertical = BorderLine::new(origin, direction);
        Ok(())
    }

    pub fn vertical_line(&self) -> BorderLine {
        self.vertical
    }

    pub fn vertical_origin(&self) -> Point3<f64> {
        self.vertical.origin
    }

    pub fn vertical_direction(&self) -> Vector3<f64> {
        self.vertical.direction
    }

    pub fn set_cos_ortho_tolerance(&mut self, tolerance: f64) {
        let mut current = self.graph.tolerance();
        current.cos_ortho = tolerance;
        self.graph.set_tolerance(current);
    }

    pub fn cos_ortho_tolerance(&self) -> f64 {
        self.graph.tolerance().cos_ortho
    }

    pub fn add_border(&mut self, border: &BorderLine) -> GeometryResult<LineId> {
        self.graph.add_border(border)
    }

    /// Add a border from `[px, py, pz, dx, dy, dz]` line coefficients
    pub fn add_border_coefficients(&mut self, coeffs: &[f64]) -> GeometryResult<LineId> {
        self.graph.add_border_coefficients(coeffs)
    }

    pub fn are_borders_orthogonal(&self, i: LineId, j: LineId) -> bool {
        self.graph.are_orthogonal(i, j)
    }

    pub fn add_vertex_from_edges(&mut self, i: LineId, j: LineId) -> GeometryResult<VertexId> {
        self.graph.add_vertex_from_edges(i, j)
    }

    /// Intersect all orthogonal border pairs; see [`GeometricGraph::build_vertices`]
    pub fn build_vertices(&mut self) -> usize {
        self.graph.build_vertices()
    }

    /// Build a rectangle from four vertices in walking order and store it.
    /// Returns the candidate index.
    pub fn add_possible_rectangle(&mut self, vertices: &[VertexId]) -> GeometryResult<usize> {
        let rect = self.compute_rectangle(vertices)?;
        self.candidates.push(rect);
        Ok(self.candidates.len() - 1)
    }

    /// Rectangle through four vertices in walking order, oriented with the vertical
    pub fn compute_rectangle(&self, vertices: &[VertexId]) -> GeometryResult<Rectangle> {
        if vertices.len() != RECTANGLE_CORNERS {
            return Err(GeometryError::invalid(format!(
                "a rectangle needs {} vertices, got {}",
                RECTANGLE_CORNERS,
                vertices.len()
            )));
        }
        let corners = vertices
            .iter()
            .map(|&v| {
                self.graph
                    .vertex(v)
                    .map(|vertex| vertex.position)
                    .ok_or_else(|| GeometryError::precondition(format!("unknown vertex {}", v)))
            })
            .collect::<GeometryResult<Vec<_>>>()?;
        Rectangle::from_vertices(&corners, &self.vertical.direction, self.cos_ortho_tolerance())
    }

    /// Turn every rectangular loop of the graph into a candidate.
    /// Loops with invalid geometry are skipped. Returns the number of candidates added.
    pub fn find_all_possible_rectangles(&mut self) -> usize {
        let mut added = 0;
        for corners in self.graph.find_rectangle_loops() {
            match self.add_possible_rectangle(&corners) {
                Ok(_) => added += 1,
                Err(e) if e.is_recoverable() => debug!("skipping loop {:?}: {}", corners, e),
                Err(e) => warn!("loop {:?} rejected: {}", corners, e),
            }
        }
        added
    }

    pub fn possible_rectangles(&self) -> &[Rectangle] {
        &self.candidates
    }

    pub fn borders_count(&self) -> usize {
        self.graph.line_count()
    }

    pub fn vertices_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn possible_rectangles_count(&self) -> usize {
        self.candidates.len()
    }

    /// Choose among the candidates the one that best explains the plane points
    pub fn select_best_matching_rectangle<R: Rng + ?Sized>(
        &self,
        cloud: &[Point3<f64>],
        indices: &[usize],
        policy: &SelectionPolicy,
        rng: &mut R,
    ) -> GeometryResult<SelectionReport> {
        select_best_with_report(&self.candidates, cloud, indices, policy, rng)
    }

    /// Rectangle kept from an earlier run
    pub fn previous_best(&self) -> Option<&Rectangle> {
        self.previous_best.as_ref()
    }

    /// Record a rectangle for continuity across runs; survives [`TableModel::clear`]
    pub fn remember_best(&mut self, rectangle: Rectangle) {
        self.previous_best = Some(rectangle);
    }

    /// Clear, add `borders`, build the graph, find candidates and select one.
    ///
    /// Borders with invalid geometry are skipped. The previous best is left
    /// for the caller to update.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        borders: &[BorderLine],
        cloud: &[Point3<f64>],
        indices: &[usize],
        policy: &SelectionPolicy,
        rng: &mut R,
    ) -> GeometryResult<Detection> {
        self.clear();
        for (i, border) in borders.iter().enumerate() {
            if let Err(e) = self.add_border(border) {
                debug!("skipping border {}: {}", i, e);
            }
        }
        let vertices = self.build_vertices();
        let candidates = self.find_all_possible_rectangles();
        let report = self.select_best_matching_rectangle(cloud, indices, policy, rng)?;

        info!(
            "{} borders, {} vertices, {} candidate rectangles: {:?}",
            self.borders_count(),
            vertices,
            candidates,
            report.selection
        );

        Ok(Detection {
            rectangle: report.selection.index().map(|i| self.candidates[i]),
            selection: report.selection,
            borders: self.borders_count(),
            vertices,
            candidates: self.candidates.clone(),
            scores: report.scores,
            unmatched: report.unmatched,
        })
    }
}

impl Default for TableModel {
    fn default() -> Self {
        Self::new(&ModelConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_borders(size: f64) -> Vec<BorderLine> {
        vec![
            BorderLine::new(Point3::new(0.0, 0.0, 0.0), Vector3::x()),
            BorderLine::new(Point3::new(size, 0.0, 0.0), Vector3::y()),
            BorderLine::new(Point3::new(0.0, size, 0.0), Vector3::x()),
            BorderLine::new(Point3::new(0.0, 0.0, 0.0), Vector3::y()),
        ]
    }

    fn model_with_square() -> TableModel {
        let mut model = TableModel::default();
        for border in square_borders(1.0) {
            model.add_border(&border).unwrap();
        }
        model
    }

    #[test]
    fn test_unit_square_gives_one_upward_rectangle() {
        let mut model = model_with_square();
        assert_eq!(model.build_vertices(), 4);
        assert_eq!(model.find_all_possible_rectangles(), 1);

        let rect = model.possible_rectangles()[0];
        assert!(rect.edge_x.cross(&rect.edge_y).z > 0.0);
        assert_relative_eq!(rect.area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compute_rectangle_in_adjacency_order() {
        let mut model = model_with_square();
        model.build_vertices();
        let corners = model.graph().find_rectangle_loops()[0];
        let rect = model.compute_rectangle(&corners).unwrap();
        let (w, h) = rect.dimensions();
        assert_relative_eq!(w, 1.0, epsilon = 1e-9);
        assert_relative_eq!(h, 1.0, epsilon = 1e-9);
        assert_relative_eq!(rect.edge_x.dot(&rect.edge_y), 0.0, epsilon = 1e-9);
        assert!(model
            .graph()
            .vertices()
            .iter()
            .any(|v| (v.position - rect.anchor).norm() < 1e-9));
    }

    #[test]
    fn test_add_possible_rectangle_rejects_bad_input() {
        let mut model = model_with_square();
        model.build_vertices();
        assert!(matches!(
            model.add_possible_rectangle(&[0, 1, 2]),
            Err(GeometryError::InvalidGeometry(_))
        ));
        assert!(matches!(
            model.add_possible_rectangle(&[0, 1, 2, 17]),
            Err(GeometryError::PreconditionViolated(_))
        ));
        assert_eq!(model.possible_rectangles_count(), 0);
    }

    #[test]
    fn test_clear_keeps_settings_and_previous_best() {
        let mut model = model_with_square();
        model.set_vertical_line(Point3::new(0.0, 0.0, 1.0), -Vector3::z()).unwrap();
        model.set_cos_ortho_tolerance(0.05);
        model.build_vertices();
        model.find_all_possible_rectangles();
        let best = model.possible_rectangles()[0];
        model.remember_best(best);

        model.clear();
        assert_eq!(model.borders_count(), 0);
        assert_eq!(model.vertices_count(), 0);
        assert_eq!(model.possible_rectangles_count(), 0);
        assert_eq!(model.cos_ortho_tolerance(), 0.05);
        assert_eq!(model.vertical_direction(), -Vector3::z());
        assert_eq!(model.vertical_origin(), Point3::new(0.0, 0.0, 1.0));
        assert_eq!(model.previous_best(), Some(&best));
    }

    #[test]
    fn test_run_selects_the_square() {
        let cloud: Vec<_> = (0..400)
            .map(|k| Point3::new((k % 20) as f64 * 0.1 + 0.05, (k / 20) as f64 * 0.1 + 0.05, 0.0))
            .collect();
        let indices: Vec<usize> = (0..cloud.len()).collect();
        let mut model = TableModel::default();
        let mut rng = StdRng::seed_from_u64(11);

        let detection = model
            .run(&square_borders(2.0), &cloud, &indices, &SelectionPolicy::default(), &mut rng)
            .unwrap();

        assert_eq!(detection.borders, 4);
        assert_eq!(detection.vertices, 4);
        assert_eq!(detection.candidates.len(), 1);
        let rect = detection.rectangle.expect("square should be selected");
        assert_relative_eq!(rect.area(), 4.0, epsilon = 1e-9);
        assert!(detection.unmatched.is_empty());
        assert!(model.previous_best().is_none());
    }

    #[test]
    fn test_run_without_borders() {
        let mut model = TableModel::default();
        let mut rng = StdRng::seed_from_u64(0);
        let detection = model
            .run(&[], &[Point3::origin()], &[0], &SelectionPolicy::default(), &mut rng)
            .unwrap();
        assert_eq!(detection.selection, Selection::NoCandidate);
        assert!(detection.rectangle.is_none());
    }

    #[test]
    fn test_zero_vertical_rejected() {
        let mut model = TableModel::default();
        let before = model.vertical_line();
        assert!(matches!(
            model.set_vertical_line(Point3::origin(), Vector3::zeros()),
            Err(GeometryError::InvalidGeometry(_))
        ));
        assert_eq!(model.vertical_line(), before);
        assert!(TableModel::with_vertical(Point3::origin(), Vector3::zeros(), 0.1).is_err());
    }
}
