// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Border graph: lines connected by the vertices where orthogonal lines meet
//!
//! Lines and vertices live in two arenas and reference each other by index.
//! Exploration state (visited lines) is owned by each traversal, never by the
//! graph, so the graph is immutable while it is being searched.

use super::line::{closest_approach, BorderLine, Line, LineId, Vertex, VertexId};
use super::loops::UniqueLoopCollection;
use crate::error::{GeometryError, GeometryResult};
use crate::utils::are_orthogonal;
use ahash::AHashSet;
use log::{debug, trace, warn};

/// Number of corners of the loops searched by [`GeometricGraph::find_rectangle_loops`]
pub const RECTANGLE_CORNERS: usize = 4;

/// Tolerances driving graph construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphTolerance {
    /// Two lines are orthogonal when `|cos(angle)|` is below this value
    pub cos_ortho: f64,
    /// Largest distance between two lines still considered an intersection
    pub max_line_gap: f64,
}

impl Default for GraphTolerance {
    fn default() -> Self {
        Self {
            cos_ortho: 0.1,
            max_line_gap: 0.02,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeometricGraph {
    tolerance: GraphTolerance,
    lines: Vec<Line>,
    vertices: Vec<Vertex>,
}

impl GeometricGraph {
    pub fn new(tolerance: GraphTolerance) -> Self {
        Self {
            tolerance,
            lines: Vec::new(),
            vertices: Vec::new(),
        }
    }

    pub fn tolerance(&self) -> GraphTolerance {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: GraphTolerance) {
        self.tolerance = tolerance;
    }

    /// Remove every line and vertex, keeping the tolerance
    pub fn clear(&mut self) {
        self.lines.clear();
        self.vertices.clear();
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Append a border line. No intersection is computed here.
    pub fn add_border(&mut self, border: &BorderLine) -> GeometryResult<LineId> {
        let line = Line::from_border(border)?;
        self.lines.push(line);
        Ok(self.lines.len() - 1)
    }

    /// Append a border line given as `[px, py, pz, dx, dy, dz]`
    pub fn add_border_coefficients(&mut self, coeffs: &[f64]) -> GeometryResult<LineId> {
        self.add_border(&BorderLine::from_coefficients(coeffs)?)
    }

    /// Whether lines `i` and `j` are orthogonal within the cosine tolerance.
    /// Unknown ids are never orthogonal.
    pub fn are_orthogonal(&self, i: LineId, j: LineId) -> bool {
        match (self.lines.get(i), self.lines.get(j)) {
            (Some(a), Some(b)) => {
                are_orthogonal(&a.direction, &b.direction, self.tolerance.cos_ortho)
            }
            _ => false,
        }
    }

    /// Create the vertex where lines `i` and `j` meet.
    ///
    /// The lines must be orthogonal; a non-orthogonal pair is reported as
    /// [`GeometryError::PreconditionViolated`]. Parallel lines, lines further
    /// apart than `max_line_gap`, and pairs that already share a vertex fail
    /// with [`GeometryError::InvalidGeometry`]. The graph is left untouched on
    /// any failure.
    pub fn add_vertex_from_edges(&mut self, i: LineId, j: LineId) -> GeometryResult<VertexId> {
        if i == j {
            return Err(GeometryError::precondition(format!(
                "cannot intersect line {} with itself",
                i
            )));
        }
        let (a, b) = match (self.lines.get(i), self.lines.get(j)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(GeometryError::precondition(format!(
                    "unknown line pair ({}, {}), graph has {} lines",
                    i,
                    j,
                    self.lines.len()
                )))
            }
        };
        if !are_orthogonal(&a.direction, &b.direction, self.tolerance.cos_ortho) {
            return Err(GeometryError::precondition(format!(
                "lines {} and {} are not orthogonal",
                i, j
            )));
        }
        if a.vertices.iter().any(|&v| self.vertices[v].lies_on(j)) {
            return Err(GeometryError::invalid(format!(
                "lines {} and {} already share a vertex",
                i, j
            )));
        }

        let (on_a, on_b) = closest_approach(a, b)
            .ok_or_else(|| GeometryError::invalid(format!("lines {} and {} are parallel", i, j)))?;
        let gap = (on_a - on_b).norm();
        if gap > self.tolerance.max_line_gap {
            return Err(GeometryError::invalid(format!(
                "lines {} and {} do not meet (gap {:.4})",
                i, j, gap
            )));
        }

        let position = nalgebra::center(&on_a, &on_b);
        let id = self.vertices.len();
        self.vertices.push(Vertex::new(position, vec![i, j]));
        self.lines[i].vertices.push(id);
        self.lines[j].vertices.push(id);
        trace!("vertex {} at {:?} from lines {} and {}", id, position, i, j);
        Ok(id)
    }

    /// Intersect every orthogonal pair of lines.
    /// Pairs that do not meet are skipped. Returns the number of vertices created.
    pub fn build_vertices(&mut self) -> usize {
        let mut created = 0;
        for i in 0..self.lines.len() {
            for j in (i + 1)..self.lines.len() {
                if !self.are_orthogonal(i, j) {
                    continue;
                }
                match self.add_vertex_from_edges(i, j) {
                    Ok(_) => created += 1,
                    Err(e) if e.is_recoverable() => {
                        debug!("skipping line pair ({}, {}): {}", i, j, e)
                    }
                    Err(e) => warn!("line pair ({}, {}) rejected: {}", i, j, e),
                }
            }
        }
        created
    }

    /// Append to `out` every vertex reachable from `from_line`.
    ///
    /// Lines reached are recorded in `visited`; lines already in `visited`
    /// are not expanded again, so a shared set bounds several traversals to one
    /// pass per line. Vertices already in `out` are not appended twice but
    /// are still walked through.
    pub fn connected_vertices(
        &self,
        out: &mut Vec<VertexId>,
        from_line: LineId,
        visited: &mut AHashSet<LineId>,
    ) {
        if from_line >= self.lines.len() || !visited.insert(from_line) {
            return;
        }
        for &v in &self.lines[from_line].vertices {
            if !out.contains(&v) {
                out.push(v);
            }
            for &next in &self.vertices[v].lines {
                if !visited.contains(&next) {
                    self.connected_vertices(out, next, visited);
                }
            }
        }
    }

    /// All vertices of the connected component containing `line`
    pub fn component_of(&self, line: LineId) -> Vec<VertexId> {
        let mut out = Vec::new();
        self.connected_vertices(&mut out, line, &mut AHashSet::new());
        out
    }

    /// Find every closed loop of four vertices where consecutive vertices
    /// share a line and the walk turns onto a different line at each corner.
    ///
    /// Each physical loop is reported once, whatever its start vertex and
    /// direction. Loops are given in walking order.
    pub fn find_rectangle_loops(&self) -> Vec<[VertexId; RECTANGLE_CORNERS]> {
        let mut visited = AHashSet::with_capacity(self.lines.len());
        let mut loops = UniqueLoopCollection::new();

        for line in 0..self.lines.len() {
            if visited.contains(&line) {
                continue;
            }
            let mut component = Vec::new();
            self.connected_vertices(&mut component, line, &mut visited);
            if component.len() < RECTANGLE_CORNERS {
                continue;
            }
            trace!("component from line {} has {} vertices", line, component.len());
            for &start in &component {
                self.find_loops_from(start, &mut loops);
            }
        }

        debug!("found {} rectangle loops in {} lines", loops.len(), self.lines.len());
        loops
            .iter()
            .filter_map(|l| <[VertexId; RECTANGLE_CORNERS]>::try_from(l).ok())
            .collect()
    }

    fn find_loops_from(&self, start: VertexId, loops: &mut UniqueLoopCollection<VertexId>) {
        let mut path = vec![start];
        for &first_line in &self.vertices[start].lines {
            self.extend_loop(&mut path, first_line, first_line, loops);
        }
    }

    /// Walk along `line` from the last vertex of `path` to each other vertex on it.
    fn extend_loop(
        &self,
        path: &mut Vec<VertexId>,
        line: LineId,
        first_line: LineId,
        loops: &mut UniqueLoopCollection<VertexId>,
    ) {
        let current = path[path.len() - 1];
        let start = path[0];

        for &next in &self.lines[line].vertices {
            if next == current {
                continue;
            }
            if next == start {
                // The closing corner must turn, like every other corner
                if path.len() == RECTANGLE_CORNERS
                    && line != first_line
                    && loops.add_loop(path.as_slice())
                {
                    trace!("closed loop {:?}", path);
                }
                continue;
            }
            if path.len() >= RECTANGLE_CORNERS || path.contains(&next) {
                continue;
            }

            path.push(next);
            for &turn in &self.vertices[next].lines {
                if turn != line {
                    self.extend_loop(path, turn, first_line, loops);
                }
            }
            path.pop();
        }
    }
}
