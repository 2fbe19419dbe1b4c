// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Best candidate selection with a required score and a lead margin

use super::scoring::{
    check_indices, draw_samples, sample_score, unmatched_points, DEFAULT_RELATIVE_THRESHOLD,
};
use crate::error::GeometryResult;
use crate::geometry::Rectangle;
use log::debug;
use nalgebra::Point3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Slack on score thresholds for floating-point sample fractions
const SCORE_EPSILON: f64 = 1e-9;

/// Acceptance policy for [`select_best`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// Minimum fraction of sampled points the winner must contain
    pub required_score: f64,
    /// Minimum score difference between the winner and the runner-up
    pub lead_score: f64,
    /// Number of plane points drawn (with replacement) for voting
    pub n_samples: usize,
    /// Tolerance band around each rectangle, relative to its edges
    pub relative_threshold: f64,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            required_score: 0.7,
            lead_score: 0.1,
            n_samples: 500,
            relative_threshold: DEFAULT_RELATIVE_THRESHOLD,
        }
    }
}

/// Outcome of a selection round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Selection {
    /// `index` won with a clear lead
    Selected {
        index: usize,
        score: f64,
        runner_up: f64,
    },
    /// The best candidate scored enough but did not lead by enough
    Ambiguous {
        best: usize,
        score: f64,
        runner_up: f64,
    },
    /// No candidate reached the required score
    BelowThreshold { best: usize, score: f64 },
    /// There was nothing to choose from
    NoCandidate,
}

impl Selection {
    /// Index of the selected candidate, if any
    pub fn index(&self) -> Option<usize> {
        match *self {
            Selection::Selected { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.index().is_some()
    }

    /// Score of the best candidate, whether it was selected or not
    pub fn best_score(&self) -> Option<f64> {
        match *self {
            Selection::Selected { score, .. }
            | Selection::Ambiguous { score, .. }
            | Selection::BelowThreshold { score, .. } => Some(score),
            Selection::NoCandidate => None,
        }
    }

    /// Index of the best candidate, whether it was selected or not
    pub fn best_index(&self) -> Option<usize> {
        match *self {
            Selection::Selected { index, .. } => Some(index),
            Selection::Ambiguous { best, .. } | Selection::BelowThreshold { best, .. } => {
                Some(best)
            }
            Selection::NoCandidate => None,
        }
    }
}

/// Selection with the per-candidate scores behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    pub selection: Selection,
    /// Score of every candidate, in candidate order
    pub scores: Vec<f64>,
    /// Plane points outside the best candidate (empty without candidates)
    pub unmatched: Vec<usize>,
}

/// Pick the rectangle that best explains the plane points.
///
/// Every candidate is voted on by the same `policy.n_samples` points drawn
/// from `indices`. The best one is returned only if it reaches
/// `policy.required_score` and leads the runner-up by `policy.lead_score`.
pub fn select_best<R: Rng + ?Sized>(
    rectangles: &[Rectangle],
    cloud: &[Point3<f64>],
    indices: &[usize],
    policy: &SelectionPolicy,
    rng: &mut R,
) -> GeometryResult<Selection> {
    select_best_with_report(rectangles, cloud, indices, policy, rng).map(|r| r.selection)
}

/// [`select_best`] that also reports every score and the unmatched points
pub fn select_best_with_report<R: Rng + ?Sized>(
    rectangles: &[Rectangle],
    cloud: &[Point3<f64>],
    indices: &[usize],
    policy: &SelectionPolicy,
    rng: &mut R,
) -> GeometryResult<SelectionReport> {
    check_indices(cloud, indices)?;
    if rectangles.is_empty() {
        return Ok(SelectionReport {
            selection: Selection::NoCandidate,
            scores: Vec::new(),
            unmatched: Vec::new(),
        });
    }

    let samples = draw_samples(indices, policy.n_samples, rng);
    let scores: Vec<f64> = rectangles
        .iter()
        .map(|rect| sample_score(rect, cloud, &samples, policy.relative_threshold))
        .collect();

    let selection = classify(&scores, policy);
    debug!(
        "scored {} rectangles on {} samples: {:?}",
        rectangles.len(),
        samples.len(),
        selection
    );
    let best = selection.best_index().unwrap_or(0);

    Ok(SelectionReport {
        selection,
        unmatched: unmatched_points(&rectangles[best], cloud, indices, policy.relative_threshold),
        scores,
    })
}

/// Apply the score and lead thresholds of `policy` to candidate scores.
///
/// Scores are sample fractions, so thresholds hit exactly (0.7 - 0.5 against
/// a 0.2 lead) must pass despite rounding; comparisons allow `SCORE_EPSILON`.
fn classify(scores: &[f64], policy: &SelectionPolicy) -> Selection {
    if scores.is_empty() {
        return Selection::NoCandidate;
    }
    let (best, best_score) = scores
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |acc, (i, s)| if s > acc.1 { (i, s) } else { acc });
    let runner_up = scores
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != best)
        .map(|(_, &s)| s)
        .fold(0.0, f64::max);

    if best_score < policy.required_score - SCORE_EPSILON {
        Selection::BelowThreshold {
            best,
            score: best_score,
        }
    } else if best_score - runner_up < policy.lead_score - SCORE_EPSILON {
        Selection::Ambiguous {
            best,
            score: best_score,
            runner_up,
        }
    } else {
        Selection::Selected {
            index: best,
            score: best_score,
            runner_up,
        }
    }
}
