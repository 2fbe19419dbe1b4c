// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for graph construction, rectangle fitting and scoring

use thiserror::Error;

/// Errors raised by the geometric core
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// The inputs do not describe a usable vertex or rectangle.
    /// Callers usually skip the offending candidate.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The caller broke an API contract (non-orthogonal pair, unknown id, ...)
    #[error("Precondition violated: {0}")]
    PreconditionViolated(String),

    #[error("Point index {index} out of range for cloud of {len} points")]
    PointIndexOutOfRange { index: usize, len: usize },
}

impl GeometryError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionViolated(msg.into())
    }

    /// True for errors that only reject one candidate
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidGeometry(_))
    }
}

pub type GeometryResult<T> = std::result::Result<T, GeometryError>;
