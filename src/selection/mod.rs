// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rectangle selection - scoring candidates against the plane's point cloud

mod scoring;
mod selector;

pub use scoring::{point_in_rectangle, score_rectangle, RectangleScore, DEFAULT_RELATIVE_THRESHOLD};
pub use selector::{select_best, select_best_with_report, Selection, SelectionPolicy, SelectionReport};
