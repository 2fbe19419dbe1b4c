// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared numeric helpers

pub mod math;

pub use math::{abs_cosine, are_orthogonal, try_normalize};
