// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - scene loading and detection export

mod scene;

pub use scene::{load_scene, write_detection, Scene};
