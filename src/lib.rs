// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rectangular table detection
//!
//! Builds a graph from the border lines of a planar cluster, finds every loop
//! of orthogonal borders that forms a rectangle, and keeps the rectangle that
//! best covers the plane's points.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod model;
pub mod selection;
pub mod utils;

pub use config::ModelConfig;
pub use error::{GeometryError, GeometryResult};
pub use geometry::{BorderLine, GeometricGraph, Rectangle, UniqueLoopCollection};
pub use io::{load_scene, Scene};
pub use model::{Detection, TableModel};
pub use selection::{Selection, SelectionPolicy};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Main entry point: run one detection on a scene
pub fn detect(scene: &Scene, config: &ModelConfig) -> Result<Detection> {
    let mut model = TableModel::new(config);
    if let Some(vertical) = scene.vertical {
        model.set_vertical_line(vertical.origin, vertical.direction)?;
    }
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let detection = model.run(
        &scene.borders,
        &scene.cloud,
        &scene.plane_indices(),
        &config.selection,
        &mut rng,
    )?;
    Ok(detection)
}
