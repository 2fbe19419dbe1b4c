// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene files: border lines and the plane's point cloud as JSON

use crate::geometry::BorderLine;
use crate::model::Detection;
use anyhow::{Context, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Inputs of one modeling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub borders: Vec<BorderLine>,
    /// Overrides the configured vertical when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<BorderLine>,
    pub cloud: Vec<Point3<f64>>,
    /// Plane member points; every point of the cloud when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<usize>>,
}

impl Scene {
    /// Indices of the plane points
    pub fn plane_indices(&self) -> Vec<usize> {
        match &self.indices {
            Some(indices) => indices.clone(),
            None => (0..self.cloud.len()).collect(),
        }
    }
}

/// Load a scene from a JSON file
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse scene file: {}", path.display()))
}

/// Write a detection as pretty JSON
pub fn write_detection(detection: &Detection, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(detection).context("Failed to serialize detection")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write detection: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_scene() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            r#"{{
                "borders": [
                    {{ "origin": [0, 0, 0], "direction": [1, 0, 0] }},
                    {{ "origin": [1, 0, 0], "direction": [0, 1, 0] }}
                ],
                "cloud": [[0.5, 0.5, 0.0], [0.2, 0.1, 0.0], [3.0, 3.0, 0.0]]
            }}"#
        )?;

        let scene = load_scene(file.path())?;
        assert_eq!(scene.borders.len(), 2);
        assert_eq!(scene.borders[1].origin, Point3::new(1.0, 0.0, 0.0));
        assert!(scene.vertical.is_none());
        assert_eq!(scene.plane_indices(), vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_explicit_indices() -> Result<()> {
        let scene: Scene = serde_json::from_str(
            r#"{ "borders": [], "cloud": [[0, 0, 0], [1, 1, 1]], "indices": [1] }"#,
        )?;
        assert_eq!(scene.plane_indices(), vec![1]);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = load_scene("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read scene file"));
    }
}
