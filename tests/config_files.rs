// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Configuration and scene file handling

use anyhow::Result;
use nalgebra::{Point3, Vector3};
use rectable::geometry::BorderLine;
use rectable::io::{load_scene, write_detection, Scene};
use rectable::{detect, Detection, ModelConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_round_trip() -> Result<()> {
    let mut config = ModelConfig::default();
    config.seed = Some(42);
    config.cos_ortho_tolerance = 0.05;
    config.selection.n_samples = 2000;
    config.vertical = BorderLine::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.1, 1.0));

    let file = NamedTempFile::new()?;
    config.save(file.path())?;
    let loaded = ModelConfig::from_file(file.path())?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_invalid_config_rejected() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "cos_ortho_tolerance = 0.0")?;
    let err = ModelConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("cos_ortho_tolerance"));
    Ok(())
}

#[test]
fn test_scene_detection_written_as_json() -> Result<()> {
    let scene = Scene {
        borders: vec![
            BorderLine::new(Point3::new(0.0, 0.0, 0.0), Vector3::x()),
            BorderLine::new(Point3::new(0.5, 0.0, 0.0), Vector3::y()),
            BorderLine::new(Point3::new(0.0, 0.5, 0.0), Vector3::x()),
            BorderLine::new(Point3::new(0.0, 0.0, 0.0), Vector3::y()),
        ],
        vertical: Some(BorderLine::new(Point3::origin(), -Vector3::z())),
        cloud: (0..25)
            .map(|k| Point3::new((k % 5) as f64 * 0.1 + 0.05, (k / 5) as f64 * 0.1 + 0.05, 0.0))
            .collect(),
        indices: None,
    };

    let mut scene_file = NamedTempFile::new()?;
    write!(scene_file, "{}", serde_json::to_string(&scene)?)?;
    let loaded = load_scene(scene_file.path())?;
    assert_eq!(loaded, scene);

    let config = ModelConfig {
        seed: Some(3),
        ..ModelConfig::default()
    };
    let detection = detect(&loaded, &config)?;
    let rect = detection.rectangle.expect("square should be selected");
    // The scene's vertical points down, so the rectangle does too
    assert!(rect.normal().z < 0.0);

    let out = NamedTempFile::new()?;
    write_detection(&detection, out.path())?;
    let written: Detection = serde_json::from_str(&std::fs::read_to_string(out.path())?)?;
    assert_eq!(written, detection);
    Ok(())
}
