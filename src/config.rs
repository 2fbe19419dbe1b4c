// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Model configuration

use crate::geometry::{BorderLine, GraphTolerance};
use crate::selection::SelectionPolicy;
use anyhow::{bail, Context, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up by [`ModelConfig::load`]
pub const DEFAULT_CONFIG_FILE: &str = "rectable.toml";

/// Tolerances, reference vertical and selection policy of a table model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// `|cos(angle)|` below which two lines count as orthogonal
    pub cos_ortho_tolerance: f64,
    /// Largest gap between two lines still treated as an intersection
    pub max_line_gap: f64,
    /// Seed for the sampling generator; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Reference "up" line used to orient rectangles
    pub vertical: BorderLine,
    pub selection: SelectionPolicy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let tolerance = GraphTolerance::default();
        Self {
            cos_ortho_tolerance: tolerance.cos_ortho,
            max_line_gap: tolerance.max_line_gap,
            seed: None,
            vertical: BorderLine::new(Point3::origin(), Vector3::z()),
            selection: SelectionPolicy::default(),
        }
    }
}

impl ModelConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ModelConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `rectable.toml` if present, then apply `RECTABLE_*` environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides looked up by variable name
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, value: String) -> Result<T>
        where
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            value
                .parse()
                .with_context(|| format!("Invalid value for {}: {:?}", key, value))
        }

        if let Some(v) = lookup("RECTABLE_COS_ORTHO_TOLERANCE") {
            self.cos_ortho_tolerance = parse("RECTABLE_COS_ORTHO_TOLERANCE", v)?;
        }
        if let Some(v) = lookup("RECTABLE_MAX_LINE_GAP") {
            self.max_line_gap = parse("RECTABLE_MAX_LINE_GAP", v)?;
        }
        if let Some(v) = lookup("RECTABLE_SEED") {
            self.seed = Some(parse("RECTABLE_SEED", v)?);
        }
        if let Some(v) = lookup("RECTABLE_REQUIRED_SCORE") {
            self.selection.required_score = parse("RECTABLE_REQUIRED_SCORE", v)?;
        }
        if let Some(v) = lookup("RECTABLE_LEAD_SCORE") {
            self.selection.lead_score = parse("RECTABLE_LEAD_SCORE", v)?;
        }
        if let Some(v) = lookup("RECTABLE_N_SAMPLES") {
            self.selection.n_samples = parse("RECTABLE_N_SAMPLES", v)?;
        }
        self.validate()
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cos_ortho_tolerance > 0.0 && self.cos_ortho_tolerance < 1.0) {
            bail!(
                "cos_ortho_tolerance must be in (0, 1), got {}",
                self.cos_ortho_tolerance
            );
        }
        if self.max_line_gap < 0.0 {
            bail!("max_line_gap must not be negative, got {}", self.max_line_gap);
        }
        if self.vertical.direction.norm() <= f64::EPSILON {
            bail!("vertical direction must not be zero");
        }
        if self.selection.n_samples == 0 {
            bail!("selection.n_samples must be positive");
        }
        if self.selection.relative_threshold < 0.0 {
            bail!(
                "selection.relative_threshold must not be negative, got {}",
                self.selection.relative_threshold
            );
        }
        Ok(())
    }

    pub fn graph_tolerance(&self) -> GraphTolerance {
        GraphTolerance {
            cos_ortho: self.cos_ortho_tolerance,
            max_line_gap: self.max_line_gap,
        }
    }
}
