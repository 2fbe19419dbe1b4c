// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! rectable CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use rectable::cli::Reporter;
use rectable::{detect, io, ModelConfig};
use std::path::Path;

#[derive(Parser)]
#[command(name = "rectable")]
#[command(about = "Rectangular table detection from border lines and plane points", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the best rectangle in a scene file
    Detect {
        /// Scene JSON file (borders, cloud, optional indices and vertical)
        scene: String,

        /// Model configuration (TOML); defaults to ./rectable.toml when present
        #[arg(short, long)]
        config: Option<String>,

        /// Seed for point sampling
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the detection as JSON
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Output TOML file
        #[arg(default_value = rectable::config::DEFAULT_CONFIG_FILE)]
        output: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    match &cli.command {
        Commands::Detect {
            scene,
            config,
            seed,
            output,
        } => {
            detect_command(scene, config.as_deref(), *seed, output.as_deref(), cli.verbose)?;
        }
        Commands::InitConfig { output } => {
            ModelConfig::default().save(output)?;
            println!("Wrote default configuration to {}", output);
        }
        Commands::Version => {
            println!("rectable v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn detect_command(
    scene_path: &str,
    config_path: Option<&str>,
    seed: Option<u64>,
    output: Option<&str>,
    verbose: bool,
) -> Result<()> {
    if !Path::new(scene_path).exists() {
        Reporter::report_error(&format!("Scene file not found: {}", scene_path));
        std::process::exit(1);
    }

    let mut config = match config_path {
        Some(path) => ModelConfig::from_file(path)?,
        None => ModelConfig::load()?,
    };
    if seed.is_some() {
        config.seed = seed;
    }

    let scene = io::load_scene(scene_path)?;
    if verbose {
        println!(
            "Loaded {} borders and {} points from {}",
            scene.borders.len(),
            scene.cloud.len(),
            scene_path
        );
    }

    let start = std::time::Instant::now();
    let detection = detect(&scene, &config)?;
    Reporter::report_detection(scene_path, &detection, start.elapsed(), verbose);

    if let Some(output) = output {
        io::write_detection(&detection, output)?;
        if verbose {
            println!("Detection written to {}", output);
        }
    }

    Ok(())
}
