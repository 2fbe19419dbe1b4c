// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::model::Detection;
use crate::selection::Selection;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a detection run with colors
    pub fn report_detection(scene: &str, detection: &Detection, elapsed: Duration, verbose: bool) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Scene:".bold(), scene.cyan());
        println!("{}", "━".repeat(80).bright_black());

        match detection.selection {
            Selection::Selected { index, score, runner_up } => {
                println!(
                    "{} {}",
                    "✅".green(),
                    format!("Rectangle #{} selected", index).green().bold()
                );
                Self::print_score(score, runner_up);
            }
            Selection::Ambiguous { best, score, runner_up } => {
                println!(
                    "{} {}",
                    "⚠️".yellow(),
                    format!("Ambiguous: rectangle #{} does not lead enough", best)
                        .yellow()
                        .bold()
                );
                Self::print_score(score, runner_up);
            }
            Selection::BelowThreshold { best, score } => {
                println!(
                    "{} {}",
                    "❌".red(),
                    format!("No rectangle reached the required score (best #{})", best)
                        .red()
                        .bold()
                );
                Self::print_score(score, 0.0);
            }
            Selection::NoCandidate => {
                println!("{} {}", "❌".red(), "No candidate rectangle".red().bold());
            }
        }

        println!("\n{}", "Graph:".bold());
        println!("  {:<12} {}", "Borders:".bright_black(), detection.borders);
        println!("  {:<12} {}", "Vertices:".bright_black(), detection.vertices);
        println!("  {:<12} {}", "Candidates:".bright_black(), detection.candidates.len());

        if let Some(rect) = detection.rectangle {
            let (w, h) = rect.dimensions();
            let c = rect.center();
            println!("\n{}", "Rectangle:".bold());
            println!("  {:<12} {:.3} x {:.3}", "Size:".bright_black(), w, h);
            println!("  {:<12} ({:.3}, {:.3}, {:.3})", "Center:".bright_black(), c.x, c.y, c.z);
            let n = rect.normal();
            println!("  {:<12} ({:.3}, {:.3}, {:.3})", "Normal:".bright_black(), n.x, n.y, n.z);
        }

        if verbose {
            println!("\n{}", "Scores:".bold());
            for (i, score) in detection.scores.iter().enumerate() {
                println!("  #{:<4} {:.3}", i, score);
            }
            println!("  {} {}", "Unmatched points:".bright_black(), detection.unmatched.len());
        }

        println!("\n  {} {:.2?}", "Time:".bright_black(), elapsed);
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    fn print_score(score: f64, runner_up: f64) {
        println!(
            "  {} {} | {} {}",
            "Score:".bright_black(),
            format!("{:.3}", score).cyan(),
            "Runner-up:".bright_black(),
            format!("{:.3}", runner_up).yellow()
        );
    }
}
