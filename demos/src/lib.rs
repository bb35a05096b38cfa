//! Kvant Demo Suite
//!
//! Demonstrations of the Kvant simulator:
//!
//! - **Teleportation**: moves a prepared state from Alice to Bob and checks
//!   the result by uncomputing the preparation and freeing Bob's qubit
//!
//! ```no_run
//! use kvant_demos::teleport::{DEFAULT_ANGLE, run_trial};
//! use kvant_sim::Simulator;
//!
//! let mut sim = Simulator::seeded(7);
//! let outcome = run_trial(&mut sim, DEFAULT_ANGLE).unwrap();
//! println!("m0={} m1={}", outcome.m0, outcome.m1);
//! ```

pub mod teleport;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print a failure message.
pub fn print_failure(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}
