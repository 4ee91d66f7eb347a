use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

/// Crates that must build without `std`.
const NO_STD_CRATES: [&str; 5] = ["platform", "bus", "connectivity", "polling", "ui"];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: library crates with default features (no_std, no logging backend)
    for krate in NO_STD_CRATES {
        step(
            &format!("Checking {krate} (no_std)"),
            &["check", "-p", krate, "--no-default-features"],
            OnFailure::Abort,
        )?;
    }

    // Check 2: firmware library without std
    step(
        "Checking firmware (no_std)",
        &["check", "-p", "firmware", "--lib"],
        OnFailure::Abort,
    )?;

    // Check 3: emulator binary
    step(
        "Checking emulator target (host)",
        &["check", "-p", "firmware", "--features", "emulator", "--bins"],
        OnFailure::Abort,
    )?;

    // Check 4: clippy, including tests (warnings only)
    step(
        "Running clippy lints",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--features",
            "firmware/emulator",
            "--",
            "-D",
            "warnings",
        ],
        OnFailure::Warn,
    )?;

    // Check 5: formatting (warnings only)
    let fmt = step(
        "Checking code formatting",
        &["fmt", "--all", "--check"],
        OnFailure::Warn,
    )?;
    if fmt.is_none() {
        eprintln!("     Run 'cargo fmt --all' to fix");
        println!();
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
