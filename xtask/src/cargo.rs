use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// How a failing step affects the run.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Abort,
    Warn,
}

/// Run `cargo <args>` under a progress label. Returns the captured output
/// when the step passed.
pub fn step(label: &str, args: &[&str], on_failure: OnFailure) -> Result<Option<Output>> {
    println!("{}", format!("  {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if output.status.success() {
        let secs = start.elapsed().as_secs_f64();
        println!("{}", format!("  ✓ {label} passed in {secs:.2}s").green());
        println!();
        return Ok(Some(output));
    }

    match on_failure {
        OnFailure::Abort => {
            eprintln!("{}", format!("  ✗ {label} failed").red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                eprintln!("  {line}");
            }
            anyhow::bail!("{label} failed");
        }
        OnFailure::Warn => {
            let warning = format!("  ⚠ {label} reported problems");
            eprintln!("{}", warning.yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            Ok(None)
        }
    }
}

/// The "test result:" summaries from libtest output, one per test binary.
pub fn test_summaries(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split("test result:").nth(1))
        .map(|summary| summary.trim().to_string())
        .collect()
}

/// Sum of the "N passed" counts across summaries.
pub fn passed_count(summaries: &[String]) -> u64 {
    summaries
        .iter()
        .filter_map(|s| {
            s.split(';')
                .find(|part| part.trim_end().ends_with("passed"))
                .and_then(|part| part.split_whitespace().rev().nth(1))
                .and_then(|n| n.parse::<u64>().ok())
        })
        .fold(0u64, u64::saturating_add)
}
