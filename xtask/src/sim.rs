use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::Command;

pub struct SimOptions {
    pub seconds: u64,
    pub drop_at: Option<u64>,
    pub screenshot: Option<PathBuf>,
    pub log: String,
}

pub fn run(options: &SimOptions) -> Result<()> {
    println!();
    println!(
        "{}",
        format!("🖥  Running emulator for {}s...", options.seconds)
            .cyan()
            .bold()
    );
    println!();

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-p", "firmware", "--bin", "emulator"])
        .args(["--features", "emulator"])
        .env("RUST_LOG", &options.log)
        .env("SKY_CLOCK_SECONDS", options.seconds.to_string());
    if let Some(at) = options.drop_at {
        cmd.env("SKY_CLOCK_DROP_AT", at.to_string());
    }
    if let Some(path) = &options.screenshot {
        cmd.env("SKY_CLOCK_SCREENSHOT", path);
    }

    let status = cmd.status().context("Failed to start the emulator")?;
    if !status.success() {
        anyhow::bail!("Emulator exited with {status}");
    }

    println!();
    println!("{}", "✓ Emulator run finished".green());
    Ok(())
}
