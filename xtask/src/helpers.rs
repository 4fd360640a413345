// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Terminal output and cargo invocation shared by every task.

use anyhow::{bail, Context, Result};
use std::process::Command;
use std::time::{Duration, Instant};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Engine crates, in dependency order.
pub const ENGINE_CRATES: &[&str] = &[
    "prism-core",
    "prism-telemetry",
    "prism-data",
    "prism-infra",
    "prism-lanes",
    "prism-agents",
    "prism-sdk",
];

pub fn banner() {
    println!("{BOLD}{CYAN}prism{RESET} {DIM}scene translation workspace{RESET}");
}

pub fn section(title: &str) {
    println!("\n{BOLD}{CYAN}== {title}{RESET}");
}

/// A single cargo invocation with an optional environment override.
pub struct CargoStep<'a> {
    pub label: String,
    pub args: Vec<&'a str>,
    pub env: Option<(&'a str, &'a str)>,
}

impl<'a> CargoStep<'a> {
    pub fn new(label: impl Into<String>, args: &[&'a str]) -> Self {
        Self {
            label: label.into(),
            args: args.to_vec(),
            env: None,
        }
    }

    pub fn env(mut self, key: &'a str, value: &'a str) -> Self {
        self.env = Some((key, value));
        self
    }

    /// Runs the step and returns its wall time.
    pub fn run(&self) -> Result<Duration> {
        println!("{DIM}$ cargo {}{RESET}", self.args.join(" "));
        let start = Instant::now();
        let mut command = Command::new("cargo");
        command.args(&self.args);
        if let Some((key, value)) = self.env {
            command.env(key, value);
        }
        let status = command
            .status()
            .with_context(|| format!("could not spawn cargo for '{}'", self.label))?;
        let elapsed = start.elapsed();
        if !status.success() {
            println!("{BOLD}{RED}x {} ({:.1}s){RESET}", self.label, elapsed.as_secs_f64());
            bail!("{} failed: {}", self.label, status);
        }
        println!("{BOLD}{GREEN}ok {} ({:.1}s){RESET}", self.label, elapsed.as_secs_f64());
        Ok(elapsed)
    }
}

/// Outcome of one step in a multi-step run.
pub struct StepReport {
    pub label: String,
    pub result: Result<Duration>,
}

/// Prints one line per step and fails if any step failed.
pub fn summarize(reports: &[StepReport]) -> Result<()> {
    section("Summary");
    let width = reports.iter().map(|r| r.label.len()).max().unwrap_or(0);
    for report in reports {
        match &report.result {
            Ok(elapsed) => println!(
                "  {GREEN}ok{RESET}  {:<width$}  {:>6.1}s",
                report.label,
                elapsed.as_secs_f64()
            ),
            Err(e) => println!("  {RED}x{RESET}   {:<width$}  {DIM}{e}{RESET}", report.label),
        }
    }
    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    if failed > 0 {
        println!("{BOLD}{YELLOW}{failed} of {} steps failed{RESET}", reports.len());
        bail!("{failed} step(s) failed");
    }
    let total: Duration = reports.iter().filter_map(|r| r.result.as_ref().ok()).sum();
    println!("{BOLD}{GREEN}all {} steps passed in {:.1}s{RESET}", reports.len(), total.as_secs_f64());
    Ok(())
}
