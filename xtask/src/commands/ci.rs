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


//! Build, lint and test tasks over the engine crates.

use crate::helpers::{banner, section, summarize, CargoStep, StepReport, ENGINE_CRATES};
use anyhow::Result;

pub fn build() -> Result<()> {
    section("Build");
    CargoStep::new("build", &["build", "--workspace", "--exclude", "xtask"]).run()?;
    Ok(())
}

/// Tests each engine crate on its own so a failure names the crate.
pub fn test() -> Result<()> {
    section("Test");
    let reports: Vec<StepReport> = ENGINE_CRATES
        .iter()
        .map(|name| StepReport {
            label: format!("test {name}"),
            result: CargoStep::new(format!("test {name}"), &["test", "-p", *name]).run(),
        })
        .collect();
    summarize(&reports)
}

/// Type-checks every target, benches included.
pub fn check() -> Result<()> {
    section("Check");
    CargoStep::new("check", &["check", "--workspace", "--all-targets"]).run()?;
    Ok(())
}

/// Formats the workspace, or only verifies formatting when `verify` is set.
pub fn format(verify: bool) -> Result<()> {
    section("Format");
    let args: &[&str] = if verify {
        &["fmt", "--all", "--", "--check"]
    } else {
        &["fmt", "--all"]
    };
    CargoStep::new("fmt", args).run()?;
    Ok(())
}

fn verify_format() -> Result<()> {
    format(true)
}

pub fn clippy() -> Result<()> {
    section("Clippy");
    CargoStep::new(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
    .run()?;
    Ok(())
}

/// Builds rustdoc for the engine crates with broken links as errors.
pub fn doc() -> Result<()> {
    section("Doc");
    CargoStep::new("doc", &["doc", "--workspace", "--exclude", "xtask", "--no-deps"])
        .env("RUSTDOCFLAGS", "-D warnings")
        .run()?;
    Ok(())
}

/// Runs the criterion benches of the translation lanes.
pub fn bench() -> Result<()> {
    section("Bench");
    CargoStep::new("bench prism-lanes", &["bench", "-p", "prism-lanes"]).run()?;
    Ok(())
}

/// Runs every CI step, continuing past failures, then reports.
pub fn all() -> Result<()> {
    banner();
    let steps = [
        ("format", verify_format as fn() -> Result<()>),
        ("check", check),
        ("clippy", clippy),
        ("test", test),
        ("doc", doc),
    ];
    let reports: Vec<StepReport> = steps
        .iter()
        .map(|(label, step)| {
            let start = std::time::Instant::now();
            StepReport {
                label: (*label).to_owned(),
                result: step().map(|()| start.elapsed()),
            }
        })
        .collect();
    summarize(&reports)
}
