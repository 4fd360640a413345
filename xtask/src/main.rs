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

// Workspace automation for the Prism translation engine.
// Run with: cargo xtask <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", version, about = "Prism workspace automation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Task>,
}

#[derive(Subcommand, Clone, Copy)]
enum Task {
    /// Build every engine crate.
    Build,
    /// Run the tests of each engine crate.
    Test,
    /// Type-check all targets.
    Check,
    /// Format the workspace with rustfmt.
    Format {
        /// Only report unformatted files.
        #[arg(long)]
        check: bool,
    },
    /// Lint with clippy, warnings as errors.
    Clippy,
    /// Build rustdoc with warnings as errors.
    Doc,
    /// Run the polymesh benchmarks.
    Bench,
    /// Format check, type-check, lint, test and doc in one go.
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let Some(task) = cli.command else {
        helpers::banner();
        Cli::command().print_help()?;
        return Ok(());
    };
    match task {
        Task::Build => commands::ci::build(),
        Task::Test => commands::ci::test(),
        Task::Check => commands::ci::check(),
        Task::Format { check } => commands::ci::format(check),
        Task::Clippy => commands::ci::clippy(),
        Task::Doc => commands::ci::doc(),
        Task::Bench => commands::ci::bench(),
        Task::All => commands::ci::all(),
    }
}
