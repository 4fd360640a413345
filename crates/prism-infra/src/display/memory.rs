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

//! A display host that keeps every tile and message it receives.

use prism_core::renderer::{DisplayHost, RenderResult, TileRect, TILE_CHANNELS};

/// A [`DisplayHost`] recording results, statistics and errors in memory.
///
/// A break can be scripted to fire once a given number of results were
/// begun, which is how a user cancelling mid-render looks to the engine.
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    next_id: u64,
    begun: usize,
    updates: usize,
    break_after: Option<usize>,
    finished: Vec<RenderResult>,
    cancelled: Vec<RenderResult>,
    stats: Vec<(String, String)>,
    memory: Vec<(f32, f32)>,
    errors: Vec<String>,
}

impl MemoryDisplay {
    /// Creates a display that never requests a break.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a break once `results` results were begun.
    pub fn break_after(mut self, results: usize) -> Self {
        self.break_after = Some(results);
        self
    }

    /// Results ended normally, in order.
    pub fn finished(&self) -> &[RenderResult] {
        &self.finished
    }

    /// Results ended as cancelled, in order.
    pub fn cancelled(&self) -> &[RenderResult] {
        &self.cancelled
    }

    /// Number of results begun and not yet ended.
    pub fn open_results(&self) -> usize {
        self.begun
            .saturating_sub(self.finished.len() + self.cancelled.len())
    }

    /// Number of `update_result` calls.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// `(stats, info)` pairs in the order they were reported.
    pub fn stats(&self) -> &[(String, String)] {
        &self.stats
    }

    /// `(used, peak)` memory reports in megabytes.
    pub fn memory_reports(&self) -> &[(f32, f32)] {
        &self.memory
    }

    /// Error messages shown to the user.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl DisplayHost for MemoryDisplay {
    fn begin_result(&mut self, rect: TileRect) -> RenderResult {
        self.next_id += 1;
        self.begun += 1;
        RenderResult {
            id: self.next_id,
            rect,
            pixels: vec![0; rect.area() * TILE_CHANNELS],
        }
    }

    fn update_result(&mut self, _result: &RenderResult) {
        self.updates += 1;
    }

    fn end_result(&mut self, result: RenderResult, cancel: bool) {
        if cancel {
            self.cancelled.push(result);
        } else {
            self.finished.push(result);
        }
    }

    fn test_break(&self) -> bool {
        self.break_after.is_some_and(|n| self.begun >= n)
    }

    fn update_stats(&mut self, stats: &str, info: &str) {
        self.stats.push((stats.to_owned(), info.to_owned()));
    }

    fn update_memory_stats(&mut self, used_mb: f32, peak_mb: f32) {
        self.memory.push((used_mb, peak_mb));
    }

    fn error_set(&mut self, message: &str) {
        log::error!("display: {}", message);
        self.errors.push(message.to_owned());
    }
}
