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

//! A monotonic stopwatch used to time translation steps.

use std::time::{Duration, Instant};

/// Measures elapsed wall-clock time from the moment it was started.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Option<Instant>,
}

impl Stopwatch {
    /// Creates a stopwatch that starts counting immediately.
    pub fn new() -> Self {
        Self {
            start: Some(Instant::now()),
        }
    }

    /// Creates a stopwatch that has not been started yet.
    pub fn stopped() -> Self {
        Self { start: None }
    }

    /// Restarts the stopwatch from zero.
    pub fn restart(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Returns the elapsed time, or `None` if the stopwatch was never started.
    pub fn elapsed(&self) -> Option<Duration> {
        self.start.map(|start| start.elapsed())
    }

    /// Returns the elapsed time in seconds as an `f64`.
    pub fn elapsed_secs_f64(&self) -> Option<f64> {
        self.elapsed().map(|d| d.as_secs_f64())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
