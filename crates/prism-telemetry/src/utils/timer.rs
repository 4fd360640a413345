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

//! RAII scope timers that log their elapsed time.

use prism_core::Stopwatch;
use std::borrow::Cow;

/// Logs the duration of a scope at debug level when dropped.
///
/// The measurement is logged on every exit path, including early returns
/// through `?`.
pub struct ScopedTimer {
    stopwatch: Stopwatch,
    label: Cow<'static, str>,
}

impl ScopedTimer {
    /// Starts a timer for `label`.
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            label: label.into(),
        }
    }

    /// Seconds elapsed so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.stopwatch.elapsed_secs_f64().unwrap_or(0.0)
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("    {} ({:.6})", self.label, self.elapsed_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_monotonic() {
        let timer = ScopedTimer::new("mesh");
        let first = timer.elapsed_secs();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(timer.elapsed_secs() >= first);
        assert!(timer.elapsed_secs() > 0.0);
    }
}
