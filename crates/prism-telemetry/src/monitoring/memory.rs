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

//! Renderer memory monitor.
//!
//! The renderer reports how many bytes it currently uses; the monitor keeps
//! the latest value and the running peak, and converts both to megabytes for
//! display.

use std::sync::atomic::{AtomicU64, Ordering};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A snapshot of the monitored memory usage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryReport {
    /// Bytes in use at the last sample.
    pub current_bytes: u64,
    /// Highest sampled value since the last reset.
    pub peak_bytes: u64,
    /// Number of samples taken.
    pub sample_count: u64,
}

impl MemoryReport {
    /// Current usage in megabytes.
    pub fn current_mb(&self) -> f32 {
        (self.current_bytes as f64 / BYTES_PER_MB) as f32
    }

    /// Peak usage in megabytes.
    pub fn peak_mb(&self) -> f32 {
        (self.peak_bytes as f64 / BYTES_PER_MB) as f32
    }
}

/// Tracks current and peak memory usage reported by a renderer.
#[derive(Debug)]
pub struct MemoryMonitor {
    id: String,
    current: AtomicU64,
    peak: AtomicU64,
    samples: AtomicU64,
}

impl MemoryMonitor {
    /// Creates a monitor with zeroed counters.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current: AtomicU64::new(0),
            peak: AtomicU64::new(0),
            samples: AtomicU64::new(0),
        }
    }

    /// The monitor's identifier.
    pub fn monitor_id(&self) -> &str {
        &self.id
    }

    /// Records a sample and returns the updated report.
    pub fn record(&self, used_bytes: u64) -> MemoryReport {
        self.current.store(used_bytes, Ordering::Relaxed);
        let previous_peak = self.peak.fetch_max(used_bytes, Ordering::Relaxed);
        let samples = self.samples.fetch_add(1, Ordering::Relaxed) + 1;
        MemoryReport {
            current_bytes: used_bytes,
            peak_bytes: previous_peak.max(used_bytes),
            sample_count: samples,
        }
    }

    /// The latest report, or `None` before the first sample.
    pub fn report(&self) -> Option<MemoryReport> {
        let sample_count = self.samples.load(Ordering::Relaxed);
        (sample_count > 0).then(|| MemoryReport {
            current_bytes: self.current.load(Ordering::Relaxed),
            peak_bytes: self.peak.load(Ordering::Relaxed),
            sample_count,
        })
    }

    /// Resets the peak to the current usage.
    pub fn reset_peak(&self) {
        self.peak
            .store(self.current.load(Ordering::Relaxed), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_report_before_first_sample() {
        let monitor = MemoryMonitor::new("Renderer");
        assert_eq!(monitor.monitor_id(), "Renderer");
        assert!(monitor.report().is_none());
    }

    #[test]
    fn test_peak_tracks_highest_sample() {
        let monitor = MemoryMonitor::new("Renderer");
        monitor.record(3 * 1024 * 1024);
        monitor.record(8 * 1024 * 1024);
        let report = monitor.record(2 * 1024 * 1024);
        assert_eq!(report.sample_count, 3);
        assert_relative_eq!(report.current_mb(), 2.0);
        assert_relative_eq!(report.peak_mb(), 8.0);
        assert_eq!(monitor.report(), Some(report));
    }

    #[test]
    fn test_reset_peak() {
        let monitor = MemoryMonitor::new("Renderer");
        monitor.record(10);
        monitor.record(4);
        monitor.reset_peak();
        assert_eq!(monitor.report().map(|r| r.peak_bytes), Some(4));
    }
}
