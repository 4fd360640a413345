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

//! Defines the RenderAgent.

use crate::session::ExportSession;
use anyhow::{Context, Result};
use prism_core::graph::ParamValue;
use prism_core::renderer::{
    DisplayHost, RenderResult, RenderStatus, Renderer, TileControl, TileEvent, TileRect,
};
use prism_telemetry::{MemoryMonitor, ScopedTimer};
use std::collections::HashMap;

/// Results begun for a highlighted bucket, keyed by tile origin.
type PendingTiles = HashMap<(i32, i32), RenderResult>;

/// The agent responsible for running image synthesis for a session.
#[derive(Debug)]
pub struct RenderAgent {
    memory: MemoryMonitor,
    last_status: Option<RenderStatus>,
}

impl Default for RenderAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderAgent {
    pub fn new() -> Self {
        Self {
            memory: MemoryMonitor::new("render"),
            last_status: None,
        }
    }

    /// Renders the session's universe into `display`.
    ///
    /// An aborted render is returned as is. Any other failure walks the
    /// session's progressive range, if any, and is reported to the display
    /// when no level succeeds. The session is cached afterwards whatever
    /// the outcome.
    pub fn render(
        &mut self,
        session: &mut ExportSession,
        renderer: &mut dyn Renderer,
        display: &mut dyn DisplayHost,
    ) -> Result<RenderStatus> {
        let _timer = ScopedTimer::new("render agent");
        let data = session.data().context("Nothing was exported to render")?.clone();

        let outcome = self.render_with_retry(renderer, display, data.offset, data.progressive);
        session.cache()?;

        let status = outcome?;
        self.last_status = Some(status);
        Ok(status)
    }

    /// Status of the most recent render.
    pub fn last_status(&self) -> Option<RenderStatus> {
        self.last_status
    }

    /// Peak renderer memory seen so far, in megabytes.
    pub fn peak_memory_mb(&self) -> Option<f32> {
        self.memory.report().map(|report| report.peak_mb())
    }

    fn render_with_retry(
        &self,
        renderer: &mut dyn Renderer,
        display: &mut dyn DisplayHost,
        offset: (i32, i32),
        progressive: Option<std::ops::RangeInclusive<i32>>,
    ) -> Result<RenderStatus> {
        let mut status = self.render_tiles(renderer, display, offset);
        if status.is_success() || status == RenderStatus::Aborted {
            return Ok(status);
        }

        if let Some(levels) = progressive {
            let options = renderer.options();
            for level in levels {
                log::debug!("render failed ({}), retrying at {} samples", status.code(), level);
                renderer
                    .set_value(options, "AA_samples", &ParamValue::Int(level))
                    .with_context(|| format!("Failed to set sampling level {}", level))?;
                status = self.render_tiles(renderer, display, offset);
                if status.is_success() || status == RenderStatus::Aborted {
                    return Ok(status);
                }
                let mem = self.memory.record(renderer.used_memory()).current_mb();
                display.update_stats("", &format!("Mem: {:.2}Mb, SL: {}", mem, level));
            }
        }

        log::error!("render failed with status {}", status.code());
        display.error_set(&format!("Render status: {}", status.code()));
        Ok(status)
    }

    /// One renderer invocation. Results still pending when it returns are
    /// ended as cancelled.
    fn render_tiles(
        &self,
        renderer: &mut dyn Renderer,
        display: &mut dyn DisplayHost,
        offset: (i32, i32),
    ) -> RenderStatus {
        let mut pending = PendingTiles::new();
        let memory = &self.memory;
        let status = {
            let mut on_tile = |tile: TileEvent<'_>| {
                deliver_tile(display, &mut pending, offset, &tile);
                if display.test_break() {
                    log::info!("render cancelled by the host");
                    drain_pending(display, &mut pending);
                    return TileControl::Abort;
                }
                let report = memory.record(tile.used_memory);
                display.update_memory_stats(report.current_mb(), report.peak_mb());
                TileControl::Continue
            };
            renderer.render(&mut on_tile)
        };
        drain_pending(display, &mut pending);
        status
    }
}

fn deliver_tile(
    display: &mut dyn DisplayHost,
    pending: &mut PendingTiles,
    offset: (i32, i32),
    tile: &TileEvent<'_>,
) {
    let origin = (tile.x - offset.0, tile.y - offset.1);
    let rect = TileRect {
        x: origin.0,
        y: origin.1,
        width: tile.width,
        height: tile.height,
    };
    match tile.pixels {
        Some(pixels) => {
            let mut result = pending
                .remove(&origin)
                .unwrap_or_else(|| display.begin_result(rect));
            result.pixels.clear();
            result.pixels.extend_from_slice(pixels);
            display.update_result(&result);
            display.end_result(result, false);
        }
        None => {
            let result = display.begin_result(rect);
            if let Some(stale) = pending.insert(origin, result) {
                display.end_result(stale, true);
            }
        }
    }
}

fn drain_pending(display: &mut dyn DisplayHost, pending: &mut PendingTiles) {
    for (_, result) in pending.drain() {
        display.end_result(result, true);
    }
}
