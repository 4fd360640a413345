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

//! The display host contract: where finished tiles and statistics go.

/// A pixel rectangle in image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRect {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TileRect {
    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Number of channels of every tile buffer (RGBA, 8 bits each).
pub const TILE_CHANNELS: usize = 4;

/// An in-flight image result opened on the display host.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    /// Host-side identifier.
    pub id: u64,
    /// Covered region.
    pub rect: TileRect,
    /// Pixels, `rect.area() * TILE_CHANNELS` bytes once filled.
    pub pixels: Vec<u8>,
}

/// The host UI that displays tiles and statistics.
///
/// Results follow a begin / update / end triple. Ending with `cancel = true`
/// discards whatever the result holds.
pub trait DisplayHost {
    /// Opens a result for a region.
    fn begin_result(&mut self, rect: TileRect) -> RenderResult;

    /// Pushes partial content of an open result.
    fn update_result(&mut self, result: &RenderResult);

    /// Closes a result, either delivering or cancelling it.
    fn end_result(&mut self, result: RenderResult, cancel: bool);

    /// Returns `true` when the user asked to stop rendering.
    fn test_break(&self) -> bool;

    /// Reports free-form progress text.
    fn update_stats(&mut self, stats: &str, info: &str);

    /// Reports memory usage in megabytes.
    fn update_memory_stats(&mut self, used_mb: f32, peak_mb: f32);

    /// Reports a user-visible error.
    fn error_set(&mut self, message: &str);
}
