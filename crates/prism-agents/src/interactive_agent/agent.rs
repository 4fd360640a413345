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

//! Defines the InteractiveAgent.

use crate::commit::{apply_patch, commit_graph};
use anyhow::{Context, Result};
use prism_core::graph::ParamValue;
use prism_core::renderer::{RenderStatus, Renderer, TileControl, TileEvent, TILE_CHANNELS};
use prism_data::{Scene, SceneHost};
use prism_lanes::ipr_lane::{
    InteractiveSessionState, PatchBuilder, PatchOutcome, PreviewLane, ViewState,
};
use std::ops::RangeInclusive;

/// One rendered viewport image, RGBA8, rows from the first tile row on.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Sampling level the frame was rendered at.
    pub samples: i32,
    pub pixels: Vec<u8>,
}

/// State of a running interactive session.
#[derive(Debug)]
struct InteractiveRun {
    state: InteractiveSessionState,
    sampling: RangeInclusive<i32>,
    level: i32,
}

/// The agent driving an interactive preview session.
#[derive(Debug, Default)]
pub struct InteractiveAgent {
    run: Option<InteractiveRun>,
    patches: PatchBuilder,
    dirty: bool,
    dropped_frames: u64,
}

impl InteractiveAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session has been started and not freed.
    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    /// Frames dropped because of an error since the agent was created.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Patch generation of the running session.
    pub fn generation(&self) -> Option<u64> {
        self.run.as_ref().map(|run| run.state.generation())
    }

    /// Requests a full translation on the next [`Self::view_update`].
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Starts the session on the first call, or after [`Self::mark_dirty`].
    /// Returns whether the scene was translated.
    pub fn view_update<H: SceneHost + ?Sized>(
        &mut self,
        scene: &Scene,
        host: &mut H,
        view: &ViewState,
        renderer: &mut dyn Renderer,
    ) -> bool {
        if self.run.is_some() && !self.dirty {
            return false;
        }
        match self.start(scene, host, view, renderer) {
            Ok(run) => {
                self.run = Some(run);
                self.dirty = false;
                true
            }
            Err(err) => {
                log::error!("interactive update failed: {:#}", err);
                renderer.end();
                self.run = None;
                self.dropped_frames += 1;
                false
            }
        }
    }

    /// Patches the camera from `view` and renders the next refinement
    /// step. Returns `None` when there is no session, when the view cannot
    /// be translated or when the frame was dropped.
    pub fn view_draw(&mut self, scene: &Scene, view: &ViewState, renderer: &mut dyn Renderer) -> Option<Frame> {
        let run = self.run.as_mut()?;
        match Self::draw(&self.patches, run, scene, view, renderer) {
            Ok(frame) => frame,
            Err(err) => {
                log::error!("interactive draw failed: {:#}", err);
                self.dropped_frames += 1;
                None
            }
        }
    }

    /// Ends the session and releases the renderer universe.
    pub fn free(&mut self, renderer: &mut dyn Renderer) {
        if self.run.take().is_some() {
            renderer.end();
            log::debug!("interactive session freed");
        }
    }

    fn start<H: SceneHost + ?Sized>(
        &self,
        scene: &Scene,
        host: &mut H,
        view: &ViewState,
        renderer: &mut dyn Renderer,
    ) -> Result<InteractiveRun> {
        let preview = PreviewLane::new()
            .run(scene, host, view)
            .context("Failed to translate the interactive preview")?;
        renderer.begin();
        commit_graph(renderer, &preview.graph).context("Failed to commit the interactive preview")?;
        log::info!("interactive session started with {} nodes", preview.graph.len());
        Ok(InteractiveRun {
            state: preview.state,
            level: *preview.sampling.start(),
            sampling: preview.sampling,
        })
    }

    fn draw(
        patches: &PatchBuilder,
        run: &mut InteractiveRun,
        scene: &Scene,
        view: &ViewState,
        renderer: &mut dyn Renderer,
    ) -> Result<Option<Frame>> {
        match patches.build(&mut run.state, scene, view) {
            PatchOutcome::Patch(patch) => {
                if !patch.is_empty() {
                    apply_patch(renderer, &patch).context("Failed to apply the view patch")?;
                    run.level = *run.sampling.start();
                }
            }
            PatchOutcome::Unhandled(reason) => {
                log::debug!("interactive view not handled: {:?}", reason);
                return Ok(None);
            }
        }

        let options = renderer.options();
        renderer.set_value(options, "xres", &ParamValue::Int(view.width as i32))?;
        renderer.set_value(options, "yres", &ParamValue::Int(view.height as i32))?;
        renderer.set_value(options, "AA_samples", &ParamValue::Int(run.level))?;

        let mut frame = Frame {
            width: view.width,
            height: view.height,
            samples: run.level,
            pixels: vec![0; view.width as usize * view.height as usize * TILE_CHANNELS],
        };
        let status = renderer.render(&mut |tile: TileEvent<'_>| {
            blit(&mut frame, &tile);
            TileControl::Continue
        });
        if status != RenderStatus::Success {
            anyhow::bail!("Interactive render returned status {}", status.code());
        }

        if run.level < *run.sampling.end() {
            run.level += 1;
        }
        Ok(Some(frame))
    }
}

/// Copies a finished tile into the frame, clipped to the frame bounds.
fn blit(frame: &mut Frame, tile: &TileEvent<'_>) {
    let Some(pixels) = tile.pixels else {
        return;
    };
    let (Ok(x), Ok(y)) = (u32::try_from(tile.x), u32::try_from(tile.y)) else {
        return;
    };
    if x >= frame.width || y >= frame.height {
        return;
    }
    let columns = tile.width.min(frame.width - x) as usize;
    let rows = tile.height.min(frame.height - y) as usize;
    let src_stride = tile.width as usize * TILE_CHANNELS;
    let dst_stride = frame.width as usize * TILE_CHANNELS;
    for row in 0..rows {
        let src = row * src_stride;
        let dst = (y as usize + row) * dst_stride + x as usize * TILE_CHANNELS;
        let len = columns * TILE_CHANNELS;
        if let (Some(from), Some(to)) = (pixels.get(src..src + len), frame.pixels.get_mut(dst..dst + len)) {
            to.copy_from_slice(from);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32) -> Frame {
        Frame {
            width,
            height,
            samples: 1,
            pixels: vec![0; (width * height) as usize * TILE_CHANNELS],
        }
    }

    #[test]
    fn test_blit_places_rows_at_the_tile_origin() {
        let mut target = frame(4, 4);
        let pixels = vec![9u8; 2 * 2 * TILE_CHANNELS];
        blit(
            &mut target,
            &TileEvent {
                x: 2,
                y: 1,
                width: 2,
                height: 2,
                pixels: Some(&pixels),
                used_memory: 0,
            },
        );
        let pixel = |x: usize, y: usize| target.pixels[(y * 4 + x) * TILE_CHANNELS];
        assert_eq!(pixel(2, 1), 9);
        assert_eq!(pixel(3, 2), 9);
        assert_eq!(pixel(1, 1), 0, "Columns left of the tile are untouched");
        assert_eq!(pixel(2, 3), 0, "Rows below the tile are untouched");
    }

    #[test]
    fn test_blit_clips_tiles_overhanging_the_frame() {
        let mut target = frame(3, 3);
        let pixels = vec![5u8; 4 * 4 * TILE_CHANNELS];
        blit(
            &mut target,
            &TileEvent {
                x: 1,
                y: 1,
                width: 4,
                height: 4,
                pixels: Some(&pixels),
                used_memory: 0,
            },
        );
        let filled = target.pixels.chunks(TILE_CHANNELS).filter(|p| p[0] == 5).count();
        assert_eq!(filled, 4, "Only the 2x2 overlap is written");
    }

    #[test]
    fn test_highlights_leave_the_frame_untouched() {
        let mut target = frame(2, 2);
        blit(
            &mut target,
            &TileEvent {
                x: 0,
                y: 0,
                width: 2,
                height: 2,
                pixels: None,
                used_memory: 0,
            },
        );
        assert!(target.pixels.iter().all(|&b| b == 0));
    }
}
