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

//! The engine facade a host drives through its render callbacks.

use crate::config::EngineConfig;
use anyhow::{Context, Result};
use prism_agents::{ExportAgent, ExportSession, Frame, InteractiveAgent, RenderAgent, SessionState};
use prism_core::renderer::{DisplayHost, RenderStatus, Renderer};
use prism_data::{Scene, SceneHost};
use prism_lanes::ipr_lane::ViewState;
use prism_lanes::scene_lane::ExportStats;

/// One render job: a renderer universe, the export session that fills it
/// and the agents that drive it.
pub struct RenderEngine<R: Renderer> {
    renderer: R,
    config: EngineConfig,
    session: ExportSession,
    export: ExportAgent,
    render: RenderAgent,
    interactive: InteractiveAgent,
}

impl<R: Renderer> RenderEngine<R> {
    /// Creates an engine over `renderer`, installing the logger if the host
    /// has not installed one.
    pub fn new(renderer: R, config: EngineConfig) -> Self {
        if prism_telemetry::init_logging(&config.log_filter).is_err() {
            log::debug!("logger already installed, keeping it");
        }
        log::info!("render engine created on {}", renderer.backend_name());
        Self {
            renderer,
            config,
            session: ExportSession::new(),
            export: ExportAgent::new(),
            render: RenderAgent::new(),
            interactive: InteractiveAgent::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Exports `scene` for the next [`Self::render`] call.
    pub fn update<H: SceneHost + ?Sized>(&mut self, scene: &Scene, host: &mut H) -> Result<ExportStats> {
        let scene = self.config.configured_scene(scene);
        self.export
            .export(&mut self.session, &scene, host, &mut self.renderer)
            .with_context(|| format!("Failed to export scene '{}'", scene.name))
    }

    /// Renders the exported scene into `display`.
    pub fn render(&mut self, display: &mut dyn DisplayHost) -> Result<RenderStatus> {
        self.render.render(&mut self.session, &mut self.renderer, display)
    }

    /// Starts the interactive session on the first call. Errors are logged
    /// and the frame is dropped.
    pub fn view_update<H: SceneHost + ?Sized>(&mut self, scene: &Scene, host: &mut H, view: &ViewState) -> bool {
        let scene = self.config.configured_scene(scene);
        self.interactive.view_update(&scene, host, view, &mut self.renderer)
    }

    /// Renders the next interactive frame.
    pub fn view_draw(&mut self, scene: &Scene, view: &ViewState) -> Option<Frame> {
        let scene = self.config.configured_scene(scene);
        self.interactive.view_draw(&scene, view, &mut self.renderer)
    }

    /// Forces a full translation on the next interactive update.
    pub fn tag_redraw(&mut self) {
        self.interactive.mark_dirty();
    }

    /// Frames dropped by the interactive session.
    pub fn dropped_frames(&self) -> u64 {
        self.interactive.dropped_frames()
    }

    /// Drops the exported data. The next render needs a new update.
    pub fn reset(&mut self) {
        if self.session.state() != SessionState::Uninitialized {
            self.renderer.end();
        }
        self.session.reset();
    }

    /// Ends every session and releases the renderer.
    pub fn free(&mut self) {
        self.interactive.free(&mut self.renderer);
        self.session.free();
        self.renderer.end();
        log::debug!("render engine freed");
    }
}

impl<R: Renderer> Drop for RenderEngine<R> {
    fn drop(&mut self) {
        if self.session.state() != SessionState::Uninitialized || self.interactive.is_active() {
            self.free();
        }
    }
}
