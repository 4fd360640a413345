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

//! Defines the ExportAgent.

use crate::commit::{commit_graph, CommittedGraph};
use crate::session::{ExportSession, SessionData};
use anyhow::{Context, Result};
use prism_core::renderer::Renderer;
use prism_data::{Scene, SceneHost};
use prism_lanes::scene_lane::{ExportStats, ExportedScene, FullExportLane};
use prism_telemetry::ScopedTimer;

/// Drives full exports into a renderer.
#[derive(Debug, Default)]
pub struct ExportAgent {
    last_stats: Option<ExportStats>,
}

impl ExportAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exports `scene` for a final render: opens a new session generation,
    /// starts a fresh universe, commits the graph and binds the display
    /// data on the session.
    ///
    /// On failure the universe is released and the session is reset.
    pub fn export<H: SceneHost + ?Sized>(
        &mut self,
        session: &mut ExportSession,
        scene: &Scene,
        host: &mut H,
        renderer: &mut dyn Renderer,
    ) -> Result<ExportStats> {
        let _timer = ScopedTimer::new("export agent");
        let generation = session.create()?;
        renderer.begin();

        let exported = match self.translate_and_commit(scene, host, renderer, true) {
            Ok((exported, _)) => exported,
            Err(err) => {
                renderer.end();
                session.reset();
                return Err(err.context(format!("Export of session {} failed", generation)));
            }
        };

        let outputs = &exported.outputs;
        let driver = exported
            .graph
            .get(outputs.driver)
            .map(|node| node.name.clone())
            .unwrap_or_default();
        session.bind(SessionData {
            driver,
            offset: outputs.offset,
            progressive: outputs.progressive.clone(),
        })?;

        log::info!(
            "exported {} nodes ({} shapes, {} instances, {} lights) to {}",
            exported.graph.len(),
            exported.stats.shapes,
            exported.stats.instances,
            exported.stats.lights,
            renderer.backend_name()
        );
        self.last_stats = Some(exported.stats);
        Ok(exported.stats)
    }

    /// Exports `scene` into the renderer's current universe without a
    /// render session. The camera keeps its default screen window and no
    /// progressive range is recorded.
    pub fn export_graph<H: SceneHost + ?Sized>(
        &mut self,
        scene: &Scene,
        host: &mut H,
        renderer: &mut dyn Renderer,
    ) -> Result<(ExportedScene, CommittedGraph)> {
        let result = self.translate_and_commit(scene, host, renderer, false)?;
        self.last_stats = Some(result.0.stats);
        Ok(result)
    }

    /// Statistics of the most recent successful export.
    pub fn last_stats(&self) -> Option<ExportStats> {
        self.last_stats
    }

    fn translate_and_commit<H: SceneHost + ?Sized>(
        &self,
        scene: &Scene,
        host: &mut H,
        renderer: &mut dyn Renderer,
        in_session: bool,
    ) -> Result<(ExportedScene, CommittedGraph)> {
        let exported = FullExportLane::new(in_session)
            .run(scene, host)
            .context("Failed to translate the scene")?;
        let committed = commit_graph(renderer, &exported.graph)
            .with_context(|| format!("Failed to commit the scene to {}", renderer.backend_name()))?;
        Ok((exported, committed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use prism_data::scene::{DataId, MeshData};
    use prism_data::{ObjectKind, SceneObject};
    use prism_infra::{MemoryHost, MemoryRenderer};

    fn plane_scene() -> (Scene, MemoryHost) {
        let mut scene = Scene::new("s");
        let mut plane = SceneObject::new("Plane", ObjectKind::Mesh);
        plane.data = Some(DataId(0));
        let plane = scene.add_object(plane);
        let host = MemoryHost::new().with_mesh(plane, MeshData::plane());
        (scene, host)
    }

    #[test]
    fn test_export_binds_session_data() {
        let (scene, mut host) = plane_scene();
        let mut session = ExportSession::new();
        let mut renderer = MemoryRenderer::new();

        let stats = ExportAgent::new()
            .export(&mut session, &scene, &mut host, &mut renderer)
            .unwrap();

        assert_eq!(stats.shapes, 1, "The plane should be the only shape");
        assert_eq!(session.state(), SessionState::Active);
        let data = session.data().unwrap();
        assert_eq!(data.driver, "__driver");
        assert_eq!(data.offset, (0, 0));
        assert!(renderer.is_active(), "The universe stays open for the render");
        assert_eq!(renderer.count_type("polymesh"), 1);
    }

    #[test]
    fn test_export_failure_resets_session() {
        let (scene, mut host) = plane_scene();
        let mut session = ExportSession::new();
        let mut renderer = MemoryRenderer::new().reject_type("polymesh");

        let err = ExportAgent::new()
            .export(&mut session, &scene, &mut host, &mut renderer)
            .unwrap_err();

        assert!(format!("{err:#}").contains("Failed to commit"), "got {err:#}");
        assert_eq!(session.state(), SessionState::Reset);
        assert!(!renderer.is_active(), "A failed export must release the universe");
    }

    #[test]
    fn test_export_refuses_an_active_session() {
        let (scene, mut host) = plane_scene();
        let mut session = ExportSession::new();
        session.create().unwrap();
        let mut renderer = MemoryRenderer::new();
        assert!(ExportAgent::new()
            .export(&mut session, &scene, &mut host, &mut renderer)
            .is_err());
        assert!(!renderer.is_active(), "No universe is opened for a refused export");
    }
}
