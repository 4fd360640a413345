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

//! Emitted particles as points.

use super::particle_shader;
use crate::error::TranslateResult;
use crate::shading_lane::MaterialCache;
use prism_core::graph::{NodeGraph, NodeId, NodeKind, ParamArray};
use prism_core::math::Vec3;
use prism_data::host::RenderResolution;
use prism_data::scene::{ParticleSystem, PointMode, PointSettings};
use prism_data::{Scene, SceneHost, SceneObject};
use prism_telemetry::ScopedTimer;

#[derive(Debug, Clone, PartialEq)]
pub struct PointsShape {
    pub points: Vec<Vec3>,
    pub radius: f32,
    pub settings: PointSettings,
    pub shader: Option<NodeId>,
}

impl PointsShape {
    pub fn emit(self, graph: &mut NodeGraph, name: impl Into<String>) -> NodeId {
        let id = graph.create(NodeKind::Points, name);
        graph.set_array(id, "points", ParamArray::Vector(self.points));
        graph.set(id, "radius", self.radius);
        graph.set(id, "mode", self.settings.mode.as_str());
        if self.settings.mode == PointMode::Quad {
            graph.set(id, "aspect", self.settings.aspect);
            graph.set(id, "rotation", self.settings.rotation);
        }
        graph.set(id, "min_pixel_width", self.settings.min_pixel_width);
        graph.set(id, "step_size", self.settings.step_size);
        if let Some(shader) = self.shader {
            graph.set_node(id, "shader", shader);
        }
        id
    }
}

/// Materialises emitter particle systems as points.
#[derive(Debug, Default)]
pub struct PointsLane;

impl PointsLane {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates the live particles of `system` at the scene frame. Returns
    /// `None` when there are none.
    pub fn build<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        graph: &mut NodeGraph,
        materials: &mut MaterialCache,
        scene: &Scene,
        object: &SceneObject,
        system: &ParticleSystem,
    ) -> TranslateResult<Option<PointsShape>> {
        let _timer = ScopedTimer::new(format!("points {}", system.name));
        let points = {
            let mut resolution = RenderResolution::enter(host, object.id, system.id);
            resolution
                .host()
                .particle_points(object.id, system.id, scene.frame_current)?
        };
        let Some(points) = points.filter(|p| !p.is_empty()) else {
            log::debug!("    {}: no points", system.name);
            return Ok(None);
        };

        let settings = &system.settings;
        let shader = particle_shader(graph, materials, scene, object, settings.material)?;
        Ok(Some(PointsShape {
            points,
            radius: settings.particle_size,
            settings: settings.points.clone(),
            shader,
        }))
    }
}
