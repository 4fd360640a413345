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

//! Hair strands as curves.

use super::particle_shader;
use crate::error::TranslateResult;
use crate::shading_lane::MaterialCache;
use prism_core::graph::{NodeGraph, NodeId, NodeKind, ParamArray, ParamValue};
use prism_core::math::Vec3;
use prism_data::host::{ParticleCounts, RenderResolution};
use prism_data::scene::{CurveBasis, CurveMode, EmitFrom, ParticleSystem};
use prism_data::{Scene, SceneHost, SceneObject};
use prism_telemetry::ScopedTimer;

/// Per-strand parametric UV coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrandUvs {
    pub u: Vec<f32>,
    pub v: Vec<f32>,
}

impl StrandUvs {
    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }
}

/// Flat curves buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvesShape {
    pub num_points: u32,
    pub points: Vec<Vec3>,
    pub radius: Vec<f32>,
    pub basis: CurveBasis,
    pub mode: CurveMode,
    pub min_pixel_width: f32,
    pub uvs: Option<StrandUvs>,
    pub shader: Option<NodeId>,
}

impl CurvesShape {
    pub fn emit(self, graph: &mut NodeGraph, name: impl Into<String>) -> NodeId {
        let id = graph.create(NodeKind::Curves, name);
        graph.set(id, "num_points", ParamValue::UInt(self.num_points));
        graph.set_array(id, "points", ParamArray::Vector(self.points));
        graph.set_array(id, "radius", ParamArray::Float(self.radius));
        graph.set(id, "basis", self.basis.as_str());
        graph.set(id, "mode", self.mode.as_str());
        graph.set(id, "min_pixel_width", self.min_pixel_width);
        if let Some(uvs) = self.uvs {
            graph.set_array(id, "uparamcoord", ParamArray::Float(uvs.u));
            graph.set_array(id, "vparamcoord", ParamArray::Float(uvs.v));
        }
        if let Some(shader) = self.shader {
            graph.set_node(id, "shader", shader);
        }
        id
    }
}

/// Order of emitter samples for `counts`: parents first when included,
/// then `children / parents` children per parent with the remainder on the
/// last parent. Children are indexed after all parents.
pub fn strand_sample_order(counts: ParticleCounts, use_parent_particles: bool) -> Vec<usize> {
    let ParticleCounts { parents, children } = counts;
    if parents == 0 {
        return Vec::new();
    }
    let include_parents = children == 0 || use_parent_particles;
    let mut order = Vec::with_capacity(if include_parents { parents + children } else { children });
    if include_parents {
        order.extend(0..parents);
    }
    if children > 0 {
        let per_parent = children / parents;
        let remainder = children % parents;
        let mut child = parents;
        for parent in 0..parents {
            let n = per_parent + if parent + 1 == parents { remainder } else { 0 };
            order.extend(child..child + n);
            child += n;
        }
    }
    order
}

/// Materialises hair particle systems as curves.
#[derive(Debug, Default)]
pub struct CurvesLane;

impl CurvesLane {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates `system` at render resolution. Returns `None` when the
    /// system yields no strands.
    pub fn build<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        graph: &mut NodeGraph,
        materials: &mut MaterialCache,
        scene: &Scene,
        object: &SceneObject,
        system: &ParticleSystem,
    ) -> TranslateResult<Option<CurvesShape>> {
        let _timer = ScopedTimer::new(format!("strands {}", system.name));
        let settings = &system.settings;
        let steps = settings.strand_steps();

        let mut resolution = RenderResolution::enter(host, object.id, system.id);
        let host = resolution.host();
        let Some(strands) = host.particle_strands(
            object.id,
            system.id,
            steps,
            settings.use_parent_particles,
        )?
        else {
            log::debug!("    {}: no strands", system.name);
            return Ok(None);
        };
        if strands.strand_count() == 0 {
            return Ok(None);
        }
        log::debug!("    {}: {} strands", system.name, strands.strand_count());

        let uvs = match (&settings.curves.uv_map, settings.emit_from) {
            (Some(uv_map), EmitFrom::Face | EmitFrom::Volume) => {
                match host.uv_layer_names(object.id).iter().position(|n| n == uv_map) {
                    Some(layer) => {
                        let counts = host.particle_counts(object.id, system.id);
                        let mut uvs = StrandUvs::default();
                        for particle in strand_sample_order(counts, settings.use_parent_particles) {
                            let uv = host.uv_on_emitter(object.id, system.id, particle, layer);
                            uvs.u.push(uv.x);
                            uvs.v.push(uv.y);
                        }
                        Some(uvs)
                    }
                    None => {
                        log::debug!("    {}: uv map '{}' not found", system.name, uv_map);
                        None
                    }
                }
            }
            _ => None,
        };
        drop(resolution);

        let shader = particle_shader(graph, materials, scene, object, settings.material)?;
        Ok(Some(CurvesShape {
            num_points: strands.points_per_strand,
            points: strands.points,
            radius: strands.radius,
            basis: settings.curves.basis,
            mode: settings.curves.mode,
            min_pixel_width: settings.curves.min_pixel_width,
            uvs,
            shader,
        }))
    }
}
