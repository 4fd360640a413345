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

//! The full export pass.
//!
//! Translation runs in the order the renderer expects to resolve references:
//! camera and world first, then every first-pass object, then duplicator
//! instances (which may reference first-pass shapes), then mesh-light
//! bindings (which may reference either), and finally the options, filter
//! and driver nodes.

use super::{instance_node, InstanceTable, SceneWalker, WalkAction};
use crate::camera_lane::CameraLane;
use crate::error::{TranslateError, TranslateResult};
use crate::geometry_lane::{apply_object_properties, CurvesLane, PointsLane, PolymeshLane};
use crate::light_lane::LightLane;
use crate::options_lane::{OptionsLane, OptionsOutput};
use crate::shading_lane::{translate_world, MaterialCache};
use prism_core::graph::{sanitize, NamingState, NodeGraph, NodeId};
use prism_core::math::Mat4;
use prism_data::host::{DuplicateList, TempMesh};
use prism_data::scene::ParticleOutput;
use prism_data::{Resolution, Scene, SceneHost, SceneObject};
use prism_telemetry::ScopedTimer;

/// Counters of one export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub shapes: usize,
    pub instances: usize,
    pub particle_shapes: usize,
    pub lights: usize,
    pub duplicates: usize,
    pub mesh_lights: usize,
    pub skipped: usize,
}

/// A translated scene, ready to commit.
#[derive(Debug)]
pub struct ExportedScene {
    pub graph: NodeGraph,
    pub outputs: OptionsOutput,
    pub camera: Option<NodeId>,
    pub stats: ExportStats,
}

/// One-shot translation of a whole scene.
#[derive(Debug, Default)]
pub struct FullExportLane {
    in_session: bool,
}

impl FullExportLane {
    /// `in_session` selects a render session (tiles go to a display host)
    /// over a plain scene export.
    pub fn new(in_session: bool) -> Self {
        Self { in_session }
    }

    pub fn run<H: SceneHost + ?Sized>(&self, scene: &Scene, host: &mut H) -> TranslateResult<ExportedScene> {
        let _timer = ScopedTimer::new("full export");
        let mut pass = ExportPass {
            scene,
            host,
            graph: NodeGraph::new(),
            names: NamingState::new("O"),
            materials: MaterialCache::new(),
            instances: InstanceTable::new(),
            lights: LightLane::new(),
            mesh_lights: Vec::new(),
            stats: ExportStats::default(),
        };

        let options = pass.graph.options();
        let camera = CameraLane::new().run(&mut pass.graph, scene, options, self.in_session)?;
        translate_world(&mut pass.graph, scene, options)?;

        let plan = SceneWalker::new().plan(scene);
        pass.stats.skipped = plan.skipped.len();
        for (id, action) in &plan.entries {
            let object = scene.object(*id).ok_or(TranslateError::MissingObject(*id))?;
            match action {
                WalkAction::Geometry => pass.export_geometry(object)?,
                WalkAction::Light => pass.export_light(object)?,
            }
        }
        for id in &plan.duplicators {
            let duplicator = scene.object(*id).ok_or(TranslateError::MissingObject(*id))?;
            pass.expand_duplicator(duplicator)?;
        }
        pass.bind_mesh_lights()?;

        let outputs = OptionsLane::new().run(&mut pass.graph, scene, self.in_session);
        log::debug!("export: {:?}", pass.stats);
        Ok(ExportedScene {
            graph: pass.graph,
            outputs,
            camera,
            stats: pass.stats,
        })
    }
}

struct ExportPass<'a, H: SceneHost + ?Sized> {
    scene: &'a Scene,
    host: &'a mut H,
    graph: NodeGraph,
    names: NamingState,
    materials: MaterialCache,
    instances: InstanceTable,
    lights: LightLane,
    mesh_lights: Vec<(NodeId, String)>,
    stats: ExportStats,
}

impl<H: SceneHost + ?Sized> ExportPass<'_, H> {
    fn export_geometry(&mut self, object: &SceneObject) -> TranslateResult<()> {
        let mut name: Option<String> = None;

        let mut systems = object.render_particle_systems().peekable();
        if systems.peek().is_some() {
            let mut use_render_emitter = false;
            for system in systems {
                use_render_emitter |= system.settings.use_render_emitter;
                let curves = match system.settings.output() {
                    Some(ParticleOutput::Curves) => true,
                    Some(ParticleOutput::Points) => false,
                    None => continue,
                };
                let (scene, graph, materials) = (self.scene, &mut self.graph, &mut self.materials);
                let host = &mut *self.host;
                let node_name = |names: &mut NamingState, name: &mut Option<String>| {
                    let base = name.get_or_insert_with(|| names.next_name(&object.name));
                    format!("{}&PS:{}", base, sanitize(&system.name))
                };
                if curves {
                    let Some(shape) = CurvesLane::new().build(host, graph, materials, scene, object, system)? else {
                        continue;
                    };
                    shape.emit(graph, node_name(&mut self.names, &mut name));
                } else {
                    let Some(shape) = PointsLane::new().build(host, graph, materials, scene, object, system)? else {
                        continue;
                    };
                    shape.emit(graph, node_name(&mut self.names, &mut name));
                }
                self.stats.particle_shapes += 1;
            }
            if !use_render_emitter {
                return Ok(());
            }
        }

        let unmodified_data = object.data.filter(|_| !object.is_modified);
        if let Some(shape) = unmodified_data.and_then(|d| self.instances.shared_shape(d)) {
            let name = name.unwrap_or_else(|| self.names.next_name(&object.name));
            let id = instance_node(&mut self.graph, name, shape, &object.matrix_world);
            apply_object_properties(&mut self.graph, id, &object.properties);
            self.stats.instances += 1;
            log::debug!("    instance ({})", object.name);
            return Ok(());
        }

        let shape = materialize_mesh(
            &mut *self.host,
            &mut self.graph,
            &mut self.materials,
            self.scene,
            object,
            || name.unwrap_or_else(|| self.names.next_name(&object.name)),
            &object.matrix_world,
        )?;
        if let Some(shape) = shape {
            apply_object_properties(&mut self.graph, shape, &object.properties);
            if let Some(data) = unmodified_data {
                self.instances.share(data, shape);
            }
            self.instances.record(object.id, shape);
            self.stats.shapes += 1;
        }
        Ok(())
    }

    fn export_light(&mut self, object: &SceneObject) -> TranslateResult<()> {
        let light = self
            .lights
            .run(&mut self.graph, self.scene, &mut self.names, object)?;
        if let Some(light) = light {
            self.stats.lights += 1;
            if let Some(mesh) = light.mesh {
                self.mesh_lights.push((light.id, mesh));
            }
        }
        Ok(())
    }

    fn expand_duplicator(&mut self, duplicator: &SceneObject) -> TranslateResult<()> {
        let _timer = ScopedTimer::new(format!("duplicator {}", duplicator.name));
        log::debug!("[DUPLI:{:?}:{:?}] '{}'", duplicator.kind, duplicator.dupli, duplicator.name);
        let mut list = DuplicateList::create(&mut *self.host, duplicator)?;
        let (instances, host) = list.parts();

        for dupli in instances {
            let object = self
                .scene
                .object(dupli.object)
                .ok_or(TranslateError::MissingObject(dupli.object))?;
            if object.hide_render || object.is_duplicator() || !object.kind.is_convertible() {
                continue;
            }
            let node = match self.instances.object_shape(object.id) {
                Some(shape) => {
                    self.stats.duplicates += 1;
                    let name = self.names.next_name(&object.name);
                    Some(instance_node(&mut self.graph, name, shape, &dupli.matrix))
                }
                None => {
                    log::debug!("[{:?}] '{}'", object.kind, object.name);
                    let shape = materialize_mesh(
                        &mut *host,
                        &mut self.graph,
                        &mut self.materials,
                        self.scene,
                        object,
                        || self.names.next_name(&object.name),
                        &dupli.matrix,
                    )?;
                    if let Some(shape) = shape {
                        self.instances.record(object.id, shape);
                        self.stats.shapes += 1;
                    }
                    shape
                }
            };
            if let Some(node) = node {
                apply_object_properties(&mut self.graph, node, &object.properties);
            }
        }
        log::debug!("instances {}", self.stats.duplicates);
        Ok(())
    }

    fn bind_mesh_lights(&mut self) -> TranslateResult<()> {
        for (light, mesh_name) in std::mem::take(&mut self.mesh_lights) {
            let Some(object) = self.scene.object_by_name(&mesh_name) else {
                log::debug!("mesh light: no object '{}'", mesh_name);
                continue;
            };
            let shape = match self.instances.object_shape(object.id) {
                Some(shape) => Some(shape),
                None if object.kind.is_convertible() => {
                    let shape = materialize_mesh(
                        &mut *self.host,
                        &mut self.graph,
                        &mut self.materials,
                        self.scene,
                        object,
                        || self.names.next_name(&object.name),
                        &object.matrix_world,
                    )?;
                    if let Some(shape) = shape {
                        self.instances.record(object.id, shape);
                    }
                    shape
                }
                None => continue,
            };
            if let Some(shape) = shape {
                self.graph.set_node(light, "mesh", shape);
                self.stats.mesh_lights += 1;
            }
        }
        Ok(())
    }
}

/// Evaluates `object` at render resolution and emits it as a polymesh.
/// Objects without mesh data yield `None`. `name` is only called once the
/// host produced a mesh.
fn materialize_mesh<H: SceneHost + ?Sized>(
    host: &mut H,
    graph: &mut NodeGraph,
    materials: &mut MaterialCache,
    scene: &Scene,
    object: &SceneObject,
    name: impl FnOnce() -> String,
    matrix: &Mat4,
) -> TranslateResult<Option<NodeId>> {
    let mesh = {
        let _timer = ScopedTimer::new("mesh");
        TempMesh::acquire(host, object, Resolution::Render)?
    };
    let Some(mesh) = mesh else {
        log::debug!("    skip (no mesh data)");
        return Ok(None);
    };
    PolymeshLane::new()
        .run(graph, materials, scene, &mesh, name(), matrix)
        .map(Some)
}
