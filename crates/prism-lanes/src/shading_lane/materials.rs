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

//! One shader node per material.

use super::ShaderLinker;
use crate::error::{TranslateError, TranslateResult};
use prism_core::graph::{NamingState, NodeGraph, NodeId, NodeKind, ParamValue};
use prism_data::scene::{
    Material, MaterialId, MaterialKind, StandardHair, StandardSurface, StandardVolume,
    SurfaceShader, Wireframe,
};
use prism_data::shading::OutputRole;
use prism_data::Scene;
use std::collections::HashMap;

/// Name of the fallback shader.
pub const DEFAULT_SHADER: &str = "__default";

/// Memoised material translation.
///
/// Node-based materials go through a fresh [`ShaderLinker`] with the prefix
/// `M{n}::{name}`; other materials translate by kind. Anything that yields no
/// node, and every empty slot, resolves to the lazily created default shader.
#[derive(Debug)]
pub struct MaterialCache {
    names: NamingState,
    shaders: HashMap<MaterialId, NodeId>,
    default: Option<NodeId>,
}

impl Default for MaterialCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialCache {
    pub fn new() -> Self {
        Self {
            names: NamingState::new("M"),
            shaders: HashMap::new(),
            default: None,
        }
    }

    /// The `__default` utility shader, created on first use.
    pub fn default_shader(&mut self, graph: &mut NodeGraph) -> NodeId {
        *self
            .default
            .get_or_insert_with(|| graph.create(NodeKind::Shader("utility".into()), DEFAULT_SHADER))
    }

    /// Whether the default shader has been created.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Number of materials translated so far.
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// The shader node for a material slot.
    pub fn get(
        &mut self,
        graph: &mut NodeGraph,
        scene: &Scene,
        material: Option<MaterialId>,
    ) -> TranslateResult<NodeId> {
        let Some(id) = material else {
            return Ok(self.default_shader(graph));
        };
        if let Some(node) = self.shaders.get(&id) {
            return Ok(*node);
        }
        let material = scene
            .material(id)
            .ok_or(TranslateError::MissingMaterial(id))?;
        let node = match self.export(graph, scene, material)? {
            Some(node) => node,
            None => self.default_shader(graph),
        };
        self.shaders.insert(id, node);
        Ok(node)
    }

    fn export(
        &mut self,
        graph: &mut NodeGraph,
        scene: &Scene,
        material: &Material,
    ) -> TranslateResult<Option<NodeId>> {
        if let Some(tree_id) = material.node_tree {
            let tree = scene
                .node_tree(tree_id)
                .ok_or(TranslateError::MissingNodeTree(tree_id))?;
            let Some((output, node)) = tree.active_output(OutputRole::Material) else {
                return Ok(None);
            };
            let linked = node.inputs.first().and_then(|s| s.link.map(|_| s.identifier.clone()));
            return Ok(linked.and_then(|socket| {
                let prefix = self.names.next_name(&material.name);
                ShaderLinker::new().translate_input(graph, tree, output, &socket, &prefix)
            }));
        }

        let node = match &material.kind {
            MaterialKind::Surface(shader) => {
                let type_name = match shader {
                    SurfaceShader::Lambert { .. } => "lambert",
                    SurfaceShader::StandardSurface(_) => "standard_surface",
                    SurfaceShader::Utility(_) => "utility",
                    SurfaceShader::Flat { .. } => "flat",
                    SurfaceShader::StandardHair(_) => "standard_hair",
                };
                let id = self.create(graph, type_name, material);
                surface_params(graph, id, material, shader);
                id
            }
            MaterialKind::Wire(wire) => {
                let id = self.create(graph, "wireframe", material);
                wireframe_params(graph, id, material, wire);
                id
            }
            MaterialKind::Volume(volume) => {
                let id = self.create(graph, "standard_volume", material);
                volume_params(graph, id, volume);
                id
            }
            MaterialKind::Halo => {
                log::debug!("    material '{}' has no translation", material.name);
                return Ok(None);
            }
        };
        Ok(Some(node))
    }

    fn create(&mut self, graph: &mut NodeGraph, type_name: &str, material: &Material) -> NodeId {
        let name = self.names.next_name(&material.name);
        graph.create(NodeKind::Shader(type_name.to_owned()), name)
    }
}

fn surface_params(graph: &mut NodeGraph, id: NodeId, mat: &Material, shader: &SurfaceShader) {
    match shader {
        SurfaceShader::Lambert { opacity } => {
            graph.set(id, "Kd", mat.diffuse_intensity);
            graph.set(id, "Kd_color", ParamValue::rgb(mat.diffuse_color));
            graph.set(id, "opacity", ParamValue::rgb(*opacity));
        }
        SurfaceShader::StandardSurface(s) => standard_surface_params(graph, id, mat, s),
        SurfaceShader::Utility(u) => {
            graph.set(id, "color_mode", u.color_mode.as_str());
            graph.set(id, "shade_mode", u.shade_mode.as_str());
            graph.set(id, "overlay_mode", u.overlay_mode.as_str());
            graph.set(id, "color", ParamValue::rgb(mat.diffuse_color));
            graph.set(id, "opacity", u.opacity);
            graph.set(id, "ao_distance", u.ao_distance);
        }
        SurfaceShader::Flat { opacity } => {
            graph.set(id, "color", ParamValue::rgb(mat.diffuse_color));
            graph.set(id, "opacity", ParamValue::rgb(*opacity));
        }
        SurfaceShader::StandardHair(h) => standard_hair_params(graph, id, h),
    }
}

fn standard_surface_params(graph: &mut NodeGraph, id: NodeId, mat: &Material, s: &StandardSurface) {
    graph.set(id, "base", mat.diffuse_intensity);
    graph.set(id, "base_color", ParamValue::rgb(mat.diffuse_color));
    graph.set(id, "diffuse_roughness", s.diffuse_roughness);
    graph.set(id, "metalness", s.metalness);
    graph.set(id, "specular", mat.specular_intensity);
    graph.set(id, "specular_color", ParamValue::rgb(mat.specular_color));
    graph.set(id, "specular_roughness", s.specular_roughness);
    graph.set(id, "specular_anisotropy", s.specular_anisotropy);
    graph.set(id, "specular_rotation", s.specular_rotation);
    graph.set(id, "emission", mat.emit);
    graph.set(id, "emission_color", ParamValue::rgb(mat.diffuse_color));
    graph.set(id, "transmission", s.transmission);
    graph.set(id, "transmission_color", ParamValue::rgb(s.transmission_color));
    graph.set(id, "transmission_depth", s.transmission_depth);
    graph.set(id, "transmission_scatter", ParamValue::rgb(s.transmission_scatter));
    graph.set(id, "transmission_scatter_anisotropy", s.transmission_scatter_anisotropy);
    graph.set(id, "transmission_dispersion", s.transmission_dispersion);
    graph.set(id, "transmission_extra_roughness", s.transmission_extra_roughness);
    graph.set(id, "transmit_aovs", s.transmit_aovs);
    graph.set(id, "subsurface", s.subsurface);
    graph.set(id, "subsurface_color", ParamValue::rgb(s.subsurface_color));
    graph.set(id, "subsurface_radius", ParamValue::rgb(s.subsurface_radius));
    graph.set(id, "subsurface_scale", s.subsurface_scale);
    graph.set(id, "subsurface_anisotropy", s.subsurface_anisotropy);
    graph.set(id, "subsurface_type", s.subsurface_type.as_str());
    graph.set(id, "thin_walled", s.thin_walled);
    graph.set(id, "normal", s.normal);
    graph.set(id, "coat", s.coat);
    graph.set(id, "coat_color", ParamValue::rgb(s.coat_color));
    graph.set(id, "coat_roughness", s.coat_roughness);
    graph.set(id, "coat_normal", s.coat_normal);
    graph.set(id, "coat_affect_color", s.coat_affect_color);
    graph.set(id, "coat_affect_roughness", s.coat_affect_roughness);
    graph.set(id, "caustics", s.caustics);
    graph.set(id, "internal_reflections", s.internal_reflections);
    graph.set(id, "exit_to_background", s.exit_to_background);
    graph.set(id, "indirect_diffuse", s.indirect_diffuse);
    graph.set(id, "indirect_specular", s.indirect_specular);
    graph.set(id, "thin_film_thickness", s.thin_film_thickness);
    graph.set(id, "sheen", s.sheen);
    graph.set(id, "sheen_color", ParamValue::rgb(s.sheen_color));
    graph.set(id, "sheen_roughness", s.sheen_roughness);
}

fn standard_hair_params(graph: &mut NodeGraph, id: NodeId, h: &StandardHair) {
    graph.set(id, "base", h.base);
    graph.set(id, "base_color", ParamValue::rgb(h.base_color));
    graph.set(id, "melanin", h.melanin);
    graph.set(id, "melanin_redness", h.melanin_redness);
    graph.set(id, "melanin_randomize", h.melanin_randomize);
    graph.set(id, "roughness", h.roughness);
    graph.set(id, "ior", h.ior);
    graph.set(id, "shift", h.shift);
    graph.set(id, "specular_tint", ParamValue::rgb(h.specular_tint));
    graph.set(id, "specular2_tint", ParamValue::rgb(h.specular2_tint));
    graph.set(id, "transmission_tint", ParamValue::rgb(h.transmission_tint));
    graph.set(id, "diffuse", h.diffuse);
    graph.set(id, "diffuse_color", ParamValue::rgb(h.diffuse_color));
    graph.set(id, "emission", h.emission);
    graph.set(id, "emission_color", ParamValue::rgb(h.emission_color));
    graph.set(id, "opacity", ParamValue::rgb(h.opacity));
    graph.set(id, "indirect_diffuse", h.indirect_diffuse);
    graph.set(id, "indirect_specular", h.indirect_specular);
    graph.set(id, "extra_depth", h.extra_depth);
    graph.set(id, "extra_samples", h.extra_samples);
}

fn wireframe_params(graph: &mut NodeGraph, id: NodeId, mat: &Material, w: &Wireframe) {
    graph.set(id, "edge_type", w.edge_type.as_str());
    graph.set(id, "line_color", ParamValue::rgb(mat.diffuse_color));
    graph.set(id, "fill_color", ParamValue::rgb(w.fill_color));
    graph.set(id, "line_width", w.line_width);
    graph.set(id, "raster_space", w.raster_space);
}

fn volume_params(graph: &mut NodeGraph, id: NodeId, v: &StandardVolume) {
    graph.set(id, "density", v.density);
    graph.set(id, "scatter", v.scatter);
    graph.set(id, "scatter_color", ParamValue::rgb(v.scatter_color));
    graph.set(id, "scatter_anisotropy", v.scatter_anisotropy);
    graph.set(id, "transparent", ParamValue::rgb(v.transparent));
    graph.set(id, "transparent_depth", v.transparent_depth);
    graph.set(id, "emission", v.emission);
    graph.set(id, "emission_color", ParamValue::rgb(v.emission_color));
    graph.set(id, "temperature", v.temperature);
    graph.set(id, "blackbody_kelvin", v.blackbody_kelvin);
    graph.set(id, "blackbody_intensity", v.blackbody_intensity);
}
