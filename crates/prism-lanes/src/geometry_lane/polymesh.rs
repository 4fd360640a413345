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

//! Polygon meshes.

use crate::error::TranslateResult;
use crate::shading_lane::MaterialCache;
use prism_core::graph::{NodeGraph, NodeId, NodeKind, ParamArray, ParamValue};
use prism_core::math::{Vec2, Vec3};
use prism_data::scene::{MaterialId, MeshData};
use prism_data::Scene;
use prism_telemetry::ScopedTimer;

/// How a polymesh references its shaders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShaderAssignment {
    /// The mesh defines no materials.
    #[default]
    None,
    /// Every polygon uses the same shader.
    Single(NodeId),
    /// Polygons select a shader through `shidxs`.
    PerFace { shaders: Vec<NodeId>, shidxs: Vec<u8> },
}

/// Groups polygons by shader.
///
/// Groups are ordered by the smallest material index that resolves to them.
/// Material indices past `slot_shaders` resolve to `fallback`.
pub fn group_shaders(
    material_indices: &[u16],
    slot_shaders: &[NodeId],
    fallback: NodeId,
) -> ShaderAssignment {
    if slot_shaders.is_empty() {
        return ShaderAssignment::None;
    }
    let resolve = |index: u16| slot_shaders.get(index as usize).copied().unwrap_or(fallback);

    let mut used: Vec<u16> = material_indices.to_vec();
    used.sort_unstable();
    used.dedup();

    let mut shaders: Vec<NodeId> = Vec::new();
    for index in used {
        let shader = resolve(index);
        if !shaders.contains(&shader) {
            shaders.push(shader);
        }
    }

    match shaders.as_slice() {
        [] => ShaderAssignment::Single(resolve(0)),
        [single] => ShaderAssignment::Single(*single),
        _ => {
            let shidxs = material_indices
                .iter()
                .map(|&index| {
                    let shader = resolve(index);
                    let group = shaders.iter().position(|s| *s == shader).unwrap_or(0);
                    u8::try_from(group).unwrap_or(u8::MAX)
                })
                .collect();
            ShaderAssignment::PerFace { shaders, shidxs }
        }
    }
}

/// Flat polymesh buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolymeshShape {
    pub vlist: Vec<Vec3>,
    pub nlist: Vec<Vec3>,
    pub nsides: Vec<u32>,
    pub vidxs: Vec<u32>,
    pub nidxs: Vec<u32>,
    pub uvlist: Option<Vec<Vec2>>,
    pub shaders: ShaderAssignment,
}

impl PolymeshShape {
    /// Copies the mesh into contiguous buffers. Normals are per loop, so
    /// `nidxs` is the identity over loops; `uvidxs` is the identity over
    /// the uv list.
    pub fn from_mesh(mesh: &MeshData) -> Self {
        let loops = mesh.loop_count() as u32;
        Self {
            vlist: mesh.vertices.clone(),
            nlist: mesh.loop_normals.clone(),
            nsides: mesh.polygons.iter().map(|p| p.loop_total).collect(),
            vidxs: mesh.loop_vertices.clone(),
            nidxs: (0..loops).collect(),
            uvlist: mesh.active_render_uv().map(|layer| layer.uvs.clone()),
            shaders: ShaderAssignment::None,
        }
    }

    /// Writes the shape as a polymesh node named `name`.
    pub fn emit(self, graph: &mut NodeGraph, name: impl Into<String>) -> NodeId {
        let id = graph.create(NodeKind::Polymesh, name);
        graph.set(id, "smoothing", true);
        graph.set_array(id, "vlist", ParamArray::Vector(self.vlist));
        graph.set_array(id, "nlist", ParamArray::Vector(self.nlist));
        graph.set_array(id, "nsides", ParamArray::UInt(self.nsides));
        graph.set_array(id, "vidxs", ParamArray::UInt(self.vidxs));
        if let Some(uvlist) = self.uvlist {
            graph.set_array(id, "uvidxs", ParamArray::UInt((0..uvlist.len() as u32).collect()));
            graph.set_array(id, "uvlist", ParamArray::Vector2(uvlist));
        }
        graph.set_array(id, "nidxs", ParamArray::UInt(self.nidxs));

        match self.shaders {
            ShaderAssignment::None => {}
            ShaderAssignment::Single(shader) => graph.set_node(id, "shader", shader),
            ShaderAssignment::PerFace { shaders, shidxs } => {
                graph.set_nodes(id, "shader", shaders);
                graph.set_array(id, "shidxs", ParamArray::Byte(shidxs));
            }
        }
        id
    }
}

/// Turns evaluated meshes into polymesh nodes.
#[derive(Debug, Default)]
pub struct PolymeshLane;

impl PolymeshLane {
    pub fn new() -> Self {
        Self
    }

    /// Builds the shape of `mesh` with its shaders resolved through
    /// `materials`.
    pub fn build(
        &self,
        graph: &mut NodeGraph,
        materials: &mut MaterialCache,
        scene: &Scene,
        mesh: &MeshData,
    ) -> TranslateResult<PolymeshShape> {
        let _timer = ScopedTimer::new("polymesh buffers");
        let mut shape = PolymeshShape::from_mesh(mesh);
        if mesh.materials.is_empty() {
            return Ok(shape);
        }

        let slot_shaders = mesh
            .materials
            .iter()
            .map(|m: &Option<MaterialId>| materials.get(graph, scene, *m))
            .collect::<TranslateResult<Vec<_>>>()?;
        let indices: Vec<u16> = mesh.polygons.iter().map(|p| p.material_index).collect();
        let fallback = if indices.iter().any(|&i| i as usize >= slot_shaders.len()) {
            materials.default_shader(graph)
        } else {
            slot_shaders[0]
        };
        shape.shaders = group_shaders(&indices, &slot_shaders, fallback);
        Ok(shape)
    }

    /// Builds and emits `mesh` as a polymesh named `name` placed at `matrix`.
    pub fn run(
        &self,
        graph: &mut NodeGraph,
        materials: &mut MaterialCache,
        scene: &Scene,
        mesh: &MeshData,
        name: impl Into<String>,
        matrix: &prism_core::math::Mat4,
    ) -> TranslateResult<NodeId> {
        let shape = self.build(graph, materials, scene, mesh)?;
        let id = shape.emit(graph, name);
        graph.set(id, "matrix", ParamValue::matrix(matrix));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::math::Mat4;
    use prism_data::scene::{Material, MaterialKind, SurfaceShader, UvLayer};

    fn triangle_pair() -> MeshData {
        MeshData::from_faces(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)],
            &[&[0, 1, 2], &[1, 3, 2]],
        )
    }

    fn lambert(scene: &mut Scene, name: &str) -> MaterialId {
        scene.add_material(Material::new(name, MaterialKind::Surface(SurfaceShader::default())))
    }

    #[test]
    fn test_group_shaders_orders_by_first_material_index() {
        let mut graph = NodeGraph::new();
        let a = graph.create(NodeKind::Shader("flat".into()), "a");
        let b = graph.create(NodeKind::Shader("flat".into()), "b");
        let fallback = graph.create(NodeKind::Shader("utility".into()), "d");

        // Slots 0 and 2 share shader `b`.
        let result = group_shaders(&[2, 1, 0, 1], &[b, a, b], fallback);
        assert_eq!(
            result,
            ShaderAssignment::PerFace {
                shaders: vec![b, a],
                shidxs: vec![0, 1, 0, 1],
            }
        );
    }

    #[test]
    fn test_group_shaders_collapses_to_single() {
        let mut graph = NodeGraph::new();
        let a = graph.create(NodeKind::Shader("flat".into()), "a");
        let fallback = graph.create(NodeKind::Shader("utility".into()), "d");
        assert_eq!(group_shaders(&[0, 1, 1], &[a, a], fallback), ShaderAssignment::Single(a));
        assert_eq!(group_shaders(&[0], &[], fallback), ShaderAssignment::None);
        assert_eq!(group_shaders(&[5], &[a], fallback), ShaderAssignment::Single(fallback));
    }

    #[test]
    fn test_buffers_are_contiguous_per_loop() {
        let shape = PolymeshShape::from_mesh(&triangle_pair());
        assert_eq!(shape.vlist.len(), 4);
        assert_eq!(shape.nsides, vec![3, 3]);
        assert_eq!(shape.vidxs, vec![0, 1, 2, 1, 3, 2]);
        assert_eq!(shape.nidxs, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(shape.nlist.len(), 6);
        assert!(shape.uvlist.is_none());
    }

    #[test]
    fn test_emit_without_materials_sets_no_shader() {
        let scene = Scene::new("s");
        let mut graph = NodeGraph::new();
        let mut cache = MaterialCache::new();
        let id = PolymeshLane::new()
            .run(&mut graph, &mut cache, &scene, &MeshData::plane(), "O0::Plane", &Mat4::IDENTITY)
            .unwrap();

        let node = graph.get(id).unwrap();
        assert_eq!(node.kind, NodeKind::Polymesh);
        assert_eq!(node.value("smoothing"), Some(&ParamValue::Bool(true)));
        assert_eq!(node.array("nsides").and_then(ParamArray::as_uints), Some(&[4u32][..]));
        assert!(!node.has("shader"), "no material slots means no shader param");
        assert!(node.has("matrix"));
        assert!(!cache.has_default());
    }

    #[test]
    fn test_active_render_uv_is_exported() {
        let mut mesh = MeshData::plane();
        mesh.uv_layers.push(UvLayer {
            name: "Preview".into(),
            active_render: false,
            uvs: vec![Vec2::ZERO; 4],
        });
        mesh.uv_layers.push(UvLayer {
            name: "Render".into(),
            active_render: true,
            uvs: vec![
                Vec2::ZERO,
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
        });

        let mut graph = NodeGraph::new();
        let id = PolymeshShape::from_mesh(&mesh).emit(&mut graph, "O0::Plane");
        let node = graph.get(id).unwrap();
        assert_eq!(node.array("uvlist").map(ParamArray::len), Some(4));
        assert_eq!(node.array("uvidxs").and_then(ParamArray::as_uints), Some(&[0u32, 1, 2, 3][..]));
    }

    #[test]
    fn test_uv_indices_follow_uv_list_length() {
        let mut mesh = MeshData::plane();
        mesh.uv_layers.push(UvLayer {
            name: "Short".into(),
            active_render: true,
            uvs: vec![Vec2::ZERO; 3],
        });

        let mut graph = NodeGraph::new();
        let id = PolymeshShape::from_mesh(&mesh).emit(&mut graph, "O0::Plane");
        let node = graph.get(id).unwrap();
        assert_eq!(node.array("uvidxs").and_then(ParamArray::as_uints), Some(&[0u32, 1, 2][..]));
        assert_eq!(node.array("nidxs").map(ParamArray::len), Some(4), "normals stay per loop");
    }

    #[test]
    fn test_two_materials_produce_shader_array() {
        let mut scene = Scene::new("s");
        let red = lambert(&mut scene, "Red");
        let blue = lambert(&mut scene, "Blue");
        let mut mesh = triangle_pair();
        mesh.materials = vec![Some(red), Some(blue)];
        mesh.polygons[1].material_index = 1;

        let mut graph = NodeGraph::new();
        let mut cache = MaterialCache::new();
        let id = PolymeshLane::new()
            .run(&mut graph, &mut cache, &scene, &mesh, "O0::Pair", &Mat4::IDENTITY)
            .unwrap();

        let node = graph.get(id).unwrap();
        let shaders = node.node_refs("shader").expect("shader array");
        assert_eq!(shaders.len(), 2);
        assert_eq!(graph.get(shaders[0]).map(|n| n.name.as_str()), Some("M0::Red"));
        assert_eq!(node.array("shidxs").and_then(ParamArray::as_bytes), Some(&[0u8, 1][..]));
    }
}
