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

//! Evaluated mesh data as returned by the host.

use super::MaterialId;
use prism_core::math::{Vec2, Vec3};

/// A polygon referencing a contiguous run of loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polygon {
    pub loop_start: u32,
    pub loop_total: u32,
    /// Index into [`MeshData::materials`].
    pub material_index: u16,
}

/// A named UV layer, one coordinate per loop.
#[derive(Debug, Clone, PartialEq)]
pub struct UvLayer {
    pub name: String,
    pub active_render: bool,
    pub uvs: Vec<Vec2>,
}

/// A temporary mesh produced by evaluating an object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    /// Vertex index of every loop.
    pub loop_vertices: Vec<u32>,
    /// Split normal of every loop.
    pub loop_normals: Vec<Vec3>,
    pub polygons: Vec<Polygon>,
    pub uv_layers: Vec<UvLayer>,
    /// Materials of the mesh, indexed by [`Polygon::material_index`].
    pub materials: Vec<Option<MaterialId>>,
}

impl MeshData {
    /// Builds a mesh from vertex positions and faces given as vertex index
    /// lists. Loop normals are the flat face normals.
    pub fn from_faces(vertices: Vec<Vec3>, faces: &[&[u32]]) -> Self {
        let mut mesh = Self {
            vertices,
            ..Default::default()
        };
        for face in faces {
            let normal = mesh.face_normal(face);
            mesh.polygons.push(Polygon {
                loop_start: mesh.loop_vertices.len() as u32,
                loop_total: face.len() as u32,
                material_index: 0,
            });
            for &v in face.iter() {
                mesh.loop_vertices.push(v);
                mesh.loop_normals.push(normal);
            }
        }
        mesh
    }

    /// A unit quad in the XY plane facing +Z.
    pub fn plane() -> Self {
        Self::from_faces(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            &[&[0, 1, 2, 3]],
        )
    }

    /// Newell normal of a polygon.
    fn face_normal(&self, face: &[u32]) -> Vec3 {
        let mut n = Vec3::ZERO;
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            let (Some(&p), Some(&q)) = (
                self.vertices.get(a as usize),
                self.vertices.get(b as usize),
            ) else {
                continue;
            };
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        n.normalize()
    }

    pub fn loop_count(&self) -> usize {
        self.loop_vertices.len()
    }

    /// The UV layer flagged for rendering.
    pub fn active_render_uv(&self) -> Option<&UvLayer> {
        self.uv_layers.iter().find(|l| l.active_render)
    }

    /// Position of a UV layer by name.
    pub fn uv_layer_index(&self, name: &str) -> Option<usize> {
        self.uv_layers.iter().position(|l| l.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_has_four_loops_facing_up() {
        let plane = MeshData::plane();
        assert_eq!(plane.vertices.len(), 4);
        assert_eq!(plane.polygons.len(), 1);
        assert_eq!(plane.loop_count(), 4);
        for n in &plane.loop_normals {
            assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_from_faces_assigns_contiguous_loops() {
        let mesh = MeshData::from_faces(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)],
            &[&[0, 1, 2], &[1, 3, 2]],
        );
        assert_eq!(mesh.polygons[0].loop_start, 0);
        assert_eq!(mesh.polygons[1].loop_start, 3);
        assert_eq!(mesh.loop_vertices, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn test_uv_layer_lookup() {
        let mut mesh = MeshData::plane();
        mesh.uv_layers = vec![
            UvLayer {
                name: "A".into(),
                active_render: false,
                uvs: vec![Vec2::ZERO; 4],
            },
            UvLayer {
                name: "B".into(),
                active_render: true,
                uvs: vec![Vec2::ZERO; 4],
            },
        ];
        assert_eq!(mesh.active_render_uv().map(|l| l.name.as_str()), Some("B"));
        assert_eq!(mesh.uv_layer_index("A"), Some(0));
        assert_eq!(mesh.uv_layer_index("C"), None);
    }
}
