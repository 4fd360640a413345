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

//! Scene objects and their render-facing properties.

use super::{CameraData, Lamp, LayerMask, MaterialId, ParticleSystem};
use prism_core::math::Mat4;
use serde::{Deserialize, Serialize};

/// Index of an object in [`super::Scene::objects`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Identity of a geometry data block; objects sharing data share this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataId(pub u32);

/// The type of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Mesh,
    Curve,
    Surface,
    Meta,
    Font,
    Lamp,
    Camera,
    Empty,
    Armature,
    Lattice,
    Speaker,
}

impl ObjectKind {
    /// Kinds that can be evaluated into a triangle/polygon mesh.
    pub fn is_convertible(self) -> bool {
        matches!(
            self,
            Self::Mesh | Self::Curve | Self::Surface | Self::Meta | Self::Font
        )
    }
}

/// How an object duplicates other objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DupliKind {
    #[default]
    None,
    /// Children are copied onto every vertex.
    Verts,
    /// Children are copied onto every face.
    Faces,
    /// A group is instanced.
    Group,
    /// The object is repeated over frames.
    Frames,
}

impl DupliKind {
    /// Duplicators that instance their own children.
    pub fn instances_children(self) -> bool {
        matches!(self, Self::Verts | Self::Faces)
    }
}

/// Subdivision kind of a polymesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubdivKind {
    #[default]
    Catclark,
    Linear,
}

impl SubdivKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Catclark => "catclark",
            Self::Linear => "linear",
        }
    }
}

/// Subdivision settings, present when subdivision is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Subdivision {
    pub kind: SubdivKind,
    pub iterations: u8,
    pub adaptive_error: f32,
    pub adaptive_metric: String,
    pub adaptive_space: String,
    pub uv_smoothing: String,
    pub smooth_derivs: bool,
}

impl Default for Subdivision {
    fn default() -> Self {
        Self {
            kind: SubdivKind::Catclark,
            iterations: 1,
            adaptive_error: 0.0,
            adaptive_metric: "auto".to_owned(),
            adaptive_space: "raster".to_owned(),
            uv_smoothing: "pin_corners".to_owned(),
            smooth_derivs: false,
        }
    }
}

/// Per-object shape properties forwarded to every emitted shape node.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRenderProperties {
    /// Ray visibility bits.
    pub visibility: u8,
    /// Sidedness bits.
    pub sidedness: u8,
    pub receive_shadows: bool,
    pub self_shadows: bool,
    pub invert_normals: bool,
    pub opaque: bool,
    pub matte: bool,
    /// `None` when subdivision is disabled.
    pub subdivision: Option<Subdivision>,
}

impl Default for ObjectRenderProperties {
    fn default() -> Self {
        Self {
            visibility: 255,
            sidedness: 255,
            receive_shadows: true,
            self_shadows: true,
            invert_normals: false,
            opaque: true,
            matte: false,
            subdivision: None,
        }
    }
}

/// A modifier in an object's stack. Only particle systems matter here.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    ParticleSystem {
        system: ParticleSystem,
        show_render: bool,
    },
    Other {
        name: String,
        show_render: bool,
    },
}

/// A scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    /// World transform.
    pub matrix_world: Mat4,
    pub hide_render: bool,
    /// Visibility in the interactive viewport.
    pub visible_in_viewport: bool,
    pub layers: LayerMask,
    pub parent: Option<ObjectId>,
    /// Shared geometry data; `None` for objects without data.
    pub data: Option<DataId>,
    /// Whether evaluation changes the geometry relative to its data block.
    pub is_modified: bool,
    pub dupli: DupliKind,
    pub modifiers: Vec<Modifier>,
    /// Material slots, 1-based from the point of view of particle settings.
    pub material_slots: Vec<Option<MaterialId>>,
    pub properties: ObjectRenderProperties,
    pub lamp: Option<Lamp>,
    pub camera: Option<CameraData>,
}

impl SceneObject {
    /// Creates an object with an identity transform on the first layer.
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::default(),
            name: name.into(),
            kind,
            matrix_world: Mat4::IDENTITY,
            hide_render: false,
            visible_in_viewport: true,
            layers: LayerMask::default(),
            parent: None,
            data: None,
            is_modified: false,
            dupli: DupliKind::None,
            modifiers: Vec::new(),
            material_slots: Vec::new(),
            properties: ObjectRenderProperties::default(),
            lamp: None,
            camera: None,
        }
    }

    pub fn is_duplicator(&self) -> bool {
        self.dupli != DupliKind::None
    }

    /// Particle systems whose modifier is enabled for rendering.
    pub fn render_particle_systems(&self) -> impl Iterator<Item = &ParticleSystem> {
        self.modifiers.iter().filter_map(|m| match m {
            Modifier::ParticleSystem {
                system,
                show_render: true,
            } => Some(system),
            _ => None,
        })
    }

    /// Resolves a 1-based material slot.
    pub fn material_slot(&self, slot: usize) -> Option<MaterialId> {
        if slot == 0 {
            return None;
        }
        self.material_slots.get(slot - 1).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ParticleSettings, ParticleSystemId};

    #[test]
    fn test_convertible_kinds() {
        assert!(ObjectKind::Mesh.is_convertible());
        assert!(ObjectKind::Font.is_convertible());
        assert!(!ObjectKind::Lamp.is_convertible());
        assert!(!ObjectKind::Empty.is_convertible());
    }

    #[test]
    fn test_render_particle_systems_skips_hidden_modifiers() {
        let mut ob = SceneObject::new("Emitter", ObjectKind::Mesh);
        let system = |id| ParticleSystem {
            id: ParticleSystemId(id),
            name: format!("ps{id}"),
            settings: ParticleSettings::default(),
        };
        ob.modifiers = vec![
            Modifier::ParticleSystem {
                system: system(0),
                show_render: false,
            },
            Modifier::Other {
                name: "Subsurf".into(),
                show_render: true,
            },
            Modifier::ParticleSystem {
                system: system(1),
                show_render: true,
            },
        ];
        let ids: Vec<_> = ob.render_particle_systems().map(|s| s.id).collect();
        assert_eq!(ids, vec![ParticleSystemId(1)]);
    }

    #[test]
    fn test_material_slot_is_one_based() {
        let mut ob = SceneObject::new("Hair", ObjectKind::Mesh);
        ob.material_slots = vec![Some(MaterialId(4)), None];
        assert_eq!(ob.material_slot(0), None);
        assert_eq!(ob.material_slot(1), Some(MaterialId(4)));
        assert_eq!(ob.material_slot(2), None);
        assert_eq!(ob.material_slot(3), None);
    }
}
