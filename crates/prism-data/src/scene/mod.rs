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

//! The source scene: an arena of objects, materials and node trees.

mod camera;
mod lamp;
mod material;
mod mesh;
mod object;
mod particles;

pub use camera::*;
pub use lamp::*;
pub use material::*;
pub use mesh::*;
pub use object::*;
pub use particles::*;

use crate::settings::{RenderOptions, RenderSettings};
use crate::shading::{NodeTree, TreeId};
use serde::{Deserialize, Serialize};

/// A bit set of the twenty scene layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Only the first layer.
    pub const FIRST: Self = Self(1);
    /// Every layer.
    pub const ALL: Self = Self(0x000f_ffff);

    /// Builds a mask with a single layer set.
    pub fn layer(index: u32) -> Self {
        Self(1 << index)
    }

    /// Returns `true` when at least one layer is set in both masks.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::FIRST
    }
}

/// The world (environment) description of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    /// Source name, used for the `W::` node prefix.
    pub name: String,
    /// The node tree driving the background, if any.
    pub node_tree: Option<TreeId>,
}

/// A read-only snapshot of a source scene.
///
/// Objects, materials and node trees live in arenas and are addressed by
/// their index-based ids; use the `add_*` methods to insert them so the ids
/// stay consistent.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Scene name.
    pub name: String,
    /// All objects, in scene order.
    pub objects: Vec<SceneObject>,
    /// Materials referenced by material slots.
    pub materials: Vec<Material>,
    /// Node trees referenced by materials, lamps and the world.
    pub node_trees: Vec<NodeTree>,
    /// The layers enabled for rendering.
    pub layers: LayerMask,
    /// The current frame.
    pub frame_current: i32,
    /// The active camera object.
    pub camera: Option<ObjectId>,
    /// The world, if any.
    pub world: Option<World>,
    /// Resolution, aspect and border.
    pub render: RenderSettings,
    /// Renderer-facing options.
    pub options: RenderOptions,
}

impl Scene {
    /// Creates an empty scene with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Inserts an object, assigning its id.
    pub fn add_object(&mut self, mut object: SceneObject) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        object.id = id;
        self.objects.push(object);
        id
    }

    /// Inserts a material, assigning its id.
    pub fn add_material(&mut self, mut material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        material.id = id;
        self.materials.push(material);
        id
    }

    /// Inserts a node tree, assigning its id.
    pub fn add_node_tree(&mut self, mut tree: NodeTree) -> TreeId {
        let id = TreeId(self.node_trees.len() as u32);
        tree.id = id;
        self.node_trees.push(tree);
        id
    }

    /// Looks an object up by id.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize)
    }

    /// Mutable access to an object.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0 as usize)
    }

    /// Looks an object up by its source name.
    pub fn object_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Looks a material up by id.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Looks a node tree up by id.
    pub fn node_tree(&self, id: TreeId) -> Option<&NodeTree> {
        self.node_trees.get(id.0 as usize)
    }

    /// The active camera object, if it exists and carries camera data.
    pub fn camera_object(&self) -> Option<&SceneObject> {
        self.camera
            .and_then(|id| self.object(id))
            .filter(|o| o.camera.is_some())
    }

    /// Returns `true` when the object is renderable according to its own
    /// flags and the enabled layers.
    pub fn is_renderable(&self, object: &SceneObject) -> bool {
        !object.hide_render && object.layers.intersects(self.layers)
    }
}
