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

//! First-pass object classification.

use prism_data::{ObjectId, ObjectKind, Scene, SceneObject};

/// What the export does with an object of the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Particle shapes and, unless suppressed, the object's own surface.
    Geometry,
    /// A light node.
    Light,
}

/// Why an object was left out of the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Hidden,
    DuplicatorChild,
    Duplicator,
    Unsupported,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::Hidden => "skip (hidden)",
            SkipReason::DuplicatorChild => "skip (duplicator child)",
            SkipReason::Duplicator => "skip (duplicator)",
            SkipReason::Unsupported => "skip (unsupported)",
        }
    }
}

/// The ordered result of walking a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkPlan {
    /// Objects to translate in the first pass, in scene order.
    pub entries: Vec<(ObjectId, WalkAction)>,
    /// Duplicators to expand in the second pass, in scene order.
    pub duplicators: Vec<ObjectId>,
    /// Objects left out, with the reason.
    pub skipped: Vec<(ObjectId, SkipReason)>,
}

/// Walks the objects of a scene in order and classifies them.
///
/// A duplicator whose mode instances its children arms a single-slot
/// marker holding the duplicator's parent. While armed, objects are skipped
/// until one with that same parent is reached, which disarms it. Only one
/// duplicator can be pending at a time; a second one arriving while the
/// marker is armed is itself skipped as a child of the first.
#[derive(Debug, Default)]
pub struct SceneWalker {
    pending_parent: Option<Option<ObjectId>>,
}

impl SceneWalker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(mut self, scene: &Scene) -> WalkPlan {
        let mut plan = WalkPlan::default();
        for object in &scene.objects {
            log::debug!("[{:?}] '{}'", object.kind, object.name);
            match self.classify(scene, object) {
                Ok(Some(action)) => plan.entries.push((object.id, action)),
                Ok(None) => plan.duplicators.push(object.id),
                Err(reason) => {
                    log::debug!("    {}", reason.as_str());
                    plan.skipped.push((object.id, reason));
                }
            }
        }
        plan
    }

    /// `Ok(None)` marks a duplicator deferred to the second pass.
    fn classify(&mut self, scene: &Scene, object: &SceneObject) -> Result<Option<WalkAction>, SkipReason> {
        if !scene.is_renderable(object) {
            return Err(SkipReason::Hidden);
        }

        if let Some(parent) = self.pending_parent {
            if parent == object.parent {
                self.pending_parent = None;
            } else {
                return Err(SkipReason::DuplicatorChild);
            }
        }

        if object.is_duplicator() {
            if object.dupli.instances_children() {
                self.pending_parent = Some(object.parent);
            }
            log::debug!("    {}", SkipReason::Duplicator.as_str());
            return Ok(None);
        }

        if object.kind.is_convertible() {
            Ok(Some(WalkAction::Geometry))
        } else if object.kind == ObjectKind::Lamp {
            Ok(Some(WalkAction::Light))
        } else {
            Err(SkipReason::Unsupported)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_data::scene::{DupliKind, LayerMask};

    fn add(scene: &mut Scene, name: &str, kind: ObjectKind) -> ObjectId {
        scene.add_object(SceneObject::new(name, kind))
    }

    #[test]
    fn test_hidden_and_unsupported_are_skipped() {
        let mut scene = Scene::new("s");
        let cube = add(&mut scene, "Cube", ObjectKind::Mesh);
        let hidden = add(&mut scene, "Hidden", ObjectKind::Mesh);
        let other_layer = add(&mut scene, "Far", ObjectKind::Mesh);
        let empty = add(&mut scene, "Empty", ObjectKind::Empty);
        let lamp = add(&mut scene, "Lamp", ObjectKind::Lamp);
        scene.object_mut(hidden).unwrap().hide_render = true;
        scene.object_mut(other_layer).unwrap().layers = LayerMask::layer(5);

        let plan = SceneWalker::new().plan(&scene);
        assert_eq!(plan.entries, vec![(cube, WalkAction::Geometry), (lamp, WalkAction::Light)]);
        assert_eq!(
            plan.skipped,
            vec![
                (hidden, SkipReason::Hidden),
                (other_layer, SkipReason::Hidden),
                (empty, SkipReason::Unsupported),
            ]
        );
        assert!(plan.duplicators.is_empty());
    }

    #[test]
    fn test_duplicator_children_are_deferred() {
        let mut scene = Scene::new("s");
        let root = add(&mut scene, "Root", ObjectKind::Empty);
        let dupli = add(&mut scene, "Verts", ObjectKind::Mesh);
        let child = add(&mut scene, "Child", ObjectKind::Mesh);
        let sibling = add(&mut scene, "Sibling", ObjectKind::Mesh);
        {
            let d = scene.object_mut(dupli).unwrap();
            d.dupli = DupliKind::Verts;
            d.parent = Some(root);
        }
        scene.object_mut(child).unwrap().parent = Some(dupli);
        scene.object_mut(sibling).unwrap().parent = Some(root);

        let plan = SceneWalker::new().plan(&scene);
        assert_eq!(plan.duplicators, vec![dupli]);
        assert!(plan.skipped.contains(&(child, SkipReason::DuplicatorChild)));
        assert!(
            plan.entries.contains(&(sibling, WalkAction::Geometry)),
            "an object sharing the duplicator's parent disarms the marker"
        );
    }

    #[test]
    fn test_group_duplicator_does_not_arm_marker() {
        let mut scene = Scene::new("s");
        let group = add(&mut scene, "Group", ObjectKind::Empty);
        let next = add(&mut scene, "Next", ObjectKind::Mesh);
        scene.object_mut(group).unwrap().dupli = DupliKind::Group;
        scene.object_mut(next).unwrap().parent = Some(group);

        let plan = SceneWalker::new().plan(&scene);
        assert_eq!(plan.duplicators, vec![group]);
        assert_eq!(plan.entries, vec![(next, WalkAction::Geometry)]);
    }
}
