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

//! Frame-to-frame diffing of the interactive camera.

use super::view::{bound_projection, camera_matrix, free_projection, Projection, ProjectionKey, ViewPerspective, ViewState};
use prism_core::graph::ParamValue;
use prism_core::math::Mat4;
use prism_data::Scene;
use std::collections::BTreeMap;

/// Name of the interactive camera node.
pub const CAMERA_NODE: &str = "__camera";

/// Parameter updates addressed to already committed nodes, by node name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    nodes: BTreeMap<String, BTreeMap<String, ParamValue>>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, node: &str, param: &str, value: impl Into<ParamValue>) {
        self.nodes
            .entry(node.to_owned())
            .or_default()
            .insert(param.to_owned(), value.into());
    }

    /// Parameters patched on `node`.
    pub fn node(&self, node: &str) -> Option<&BTreeMap<String, ParamValue>> {
        self.nodes.get(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, ParamValue>)> {
        self.nodes.iter().map(|(name, params)| (name.as_str(), params))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of patched parameters across all nodes.
    pub fn len(&self) -> usize {
        self.nodes.values().map(BTreeMap::len).sum()
    }
}

/// Why a view cannot be translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnhandledView {
    Orthographic,
    /// Camera view without a camera object carrying camera data.
    MissingCamera,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatchOutcome {
    Patch(Patch),
    Unhandled(UnhandledView),
}

/// What was last sent to the renderer during an interactive session.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveSessionState {
    perspective: ViewPerspective,
    view_matrix: Mat4,
    projection: ProjectionKey,
    generation: u64,
}

impl InteractiveSessionState {
    pub fn new(view: &ViewState, projection: ProjectionKey) -> Self {
        Self {
            perspective: view.perspective,
            view_matrix: view.view_matrix,
            projection,
            generation: 0,
        }
    }

    pub fn perspective(&self) -> ViewPerspective {
        self.perspective
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection(&self) -> &ProjectionKey {
        &self.projection
    }

    /// Number of non-empty patches produced so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Samples the projection of `view`.
pub fn view_projection(scene: &Scene, view: &ViewState) -> Result<(ProjectionKey, Projection), UnhandledView> {
    match view.perspective {
        ViewPerspective::Camera => {
            let camera = view
                .camera
                .and_then(|id| scene.object(id))
                .and_then(|object| object.camera.as_ref())
                .ok_or(UnhandledView::MissingCamera)?;
            let key = ProjectionKey::bound(view, camera);
            let projection = bound_projection(view.aspect(), &key).ok_or(UnhandledView::MissingCamera)?;
            Ok((key, projection))
        }
        ViewPerspective::Perspective => Ok((ProjectionKey::free(view), free_projection(view.lens))),
        ViewPerspective::Orthographic => Err(UnhandledView::Orthographic),
    }
}

pub(crate) fn write_projection(patch: &mut Patch, projection: &Projection) {
    patch.set(CAMERA_NODE, "fov", projection.fov);
    patch.set(CAMERA_NODE, "screen_window_min", projection.screen_window_min);
    patch.set(CAMERA_NODE, "screen_window_max", projection.screen_window_max);
}

/// Builds the minimal camera patch between two interactive frames.
///
/// Two groups are tracked: the view matrix, and the projection key as a
/// whole. A changed key recomputes every projection parameter, except in
/// free perspective where only the lens can change and only `fov` is sent.
#[derive(Debug, Default)]
pub struct PatchBuilder;

impl PatchBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the patch for `view`. `state` only moves forward when a patch
    /// is returned; an unhandled view leaves it on the last sent frame.
    pub fn build(&self, state: &mut InteractiveSessionState, scene: &Scene, view: &ViewState) -> PatchOutcome {
        let mut patch = Patch::new();
        let mut projection_key = None;

        if view.perspective != state.perspective {
            let (key, projection) = match view_projection(scene, view) {
                Ok(sampled) => sampled,
                Err(reason) => return PatchOutcome::Unhandled(reason),
            };
            write_projection(&mut patch, &projection);
            projection_key = Some(key);
        } else {
            match view.perspective {
                ViewPerspective::Camera => {
                    let (key, projection) = match view_projection(scene, view) {
                        Ok(sampled) => sampled,
                        Err(reason) => return PatchOutcome::Unhandled(reason),
                    };
                    if key != state.projection {
                        write_projection(&mut patch, &projection);
                        projection_key = Some(key);
                    }
                }
                ViewPerspective::Perspective => {
                    let key = ProjectionKey::free(view);
                    if key != state.projection {
                        patch.set(CAMERA_NODE, "fov", free_projection(view.lens).fov);
                        projection_key = Some(key);
                    }
                }
                ViewPerspective::Orthographic => {
                    return PatchOutcome::Unhandled(UnhandledView::Orthographic)
                }
            }
        }

        if view.view_matrix != state.view_matrix {
            match camera_matrix(&view.view_matrix) {
                Some(matrix) => patch.set(CAMERA_NODE, "matrix", ParamValue::matrix(&matrix)),
                None => log::warn!("Singular view matrix, camera transform not updated"),
            }
        }

        state.view_matrix = view.view_matrix;
        state.perspective = view.perspective;
        if let Some(key) = projection_key {
            state.projection = key;
        }
        if !patch.is_empty() {
            state.generation += 1;
            log::trace!("patch #{}: {} params", state.generation, patch.len());
        }
        PatchOutcome::Patch(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::math::{Vec2, Vec3};
    use prism_data::scene::CameraData;
    use prism_data::{ObjectKind, SceneObject};

    fn camera_scene() -> (Scene, ViewState) {
        let mut scene = Scene::new("s");
        let mut camera = SceneObject::new("Camera", ObjectKind::Camera);
        camera.camera = Some(CameraData::default());
        let id = scene.add_object(camera);
        let view = ViewState {
            perspective: ViewPerspective::Camera,
            camera: Some(id),
            ..Default::default()
        };
        (scene, view)
    }

    fn start(scene: &Scene, view: &ViewState) -> InteractiveSessionState {
        let (key, _) = view_projection(scene, view).unwrap();
        InteractiveSessionState::new(view, key)
    }

    fn patch_of(outcome: PatchOutcome) -> Patch {
        match outcome {
            PatchOutcome::Patch(patch) => patch,
            PatchOutcome::Unhandled(reason) => panic!("unexpected unhandled view: {reason:?}"),
        }
    }

    #[test]
    fn test_unchanged_frame_yields_empty_patch() {
        let scene = Scene::new("s");
        let view = ViewState::default();
        let mut state = start(&scene, &view);
        let patch = patch_of(PatchBuilder::new().build(&mut state, &scene, &view));
        assert!(patch.is_empty());
        assert_eq!(state.generation(), 0, "empty patches do not advance the generation");
    }

    #[test]
    fn test_free_lens_change_patches_fov_only() {
        let scene = Scene::new("s");
        let mut view = ViewState::default();
        let mut state = start(&scene, &view);
        view.lens = 32.0;

        let patch = patch_of(PatchBuilder::new().build(&mut state, &scene, &view));
        assert_eq!(patch.len(), 1, "only fov changes: {patch:?}");
        let fov = patch.node(CAMERA_NODE).and_then(|p| p.get("fov")).and_then(ParamValue::as_float);
        assert!((fov.unwrap() - 90.0).abs() < 1e-3);
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn test_bound_lens_change_recomputes_projection_group() {
        let (mut scene, view) = camera_scene();
        let mut state = start(&scene, &view);
        let id = view.camera.unwrap();
        scene.object_mut(id).unwrap().camera.as_mut().unwrap().lens = 85.0;

        let patch = patch_of(PatchBuilder::new().build(&mut state, &scene, &view));
        let camera = patch.node(CAMERA_NODE).unwrap();
        let keys: Vec<_> = camera.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["fov", "screen_window_max", "screen_window_min"]);
        assert_eq!(patch.iter().count(), 1, "no node besides the camera is touched");
    }

    #[test]
    fn test_view_matrix_change_patches_matrix_only() {
        let scene = Scene::new("s");
        let mut view = ViewState::default();
        let mut state = start(&scene, &view);
        view.view_matrix = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));

        let patch = patch_of(PatchBuilder::new().build(&mut state, &scene, &view));
        assert_eq!(patch.len(), 1);
        assert!(patch.node(CAMERA_NODE).unwrap().contains_key("matrix"));
        assert_eq!(state.view_matrix(), &view.view_matrix);
    }

    #[test]
    fn test_mode_switch_recomputes_everything() {
        let (scene, mut view) = camera_scene();
        view.perspective = ViewPerspective::Perspective;
        let mut state = start(&scene, &view);
        view.perspective = ViewPerspective::Camera;
        view.camera_offset = Vec2::new(0.1, 0.0);

        let patch = patch_of(PatchBuilder::new().build(&mut state, &scene, &view));
        assert_eq!(patch.len(), 3);
        assert_eq!(state.perspective(), ViewPerspective::Camera);
        assert!(matches!(state.projection(), ProjectionKey::Bound { .. }));
    }

    #[test]
    fn test_orthographic_is_unhandled() {
        let scene = Scene::new("s");
        let mut view = ViewState::default();
        let mut state = start(&scene, &view);
        view.perspective = ViewPerspective::Orthographic;

        let builder = PatchBuilder::new();
        assert_eq!(
            builder.build(&mut state, &scene, &view),
            PatchOutcome::Unhandled(UnhandledView::Orthographic)
        );
        assert_eq!(
            builder.build(&mut state, &scene, &view),
            PatchOutcome::Unhandled(UnhandledView::Orthographic),
            "stays unhandled while the view is orthographic"
        );

        view.perspective = ViewPerspective::Perspective;
        let patch = patch_of(builder.build(&mut state, &scene, &view));
        assert!(patch.is_empty(), "nothing changed since the last sent frame: {patch:?}");
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn test_matrix_moved_while_orthographic_is_sent_on_return() {
        let scene = Scene::new("s");
        let mut view = ViewState::default();
        let mut state = start(&scene, &view);
        let builder = PatchBuilder::new();

        view.perspective = ViewPerspective::Orthographic;
        view.view_matrix = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(
            builder.build(&mut state, &scene, &view),
            PatchOutcome::Unhandled(UnhandledView::Orthographic)
        );
        assert_eq!(state.view_matrix(), &Mat4::IDENTITY, "unhandled frames leave the state untouched");
        assert_eq!(state.perspective(), ViewPerspective::Perspective);

        view.perspective = ViewPerspective::Perspective;
        let patch = patch_of(builder.build(&mut state, &scene, &view));
        let matrix = patch.node(CAMERA_NODE).and_then(|p| p.get("matrix"));
        let expected = camera_matrix(&view.view_matrix).map(|m| ParamValue::matrix(&m));
        assert_eq!(matrix, expected.as_ref(), "the move made while orthographic reaches the renderer");
        assert_eq!(state.view_matrix(), &view.view_matrix);
    }

    #[test]
    fn test_missing_camera_leaves_state_untouched() {
        let (scene, mut view) = camera_scene();
        view.perspective = ViewPerspective::Perspective;
        let mut state = start(&scene, &view);
        view.perspective = ViewPerspective::Camera;
        view.camera = None;
        view.view_matrix = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(
            PatchBuilder::new().build(&mut state, &scene, &view),
            PatchOutcome::Unhandled(UnhandledView::MissingCamera)
        );
        assert_eq!(state.perspective(), ViewPerspective::Perspective);
        assert_eq!(state.view_matrix(), &Mat4::IDENTITY);
    }

    #[test]
    fn test_camera_view_without_camera_is_unhandled() {
        let scene = Scene::new("s");
        let view = ViewState {
            perspective: ViewPerspective::Camera,
            ..Default::default()
        };
        assert_eq!(view_projection(&scene, &view).unwrap_err(), UnhandledView::MissingCamera);
    }
}
