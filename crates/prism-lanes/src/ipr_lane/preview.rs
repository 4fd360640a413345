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

//! First-frame translation of an interactive session.
//!
//! A reduced pass next to the full export: surfaces carry positions and
//! topology only, there is no instancing, and particle systems and
//! duplicators are not expanded.

use super::patch::{view_projection, InteractiveSessionState, CAMERA_NODE};
use super::view::{camera_matrix, ViewState};
use crate::error::{TranslateError, TranslateResult};
use crate::light_lane::LightLane;
use crate::options_lane::{export_filter, export_options, DRIVER_NODE, OUTPUT};
use crate::shading_lane::translate_world;
use prism_core::graph::{sanitize, NamingState, NodeGraph, NodeId, NodeKind, ParamArray, ParamValue};
use prism_core::math::Mat4;
use prism_data::host::TempMesh;
use prism_data::{ObjectKind, Resolution, Scene, SceneHost};
use prism_telemetry::ScopedTimer;
use std::ops::RangeInclusive;

/// The translated first frame plus the state later frames diff against.
#[derive(Debug)]
pub struct InteractivePreview {
    pub graph: NodeGraph,
    pub camera: NodeId,
    pub options: NodeId,
    pub state: InteractiveSessionState,
    /// Sample levels the preview refines through.
    pub sampling: RangeInclusive<i32>,
}

#[derive(Debug, Default)]
pub struct PreviewLane;

impl PreviewLane {
    pub fn new() -> Self {
        Self
    }

    pub fn run<H: SceneHost + ?Sized>(
        &self,
        scene: &Scene,
        host: &mut H,
        view: &ViewState,
    ) -> TranslateResult<InteractivePreview> {
        let _timer = ScopedTimer::new("interactive preview");
        let (key, projection) = view_projection(scene, view).map_err(TranslateError::UnhandledView)?;

        let mut graph = NodeGraph::new();
        let options = graph.options();

        for object in &scene.objects {
            let visible = object.visible_in_viewport && object.layers.intersects(scene.layers);
            if !visible {
                continue;
            }
            if object.kind.is_convertible() {
                let Some(mesh) = TempMesh::acquire(host, object, Resolution::Preview)? else {
                    continue;
                };
                let id = graph.create(NodeKind::Polymesh, format!("O::{}", sanitize(&object.name)));
                graph.set(id, "matrix", ParamValue::matrix(&object.matrix_world));
                graph.set_array(id, "vlist", ParamArray::Vector(mesh.vertices.clone()));
                graph.set_array(
                    id,
                    "nsides",
                    ParamArray::UInt(mesh.polygons.iter().map(|p| p.loop_total).collect()),
                );
                graph.set_array(id, "vidxs", ParamArray::UInt(mesh.loop_vertices.clone()));
            }
        }

        let mut names = NamingState::new("O");
        let mut lights = LightLane::new();
        for object in scene.objects.iter().filter(|o| o.kind == ObjectKind::Lamp) {
            if object.visible_in_viewport && object.layers.intersects(scene.layers) {
                lights.run(&mut graph, scene, &mut names, object)?;
            }
        }

        let camera = graph.create(NodeKind::Camera, CAMERA_NODE);
        let matrix = camera_matrix(&view.view_matrix).unwrap_or_else(|| {
            log::warn!("Singular view matrix, interactive camera placed at the origin");
            Mat4::IDENTITY
        });
        graph.set(camera, "matrix", ParamValue::matrix(&matrix));
        graph.set(camera, "fov", projection.fov);
        graph.set(camera, "screen_window_min", projection.screen_window_min);
        graph.set(camera, "screen_window_max", projection.screen_window_max);

        export_options(&mut graph, options, scene);
        graph.set_node(options, "camera", camera);
        graph.set(options, "xres", view.width as i32);
        graph.set(options, "yres", view.height as i32);
        graph.set(options, "bucket_size", scene.options.ipr_bucket_size);
        export_filter(&mut graph, &scene.options.sample_filter);
        graph.create(NodeKind::Driver("driver_display_callback".into()), DRIVER_NODE);
        graph.set_array(options, "outputs", ParamArray::Str(vec![OUTPUT.to_owned()]));
        translate_world(&mut graph, scene, options)?;

        let opts = &scene.options;
        let sampling = opts.initial_sampling_level.min(opts.aa_samples)..=opts.aa_samples;
        graph.set(options, "AA_samples", *sampling.start());

        log::debug!("interactive preview: {} nodes", graph.len());
        Ok(InteractivePreview {
            graph,
            camera,
            options,
            state: InteractiveSessionState::new(view, key),
            sampling,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipr_lane::{UnhandledView, ViewPerspective};
    use prism_core::math::Vec3;
    use prism_data::scene::{Lamp, LampKind, LayerMask, MeshData};
    use prism_data::SceneObject;
    use prism_infra::MemoryHost;

    fn scene_with_plane() -> (Scene, MemoryHost) {
        let mut scene = Scene::new("s");
        let plane = scene.add_object(SceneObject::new("Plane", ObjectKind::Mesh));
        let mut lamp = SceneObject::new("Key", ObjectKind::Lamp);
        lamp.lamp = Some(Lamp::new(LampKind::Point));
        scene.add_object(lamp);
        let host = MemoryHost::new().with_mesh(plane, MeshData::plane());
        (scene, host)
    }

    #[test]
    fn test_first_frame_has_topology_only_meshes() {
        let (scene, mut host) = scene_with_plane();
        let preview = PreviewLane::new().run(&scene, &mut host, &ViewState::default()).unwrap();
        let mesh = preview.graph.find("O::Plane").expect("preview mesh");
        let params: Vec<_> = mesh.params.keys().map(String::as_str).collect();
        assert_eq!(params, vec!["matrix", "nsides", "vidxs", "vlist"]);
        assert!(host.is_balanced(), "preview meshes are released");
    }

    #[test]
    fn test_first_frame_camera_and_options() {
        let (mut scene, mut host) = scene_with_plane();
        scene.options.ipr_bucket_size = 16;
        let view = ViewState {
            view_matrix: Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)),
            width: 320,
            height: 200,
            ..Default::default()
        };

        let preview = PreviewLane::new().run(&scene, &mut host, &view).unwrap();
        let graph = &preview.graph;
        let camera = graph.get(preview.camera).unwrap();
        assert_eq!(camera.name, CAMERA_NODE);
        assert!(camera.has("fov") && camera.has("screen_window_min"));
        let options = graph.get(preview.options).unwrap();
        assert_eq!(options.node_ref("camera"), Some(preview.camera));
        assert_eq!(options.value("bucket_size").and_then(ParamValue::as_int), Some(16));
        assert_eq!(options.value("xres").and_then(ParamValue::as_int), Some(320));
        assert!(graph.find("O0::Key").is_some(), "lights are translated");
        assert_eq!(preview.state.generation(), 0);
    }

    #[test]
    fn test_preview_mesh_names_are_sanitized() {
        let mut scene = Scene::new("s");
        let plane = scene.add_object(SceneObject::new("Plane.001 (copy)", ObjectKind::Mesh));
        let mut host = MemoryHost::new().with_mesh(plane, MeshData::plane());
        let preview = PreviewLane::new().run(&scene, &mut host, &ViewState::default()).unwrap();
        assert!(preview.graph.find("O::Plane_001__copy_").is_some());
    }

    #[test]
    fn test_singular_view_matrix_places_camera_at_origin() {
        let (scene, mut host) = scene_with_plane();
        let view = ViewState {
            view_matrix: Mat4::from_rows([[0.0; 4]; 4]),
            ..Default::default()
        };
        let preview = PreviewLane::new().run(&scene, &mut host, &view).unwrap();
        let camera = preview.graph.get(preview.camera).unwrap();
        assert_eq!(camera.value("matrix"), Some(&ParamValue::matrix(&Mat4::IDENTITY)));
    }

    #[test]
    fn test_hidden_objects_are_left_out() {
        let (mut scene, mut host) = scene_with_plane();
        scene.objects[0].layers = LayerMask::layer(9);
        let preview = PreviewLane::new().run(&scene, &mut host, &ViewState::default()).unwrap();
        assert!(preview.graph.find("O::Plane").is_none());
        assert_eq!(host.evaluations(), 0);
    }

    #[test]
    fn test_orthographic_first_frame_is_an_error() {
        let (scene, mut host) = scene_with_plane();
        let view = ViewState {
            perspective: ViewPerspective::Orthographic,
            ..Default::default()
        };
        let err = PreviewLane::new().run(&scene, &mut host, &view).unwrap_err();
        assert!(matches!(err, TranslateError::UnhandledView(UnhandledView::Orthographic)));
        assert_eq!(host.evaluations(), 0, "nothing is evaluated for an unhandled view");
    }
}
