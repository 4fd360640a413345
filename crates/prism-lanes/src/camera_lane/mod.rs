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

//! Scene camera translation.

use crate::error::{TranslateError, TranslateResult};
use prism_core::graph::{sanitize, NodeGraph, NodeId, NodeKind, ParamValue};
use prism_core::math::{fov_degrees, Mat4, Vec2, Vec3};
use prism_data::scene::{CameraData, SensorFit};
use prism_data::{RenderSettings, Scene, SceneObject};

/// Horizontal sensor extent used for the field of view.
///
/// A vertical fit derives the width from the sensor height and the image
/// aspect; an automatic fit narrows the sensor for portrait images.
pub fn fitted_sensor_width(camera: &CameraData, render: &RenderSettings) -> f32 {
    let xres = render.resolution_x as f32;
    let yres = render.resolution_y.max(1) as f32;
    let (ax, ay) = (render.pixel_aspect_x, render.pixel_aspect_y);
    match camera.sensor_fit {
        SensorFit::Vertical => camera.sensor_height * xres / yres * ax / ay,
        SensorFit::Horizontal => camera.sensor_width,
        SensorFit::Auto => {
            let (x, y) = (xres * ax, yres * ay);
            if x < y {
                camera.sensor_width * x / y
            } else {
                camera.sensor_width
            }
        }
    }
}

/// Signed distance from the camera to the plane through `target` that is
/// perpendicular to the camera's local Z axis.
pub fn focus_plane_distance(camera: &Mat4, target: Vec3) -> f32 {
    let axis = camera.cols[2].truncate().normalize();
    (camera.translation() - target).dot(axis)
}

/// Translates the scene camera into a `persp_camera`.
#[derive(Debug, Default)]
pub struct CameraLane;

impl CameraLane {
    pub fn new() -> Self {
        Self
    }

    /// Builds `C::{name}` and binds it to the options node. A scene without
    /// an active camera yields `None`.
    ///
    /// `in_session` flips the screen window vertically for tile delivery to
    /// the host display.
    pub fn run(
        &self,
        graph: &mut NodeGraph,
        scene: &Scene,
        options: NodeId,
        in_session: bool,
    ) -> TranslateResult<Option<NodeId>> {
        let Some(object) = scene.camera_object() else {
            return Ok(None);
        };
        let Some(data) = &object.camera else {
            return Ok(None);
        };
        let id = graph.create(NodeKind::Camera, format!("C::{}", sanitize(&object.name)));
        let matrix = object.matrix_world;
        graph.set(id, "matrix", ParamValue::matrix(&matrix));

        let sensor = fitted_sensor_width(data, &scene.render);
        graph.set(id, "fov", fov_degrees(sensor, data.lens));
        graph.set(id, "focus_distance", focus_distance(scene, object, data)?);

        let cp = &data.settings;
        if cp.enable_dof {
            graph.set(id, "aperture_size", cp.aperture_size);
            graph.set(id, "aperture_blades", cp.aperture_blades);
            graph.set(id, "aperture_rotation", cp.aperture_rotation);
            graph.set(id, "aperture_blade_curvature", cp.aperture_blade_curvature);
            graph.set(id, "aperture_aspect_ratio", cp.aperture_aspect_ratio);
        }
        graph.set(id, "near_clip", data.clip_start);
        graph.set(id, "far_clip", data.clip_end);
        graph.set(id, "shutter_start", cp.shutter_start);
        graph.set(id, "shutter_end", cp.shutter_end);
        graph.set(id, "shutter_type", cp.shutter_type.as_str());
        graph.set(id, "rolling_shutter", cp.rolling_shutter.as_str());
        graph.set(id, "rolling_shutter_duration", cp.rolling_shutter_duration);
        if in_session {
            graph.set(id, "screen_window_min", Vec2::new(-1.0, 1.0));
            graph.set(id, "screen_window_max", Vec2::new(1.0, -1.0));
        }
        graph.set(id, "exposure", cp.exposure);
        graph.set_node(options, "camera", id);
        Ok(Some(id))
    }
}

fn focus_distance(scene: &Scene, camera: &SceneObject, data: &CameraData) -> TranslateResult<f32> {
    match data.dof_object {
        Some(target) => {
            let target = scene
                .object(target)
                .ok_or(TranslateError::MissingObject(target))?;
            Ok(focus_plane_distance(
                &camera.matrix_world,
                target.matrix_world.translation(),
            ))
        }
        None => Ok(data.dof_distance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prism_data::ObjectKind;

    fn camera_scene(data: CameraData) -> Scene {
        let mut scene = Scene::new("s");
        let mut cam = SceneObject::new("Main Cam", ObjectKind::Camera);
        cam.matrix_world = Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0));
        cam.camera = Some(data);
        scene.camera = Some(scene.add_object(cam));
        scene
    }

    #[test]
    fn test_sensor_fit() {
        let cam = CameraData::default();
        let mut render = RenderSettings::default();
        assert_relative_eq!(fitted_sensor_width(&cam, &render), 32.0);

        render.resolution_x = 1000;
        render.resolution_y = 2000;
        assert_relative_eq!(fitted_sensor_width(&cam, &render), 16.0, epsilon = 1e-5);

        let vertical = CameraData {
            sensor_fit: SensorFit::Vertical,
            ..Default::default()
        };
        render.resolution_x = 1920;
        render.resolution_y = 1080;
        assert_relative_eq!(fitted_sensor_width(&vertical, &render), 32.0, epsilon = 1e-4);
    }

    #[test]
    fn test_camera_node_and_options_binding() {
        let scene = camera_scene(CameraData::default());
        let mut graph = NodeGraph::new();
        let options = graph.options();
        let id = CameraLane::new()
            .run(&mut graph, &scene, options, true)
            .unwrap()
            .expect("scene has a camera");

        let node = graph.get(id).unwrap();
        assert_eq!(node.name, "C::Main_Cam");
        let fov = node.value("fov").and_then(ParamValue::as_float).unwrap();
        assert_relative_eq!(fov, 35.489_38, epsilon = 1e-3);
        assert_eq!(node.value("screen_window_min"), Some(&ParamValue::Vector2(Vec2::new(-1.0, 1.0))));
        assert!(!node.has("aperture_size"), "dof disabled");
        assert_eq!(graph.get(options).and_then(|o| o.node_ref("camera")), Some(id));
    }

    #[test]
    fn test_focus_distance_from_dof_object() {
        let mut scene = camera_scene(CameraData::default());
        let mut target = SceneObject::new("Target", ObjectKind::Empty);
        target.matrix_world = Mat4::from_translation(Vec3::new(3.0, 0.0, 4.0));
        let target = scene.add_object(target);
        if let Some(cam) = scene.camera.and_then(|id| scene.object_mut(id)) {
            if let Some(data) = cam.camera.as_mut() {
                data.dof_object = Some(target);
                data.settings.enable_dof = true;
            }
        }

        let mut graph = NodeGraph::new();
        let options = graph.options();
        let id = CameraLane::new().run(&mut graph, &scene, options, false).unwrap().unwrap();
        let node = graph.get(id).unwrap();
        let focus = node.value("focus_distance").and_then(ParamValue::as_float).unwrap();
        assert_relative_eq!(focus, 6.0, epsilon = 1e-5);
        assert!(node.has("aperture_size"));
        assert!(!node.has("screen_window_min"), "outside a session the window is left alone");
    }

    #[test]
    fn test_no_camera() {
        let scene = Scene::new("empty");
        let mut graph = NodeGraph::new();
        let options = graph.options();
        assert!(CameraLane::new().run(&mut graph, &scene, options, true).unwrap().is_none());
        assert_eq!(graph.len(), 1);
    }
}
