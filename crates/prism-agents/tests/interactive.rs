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

//! Interactive preview sessions against the in-memory collaborators.

use prism_agents::InteractiveAgent;
use prism_core::graph::ParamValue;
use prism_core::math::{Mat4, Vec3};
use prism_core::renderer::TILE_CHANNELS;
use prism_data::scene::{Lamp, LampKind, MeshData};
use prism_data::{ObjectKind, Scene, SceneObject};
use prism_infra::{MemoryHost, MemoryRenderer};
use prism_lanes::ipr_lane::{ViewPerspective, ViewState};

fn preview_scene() -> (Scene, MemoryHost) {
    let mut scene = Scene::new("scene");
    scene.options.ipr_bucket_size = 16;
    scene.options.initial_sampling_level = 1;
    scene.options.aa_samples = 3;
    let plane = scene.add_object(SceneObject::new("Plane", ObjectKind::Mesh));
    let mut lamp = SceneObject::new("Key", ObjectKind::Lamp);
    lamp.lamp = Some(Lamp::new(LampKind::Point));
    scene.add_object(lamp);
    let host = MemoryHost::new().with_mesh(plane, MeshData::plane());
    (scene, host)
}

fn view() -> ViewState {
    ViewState {
        width: 32,
        height: 24,
        ..Default::default()
    }
}

#[test]
fn test_first_frame_translates_the_scene_once() {
    let (scene, mut host) = preview_scene();
    let mut renderer = MemoryRenderer::new();
    let mut agent = InteractiveAgent::new();

    assert!(agent.view_update(&scene, &mut host, &view(), &mut renderer));
    assert!(!agent.view_update(&scene, &mut host, &view(), &mut renderer), "Later updates reuse the session");
    assert_eq!(host.evaluations(), 1, "The plane is evaluated by the first frame only");
    assert!(renderer.node("O::Plane").is_some());
    assert!(renderer.node("O0::Key").is_some(), "Lights are part of the preview");
    assert_eq!(renderer.count_type("persp_camera"), 1);

    agent.mark_dirty();
    assert!(agent.view_update(&scene, &mut host, &view(), &mut renderer));
    assert_eq!(host.evaluations(), 2);
}

#[test]
fn test_frames_refine_until_the_configured_samples() {
    let (scene, mut host) = preview_scene();
    let mut renderer = MemoryRenderer::new();
    let mut agent = InteractiveAgent::new();
    agent.view_update(&scene, &mut host, &view(), &mut renderer);

    let samples: Vec<i32> = (0..4)
        .filter_map(|_| agent.view_draw(&scene, &view(), &mut renderer))
        .map(|frame| frame.samples)
        .collect();
    assert_eq!(samples, vec![1, 2, 3, 3]);

    let frame = agent.view_draw(&scene, &view(), &mut renderer).unwrap();
    assert_eq!(frame.pixels.len(), 32 * 24 * TILE_CHANNELS);
    assert!(frame.pixels.iter().all(|&b| b != 0), "Every pixel is covered by a tile");
}

#[test]
fn test_lens_change_patches_only_the_camera_fov() {
    let (scene, mut host) = preview_scene();
    let mut renderer = MemoryRenderer::new();
    let mut agent = InteractiveAgent::new();
    let mut view = view();
    agent.view_update(&scene, &mut host, &view, &mut renderer);
    agent.view_draw(&scene, &view, &mut renderer);
    agent.view_draw(&scene, &view, &mut renderer);

    let before: Vec<_> = renderer.nodes().filter(|n| n.name != "options").cloned().collect();
    let fov_before = renderer.node("__camera").and_then(|n| n.value("fov")).cloned();
    view.lens = 35.0;
    let frame = agent.view_draw(&scene, &view, &mut renderer).unwrap();

    assert_eq!(agent.generation(), Some(1));
    assert_eq!(frame.samples, 1, "A patch restarts the refinement");
    let after: Vec<_> = renderer.nodes().filter(|n| n.name != "options").cloned().collect();
    let changed: Vec<&str> = before
        .iter()
        .zip(&after)
        .filter(|(b, a)| b != a)
        .map(|(b, _)| b.name.as_str())
        .collect();
    assert_eq!(changed, vec!["__camera"], "No geometry node is touched");
    let fov_after = renderer.node("__camera").and_then(|n| n.value("fov")).cloned();
    assert_ne!(fov_before, fov_after);
}

#[test]
fn test_view_matrix_change_moves_the_camera() {
    let (scene, mut host) = preview_scene();
    let mut renderer = MemoryRenderer::new();
    let mut agent = InteractiveAgent::new();
    let mut view = view();
    agent.view_update(&scene, &mut host, &view, &mut renderer);

    view.view_matrix = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
    agent.view_draw(&scene, &view, &mut renderer).unwrap();

    let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)).to_renderer_layout();
    match renderer.node("__camera").and_then(|n| n.value("matrix")) {
        Some(ParamValue::Matrix(m)) => {
            for (got, want) in m.iter().zip(expected) {
                approx::assert_abs_diff_eq!(*got, want, epsilon = 1e-5);
            }
        }
        other => panic!("camera matrix missing: {other:?}"),
    }
}

#[test]
fn test_orthographic_views_are_not_drawn() {
    let (scene, mut host) = preview_scene();
    let mut renderer = MemoryRenderer::new();
    let mut agent = InteractiveAgent::new();
    let mut view = view();
    agent.view_update(&scene, &mut host, &view, &mut renderer);

    view.perspective = ViewPerspective::Orthographic;
    assert!(agent.view_draw(&scene, &view, &mut renderer).is_none());
    assert_eq!(agent.dropped_frames(), 0, "An unhandled view is not an error");
    assert!(agent.is_active(), "The session survives an unhandled view");
}

#[test]
fn test_camera_moved_during_orthographic_view_is_sent_on_return() {
    let (scene, mut host) = preview_scene();
    let mut renderer = MemoryRenderer::new();
    let mut agent = InteractiveAgent::new();
    let mut view = view();
    agent.view_update(&scene, &mut host, &view, &mut renderer);
    agent.view_draw(&scene, &view, &mut renderer).unwrap();

    view.perspective = ViewPerspective::Orthographic;
    view.view_matrix = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
    assert!(agent.view_draw(&scene, &view, &mut renderer).is_none());

    view.perspective = ViewPerspective::Perspective;
    agent.view_draw(&scene, &view, &mut renderer).unwrap();

    let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)).to_renderer_layout();
    match renderer.node("__camera").and_then(|n| n.value("matrix")) {
        Some(ParamValue::Matrix(m)) => {
            for (got, want) in m.iter().zip(expected) {
                approx::assert_abs_diff_eq!(*got, want, epsilon = 1e-5);
            }
        }
        other => panic!("camera matrix missing: {other:?}"),
    }
}

#[test]
fn test_failing_frames_are_dropped_not_fatal() {
    let (scene, mut host) = preview_scene();
    let mut renderer = MemoryRenderer::new().fail_below_samples(3, 2);
    let mut agent = InteractiveAgent::new();
    agent.view_update(&scene, &mut host, &view(), &mut renderer);

    assert!(agent.view_draw(&scene, &view(), &mut renderer).is_none());
    assert_eq!(agent.dropped_frames(), 1);
    assert!(agent.is_active());

    agent.free(&mut renderer);
    assert!(!agent.is_active());
    assert!(!renderer.is_active(), "Freeing releases the universe");
}

#[test]
fn test_orthographic_first_frame_starts_nothing() {
    let (scene, mut host) = preview_scene();
    let mut renderer = MemoryRenderer::new();
    let mut agent = InteractiveAgent::new();
    let view = ViewState {
        perspective: ViewPerspective::Orthographic,
        ..view()
    };

    assert!(!agent.view_update(&scene, &mut host, &view, &mut renderer));
    assert!(!agent.is_active());
    assert_eq!(agent.dropped_frames(), 1);
    assert!(agent.view_draw(&scene, &view, &mut renderer).is_none());
}
