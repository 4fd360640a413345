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

//! Full export and final render against the in-memory collaborators.

use prism_agents::{ExportAgent, ExportSession, RenderAgent, SessionState};
use prism_core::graph::ParamValue;
use prism_core::math::Mat4;
use prism_core::renderer::{RenderStatus, TileRect};
use prism_data::scene::{DataId, Lamp, LampKind, MeshData};
use prism_data::{ObjectKind, Scene, SceneObject};
use prism_infra::{MemoryDisplay, MemoryHost, MemoryRenderer};

fn small_scene() -> Scene {
    let mut scene = Scene::new("scene");
    scene.render.resolution_x = 64;
    scene.render.resolution_y = 32;
    scene.options.bucket_size = 32;
    scene.options.progressive_refinement = false;
    scene
}

fn add_plane(scene: &mut Scene) -> prism_data::ObjectId {
    let mut plane = SceneObject::new("Plane", ObjectKind::Mesh);
    plane.data = Some(DataId(0));
    scene.add_object(plane)
}

#[test]
fn test_plane_exports_one_polymesh_without_shader() {
    let mut scene = small_scene();
    let plane = add_plane(&mut scene);
    let mut host = MemoryHost::new().with_mesh(plane, MeshData::plane());
    let mut renderer = MemoryRenderer::new();
    let mut session = ExportSession::new();

    ExportAgent::new()
        .export(&mut session, &scene, &mut host, &mut renderer)
        .expect("export succeeds");

    assert_eq!(renderer.count_type("polymesh"), 1, "Exactly one geometry node");
    let mesh = renderer.node("O0::Plane").expect("plane committed");
    let vlist = mesh.array("vlist").and_then(|a| a.as_floats()).unwrap();
    assert_eq!(vlist.len(), 12, "4 vertices of 3 floats");
    assert_eq!(mesh.array("nsides").and_then(|a| a.as_uints()), Some(&[4u32][..]));
    assert_eq!(mesh.array("vidxs").and_then(|a| a.as_uints()), Some(&[0u32, 1, 2, 3][..]));
    assert!(mesh.node_ref("shader").is_none(), "No material, no shader reference");
    assert!(host.is_balanced(), "Every temporary mesh is released");
}

#[test]
fn test_point_light_parameters_reach_the_renderer() {
    let mut scene = small_scene();
    let mut lamp = Lamp::new(LampKind::Point);
    lamp.settings.intensity = 5.0;
    let mut light = SceneObject::new("Lamp", ObjectKind::Lamp);
    light.lamp = Some(lamp);
    scene.add_object(light);
    let mut renderer = MemoryRenderer::new();

    ExportAgent::new()
        .export(&mut ExportSession::new(), &scene, &mut MemoryHost::new(), &mut renderer)
        .unwrap();

    assert_eq!(renderer.count_type("point_light"), 1);
    let node = renderer.node("O0::Lamp").unwrap();
    assert_eq!(node.value("intensity"), Some(&ParamValue::Float(5.0)));
    assert_eq!(node.value("color"), Some(&ParamValue::Rgb([1.0, 1.0, 1.0])));
    let mut identity = [0.0; 16];
    for i in 0..4 {
        identity[i * 5] = 1.0;
    }
    assert_eq!(node.value("matrix"), Some(&ParamValue::Matrix(identity)));
    assert_eq!(Mat4::IDENTITY.to_renderer_layout(), identity);
}

#[test]
fn test_export_then_render_fills_every_tile() {
    let mut scene = small_scene();
    let plane = add_plane(&mut scene);
    let mut host = MemoryHost::new().with_mesh(plane, MeshData::plane());
    let mut renderer = MemoryRenderer::new();
    let mut session = ExportSession::new();
    let mut display = MemoryDisplay::new();

    ExportAgent::new()
        .export(&mut session, &scene, &mut host, &mut renderer)
        .unwrap();
    let mut agent = RenderAgent::new();
    let status = agent.render(&mut session, &mut renderer, &mut display).unwrap();

    assert_eq!(status, RenderStatus::Success);
    assert_eq!(display.finished().len(), 2, "64x32 in 32px buckets");
    assert_eq!(display.open_results(), 0);
    assert!(agent.peak_memory_mb().is_some_and(|mb| mb > 0.0));
    assert_eq!(session.state(), SessionState::Cached);

    // A cached session can start the next frame.
    ExportAgent::new()
        .export(&mut session, &scene, &mut host, &mut renderer)
        .expect("re-export from a cached session");
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn test_border_render_delivers_results_relative_to_the_border() {
    let mut scene = small_scene();
    scene.render.use_border = true;
    scene.render.border_min_x = 0.5;
    scene.render.border_max_x = 1.0;
    scene.render.border_min_y = 0.0;
    scene.render.border_max_y = 0.5;
    let mut renderer = MemoryRenderer::new();
    let mut session = ExportSession::new();
    let mut display = MemoryDisplay::new();

    ExportAgent::new()
        .export(&mut session, &scene, &mut MemoryHost::new(), &mut renderer)
        .unwrap();
    assert_eq!(session.data().unwrap().offset, (32, 0));
    RenderAgent::new()
        .render(&mut session, &mut renderer, &mut display)
        .unwrap();

    let rects: Vec<TileRect> = display.finished().iter().map(|r| r.rect).collect();
    assert_eq!(
        rects,
        vec![TileRect {
            x: 0,
            y: 0,
            width: 32,
            height: 16
        }]
    );
}

#[test]
fn test_progressive_session_retries_failed_levels() {
    let mut scene = small_scene();
    scene.options.progressive_refinement = true;
    scene.options.initial_sampling_level = 1;
    scene.options.aa_samples = 3;
    let mut renderer = MemoryRenderer::new().fail_below_samples(2, 4);
    let mut session = ExportSession::new();
    let mut display = MemoryDisplay::new();

    ExportAgent::new()
        .export(&mut session, &scene, &mut MemoryHost::new(), &mut renderer)
        .unwrap();
    assert_eq!(session.data().unwrap().progressive, Some(1..=3));
    let status = RenderAgent::new()
        .render(&mut session, &mut renderer, &mut display)
        .unwrap();

    assert_eq!(status, RenderStatus::Success);
    assert_eq!(renderer.render_calls(), [1, 1, 2], "Starts at the initial level, then walks the range");
    assert_eq!(display.stats().len(), 1);
    assert!(display.stats()[0].1.ends_with("SL: 1"));
    assert!(display.errors().is_empty());
}

#[test]
fn test_cancelled_render_closes_every_result() {
    let mut scene = small_scene();
    let plane = add_plane(&mut scene);
    let mut host = MemoryHost::new().with_mesh(plane, MeshData::plane());
    let mut renderer = MemoryRenderer::new();
    let mut session = ExportSession::new();
    let mut display = MemoryDisplay::new().break_after(2);

    ExportAgent::new()
        .export(&mut session, &scene, &mut host, &mut renderer)
        .unwrap();
    let status = RenderAgent::new()
        .render(&mut session, &mut renderer, &mut display)
        .unwrap();

    assert_eq!(status, RenderStatus::Aborted);
    assert_eq!(display.finished().len(), 1, "The first bucket completed before the break");
    assert_eq!(display.cancelled().len(), 1);
    assert_eq!(display.open_results(), 0);
    assert_eq!(session.state(), SessionState::Cached);
}
