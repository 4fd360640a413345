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

//! Host-facing lifecycle of the engine facade.

use prism_data::scene::{DataId, MeshData};
use prism_data::{ObjectKind, SceneObject};
use prism_infra::{MemoryDisplay, MemoryHost, MemoryRenderer};
use prism_sdk::prelude::*;
use std::io::Write;

fn plane_scene() -> (Scene, MemoryHost) {
    let mut scene = Scene::new("job");
    scene.render.resolution_x = 32;
    scene.render.resolution_y = 32;
    let mut plane = SceneObject::new("Plane", ObjectKind::Mesh);
    plane.data = Some(DataId(0));
    let plane = scene.add_object(plane);
    (scene, MemoryHost::new().with_mesh(plane, MeshData::plane()))
}

#[test]
fn test_config_file_is_loaded_and_applied() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "(log_filter: \"warn\", options: Some((aa_samples: 2, progressive_refinement: false, bucket_size: 16)))"
    )
    .unwrap();
    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.log_filter, "warn");

    let (scene, mut host) = plane_scene();
    let mut engine = RenderEngine::new(MemoryRenderer::new(), config);
    engine.update(&scene, &mut host).unwrap();
    let mut display = MemoryDisplay::new();
    assert_eq!(engine.render(&mut display).unwrap(), RenderStatus::Success);

    assert_eq!(engine.renderer().render_calls(), [2], "The configured samples win over the scene");
    assert_eq!(display.finished().len(), 4, "32x32 in 16px buckets");
}

#[test]
fn test_missing_config_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.ron");
    let err = EngineConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("engine.ron"), "got {err:#}");
}

#[test]
fn test_config_round_trips_through_a_file() {
    let config = EngineConfig {
        log_filter: "debug".into(),
        options: Some(RenderOptions::default()),
        render: None,
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.ron");
    std::fs::write(&path, config.to_ron_string().unwrap()).unwrap();
    assert_eq!(EngineConfig::load(&path).unwrap(), config);
}

#[test]
fn test_session_lifecycle_through_the_facade() {
    let (scene, mut host) = plane_scene();
    let mut engine = RenderEngine::new(MemoryRenderer::new(), EngineConfig::default());
    assert_eq!(engine.session_state(), SessionState::Uninitialized);

    let stats = engine.update(&scene, &mut host).unwrap();
    assert_eq!(stats.shapes, 1);
    assert_eq!(engine.session_state(), SessionState::Active);

    engine.render(&mut MemoryDisplay::new()).unwrap();
    assert_eq!(engine.session_state(), SessionState::Cached);

    engine.reset();
    assert_eq!(engine.session_state(), SessionState::Reset);
    assert!(engine.render(&mut MemoryDisplay::new()).is_err(), "A reset session has nothing to render");

    engine.free();
    assert_eq!(engine.session_state(), SessionState::Uninitialized);
    assert!(!engine.renderer().is_active());
}

#[test]
fn test_interactive_frames_through_the_facade() {
    let (scene, mut host) = plane_scene();
    let mut engine = RenderEngine::new(MemoryRenderer::new(), EngineConfig::default());
    let view = ViewState {
        width: 16,
        height: 16,
        ..Default::default()
    };

    assert!(engine.view_update(&scene, &mut host, &view));
    let frame = engine.view_draw(&scene, &view).expect("first frame");
    assert_eq!((frame.width, frame.height), (16, 16));

    let ortho = ViewState {
        perspective: ViewPerspective::Orthographic,
        ..view
    };
    assert!(engine.view_draw(&scene, &ortho).is_none());
    assert_eq!(engine.dropped_frames(), 0);
}
