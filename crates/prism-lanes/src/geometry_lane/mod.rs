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

//! Geometry materialisation: evaluated meshes and particle systems become
//! flat attribute buffers on shape nodes.
//!
//! Each lane first builds a shape value holding contiguous buffers, then
//! `emit`s it into the graph under a caller-chosen name. Particle lanes hold
//! a [`prism_data::host::RenderResolution`] guard for the whole evaluation,
//! so the system returns to preview resolution on every exit path.

mod curves;
mod points;
mod polymesh;
mod properties;

pub use curves::*;
pub use points::*;
pub use polymesh::*;
pub use properties::*;

use crate::error::TranslateResult;
use crate::shading_lane::MaterialCache;
use prism_core::graph::{NodeGraph, NodeId};
use prism_data::{Scene, SceneObject};

/// Resolves the 1-based particle material slot of `object`.
///
/// Slot `0` and slots past the end leave the shape without a shader; an
/// empty slot in range resolves to the default shader.
pub(crate) fn particle_shader(
    graph: &mut NodeGraph,
    materials: &mut MaterialCache,
    scene: &Scene,
    object: &SceneObject,
    slot: usize,
) -> TranslateResult<Option<NodeId>> {
    if slot == 0 || slot > object.material_slots.len() {
        return Ok(None);
    }
    materials
        .get(graph, scene, object.material_slot(slot))
        .map(Some)
}
