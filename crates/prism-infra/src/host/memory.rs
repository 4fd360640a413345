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

//! An in-memory scene host.

use prism_core::math::{Vec2, Vec3};
use prism_data::host::{DupliInstance, ParticleCounts, StrandData};
use prism_data::scene::{MeshData, ObjectId, ParticleSystemId};
use prism_data::{HostError, Resolution, SceneHost, SceneObject};
use std::collections::{HashMap, HashSet};

type SystemKey = (ObjectId, ParticleSystemId);

/// A [`SceneHost`] serving pre-registered evaluation results.
///
/// Objects without a registered mesh evaluate to no data. Objects marked
/// with [`MemoryHost::fail_on`] fail every evaluation. The host records
/// which meshes and duplicator lists are currently held, and the current
/// resolution of every particle system, so tests can assert that each
/// acquisition was paired with its release.
#[derive(Debug, Default)]
pub struct MemoryHost {
    meshes: HashMap<ObjectId, MeshData>,
    duplicates: HashMap<ObjectId, Vec<DupliInstance>>,
    strands: HashMap<SystemKey, StrandData>,
    points: HashMap<SystemKey, Vec<Vec3>>,
    counts: HashMap<SystemKey, ParticleCounts>,
    uv_layers: HashMap<ObjectId, Vec<String>>,
    failing: HashSet<ObjectId>,

    live_meshes: HashSet<ObjectId>,
    live_duplicates: HashSet<ObjectId>,
    resolutions: HashMap<SystemKey, Resolution>,
    render_requests: HashSet<SystemKey>,
    evaluations: usize,
}

impl MemoryHost {
    /// Creates a host with no registered data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the evaluated mesh of `object`.
    pub fn with_mesh(mut self, object: ObjectId, mesh: MeshData) -> Self {
        self.meshes.insert(object, mesh);
        self
    }

    /// Registers the instance list of a duplicator.
    pub fn with_duplicates(mut self, duplicator: ObjectId, instances: Vec<DupliInstance>) -> Self {
        self.duplicates.insert(duplicator, instances);
        self
    }

    /// Registers hair strands.
    pub fn with_strands(mut self, object: ObjectId, system: ParticleSystemId, strands: StrandData) -> Self {
        self.strands.insert((object, system), strands);
        self
    }

    /// Registers live particle positions.
    pub fn with_points(mut self, object: ObjectId, system: ParticleSystemId, points: Vec<Vec3>) -> Self {
        self.points.insert((object, system), points);
        self
    }

    /// Registers parent and child counts.
    pub fn with_counts(mut self, object: ObjectId, system: ParticleSystemId, counts: ParticleCounts) -> Self {
        self.counts.insert((object, system), counts);
        self
    }

    /// Registers the UV layer names of an object's mesh data.
    pub fn with_uv_layers(mut self, object: ObjectId, names: &[&str]) -> Self {
        self.uv_layers
            .insert(object, names.iter().map(|n| (*n).to_owned()).collect());
        self
    }

    /// Makes every evaluation involving `object` fail.
    pub fn fail_on(mut self, object: ObjectId) -> Self {
        self.failing.insert(object);
        self
    }

    /// The UV this host reports for `particle` in `layer`.
    pub fn emitter_uv(particle: usize, layer: usize) -> Vec2 {
        Vec2::new(particle as f32 * 0.125, layer as f32 * 0.5)
    }

    /// Current resolution of a particle system. Systems never touched are
    /// at preview resolution.
    pub fn resolution(&self, object: ObjectId, system: ParticleSystemId) -> Resolution {
        self.resolutions
            .get(&(object, system))
            .copied()
            .unwrap_or(Resolution::Preview)
    }

    /// Whether the system was ever switched to render resolution.
    pub fn switched_to_render(&self, object: ObjectId, system: ParticleSystemId) -> bool {
        self.render_requests.contains(&(object, system))
    }

    /// Number of mesh evaluations performed.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// `true` when no mesh or duplicator list is held and every particle
    /// system is back at preview resolution.
    pub fn is_balanced(&self) -> bool {
        self.live_meshes.is_empty()
            && self.live_duplicates.is_empty()
            && self.resolutions.values().all(|r| *r == Resolution::Preview)
    }

    fn check(&self, object: ObjectId, what: &str) -> Result<(), HostError> {
        if self.failing.contains(&object) {
            return Err(HostError::new(format!("{what} of object {} failed", object.0)));
        }
        Ok(())
    }
}

impl SceneHost for MemoryHost {
    fn evaluate_mesh(
        &mut self,
        object: &SceneObject,
        resolution: Resolution,
    ) -> Result<Option<MeshData>, HostError> {
        self.check(object.id, "mesh evaluation")?;
        self.evaluations += 1;
        log::trace!("evaluate {} at {:?}", object.name, resolution);
        let mesh = self.meshes.get(&object.id).cloned();
        if mesh.is_some() {
            self.live_meshes.insert(object.id);
        }
        Ok(mesh)
    }

    fn release_mesh(&mut self, object: ObjectId) {
        self.live_meshes.remove(&object);
    }

    fn create_duplicates(&mut self, duplicator: &SceneObject) -> Result<Vec<DupliInstance>, HostError> {
        self.live_duplicates.insert(duplicator.id);
        self.check(duplicator.id, "duplicator expansion")?;
        Ok(self.duplicates.get(&duplicator.id).cloned().unwrap_or_default())
    }

    fn clear_duplicates(&mut self, duplicator: ObjectId) {
        self.live_duplicates.remove(&duplicator);
    }

    fn set_particle_resolution(&mut self, object: ObjectId, system: ParticleSystemId, resolution: Resolution) {
        if resolution == Resolution::Render {
            self.render_requests.insert((object, system));
        }
        self.resolutions.insert((object, system), resolution);
    }

    fn particle_strands(
        &mut self,
        object: ObjectId,
        system: ParticleSystemId,
        steps: u32,
        _use_parent_particles: bool,
    ) -> Result<Option<StrandData>, HostError> {
        self.check(object, "strand evaluation")?;
        Ok(self.strands.get(&(object, system)).cloned().map(|mut strands| {
            if strands.points_per_strand == 0 {
                strands.points_per_strand = steps;
            }
            strands
        }))
    }

    fn particle_points(
        &mut self,
        object: ObjectId,
        system: ParticleSystemId,
        _frame: i32,
    ) -> Result<Option<Vec<Vec3>>, HostError> {
        self.check(object, "particle evaluation")?;
        Ok(self.points.get(&(object, system)).cloned())
    }

    fn particle_counts(&self, object: ObjectId, system: ParticleSystemId) -> ParticleCounts {
        self.counts.get(&(object, system)).copied().unwrap_or_default()
    }

    fn uv_on_emitter(
        &mut self,
        _object: ObjectId,
        _system: ParticleSystemId,
        particle: usize,
        uv_layer: usize,
    ) -> Vec2 {
        Self::emitter_uv(particle, uv_layer)
    }

    fn uv_layer_names(&self, object: ObjectId) -> Vec<String> {
        self.uv_layers.get(&object).cloned().unwrap_or_default()
    }
}
