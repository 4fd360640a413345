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

//! The contract between the translator and the host application.
//!
//! Everything the host must *evaluate* (modifier stacks, duplicator lists,
//! particle simulations) goes through [`SceneHost`]. The scoped guards in
//! [`guards`] pair every acquisition with its release.

pub mod guards;

pub use guards::{DuplicateList, RenderResolution, TempMesh};

use crate::scene::{MeshData, ObjectId, ParticleSystemId, SceneObject};
use prism_core::math::{Mat4, Vec2, Vec3};
use std::fmt;

/// Evaluation resolution of modifiers and particle systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Preview,
    Render,
}

/// One entry of a duplicator's instance list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DupliInstance {
    pub object: ObjectId,
    pub matrix: Mat4,
}

/// Hair strands sampled at a fixed number of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrandData {
    /// `strand_count * points_per_strand` positions.
    pub points: Vec<Vec3>,
    /// One radius per point.
    pub radius: Vec<f32>,
    pub points_per_strand: u32,
}

impl StrandData {
    pub fn strand_count(&self) -> usize {
        if self.points_per_strand == 0 {
            0
        } else {
            self.points.len() / self.points_per_strand as usize
        }
    }
}

/// Parent and child particle counts of a system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleCounts {
    pub parents: usize,
    pub children: usize,
}

/// A failure reported by the host while evaluating data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Host evaluation failed: {}", self.message)
    }
}

impl std::error::Error for HostError {}

/// Evaluation services provided by the host application.
///
/// The translator never mutates host scene data except through scoped
/// acquisitions: every `evaluate_mesh` is followed by `release_mesh`, every
/// `create_duplicates` by `clear_duplicates`, and every switch of a particle
/// system to [`Resolution::Render`] by a switch back to
/// [`Resolution::Preview`].
pub trait SceneHost {
    /// Evaluates the object's modifier stack into a temporary mesh.
    /// `Ok(None)` means the object has no mesh data.
    fn evaluate_mesh(
        &mut self,
        object: &SceneObject,
        resolution: Resolution,
    ) -> Result<Option<MeshData>, HostError>;

    /// Frees the temporary mesh of `object`.
    fn release_mesh(&mut self, object: ObjectId);

    /// Builds the instance list of a duplicator.
    fn create_duplicates(&mut self, duplicator: &SceneObject)
        -> Result<Vec<DupliInstance>, HostError>;

    /// Frees the instance list of a duplicator.
    fn clear_duplicates(&mut self, duplicator: ObjectId);

    fn set_particle_resolution(
        &mut self,
        object: ObjectId,
        system: ParticleSystemId,
        resolution: Resolution,
    );

    /// Samples every strand at `steps` points. `Ok(None)` means no strands.
    fn particle_strands(
        &mut self,
        object: ObjectId,
        system: ParticleSystemId,
        steps: u32,
        use_parent_particles: bool,
    ) -> Result<Option<StrandData>, HostError>;

    /// Positions of the live particles at `frame`.
    fn particle_points(
        &mut self,
        object: ObjectId,
        system: ParticleSystemId,
        frame: i32,
    ) -> Result<Option<Vec<Vec3>>, HostError>;

    fn particle_counts(&self, object: ObjectId, system: ParticleSystemId) -> ParticleCounts;

    /// UV coordinate of the emitter surface under `particle` in `uv_layer`.
    /// Child particles are indexed after all parents.
    fn uv_on_emitter(
        &mut self,
        object: ObjectId,
        system: ParticleSystemId,
        particle: usize,
        uv_layer: usize,
    ) -> Vec2;

    /// Names of the UV layers of the object's own mesh data.
    fn uv_layer_names(&self, object: ObjectId) -> Vec<String>;
}
