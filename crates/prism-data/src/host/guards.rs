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

//! Scoped acquisitions on a [`SceneHost`].
//!
//! Each guard releases what it acquired when dropped, including on early
//! returns through `?` and during unwinding.

use super::{DupliInstance, HostError, Resolution, SceneHost};
use crate::scene::{MeshData, ObjectId, ParticleSystemId, SceneObject};
use std::ops::Deref;

/// A temporary evaluated mesh, released when dropped.
pub struct TempMesh<'h, H: SceneHost + ?Sized> {
    host: &'h mut H,
    object: ObjectId,
    mesh: MeshData,
}

impl<'h, H: SceneHost + ?Sized> TempMesh<'h, H> {
    /// Evaluates `object`. Returns `Ok(None)` when the object yields no
    /// mesh; nothing needs releasing in that case.
    pub fn acquire(
        host: &'h mut H,
        object: &SceneObject,
        resolution: Resolution,
    ) -> Result<Option<Self>, HostError> {
        let Some(mesh) = host.evaluate_mesh(object, resolution)? else {
            log::trace!("{}: no mesh at {:?} resolution", object.name, resolution);
            return Ok(None);
        };
        log::trace!("{}: acquired temporary mesh", object.name);
        Ok(Some(Self {
            host,
            object: object.id,
            mesh,
        }))
    }
}

impl<H: SceneHost + ?Sized> Deref for TempMesh<'_, H> {
    type Target = MeshData;

    fn deref(&self) -> &MeshData {
        &self.mesh
    }
}

impl<H: SceneHost + ?Sized> Drop for TempMesh<'_, H> {
    fn drop(&mut self) {
        log::trace!("releasing temporary mesh of object {}", self.object.0);
        self.host.release_mesh(self.object);
    }
}

/// Switches a particle system to render resolution for the guard's lifetime.
pub struct RenderResolution<'h, H: SceneHost + ?Sized> {
    host: &'h mut H,
    object: ObjectId,
    system: ParticleSystemId,
}

impl<'h, H: SceneHost + ?Sized> RenderResolution<'h, H> {
    pub fn enter(host: &'h mut H, object: ObjectId, system: ParticleSystemId) -> Self {
        log::trace!("particle system {} of object {}: render resolution", system.0, object.0);
        host.set_particle_resolution(object, system, Resolution::Render);
        Self {
            host,
            object,
            system,
        }
    }

    /// The host, for evaluation calls made at render resolution.
    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: SceneHost + ?Sized> Drop for RenderResolution<'_, H> {
    fn drop(&mut self) {
        log::trace!("particle system {} of object {}: preview resolution", self.system.0, self.object.0);
        self.host
            .set_particle_resolution(self.object, self.system, Resolution::Preview);
    }
}

/// A duplicator's instance list, cleared when dropped.
pub struct DuplicateList<'h, H: SceneHost + ?Sized> {
    host: &'h mut H,
    duplicator: ObjectId,
    instances: Vec<DupliInstance>,
}

impl<'h, H: SceneHost + ?Sized> DuplicateList<'h, H> {
    /// Builds the list. The host list is cleared even if building fails.
    pub fn create(host: &'h mut H, duplicator: &SceneObject) -> Result<Self, HostError> {
        match host.create_duplicates(duplicator) {
            Ok(instances) => {
                log::trace!("{}: {} duplicates", duplicator.name, instances.len());
                Ok(Self {
                    host,
                    duplicator: duplicator.id,
                    instances,
                })
            }
            Err(e) => {
                log::warn!("{}: building duplicates failed: {}", duplicator.name, e);
                host.clear_duplicates(duplicator.id);
                Err(e)
            }
        }
    }

    /// Splits the guard into its instances and the host.
    pub fn parts(&mut self) -> (&[DupliInstance], &mut H) {
        (self.instances.as_slice(), &mut *self.host)
    }
}

impl<H: SceneHost + ?Sized> Drop for DuplicateList<'_, H> {
    fn drop(&mut self) {
        self.host.clear_duplicates(self.duplicator);
    }
}
