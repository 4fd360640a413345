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

//! # Prism Data
//!
//! The read-only description of a source scene (objects, meshes, particle
//! systems, lamps, cameras, materials and their node graphs, world), the
//! render settings that accompany it, and the [`host::SceneHost`] contract
//! through which evaluated data is requested from the host application.

pub mod host;
pub mod scene;
pub mod settings;
pub mod shading;

pub use host::{HostError, Resolution, SceneHost};
pub use scene::{ObjectId, ObjectKind, Scene, SceneObject};
pub use settings::{RenderOptions, RenderSettings};
