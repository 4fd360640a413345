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

//! # Prism Lanes
//!
//! The hot-path translation pipelines. Each lane turns one part of a
//! [`prism_data::Scene`] into nodes of a [`prism_core::NodeGraph`]:
//!
//! - [`scene_lane`]: the scene walker and the full export pass.
//! - [`shading_lane`]: the shader graph linker, the material cache and the world.
//! - [`geometry_lane`]: polymesh, curves and points materialisation.
//! - [`light_lane`], [`camera_lane`], [`options_lane`]: the remaining node kinds.
//! - [`ipr_lane`]: interactive preview translation and the incremental patch builder.

pub mod camera_lane;
pub mod error;
pub mod geometry_lane;
pub mod ipr_lane;
pub mod light_lane;
pub mod options_lane;
pub mod scene_lane;
pub mod shading_lane;

pub use error::{TranslateError, TranslateResult};
