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

//! The public-facing API of the Prism translation engine.
//!
//! A host application owns a [`RenderEngine`] per render job and forwards
//! its callbacks to it: `update` and `render` for final frames,
//! `view_update` and `view_draw` for the interactive viewport, `reset` and
//! `free` when the job ends.

pub mod config;
mod engine;

pub use config::EngineConfig;
pub use engine::RenderEngine;

pub mod prelude {
    pub use crate::{EngineConfig, RenderEngine};
    pub use prism_agents::{Frame, SessionState};
    pub use prism_core::renderer::{DisplayHost, RenderStatus, Renderer};
    pub use prism_data::{RenderOptions, RenderSettings, Scene, SceneHost};
    pub use prism_lanes::ipr_lane::{ViewPerspective, ViewState};
    pub use prism_lanes::scene_lane::ExportStats;
}
