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

//! Acts as the agent for interactive viewport previews.
//!
//! The first frame translates the visible scene once through the preview
//! lane. Every later frame diffs the viewport against what was last sent,
//! patches the camera, and renders one progressive refinement step. Errors
//! never tear the session down: the frame is logged and dropped.

mod agent;

pub use agent::*;
