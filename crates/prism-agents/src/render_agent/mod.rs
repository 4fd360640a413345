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

//! Acts as the agent for final-frame image synthesis.
//!
//! The render agent owns the tile callback handed to the renderer: it maps
//! tiles onto display results, keeps in-flight buckets in a pending map,
//! polls the display for cancellation and reports memory usage. When a
//! render fails and the session carries a progressive range, the agent
//! retries through that range before surfacing the failure.

mod agent;

pub use agent::*;
