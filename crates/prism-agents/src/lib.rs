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

//! # Prism Agents
//!
//! Orchestration of the translation lanes over a session. Agents own the
//! stateful parts of the engine: the export session and its lifecycle, the
//! commit of a node graph into a renderer universe, the tile loop of a final
//! render and the frame loop of an interactive preview.

pub mod commit;
pub mod export_agent;
pub mod interactive_agent;
pub mod render_agent;
pub mod session;

pub use commit::{apply_patch, commit_graph, CommittedGraph};
pub use export_agent::ExportAgent;
pub use interactive_agent::{Frame, InteractiveAgent};
pub use render_agent::RenderAgent;
pub use session::{ExportSession, SessionData, SessionState};
