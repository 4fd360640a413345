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

//! Provides concrete, in-process implementations of the collaborators the
//! translation engine talks to.
//!
//! [`MemoryRenderer`] is a renderer universe that records every node and
//! parameter it receives and synthesises flat-colour tiles. [`MemoryHost`]
//! serves pre-registered meshes, duplicator lists and particle data and
//! tracks every scoped acquisition so callers can check that each one was
//! released. [`MemoryDisplay`] collects the tiles, statistics and errors a
//! render reports to the user.

#![warn(missing_docs)]

pub mod display;
pub mod host;
pub mod renderer;

pub use display::MemoryDisplay;
pub use host::MemoryHost;
pub use renderer::{MemoryNode, MemoryRenderer, RecordedParam};
