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

//! # Prism Core
//!
//! Foundational crate containing the math primitives, the renderer node graph
//! model, and the interface contracts (renderer, display host) that the
//! translation engine is written against.

#![warn(missing_docs)]

pub mod graph;
pub mod math;
pub mod renderer;
pub mod utils;

pub use graph::{NodeGraph, NodeId, NodeKind, Param, ParamArray, ParamValue, SceneNode};
pub use utils::timer::Stopwatch;
