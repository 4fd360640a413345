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

//! Errors raised while translating a scene.
//!
//! Unsupported inputs are not errors: lanes skip them and log at debug
//! level. These variants cover broken references and collaborator failures.

use crate::ipr_lane::UnhandledView;
use prism_core::renderer::RenderError;
use prism_data::scene::{MaterialId, ObjectId};
use prism_data::shading::TreeId;
use prism_data::HostError;
use thiserror::Error;

/// An error that aborts a translation pass.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The host failed to evaluate data.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The renderer rejected a node or parameter during commit.
    #[error("Renderer rejected the graph: {0}")]
    Render(#[from] RenderError),

    /// A material, lamp or world references a node tree that does not exist.
    #[error("Node tree {0:?} does not exist")]
    MissingNodeTree(TreeId),

    /// A reference to an object that does not exist.
    #[error("Object {0:?} does not exist")]
    MissingObject(ObjectId),

    /// A material slot references a material that does not exist.
    #[error("Material {0:?} does not exist")]
    MissingMaterial(MaterialId),

    /// The interactive view cannot be translated.
    #[error("Unhandled interactive view: {0:?}")]
    UnhandledView(UnhandledView),

    /// A patch addresses a node that was never committed.
    #[error("Node '{0}' was never committed")]
    UncommittedNode(String),
}

/// Result alias for translation passes.
pub type TranslateResult<T> = Result<T, TranslateError>;
