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

//! Defines the error type of the renderer boundary.

use super::RenderHandle;
use std::fmt;

/// An error reported by a [`super::Renderer`] implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The renderer does not know the requested node type.
    UnknownNodeType(String),
    /// The handle does not address a live node.
    UnknownNode(RenderHandle),
    /// The node has no parameter of that name, or the value has the wrong type.
    InvalidParameter {
        /// The node's name.
        node: String,
        /// The parameter name.
        param: String,
        /// A human-readable reason.
        reason: String,
    },
    /// Image synthesis finished with a non-success status code.
    Failed {
        /// The renderer's status code.
        status: i32,
    },
    /// Image synthesis was interrupted by a cancellation request.
    Aborted,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownNodeType(type_name) => {
                write!(f, "Unknown renderer node type '{type_name}'")
            }
            RenderError::UnknownNode(handle) => {
                write!(f, "No renderer node for handle {handle:?}")
            }
            RenderError::InvalidParameter {
                node,
                param,
                reason,
            } => {
                write!(f, "Invalid parameter '{param}' on node '{node}': {reason}")
            }
            RenderError::Failed { status } => write!(f, "Render status: {status}"),
            RenderError::Aborted => write!(f, "Render aborted"),
        }
    }
}

impl std::error::Error for RenderError {}
