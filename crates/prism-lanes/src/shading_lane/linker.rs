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

//! Translates source node graphs into renderer shader nodes.

use prism_core::graph::{sanitize, NodeGraph, NodeId, NodeKind, ParamValue};
use prism_data::shading::{GraphNodeKey, GraphNodeKind, NodeTree, SocketValue};
use std::collections::HashMap;

/// Converts a socket literal into a renderer parameter.
///
/// Pass-through sockets (shader closures and light filters) carry no literal
/// and yield `None`.
pub fn socket_param(value: &SocketValue) -> Option<ParamValue> {
    match value {
        SocketValue::Shader | SocketValue::Filter => None,
        SocketValue::Bool(v) => Some(ParamValue::Bool(*v)),
        SocketValue::Int(v) => Some(ParamValue::Int(*v)),
        SocketValue::Float(v) => Some(ParamValue::Float(*v)),
        SocketValue::Color(v) => Some(ParamValue::Rgba(*v)),
        SocketValue::Rgb(v) => Some(ParamValue::Rgb(*v)),
        SocketValue::Vector(v) => Some(ParamValue::Vector(*v)),
        SocketValue::Vector2(v) => Some(ParamValue::Vector2(*v)),
        SocketValue::Str(v) => Some(ParamValue::Str(v.clone())),
        SocketValue::Byte(v) => Some(ParamValue::Byte(*v)),
        SocketValue::Matrix(m) => Some(ParamValue::matrix(m)),
    }
}

/// Depth-first translation of node graphs with per-source-node memoization.
///
/// The memo table is keyed by [`GraphNodeKey`], so a node reached through
/// two different inputs is translated once and linked twice. Node names are
/// `{prefix}&N{seq}::{name}`, where `seq` is the size of the memo table at
/// creation time.
#[derive(Debug, Default)]
pub struct ShaderLinker {
    memo: HashMap<GraphNodeKey, NodeId>,
}

impl ShaderLinker {
    /// Creates a linker with an empty memo table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of source nodes translated so far.
    pub fn translated(&self) -> usize {
        self.memo.len()
    }

    /// Returns the renderer node built for a source node, if any.
    pub fn get(&self, key: GraphNodeKey) -> Option<NodeId> {
        self.memo.get(&key).copied()
    }

    /// Translates the node at `index` and everything upstream of it.
    ///
    /// Returns `None` for output nodes and unsupported kinds; an input fed
    /// by such a node falls back to its own literal.
    pub fn translate(
        &mut self,
        graph: &mut NodeGraph,
        tree: &NodeTree,
        index: u32,
        prefix: &str,
    ) -> Option<NodeId> {
        let node = tree.node(index)?;
        let kind = match &node.kind {
            GraphNodeKind::Shader { ai_name } => NodeKind::Shader(ai_name.clone()),
            GraphNodeKind::Filter { ai_name } => NodeKind::LightFilter(ai_name.clone()),
            GraphNodeKind::Output { .. } => return None,
            GraphNodeKind::Unsupported { type_name } => {
                log::debug!("    skip node '{}' (unsupported {})", node.name, type_name);
                return None;
            }
        };

        let key = tree.key(index);
        if let Some(id) = self.memo.get(&key) {
            return Some(*id);
        }

        let name = format!("{}&N{}::{}", prefix, self.memo.len(), sanitize(&node.name));
        let id = graph.create(kind, name);
        // Registered before recursing so cycles terminate.
        self.memo.insert(key, id);

        for socket in &node.inputs {
            if let Some(from) = socket.link {
                if let Some(upstream) = self.translate(graph, tree, from, prefix) {
                    graph.link(upstream, id, &socket.identifier);
                    continue;
                }
            }
            if !socket.hide_value {
                if let Some(value) = socket_param(&socket.value) {
                    graph.set(id, &socket.identifier, value);
                }
            }
        }
        for (param, value) in &node.properties {
            if let Some(value) = socket_param(value) {
                graph.set(id, param, value);
            }
        }
        Some(id)
    }

    /// Translates whatever feeds `socket` of the node at `index`.
    pub fn translate_input(
        &mut self,
        graph: &mut NodeGraph,
        tree: &NodeTree,
        index: u32,
        socket: &str,
        prefix: &str,
    ) -> Option<NodeId> {
        let from = tree.node(index)?.input(socket)?.link?;
        self.translate(graph, tree, from, prefix)
    }
}
