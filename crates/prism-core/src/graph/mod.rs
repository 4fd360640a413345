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

//! The flat renderer node graph built by one export or patch operation.
//!
//! Nodes live in an arena indexed by [`NodeId`]; names are unique within the
//! graph and resolve back to ids through a lookup table.

pub mod naming;
mod node;
mod value;

use std::collections::HashMap;

pub use self::naming::{sanitize, NamingState};
pub use self::node::{LightKind, NodeId, NodeKind, SceneNode};
pub use self::value::{Param, ParamArray, ParamValue};

/// Name of the renderer's singleton options node.
pub const OPTIONS_NODE: &str = "options";

/// An ordered arena of [`SceneNode`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeGraph {
    nodes: Vec<SceneNode>,
    names: HashMap<String, NodeId>,
}

impl NodeGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its id.
    ///
    /// Callers derive names from a [`NamingState`] or a fixed reserved name, so
    /// a repeated name indicates a translation bug; it is logged and the first
    /// node keeps the name in the lookup table.
    pub fn create(&mut self, kind: NodeKind, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let id = NodeId(self.nodes.len() as u32);
        if self.names.contains_key(&name) {
            log::warn!("Duplicate renderer node name '{}' ({})", name, kind);
        } else {
            self.names.insert(name.clone(), id);
        }
        self.nodes.push(SceneNode::new(kind, name));
        id
    }

    /// Returns the options node, creating it on first use.
    pub fn options(&mut self) -> NodeId {
        match self.names.get(OPTIONS_NODE) {
            Some(id) => *id,
            None => self.create(NodeKind::Options, OPTIONS_NODE),
        }
    }

    /// Returns a node by id.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    /// Returns a node by name.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.names.get(name).and_then(|id| self.get(*id))
    }

    /// Returns the id registered for a name.
    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Sets a literal parameter.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this graph.
    pub fn set(&mut self, id: NodeId, param: &str, value: impl Into<ParamValue>) {
        self.insert(id, param, Param::Value(value.into()));
    }

    /// Binds an attribute buffer to a parameter.
    pub fn set_array(&mut self, id: NodeId, param: &str, array: ParamArray) {
        self.insert(id, param, Param::Array(array));
    }

    /// Points a parameter at another node.
    pub fn set_node(&mut self, id: NodeId, param: &str, target: NodeId) {
        self.insert(id, param, Param::Node(target));
    }

    /// Points a parameter at a list of nodes.
    pub fn set_nodes(&mut self, id: NodeId, param: &str, targets: Vec<NodeId>) {
        self.insert(id, param, Param::Nodes(targets));
    }

    /// Connects `source`'s output to `target`'s `input`.
    pub fn link(&mut self, source: NodeId, target: NodeId, input: &str) {
        self.nodes[target.index()]
            .links
            .insert(input.to_owned(), source);
    }

    fn insert(&mut self, id: NodeId, param: &str, value: Param) {
        self.nodes[id.index()].params.insert(param.to_owned(), value);
    }

    /// Iterates nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counts the nodes whose kind satisfies `pred`.
    pub fn count(&self, pred: impl Fn(&NodeKind) -> bool) -> usize {
        self.nodes.iter().filter(|n| pred(&n.kind)).count()
    }
}
