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

//! Source node graphs for materials, lights and the world.
//!
//! A [`NodeTree`] stores its nodes in an arena. Socket links point at the
//! upstream node by index, so a node's identity within a tree is its
//! [`GraphNodeKey`] and never its name.

use prism_core::math::{Mat4, Vec2, Vec3};

/// Index of a node tree in [`crate::scene::Scene::node_trees`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub u32);

/// Identity of a graph node: its tree and its index in that tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphNodeKey {
    pub tree: TreeId,
    pub node: u32,
}

/// What an output node feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRole {
    Material,
    World,
    Light,
}

/// The kind of a source graph node.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphNodeKind {
    /// A terminal node; only the active one of each role is used.
    Output { role: OutputRole, active: bool },
    /// A renderer shader, created under `ai_name`.
    Shader { ai_name: String },
    /// A renderer light filter, created under `ai_name`.
    Filter { ai_name: String },
    /// Anything else; translated as "no node".
    Unsupported { type_name: String },
}

/// The literal value carried by a socket or a static property.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketValue {
    /// A closure socket; carries no literal.
    Shader,
    /// A light filter socket; carries no literal.
    Filter,
    Bool(bool),
    Int(i32),
    Float(f32),
    /// Four-channel color.
    Color([f32; 4]),
    Rgb([f32; 3]),
    Vector(Vec3),
    Vector2(Vec2),
    Str(String),
    Byte(u8),
    Matrix(Mat4),
}

/// An input socket.
#[derive(Debug, Clone, PartialEq)]
pub struct Socket {
    pub identifier: String,
    pub value: SocketValue,
    /// Hidden literals are never written.
    pub hide_value: bool,
    /// Upstream node index in the same tree.
    pub link: Option<u32>,
}

impl Socket {
    pub fn new(identifier: impl Into<String>, value: SocketValue) -> Self {
        Self {
            identifier: identifier.into(),
            value,
            hide_value: false,
            link: None,
        }
    }

    /// A socket fed by the node at `from`.
    pub fn linked(identifier: impl Into<String>, value: SocketValue, from: u32) -> Self {
        Self {
            link: Some(from),
            ..Self::new(identifier, value)
        }
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }
}

/// A node in a source graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub name: String,
    pub kind: GraphNodeKind,
    pub inputs: Vec<Socket>,
    /// Static properties, applied after the sockets.
    pub properties: Vec<(String, SocketValue)>,
}

impl GraphNode {
    pub fn new(name: impl Into<String>, kind: GraphNodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            inputs: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn shader(name: impl Into<String>, ai_name: impl Into<String>) -> Self {
        Self::new(
            name,
            GraphNodeKind::Shader {
                ai_name: ai_name.into(),
            },
        )
    }

    pub fn filter(name: impl Into<String>, ai_name: impl Into<String>) -> Self {
        Self::new(
            name,
            GraphNodeKind::Filter {
                ai_name: ai_name.into(),
            },
        )
    }

    pub fn output(name: impl Into<String>, role: OutputRole) -> Self {
        Self::new(name, GraphNodeKind::Output { role, active: true })
    }

    pub fn with_input(mut self, socket: Socket) -> Self {
        self.inputs.push(socket);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: SocketValue) -> Self {
        self.properties.push((name.into(), value));
        self
    }

    pub fn input(&self, identifier: &str) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.identifier == identifier)
    }

    /// The renderer type name for translatable nodes.
    pub fn renderer_type(&self) -> Option<&str> {
        match &self.kind {
            GraphNodeKind::Shader { ai_name } | GraphNodeKind::Filter { ai_name } => {
                Some(ai_name)
            }
            _ => None,
        }
    }
}

/// A node graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTree {
    pub id: TreeId,
    pub name: String,
    pub nodes: Vec<GraphNode>,
}

impl NodeTree {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a node and returns its index.
    pub fn add(&mut self, node: GraphNode) -> u32 {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
    }

    pub fn node(&self, index: u32) -> Option<&GraphNode> {
        self.nodes.get(index as usize)
    }

    pub fn key(&self, index: u32) -> GraphNodeKey {
        GraphNodeKey {
            tree: self.id,
            node: index,
        }
    }

    /// The first active output node of the given role.
    pub fn active_output(&self, role: OutputRole) -> Option<(u32, &GraphNode)> {
        self.nodes.iter().enumerate().find_map(|(i, n)| match n.kind {
            GraphNodeKind::Output { role: r, active: true } if r == role => Some((i as u32, n)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> NodeTree {
        let mut tree = NodeTree::new("Material");
        let noise = tree.add(
            GraphNode::shader("Noise", "noise").with_property("octaves", SocketValue::Int(3)),
        );
        let mix = tree.add(
            GraphNode::shader("Mix", "mix_rgba")
                .with_input(Socket::linked("input1", SocketValue::Color([0.0; 4]), noise))
                .with_input(Socket::linked("input2", SocketValue::Color([0.0; 4]), noise)),
        );
        tree.add(GraphNode::new(
            "Old",
            GraphNodeKind::Output {
                role: OutputRole::Material,
                active: false,
            },
        ));
        tree.add(
            GraphNode::output("Output", OutputRole::Material)
                .with_input(Socket::linked("shader", SocketValue::Shader, mix)),
        );
        tree
    }

    #[test]
    fn test_active_output_skips_inactive_nodes() {
        let tree = tree();
        let (index, node) = tree.active_output(OutputRole::Material).unwrap();
        assert_eq!(index, 3);
        assert_eq!(node.name, "Output");
        assert!(tree.active_output(OutputRole::World).is_none());
    }

    #[test]
    fn test_renderer_type_only_for_translatable_kinds() {
        let tree = tree();
        assert_eq!(tree.node(0).and_then(|n| n.renderer_type()), Some("noise"));
        assert_eq!(tree.node(3).and_then(|n| n.renderer_type()), None);
        let unsupported = GraphNode::new(
            "Frame",
            GraphNodeKind::Unsupported {
                type_name: "NodeFrame".into(),
            },
        );
        assert_eq!(unsupported.renderer_type(), None);
    }

    #[test]
    fn test_socket_lookup_and_links() {
        let tree = tree();
        let mix = tree.node(1).unwrap();
        assert!(mix.input("input1").is_some_and(Socket::is_linked));
        assert!(mix.input("missing").is_none());
        assert_eq!(tree.key(1), GraphNodeKey { tree: TreeId(0), node: 1 });
    }
}
