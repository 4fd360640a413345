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

//! Renderer graph nodes and their enumerated kinds.

use std::collections::BTreeMap;
use std::fmt;

use super::value::{Param, ParamArray, ParamValue};

/// Index of a node inside a [`super::NodeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in creation order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The renderer light node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Omnidirectional light with a spherical radius.
    Point,
    /// Directional light at infinity.
    Distant,
    /// Cone light.
    Spot,
    /// Environment dome.
    Skydome,
    /// Cylindrical area light.
    Cylinder,
    /// Disk area light.
    Disk,
    /// Quad area light.
    Quad,
    /// IES profile light.
    Photometric,
    /// Area light shaped by a mesh node.
    Mesh,
}

impl LightKind {
    /// The renderer's node type name.
    pub fn type_name(self) -> &'static str {
        match self {
            LightKind::Point => "point_light",
            LightKind::Distant => "distant_light",
            LightKind::Spot => "spot_light",
            LightKind::Skydome => "skydome_light",
            LightKind::Cylinder => "cylinder_light",
            LightKind::Disk => "disk_light",
            LightKind::Quad => "quad_light",
            LightKind::Photometric => "photometric_light",
            LightKind::Mesh => "mesh_light",
        }
    }
}

/// What a renderer node is.
///
/// The kind is an explicit field of every node; the `is_*` capability checks
/// replace any reliance on runtime type identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The renderer's global options node.
    Options,
    /// A polygon mesh.
    Polymesh,
    /// Hair strands.
    Curves,
    /// Particles rendered as discs, spheres or quads.
    Points,
    /// A proxy referencing another shape, carrying only its own transform.
    Instance,
    /// A light source.
    Light(LightKind),
    /// A perspective camera.
    Camera,
    /// A shading node, named by its renderer type (`standard_surface`, `image`, ...).
    Shader(String),
    /// A light filter node (`gobo`, `barndoor`, ...).
    LightFilter(String),
    /// A pixel filter (`gaussian_filter`, ...).
    PixelFilter(String),
    /// An output driver.
    Driver(String),
}

impl NodeKind {
    /// The renderer's node type name.
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Options => "options",
            NodeKind::Polymesh => "polymesh",
            NodeKind::Curves => "curves",
            NodeKind::Points => "points",
            NodeKind::Instance => "ginstance",
            NodeKind::Light(kind) => kind.type_name(),
            NodeKind::Camera => "persp_camera",
            NodeKind::Shader(name)
            | NodeKind::LightFilter(name)
            | NodeKind::PixelFilter(name)
            | NodeKind::Driver(name) => name,
        }
    }

    /// Shading nodes may be linked into other nodes' inputs.
    pub fn is_shader(&self) -> bool {
        matches!(self, NodeKind::Shader(_) | NodeKind::LightFilter(_))
    }

    /// Nodes that own geometry buffers.
    pub fn is_geometry(&self) -> bool {
        matches!(self, NodeKind::Polymesh | NodeKind::Curves | NodeKind::Points)
    }

    /// Anything placed in the scene with a transform and object properties.
    pub fn is_shape(&self) -> bool {
        self.is_geometry() || matches!(self, NodeKind::Instance)
    }

    /// Light sources.
    pub fn is_light(&self) -> bool {
        matches!(self, NodeKind::Light(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// An abstract renderer-graph node.
///
/// Created during translation and owned by the graph of the export or patch
/// operation that built it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// The node type.
    pub kind: NodeKind,
    /// The unique renderer name.
    pub name: String,
    /// Parameter name to value, array or node reference.
    pub params: BTreeMap<String, Param>,
    /// Parameter name to upstream node whose output drives that input.
    pub links: BTreeMap<String, NodeId>,
}

impl SceneNode {
    /// Creates an empty node.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            params: BTreeMap::new(),
            links: BTreeMap::new(),
        }
    }

    /// Returns the literal value of a parameter.
    pub fn value(&self, param: &str) -> Option<&ParamValue> {
        match self.params.get(param) {
            Some(Param::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns the array bound to a parameter.
    pub fn array(&self, param: &str) -> Option<&ParamArray> {
        match self.params.get(param) {
            Some(Param::Array(a)) => Some(a),
            _ => None,
        }
    }

    /// Returns the single node referenced by a parameter.
    pub fn node_ref(&self, param: &str) -> Option<NodeId> {
        match self.params.get(param) {
            Some(Param::Node(id)) => Some(*id),
            _ => None,
        }
    }

    /// Returns the node list referenced by a parameter.
    pub fn node_refs(&self, param: &str) -> Option<&[NodeId]> {
        match self.params.get(param) {
            Some(Param::Nodes(ids)) => Some(ids),
            _ => None,
        }
    }

    /// Returns the upstream node linked into `input`.
    pub fn link(&self, input: &str) -> Option<NodeId> {
        self.links.get(input).copied()
    }

    /// Returns `true` if the parameter holds anything, value or link.
    pub fn has(&self, param: &str) -> bool {
        self.params.contains_key(param) || self.links.contains_key(param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_capabilities() {
        assert!(NodeKind::Shader("lambert".into()).is_shader());
        assert!(NodeKind::LightFilter("gobo".into()).is_shader());
        assert!(!NodeKind::Polymesh.is_shader());
        assert!(NodeKind::Instance.is_shape());
        assert!(!NodeKind::Instance.is_geometry());
        assert!(NodeKind::Light(LightKind::Quad).is_light());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(NodeKind::Instance.type_name(), "ginstance");
        assert_eq!(NodeKind::Light(LightKind::Point).to_string(), "point_light");
        assert_eq!(
            NodeKind::PixelFilter("gaussian_filter".into()).type_name(),
            "gaussian_filter"
        );
    }

    #[test]
    fn test_typed_accessors_do_not_cross_kinds() {
        let mut node = SceneNode::new(NodeKind::Polymesh, "O0::Plane");
        node.params
            .insert("smoothing".into(), Param::Value(ParamValue::Bool(true)));
        assert_eq!(node.value("smoothing"), Some(&ParamValue::Bool(true)));
        assert!(node.array("smoothing").is_none());
        assert!(node.node_ref("smoothing").is_none());
        assert!(node.has("smoothing"));
        assert!(!node.has("shader"));
    }
}
