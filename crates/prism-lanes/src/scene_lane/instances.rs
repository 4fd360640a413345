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

//! Shape reuse across objects.

use prism_core::graph::{NodeGraph, NodeId, NodeKind, ParamValue};
use prism_core::math::Mat4;
use prism_data::scene::DataId;
use prism_data::ObjectId;
use std::collections::HashMap;

/// Shape nodes already built during one export.
///
/// `by_data` holds shapes of unmodified objects keyed by their source data
/// block, so objects sharing a mesh become instances of one shape.
/// `by_object` holds every object's own shape, used by duplicators and mesh
/// lights.
#[derive(Debug, Default)]
pub struct InstanceTable {
    by_data: HashMap<DataId, NodeId>,
    by_object: HashMap<ObjectId, NodeId>,
}

impl InstanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared_shape(&self, data: DataId) -> Option<NodeId> {
        self.by_data.get(&data).copied()
    }

    pub fn share(&mut self, data: DataId, shape: NodeId) {
        self.by_data.insert(data, shape);
    }

    pub fn object_shape(&self, object: ObjectId) -> Option<NodeId> {
        self.by_object.get(&object).copied()
    }

    pub fn record(&mut self, object: ObjectId, shape: NodeId) {
        self.by_object.insert(object, shape);
    }
}

/// Creates a `ginstance` of `shape` carrying only its own transform.
pub fn instance_node(
    graph: &mut NodeGraph,
    name: impl Into<String>,
    shape: NodeId,
    matrix: &Mat4,
) -> NodeId {
    let id = graph.create(NodeKind::Instance, name);
    graph.set(id, "matrix", ParamValue::matrix(matrix));
    graph.set(id, "inherit_xform", false);
    graph.set_node(id, "node", shape);
    id
}
