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

//! Per-object shape properties.

use prism_core::graph::{NodeGraph, NodeId, ParamValue};
use prism_data::scene::ObjectRenderProperties;

/// Writes visibility, shadowing and subdivision settings onto a shape or
/// instance node.
pub fn apply_object_properties(graph: &mut NodeGraph, id: NodeId, props: &ObjectRenderProperties) {
    graph.set(id, "visibility", ParamValue::Byte(props.visibility));
    graph.set(id, "sidedness", ParamValue::Byte(props.sidedness));
    graph.set(id, "receive_shadows", props.receive_shadows);
    graph.set(id, "self_shadows", props.self_shadows);
    graph.set(id, "invert_normals", props.invert_normals);
    graph.set(id, "opaque", props.opaque);
    graph.set(id, "matte", props.matte);

    if let Some(subdiv) = &props.subdivision {
        graph.set(id, "subdiv_type", subdiv.kind.as_str());
        graph.set(id, "subdiv_iterations", ParamValue::Byte(subdiv.iterations));
        graph.set(id, "subdiv_adaptive_error", subdiv.adaptive_error);
        graph.set(id, "subdiv_adaptive_metric", subdiv.adaptive_metric.as_str());
        graph.set(id, "subdiv_adaptive_space", subdiv.adaptive_space.as_str());
        graph.set(id, "subdiv_uv_smoothing", subdiv.uv_smoothing.as_str());
        graph.set(id, "subdiv_smooth_derivs", subdiv.smooth_derivs);
    }
}
