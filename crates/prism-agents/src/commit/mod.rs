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

//! Committing node graphs and patches into a renderer universe.

use prism_core::graph::{NodeGraph, NodeId, NodeKind, Param};
use prism_core::renderer::{RenderHandle, Renderer};
use prism_lanes::ipr_lane::Patch;
use prism_lanes::{TranslateError, TranslateResult};
use prism_telemetry::ScopedTimer;

/// Renderer handles of a committed graph, indexed like the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommittedGraph {
    handles: Vec<RenderHandle>,
}

impl CommittedGraph {
    pub fn handle(&self, id: NodeId) -> Option<RenderHandle> {
        self.handles.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Creates every node of `graph` in `renderer`, then sets parameters and
/// links. Node references may point forward in the graph, so no parameter
/// is set before all nodes exist.
pub fn commit_graph(renderer: &mut dyn Renderer, graph: &NodeGraph) -> TranslateResult<CommittedGraph> {
    let _timer = ScopedTimer::new("commit");
    let mut committed = CommittedGraph {
        handles: Vec::with_capacity(graph.len()),
    };
    for (_, node) in graph.iter() {
        let handle = match node.kind {
            NodeKind::Options => renderer.options(),
            _ => renderer.create_node(node.kind.type_name(), &node.name)?,
        };
        committed.handles.push(handle);
    }

    for (id, node) in graph.iter() {
        let handle = resolve(&committed, graph, id)?;
        for (param, value) in &node.params {
            match value {
                Param::Value(v) => renderer.set_value(handle, param, v)?,
                Param::Array(a) => renderer.set_array(handle, param, a)?,
                Param::Node(target) => {
                    let target = resolve(&committed, graph, *target)?;
                    renderer.set_node(handle, param, target)?;
                }
                Param::Nodes(targets) => {
                    let targets = targets
                        .iter()
                        .map(|t| resolve(&committed, graph, *t))
                        .collect::<TranslateResult<Vec<_>>>()?;
                    renderer.set_nodes(handle, param, &targets)?;
                }
            }
        }
        for (input, source) in &node.links {
            let source = resolve(&committed, graph, *source)?;
            renderer.link(source, handle, input)?;
        }
    }
    log::debug!("committed {} nodes to {}", committed.len(), renderer.backend_name());
    Ok(committed)
}

fn resolve(committed: &CommittedGraph, graph: &NodeGraph, id: NodeId) -> TranslateResult<RenderHandle> {
    committed.handle(id).ok_or_else(|| {
        let name = graph.get(id).map(|n| n.name.clone()).unwrap_or_else(|| format!("#{}", id.index()));
        TranslateError::UncommittedNode(name)
    })
}

/// Sends the parameters of `patch` to the already committed nodes they
/// address. Returns the number of parameters sent.
pub fn apply_patch(renderer: &mut dyn Renderer, patch: &Patch) -> TranslateResult<usize> {
    let mut sent = 0;
    for (name, params) in patch.iter() {
        let handle = renderer
            .lookup(name)
            .ok_or_else(|| TranslateError::UncommittedNode(name.to_owned()))?;
        for (param, value) in params {
            renderer.set_value(handle, param, value)?;
            sent += 1;
        }
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::graph::{LightKind, ParamArray, ParamValue};
    use prism_core::math::Vec3;
    use prism_infra::MemoryRenderer;

    fn universe() -> MemoryRenderer {
        let mut renderer = MemoryRenderer::new();
        renderer.begin();
        renderer
    }

    #[test]
    fn test_commit_resolves_forward_references() {
        let mut graph = NodeGraph::new();
        let options = graph.options();
        let mesh = graph.create(NodeKind::Polymesh, "O0::Plane");
        let shader = graph.create(NodeKind::Shader("lambert".into()), "M0::Red");
        let texture = graph.create(NodeKind::Shader("noise".into()), "M0::Red&N0::Noise");
        graph.set_node(mesh, "shader", shader);
        graph.link(texture, shader, "Kd_color");
        graph.set_array(mesh, "vlist", ParamArray::Vector(vec![Vec3::ZERO; 4]));
        graph.set(options, "AA_samples", 3);

        let mut renderer = universe();
        let committed = commit_graph(&mut renderer, &graph).unwrap();
        assert_eq!(committed.len(), 4);

        let mesh_node = renderer.node("O0::Plane").unwrap();
        assert_eq!(mesh_node.node_ref("shader"), committed.handle(shader));
        assert_eq!(mesh_node.array("vlist").map(ParamArray::len), Some(4));
        assert_eq!(
            renderer.node("M0::Red").unwrap().links.get("Kd_color").copied(),
            committed.handle(texture)
        );
        assert_eq!(
            renderer.node("options").and_then(|n| n.value("AA_samples")),
            Some(&ParamValue::Int(3))
        );
    }

    #[test]
    fn test_rejected_node_type_surfaces_as_render_error() {
        let mut graph = NodeGraph::new();
        graph.create(NodeKind::Light(LightKind::Photometric), "O0::Ies");
        let mut renderer = universe().reject_type("photometric_light");
        let err = commit_graph(&mut renderer, &graph).unwrap_err();
        assert!(matches!(err, TranslateError::Render(_)), "got {err:?}");
    }

    #[test]
    fn test_patch_addresses_committed_nodes_by_name() {
        let mut renderer = universe();
        renderer.create_node("persp_camera", "__camera").unwrap();
        let mut patch = Patch::new();
        patch.set("__camera", "fov", 40.0f32);

        assert_eq!(apply_patch(&mut renderer, &patch).unwrap(), 1);
        assert_eq!(
            renderer.node("__camera").and_then(|n| n.value("fov")),
            Some(&ParamValue::Float(40.0))
        );

        let mut stray = Patch::new();
        stray.set("__ghost", "fov", 1.0f32);
        assert!(matches!(
            apply_patch(&mut renderer, &stray),
            Err(TranslateError::UncommittedNode(name)) if name == "__ghost"
        ));
    }
}
