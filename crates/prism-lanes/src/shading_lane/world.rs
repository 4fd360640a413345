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

//! World (environment) translation.

use super::ShaderLinker;
use crate::error::{TranslateError, TranslateResult};
use prism_core::graph::{sanitize, NodeGraph, NodeId};
use prism_data::shading::OutputRole;
use prism_data::Scene;

/// Links the active world output's inputs onto the options node.
///
/// Every linked input is translated with its own linker under the prefix
/// `W::{world}` and bound to the options parameter of the same name.
/// Returns the number of bound parameters.
pub fn translate_world(
    graph: &mut NodeGraph,
    scene: &Scene,
    options: NodeId,
) -> TranslateResult<usize> {
    let Some(world) = &scene.world else {
        return Ok(0);
    };
    let Some(tree_id) = world.node_tree else {
        return Ok(0);
    };
    let tree = scene
        .node_tree(tree_id)
        .ok_or(TranslateError::MissingNodeTree(tree_id))?;
    let Some((_, output)) = tree.active_output(OutputRole::World) else {
        return Ok(0);
    };

    let prefix = format!("W::{}", sanitize(&world.name));
    let mut bound = 0;
    for socket in &output.inputs {
        let Some(from) = socket.link else { continue };
        if let Some(node) = ShaderLinker::new().translate(graph, tree, from, &prefix) {
            graph.set_node(options, &socket.identifier, node);
            bound += 1;
        }
    }
    Ok(bound)
}
