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

//! Lamp translation.
//!
//! Lamps map one-to-one onto renderer light nodes. Light node trees share a
//! single [`ShaderLinker`] across every lamp of an export, so a filter tree
//! used by several lamps is still translated per source node exactly once.

use crate::error::{TranslateError, TranslateResult};
use crate::shading_lane::ShaderLinker;
use prism_core::graph::{LightKind, NamingState, NodeGraph, NodeId, NodeKind, ParamArray, ParamValue};
use prism_core::math::{radians_to_degrees, Mat4, Vec3, FRAC_PI_2};
use prism_data::scene::{AreaLightKind, AreaShape, Lamp, LampKind, LightSettings};
use prism_data::shading::{OutputRole, SocketValue};
use prism_data::{Scene, SceneObject};

/// A translated light.
#[derive(Debug, Clone, PartialEq)]
pub struct LightNode {
    pub id: NodeId,
    /// Object name the light's emitting surface is bound to, resolved once
    /// every object has been exported.
    pub mesh: Option<String>,
}

/// Maps a lamp onto the renderer light type that represents it.
pub fn light_kind(lamp: &LampKind) -> Option<LightKind> {
    Some(match lamp {
        LampKind::Point => LightKind::Point,
        LampKind::Sun => LightKind::Distant,
        LampKind::Spot => LightKind::Spot,
        LampKind::Hemi => LightKind::Skydome,
        LampKind::Area(AreaLightKind::Cylinder) => LightKind::Cylinder,
        LampKind::Area(AreaLightKind::Disk) => LightKind::Disk,
        LampKind::Area(AreaLightKind::Quad) => LightKind::Quad,
        LampKind::Area(AreaLightKind::Photometric) => LightKind::Photometric,
        LampKind::Area(AreaLightKind::Mesh) => LightKind::Mesh,
        LampKind::Other(_) => return None,
    })
}

/// Corners of a quad light, counter-clockwise from `(-x, -y)`.
pub fn quad_vertices(lamp: &Lamp) -> Vec<Vec3> {
    let x = lamp.size / 2.0;
    let y = match lamp.shape {
        AreaShape::Rectangle => lamp.size_y / 2.0,
        AreaShape::Square => x,
    };
    vec![
        Vec3::new(-x, -y, 0.0),
        Vec3::new(-x, y, 0.0),
        Vec3::new(x, y, 0.0),
        Vec3::new(x, -y, 0.0),
    ]
}

#[derive(Debug, Default)]
pub struct LightLane {
    linker: ShaderLinker,
}

impl LightLane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates the lamp of `object`, naming the node through `names`.
    ///
    /// Returns `None` for objects without lamp data and for lamp kinds the
    /// renderer has no light for; neither consumes a name.
    pub fn run(
        &mut self,
        graph: &mut NodeGraph,
        scene: &Scene,
        names: &mut NamingState,
        object: &SceneObject,
    ) -> TranslateResult<Option<LightNode>> {
        let Some(lamp) = &object.lamp else {
            return Ok(None);
        };
        let Some(kind) = light_kind(&lamp.kind) else {
            log::debug!("    skip (unsupported)");
            return Ok(None);
        };
        log::debug!("    {}", kind.type_name());

        let name = names.next_name(&object.name);
        let id = graph.create(NodeKind::Light(kind), name.as_str());
        let settings = &lamp.settings;
        let mut matrix = object.matrix_world;
        let mut mesh = None;

        match kind {
            LightKind::Point => {
                graph.set(id, "radius", settings.radius);
                graph.set(id, "decay_type", settings.decay_type.as_str());
            }
            LightKind::Distant => graph.set(id, "angle", settings.angle),
            LightKind::Spot => {
                graph.set(id, "radius", settings.radius);
                graph.set(id, "lens_radius", settings.lens_radius);
                graph.set(id, "cone_angle", radians_to_degrees(lamp.spot_size));
                graph.set(id, "penumbra_angle", settings.penumbra_angle);
                graph.set(id, "aspect_ratio", settings.aspect_ratio);
                graph.set(id, "decay_type", settings.decay_type.as_str());
            }
            LightKind::Skydome => {
                graph.set(id, "resolution", settings.resolution);
                graph.set(id, "format", settings.format.as_str());
            }
            LightKind::Cylinder => {
                let half = lamp.size_y / 2.0;
                graph.set_array(id, "top", ParamArray::Vector(vec![Vec3::new(0.0, half, 0.0)]));
                graph.set_array(id, "bottom", ParamArray::Vector(vec![Vec3::new(0.0, -half, 0.0)]));
                graph.set(id, "radius", lamp.size / 2.0);
                graph.set(id, "decay_type", settings.decay_type.as_str());
            }
            LightKind::Disk => graph.set(id, "radius", lamp.size / 2.0),
            LightKind::Quad => {
                graph.set_array(id, "vertices", ParamArray::Vector(quad_vertices(lamp)));
                graph.set(id, "resolution", settings.quad_resolution);
            }
            LightKind::Photometric => {
                graph.set(id, "filename", settings.filename.as_str());
                matrix = matrix * Mat4::from_rotation_x(FRAC_PI_2);
            }
            LightKind::Mesh => {
                graph.set(id, "decay_type", settings.decay_type.as_str());
                mesh = settings.mesh.clone().filter(|m| !m.is_empty());
            }
        }

        let color_linked = self.link_node_tree(graph, scene, lamp, id, &name)?;
        if !color_linked {
            graph.set(id, "color", ParamValue::rgb(lamp.color));
        }
        graph.set(id, "matrix", ParamValue::matrix(&matrix));
        common_params(graph, id, settings);

        Ok(Some(LightNode { id, mesh }))
    }

    /// Translates the active light output of the lamp's node tree. Returns
    /// whether the `color` input was linked.
    fn link_node_tree(
        &mut self,
        graph: &mut NodeGraph,
        scene: &Scene,
        lamp: &Lamp,
        light: NodeId,
        prefix: &str,
    ) -> TranslateResult<bool> {
        let Some(tree_id) = lamp.node_tree else {
            return Ok(false);
        };
        let tree = scene
            .node_tree(tree_id)
            .ok_or(TranslateError::MissingNodeTree(tree_id))?;
        let Some((_, output)) = tree.active_output(OutputRole::Light) else {
            return Ok(false);
        };

        let mut color_linked = false;
        let mut filters = Vec::new();
        for socket in &output.inputs {
            let Some(from) = socket.link else { continue };
            let Some(node) = self.linker.translate(graph, tree, from, prefix) else {
                continue;
            };
            if socket.identifier == "color" {
                graph.link(node, light, "color");
                color_linked = true;
            } else if matches!(socket.value, SocketValue::Filter) {
                filters.push(node);
            }
        }
        if !filters.is_empty() {
            graph.set_nodes(light, "filters", filters);
        }
        Ok(color_linked)
    }
}

fn common_params(graph: &mut NodeGraph, id: NodeId, s: &LightSettings) {
    graph.set(id, "intensity", s.intensity);
    graph.set(id, "exposure", s.exposure);
    graph.set(id, "cast_shadows", s.cast_shadows);
    graph.set(id, "cast_volumetric_shadows", s.cast_volumetric_shadows);
    graph.set(id, "shadow_density", s.shadow_density);
    graph.set(id, "shadow_color", ParamValue::rgb(s.shadow_color));
    graph.set(id, "samples", s.samples);
    graph.set(id, "normalize", s.normalize);
    graph.set(id, "diffuse", s.diffuse);
    graph.set(id, "specular", s.specular);
    graph.set(id, "sss", s.sss);
    graph.set(id, "indirect", s.indirect);
    graph.set(id, "max_bounces", s.max_bounces);
    graph.set(id, "volume_samples", s.volume_samples);
    graph.set(id, "volume", s.volume);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prism_core::math::LinearRgba;
    use prism_data::scene::ObjectKind;
    use prism_data::shading::{GraphNode, NodeTree, Socket};

    fn lamp_object(name: &str, lamp: Lamp) -> SceneObject {
        let mut ob = SceneObject::new(name, ObjectKind::Lamp);
        ob.lamp = Some(lamp);
        ob
    }

    fn run(lane: &mut LightLane, graph: &mut NodeGraph, scene: &Scene, ob: &SceneObject) -> Option<LightNode> {
        let mut names = NamingState::new("O");
        lane.run(graph, scene, &mut names, ob).unwrap()
    }

    #[test]
    fn test_point_light_parameters() {
        let scene = Scene::new("s");
        let mut lamp = Lamp::new(LampKind::Point);
        lamp.settings.intensity = 5.0;
        let ob = lamp_object("Lamp", lamp);

        let mut graph = NodeGraph::new();
        let light = run(&mut LightLane::new(), &mut graph, &scene, &ob).expect("point lights are supported");
        let node = graph.get(light.id).unwrap();
        assert_eq!(node.kind.type_name(), "point_light");
        assert_eq!(node.name, "O0::Lamp");
        assert_eq!(node.value("intensity"), Some(&ParamValue::Float(5.0)));
        assert_eq!(node.value("color"), Some(&ParamValue::Rgb([1.0, 1.0, 1.0])));
        assert_eq!(node.value("matrix"), Some(&ParamValue::matrix(&Mat4::IDENTITY)));
        assert!(light.mesh.is_none());
    }

    #[test]
    fn test_spot_cone_in_degrees() {
        let scene = Scene::new("s");
        let mut lamp = Lamp::new(LampKind::Spot);
        lamp.spot_size = FRAC_PI_2;
        let ob = lamp_object("Spot", lamp);
        let mut graph = NodeGraph::new();
        let light = run(&mut LightLane::new(), &mut graph, &scene, &ob).unwrap();
        let cone = graph.get(light.id).and_then(|n| n.value("cone_angle")).and_then(ParamValue::as_float);
        assert_relative_eq!(cone.unwrap(), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_quad_rectangle_vertices() {
        let mut lamp = Lamp::new(LampKind::Area(AreaLightKind::Quad));
        lamp.size = 2.0;
        lamp.size_y = 4.0;
        lamp.shape = AreaShape::Rectangle;
        let verts = quad_vertices(&lamp);
        assert_eq!(verts[0], Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(verts[2], Vec3::new(1.0, 2.0, 0.0));

        lamp.shape = AreaShape::Square;
        assert_eq!(quad_vertices(&lamp)[1], Vec3::new(-1.0, 1.0, 0.0), "square uses x for both axes");
    }

    #[test]
    fn test_cylinder_and_photometric() {
        let scene = Scene::new("s");
        let mut cyl = Lamp::new(LampKind::Area(AreaLightKind::Cylinder));
        cyl.size = 1.0;
        cyl.size_y = 3.0;
        let mut graph = NodeGraph::new();
        let mut lane = LightLane::new();
        let light = run(&mut lane, &mut graph, &scene, &lamp_object("Tube", cyl)).unwrap();
        let node = graph.get(light.id).unwrap();
        assert_eq!(node.array("top"), Some(&ParamArray::Vector(vec![Vec3::new(0.0, 1.5, 0.0)])));
        assert_eq!(node.value("radius"), Some(&ParamValue::Float(0.5)));

        let ies = lamp_object("Ies", Lamp::new(LampKind::Area(AreaLightKind::Photometric)));
        let light = run(&mut lane, &mut graph, &scene, &ies).unwrap();
        let expected = ParamValue::matrix(&Mat4::from_rotation_x(FRAC_PI_2));
        assert_eq!(graph.get(light.id).and_then(|n| n.value("matrix")), Some(&expected));
    }

    #[test]
    fn test_mesh_light_reports_binding_and_unsupported_is_skipped() {
        let scene = Scene::new("s");
        let mut lamp = Lamp::new(LampKind::Area(AreaLightKind::Mesh));
        lamp.settings.mesh = Some("Bulb".into());
        let mut graph = NodeGraph::new();
        let mut lane = LightLane::new();
        let light = run(&mut lane, &mut graph, &scene, &lamp_object("Glow", lamp)).unwrap();
        assert_eq!(light.mesh.as_deref(), Some("Bulb"));

        let other = lamp_object("Odd", Lamp::new(LampKind::Other("VOLUME".into())));
        let mut names = NamingState::new("O");
        assert!(lane.run(&mut graph, &scene, &mut names, &other).unwrap().is_none());
        assert_eq!(names.issued(), 0, "skipped lamps consume no name");
    }

    #[test]
    fn test_node_tree_links_color_and_collects_filters() {
        let mut scene = Scene::new("s");
        let mut tree = NodeTree::new("LightNodes");
        let tex = tree.add(GraphNode::shader("Image", "image"));
        let gobo = tree.add(GraphNode::filter("Gobo", "gobo"));
        let decay = tree.add(GraphNode::filter("Decay", "light_decay"));
        tree.add(
            GraphNode::output("Light Output", OutputRole::Light)
                .with_input(Socket::linked("color", SocketValue::Rgb([1.0, 1.0, 1.0]), tex))
                .with_input(Socket::linked("filter1", SocketValue::Filter, gobo))
                .with_input(Socket::linked("filter2", SocketValue::Filter, decay)),
        );
        let tree = scene.add_node_tree(tree);

        let mut lamp = Lamp::new(LampKind::Point);
        lamp.color = LinearRgba::rgb(1.0, 0.0, 0.0);
        lamp.node_tree = Some(tree);
        let ob = lamp_object("Key", lamp);

        let mut graph = NodeGraph::new();
        let mut lane = LightLane::new();
        let light = run(&mut lane, &mut graph, &scene, &ob).unwrap();
        let node = graph.get(light.id).unwrap();
        assert!(node.link("color").is_some());
        assert!(node.value("color").is_none(), "linked colour is not also set as a literal");
        assert_eq!(node.node_refs("filters").map(<[NodeId]>::len), Some(2));
        assert!(graph.find("O0::Key&N0::Image").is_some());

        // A second lamp using the same tree reuses the translated nodes.
        let before = graph.len();
        let again = lamp_object("Fill", ob.lamp.clone().unwrap());
        run(&mut lane, &mut graph, &scene, &again).unwrap();
        assert_eq!(graph.len(), before + 1, "only the light node itself is new");
    }
}
