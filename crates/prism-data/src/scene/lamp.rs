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

//! Lamp data.

use crate::shading::TreeId;
use prism_core::math::LinearRgba;

/// The area light variant selected on an area lamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AreaLightKind {
    Cylinder,
    Disk,
    #[default]
    Quad,
    Photometric,
    Mesh,
}

/// The source lamp type.
#[derive(Debug, Clone, PartialEq)]
pub enum LampKind {
    Point,
    Sun,
    Spot,
    Hemi,
    Area(AreaLightKind),
    /// Any lamp type the translator does not know about.
    Other(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AreaShape {
    #[default]
    Square,
    Rectangle,
}

/// Renderer-facing light settings attached to a lamp.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSettings {
    pub radius: f32,
    pub decay_type: String,
    pub angle: f32,
    pub lens_radius: f32,
    pub penumbra_angle: f32,
    pub aspect_ratio: f32,
    /// Skydome texture resolution.
    pub resolution: i32,
    pub format: String,
    pub quad_resolution: i32,
    /// IES profile for photometric lights.
    pub filename: String,
    /// Name of the object whose surface emits, for mesh lights.
    pub mesh: Option<String>,
    pub intensity: f32,
    pub exposure: f32,
    pub cast_shadows: bool,
    pub cast_volumetric_shadows: bool,
    pub shadow_density: f32,
    pub shadow_color: LinearRgba,
    pub samples: i32,
    pub normalize: bool,
    pub diffuse: f32,
    pub specular: f32,
    pub sss: f32,
    pub indirect: f32,
    pub max_bounces: i32,
    pub volume_samples: i32,
    pub volume: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            radius: 0.0,
            decay_type: "quadratic".to_owned(),
            angle: 0.0,
            lens_radius: 0.0,
            penumbra_angle: 0.0,
            aspect_ratio: 1.0,
            resolution: 1000,
            format: "angular".to_owned(),
            quad_resolution: 512,
            filename: String::new(),
            mesh: None,
            intensity: 1.0,
            exposure: 0.0,
            cast_shadows: true,
            cast_volumetric_shadows: true,
            shadow_density: 1.0,
            shadow_color: LinearRgba::BLACK,
            samples: 1,
            normalize: true,
            diffuse: 1.0,
            specular: 1.0,
            sss: 1.0,
            indirect: 1.0,
            max_bounces: 999,
            volume_samples: 2,
            volume: 1.0,
        }
    }
}

/// Lamp data of a lamp object.
#[derive(Debug, Clone, PartialEq)]
pub struct Lamp {
    pub kind: LampKind,
    pub color: LinearRgba,
    /// Spot cone size in radians.
    pub spot_size: f32,
    pub size: f32,
    pub size_y: f32,
    pub shape: AreaShape,
    /// Light node tree, present when the lamp uses nodes.
    pub node_tree: Option<TreeId>,
    pub settings: LightSettings,
}

impl Lamp {
    pub fn new(kind: LampKind) -> Self {
        Self {
            kind,
            color: LinearRgba::WHITE,
            spot_size: std::f32::consts::FRAC_PI_4,
            size: 1.0,
            size_y: 1.0,
            shape: AreaShape::Square,
            node_tree: None,
            settings: LightSettings::default(),
        }
    }
}
