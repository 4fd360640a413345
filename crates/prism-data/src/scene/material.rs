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

//! Materials and their non-node shader settings.

use crate::shading::TreeId;
use prism_core::math::{LinearRgba, Vec3};
use serde::{Deserialize, Serialize};

/// Index of a material in [`super::Scene::materials`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct StandardSurface {
    pub diffuse_roughness: f32,
    pub metalness: f32,
    pub specular_roughness: f32,
    pub specular_anisotropy: f32,
    pub specular_rotation: f32,
    pub transmission: f32,
    pub transmission_color: LinearRgba,
    pub transmission_depth: f32,
    pub transmission_scatter: LinearRgba,
    pub transmission_scatter_anisotropy: f32,
    pub transmission_dispersion: f32,
    pub transmission_extra_roughness: f32,
    pub transmit_aovs: bool,
    pub subsurface: f32,
    pub subsurface_color: LinearRgba,
    pub subsurface_radius: LinearRgba,
    pub subsurface_scale: f32,
    pub subsurface_anisotropy: f32,
    pub subsurface_type: String,
    pub thin_walled: bool,
    pub normal: Vec3,
    pub coat: f32,
    pub coat_color: LinearRgba,
    pub coat_roughness: f32,
    pub coat_normal: Vec3,
    pub coat_affect_color: f32,
    pub coat_affect_roughness: f32,
    pub caustics: bool,
    pub internal_reflections: bool,
    pub exit_to_background: bool,
    pub indirect_diffuse: f32,
    pub indirect_specular: f32,
    pub thin_film_thickness: f32,
    pub sheen: f32,
    pub sheen_color: LinearRgba,
    pub sheen_roughness: f32,
}

impl Default for StandardSurface {
    fn default() -> Self {
        Self {
            diffuse_roughness: 0.0,
            metalness: 0.0,
            specular_roughness: 0.1,
            specular_anisotropy: 0.0,
            specular_rotation: 0.0,
            transmission: 0.0,
            transmission_color: LinearRgba::WHITE,
            transmission_depth: 0.0,
            transmission_scatter: LinearRgba::BLACK,
            transmission_scatter_anisotropy: 0.0,
            transmission_dispersion: 0.0,
            transmission_extra_roughness: 0.0,
            transmit_aovs: false,
            subsurface: 0.0,
            subsurface_color: LinearRgba::WHITE,
            subsurface_radius: LinearRgba::WHITE,
            subsurface_scale: 1.0,
            subsurface_anisotropy: 0.0,
            subsurface_type: "diffusion".to_owned(),
            thin_walled: false,
            normal: Vec3::ZERO,
            coat: 0.0,
            coat_color: LinearRgba::WHITE,
            coat_roughness: 0.1,
            coat_normal: Vec3::ZERO,
            coat_affect_color: 0.0,
            coat_affect_roughness: 0.0,
            caustics: false,
            internal_reflections: true,
            exit_to_background: false,
            indirect_diffuse: 1.0,
            indirect_specular: 1.0,
            thin_film_thickness: 0.0,
            sheen: 0.0,
            sheen_color: LinearRgba::WHITE,
            sheen_roughness: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utility {
    pub color_mode: String,
    pub shade_mode: String,
    pub overlay_mode: String,
    pub opacity: f32,
    pub ao_distance: f32,
}

impl Default for Utility {
    fn default() -> Self {
        Self {
            color_mode: "color".to_owned(),
            shade_mode: "ndoteye".to_owned(),
            overlay_mode: "none".to_owned(),
            opacity: 1.0,
            ao_distance: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardHair {
    pub base: f32,
    pub base_color: LinearRgba,
    pub melanin: f32,
    pub melanin_redness: f32,
    pub melanin_randomize: f32,
    pub roughness: f32,
    pub ior: f32,
    pub shift: f32,
    pub specular_tint: LinearRgba,
    pub specular2_tint: LinearRgba,
    pub transmission_tint: LinearRgba,
    pub diffuse: f32,
    pub diffuse_color: LinearRgba,
    pub emission: f32,
    pub emission_color: LinearRgba,
    pub opacity: LinearRgba,
    pub indirect_diffuse: f32,
    pub indirect_specular: f32,
    pub extra_depth: f32,
    pub extra_samples: f32,
}

impl Default for StandardHair {
    fn default() -> Self {
        Self {
            base: 1.0,
            base_color: LinearRgba::WHITE,
            melanin: 1.0,
            melanin_redness: 0.5,
            melanin_randomize: 0.0,
            roughness: 0.2,
            ior: 1.55,
            shift: 3.0,
            specular_tint: LinearRgba::WHITE,
            specular2_tint: LinearRgba::WHITE,
            transmission_tint: LinearRgba::WHITE,
            diffuse: 0.0,
            diffuse_color: LinearRgba::WHITE,
            emission: 0.0,
            emission_color: LinearRgba::WHITE,
            opacity: LinearRgba::WHITE,
            indirect_diffuse: 1.0,
            indirect_specular: 1.0,
            extra_depth: 16.0,
            extra_samples: 0.0,
        }
    }
}

/// The surface shader a non-node material translates to.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceShader {
    Lambert { opacity: LinearRgba },
    StandardSurface(Box<StandardSurface>),
    Utility(Utility),
    Flat { opacity: LinearRgba },
    StandardHair(Box<StandardHair>),
}

impl Default for SurfaceShader {
    fn default() -> Self {
        Self::Lambert {
            opacity: LinearRgba::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    pub edge_type: String,
    pub fill_color: LinearRgba,
    pub line_width: f32,
    pub raster_space: bool,
}

impl Default for Wireframe {
    fn default() -> Self {
        Self {
            edge_type: "triangles".to_owned(),
            fill_color: LinearRgba::WHITE,
            line_width: 1.0,
            raster_space: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardVolume {
    pub density: f32,
    pub scatter: f32,
    pub scatter_color: LinearRgba,
    pub scatter_anisotropy: f32,
    pub transparent: LinearRgba,
    pub transparent_depth: f32,
    pub emission: f32,
    pub emission_color: LinearRgba,
    pub temperature: f32,
    pub blackbody_kelvin: f32,
    pub blackbody_intensity: f32,
}

impl Default for StandardVolume {
    fn default() -> Self {
        Self {
            density: 1.0,
            scatter: 1.0,
            scatter_color: LinearRgba::WHITE,
            scatter_anisotropy: 0.0,
            transparent: LinearRgba::WHITE,
            transparent_depth: 1.0,
            emission: 1.0,
            emission_color: LinearRgba::WHITE,
            temperature: 1.0,
            blackbody_kelvin: 5000.0,
            blackbody_intensity: 1.0,
        }
    }
}

/// The material type and its shader settings.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialKind {
    Surface(SurfaceShader),
    Wire(Wireframe),
    Volume(StandardVolume),
    /// Any type without a translation; resolves to the default shader.
    Halo,
}

/// A material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    /// Present when the material uses a node tree.
    pub node_tree: Option<TreeId>,
    pub kind: MaterialKind,
    pub diffuse_color: LinearRgba,
    pub diffuse_intensity: f32,
    pub specular_color: LinearRgba,
    pub specular_intensity: f32,
    pub emit: f32,
}

impl Material {
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            id: MaterialId::default(),
            name: name.into(),
            node_tree: None,
            kind,
            diffuse_color: LinearRgba::rgb(0.8, 0.8, 0.8),
            diffuse_intensity: 0.8,
            specular_color: LinearRgba::WHITE,
            specular_intensity: 0.5,
            emit: 0.0,
        }
    }

    /// A material driven by a node tree.
    pub fn with_nodes(name: impl Into<String>, tree: TreeId) -> Self {
        Self {
            node_tree: Some(tree),
            ..Self::new(name, MaterialKind::Surface(SurfaceShader::default()))
        }
    }

    pub fn use_nodes(&self) -> bool {
        self.node_tree.is_some()
    }
}
