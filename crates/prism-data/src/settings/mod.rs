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

//! Render settings and renderer options.
//!
//! Both structs deserialize with `#[serde(default)]`, so a configuration
//! file only needs to name the fields it changes.

use serde::{Deserialize, Serialize};

/// Output resolution, pixel aspect and border region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub pixel_aspect_x: f32,
    pub pixel_aspect_y: f32,
    pub use_border: bool,
    pub border_min_x: f32,
    pub border_min_y: f32,
    pub border_max_x: f32,
    pub border_max_y: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution_x: 1920,
            resolution_y: 1080,
            pixel_aspect_x: 1.0,
            pixel_aspect_y: 1.0,
            use_border: false,
            border_min_x: 0.0,
            border_min_y: 0.0,
            border_max_x: 1.0,
            border_max_y: 1.0,
        }
    }
}

/// A pixel region in output pixels, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderRegion {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl RenderSettings {
    /// The border region in pixels for the given resolution, if enabled.
    pub fn border_region(&self, xres: u32, yres: u32) -> Option<BorderRegion> {
        if !self.use_border {
            return None;
        }
        let (x, y) = (xres as f32, yres as f32);
        Some(BorderRegion {
            min_x: (x * self.border_min_x) as i32,
            min_y: (y * self.border_min_y) as i32,
            max_x: (x * self.border_max_x) as i32 - 1,
            max_y: (y * self.border_max_y) as i32 - 1,
        })
    }
}

/// The pixel filter applied to samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SampleFilter {
    BlackmanHarris { width: f32 },
    Box { width: f32 },
    Catrom,
    Closest,
    Cone { width: f32 },
    Cook { width: f32 },
    Cubic { width: f32 },
    Disk { width: f32 },
    Farthest { domain: String },
    Gaussian { width: f32 },
    Heatmap { minimum: f32, maximum: f32 },
    Mitnet,
    Sinc { width: f32 },
    Triangle { width: f32 },
    Variance { width: f32, scalar_mode: bool },
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self::Gaussian { width: 2.0 }
    }
}

impl SampleFilter {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::BlackmanHarris { .. } => "blackman_harris_filter",
            Self::Box { .. } => "box_filter",
            Self::Catrom => "catrom_filter",
            Self::Closest => "closest_filter",
            Self::Cone { .. } => "cone_filter",
            Self::Cook { .. } => "cook_filter",
            Self::Cubic { .. } => "cubic_filter",
            Self::Disk { .. } => "disk_filter",
            Self::Farthest { .. } => "farthest_filter",
            Self::Gaussian { .. } => "gaussian_filter",
            Self::Heatmap { .. } => "heatmap_filter",
            Self::Mitnet => "mitnet_filter",
            Self::Sinc { .. } => "sinc_filter",
            Self::Triangle { .. } => "triangle_filter",
            Self::Variance { .. } => "variance_filter",
        }
    }
}

/// Renderer options of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub aa_samples: i32,
    pub lock_sampling_pattern: bool,
    pub progressive_refinement: bool,
    /// First sample level of progressive refinement; usually negative.
    pub initial_sampling_level: i32,
    pub clamp_sample_values: bool,
    pub aa_sample_clamp: f32,
    pub aa_sample_clamp_affects_aovs: bool,
    pub auto_threads: bool,
    pub threads: i32,
    pub thread_priority: String,
    pub pin_threads: String,
    pub abort_on_error: bool,
    pub abort_on_license_fail: bool,
    pub skip_license_check: bool,
    pub error_color_bad_texture: [f32; 3],
    pub error_color_bad_pixel: [f32; 3],
    pub error_color_bad_shader: [f32; 3],
    pub bucket_size: i32,
    /// Bucket size used by interactive preview.
    pub ipr_bucket_size: i32,
    pub bucket_scanning: String,
    pub ignore_textures: bool,
    pub ignore_shaders: bool,
    pub ignore_atmosphere: bool,
    pub ignore_lights: bool,
    pub ignore_shadows: bool,
    pub ignore_subdivision: bool,
    pub ignore_displacement: bool,
    pub ignore_bump: bool,
    pub ignore_motion_blur: bool,
    pub ignore_dof: bool,
    pub ignore_smoothing: bool,
    pub ignore_sss: bool,
    pub auto_transparency_depth: i32,
    pub texture_max_open_files: i32,
    pub texture_max_memory_mb: f32,
    pub texture_searchpath: String,
    pub texture_automip: bool,
    pub texture_autotile: i32,
    pub texture_accept_untiled: bool,
    pub texture_accept_unmipped: bool,
    pub low_light_threshold: f32,
    pub gi_sss_samples: i32,
    pub sss_use_autobump: bool,
    pub gi_volume_samples: i32,
    pub max_subdivisions: u8,
    pub procedural_searchpath: String,
    pub plugin_searchpath: String,
    pub gi_diffuse_depth: i32,
    pub gi_specular_depth: i32,
    pub gi_transmission_depth: i32,
    pub gi_volume_depth: i32,
    pub gi_total_depth: i32,
    pub gi_diffuse_samples: i32,
    pub gi_specular_samples: i32,
    pub gi_transmission_samples: i32,
    pub sample_filter: SampleFilter,
    pub max_warnings: i32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            aa_samples: 3,
            lock_sampling_pattern: false,
            progressive_refinement: true,
            initial_sampling_level: -3,
            clamp_sample_values: false,
            aa_sample_clamp: 10.0,
            aa_sample_clamp_affects_aovs: false,
            auto_threads: true,
            threads: 0,
            thread_priority: "lowest".to_owned(),
            pin_threads: "auto".to_owned(),
            abort_on_error: true,
            abort_on_license_fail: false,
            skip_license_check: false,
            error_color_bad_texture: [1.0, 0.0, 0.0],
            error_color_bad_pixel: [0.0, 0.0, 1.0],
            error_color_bad_shader: [1.0, 0.0, 1.0],
            bucket_size: 64,
            ipr_bucket_size: 32,
            bucket_scanning: "spiral".to_owned(),
            ignore_textures: false,
            ignore_shaders: false,
            ignore_atmosphere: false,
            ignore_lights: false,
            ignore_shadows: false,
            ignore_subdivision: false,
            ignore_displacement: false,
            ignore_bump: false,
            ignore_motion_blur: false,
            ignore_dof: false,
            ignore_smoothing: false,
            ignore_sss: false,
            auto_transparency_depth: 10,
            texture_max_open_files: 0,
            texture_max_memory_mb: 1024.0,
            texture_searchpath: String::new(),
            texture_automip: true,
            texture_autotile: 64,
            texture_accept_untiled: true,
            texture_accept_unmipped: true,
            low_light_threshold: 0.001,
            gi_sss_samples: 2,
            sss_use_autobump: false,
            gi_volume_samples: 2,
            max_subdivisions: 255,
            procedural_searchpath: String::new(),
            plugin_searchpath: String::new(),
            gi_diffuse_depth: 1,
            gi_specular_depth: 1,
            gi_transmission_depth: 2,
            gi_volume_depth: 0,
            gi_total_depth: 10,
            gi_diffuse_samples: 2,
            gi_specular_samples: 2,
            gi_transmission_samples: 2,
            sample_filter: SampleFilter::default(),
            max_warnings: 5,
        }
    }
}

impl RenderOptions {
    /// The retry range of progressive refinement, `initial ..= aa_samples`.
    pub fn progressive_range(&self) -> Option<std::ops::RangeInclusive<i32>> {
        self.progressive_refinement
            .then(|| self.initial_sampling_level..=self.aa_samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_region_in_pixels() {
        let settings = RenderSettings {
            use_border: true,
            border_min_x: 0.25,
            border_min_y: 0.5,
            border_max_x: 0.75,
            border_max_y: 1.0,
            ..Default::default()
        };
        let region = settings.border_region(200, 100).unwrap();
        assert_eq!(region, BorderRegion { min_x: 50, min_y: 50, max_x: 149, max_y: 99 });
        assert!(RenderSettings::default().border_region(200, 100).is_none());
    }

    #[test]
    fn test_progressive_range() {
        let mut opts = RenderOptions::default();
        opts.initial_sampling_level = -2;
        opts.aa_samples = 4;
        assert_eq!(opts.progressive_range(), Some(-2..=4));
        opts.progressive_refinement = false;
        assert_eq!(opts.progressive_range(), None);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let opts: RenderOptions =
            ron::from_str("(aa_samples: 8, sample_filter: Sinc(width: 4.0))").unwrap();
        assert_eq!(opts.aa_samples, 8);
        assert_eq!(opts.sample_filter, SampleFilter::Sinc { width: 4.0 });
        assert_eq!(opts.bucket_size, 64, "unnamed fields fall back to defaults");
        assert_eq!(opts.sample_filter.type_name(), "sinc_filter");
    }
}
