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

//! Options, outputs and sampling.

use prism_core::graph::{NodeGraph, NodeId, NodeKind, ParamArray, ParamValue};
use prism_data::settings::SampleFilter;
use prism_data::{RenderOptions, Scene};
use std::ops::RangeInclusive;

/// Name of the pixel filter node.
pub const FILTER_NODE: &str = "__filter";
/// Name of the display driver node.
pub const DRIVER_NODE: &str = "__driver";
/// The single output declaration.
pub const OUTPUT: &str = "RGBA RGBA __filter __driver";

/// What a session keeps from the options pass.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsOutput {
    pub options: NodeId,
    pub driver: NodeId,
    /// Border offset subtracted from every tile origin.
    pub offset: (i32, i32),
    /// Sample levels to retry on failure, set for progressive sessions.
    pub progressive: Option<RangeInclusive<i32>>,
}

#[derive(Debug, Default)]
pub struct OptionsLane;

impl OptionsLane {
    pub fn new() -> Self {
        Self
    }

    /// Writes the options node, the filter and driver nodes, the outputs
    /// declaration and the sample count.
    ///
    /// In a session with progressive refinement the render starts at the
    /// initial sampling level.
    pub fn run(&self, graph: &mut NodeGraph, scene: &Scene, in_session: bool) -> OptionsOutput {
        let options = graph.options();
        let offset = export_options(graph, options, scene);

        export_filter(graph, &scene.options.sample_filter);
        let driver = graph.create(NodeKind::Driver("driver_display_callback".into()), DRIVER_NODE);
        graph.set_array(options, "outputs", ParamArray::Str(vec![OUTPUT.to_owned()]));

        let mut aa_samples = scene.options.aa_samples;
        let mut progressive = None;
        if in_session {
            if let Some(range) = scene.options.progressive_range() {
                aa_samples = *range.start();
                progressive = Some(range);
            }
        }
        graph.set(options, "AA_samples", aa_samples);

        OptionsOutput {
            options,
            driver,
            offset: if in_session { offset } else { (0, 0) },
            progressive,
        }
    }
}

/// Writes render options onto `options`. Returns the border offset.
pub fn export_options(graph: &mut NodeGraph, options: NodeId, scene: &Scene) -> (i32, i32) {
    let render = &scene.render;
    let opts: &RenderOptions = &scene.options;
    let (xres, yres) = (render.resolution_x, render.resolution_y);
    graph.set(options, "xres", xres as i32);
    graph.set(options, "yres", yres as i32);

    let mut offset = (0, 0);
    if let Some(region) = render.border_region(xres, yres) {
        offset = (region.min_x, region.min_y);
        graph.set(options, "region_min_x", region.min_x);
        graph.set(options, "region_min_y", region.min_y);
        graph.set(options, "region_max_x", region.max_x);
        graph.set(options, "region_max_y", region.max_y);
    }
    if !opts.lock_sampling_pattern {
        graph.set(options, "AA_seed", scene.frame_current);
    }
    if opts.clamp_sample_values {
        graph.set(options, "AA_sample_clamp", opts.aa_sample_clamp);
        graph.set(options, "AA_sample_clamp_affects_aovs", opts.aa_sample_clamp_affects_aovs);
    }
    if !opts.auto_threads {
        graph.set(options, "threads", opts.threads);
    }
    graph.set(options, "thread_priority", opts.thread_priority.as_str());
    graph.set(options, "pin_threads", opts.pin_threads.as_str());
    graph.set(options, "abort_on_error", opts.abort_on_error);
    graph.set(options, "abort_on_license_fail", opts.abort_on_license_fail);
    graph.set(options, "skip_license_check", opts.skip_license_check);
    graph.set(options, "error_color_bad_texture", ParamValue::Rgb(opts.error_color_bad_texture));
    graph.set(options, "error_color_bad_pixel", ParamValue::Rgb(opts.error_color_bad_pixel));
    graph.set(options, "error_color_bad_shader", ParamValue::Rgb(opts.error_color_bad_shader));
    graph.set(options, "bucket_size", opts.bucket_size);
    graph.set(options, "bucket_scanning", opts.bucket_scanning.as_str());

    let ignores = [
        ("ignore_textures", opts.ignore_textures),
        ("ignore_shaders", opts.ignore_shaders),
        ("ignore_atmosphere", opts.ignore_atmosphere),
        ("ignore_lights", opts.ignore_lights),
        ("ignore_shadows", opts.ignore_shadows),
        ("ignore_subdivision", opts.ignore_subdivision),
        ("ignore_displacement", opts.ignore_displacement),
        ("ignore_bump", opts.ignore_bump),
        ("ignore_motion_blur", opts.ignore_motion_blur),
        ("ignore_dof", opts.ignore_dof),
        ("ignore_smoothing", opts.ignore_smoothing),
        ("ignore_sss", opts.ignore_sss),
    ];
    for (param, value) in ignores {
        graph.set(options, param, value);
    }

    graph.set(options, "auto_transparency_depth", opts.auto_transparency_depth);
    graph.set(options, "texture_max_open_files", opts.texture_max_open_files);
    graph.set(options, "texture_max_memory_MB", opts.texture_max_memory_mb);
    graph.set(options, "texture_searchpath", opts.texture_searchpath.as_str());
    graph.set(options, "texture_automip", opts.texture_automip);
    graph.set(options, "texture_autotile", opts.texture_autotile);
    graph.set(options, "texture_accept_untiled", opts.texture_accept_untiled);
    graph.set(options, "texture_accept_unmipped", opts.texture_accept_unmipped);
    graph.set(options, "low_light_threshold", opts.low_light_threshold);
    graph.set(options, "GI_sss_samples", opts.gi_sss_samples);
    graph.set(options, "sss_use_autobump", opts.sss_use_autobump);
    graph.set(options, "GI_volume_samples", opts.gi_volume_samples);
    graph.set(options, "max_subdivisions", ParamValue::Byte(opts.max_subdivisions));
    graph.set(options, "procedural_searchpath", opts.procedural_searchpath.as_str());
    graph.set(options, "plugin_searchpath", opts.plugin_searchpath.as_str());
    graph.set(options, "GI_diffuse_depth", opts.gi_diffuse_depth);
    graph.set(options, "GI_specular_depth", opts.gi_specular_depth);
    graph.set(options, "GI_transmission_depth", opts.gi_transmission_depth);
    graph.set(options, "GI_volume_depth", opts.gi_volume_depth);
    graph.set(options, "GI_total_depth", opts.gi_total_depth);
    graph.set(options, "GI_diffuse_samples", opts.gi_diffuse_samples);
    graph.set(options, "GI_specular_samples", opts.gi_specular_samples);
    graph.set(options, "GI_transmission_samples", opts.gi_transmission_samples);
    offset
}

/// Creates `__filter` with the parameters of its type.
pub fn export_filter(graph: &mut NodeGraph, filter: &SampleFilter) -> NodeId {
    let id = graph.create(NodeKind::PixelFilter(filter.type_name().into()), FILTER_NODE);
    match filter {
        SampleFilter::BlackmanHarris { width }
        | SampleFilter::Box { width }
        | SampleFilter::Cone { width }
        | SampleFilter::Cook { width }
        | SampleFilter::Cubic { width }
        | SampleFilter::Disk { width }
        | SampleFilter::Gaussian { width }
        | SampleFilter::Sinc { width }
        | SampleFilter::Triangle { width } => graph.set(id, "width", *width),
        SampleFilter::Farthest { domain } => graph.set(id, "domain", domain.as_str()),
        SampleFilter::Heatmap { minimum, maximum } => {
            // The renderer spells the lower bound this way.
            graph.set(id, "minumum", *minimum);
            graph.set(id, "maximum", *maximum);
        }
        SampleFilter::Variance { width, scalar_mode } => {
            graph.set(id, "width", *width);
            graph.set(id, "scalar_mode", *scalar_mode);
        }
        SampleFilter::Catrom | SampleFilter::Closest | SampleFilter::Mitnet => {}
    }
    id
}
