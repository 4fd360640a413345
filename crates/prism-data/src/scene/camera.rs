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

//! Camera data.

use super::ObjectId;

/// Which sensor dimension drives the field of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SensorFit {
    #[default]
    Auto,
    Horizontal,
    Vertical,
}

/// Renderer-facing camera settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub enable_dof: bool,
    pub aperture_size: f32,
    pub aperture_blades: i32,
    pub aperture_rotation: f32,
    pub aperture_blade_curvature: f32,
    pub aperture_aspect_ratio: f32,
    pub shutter_start: f32,
    pub shutter_end: f32,
    pub shutter_type: String,
    pub rolling_shutter: String,
    pub rolling_shutter_duration: f32,
    pub exposure: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            enable_dof: false,
            aperture_size: 0.0,
            aperture_blades: 0,
            aperture_rotation: 0.0,
            aperture_blade_curvature: 0.0,
            aperture_aspect_ratio: 1.0,
            shutter_start: 0.0,
            shutter_end: 0.0,
            shutter_type: "box".to_owned(),
            rolling_shutter: "off".to_owned(),
            rolling_shutter_duration: 0.0,
            exposure: 0.0,
        }
    }
}

/// Camera data of a camera object. Lengths are in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraData {
    pub lens: f32,
    pub sensor_width: f32,
    pub sensor_height: f32,
    pub sensor_fit: SensorFit,
    pub shift_x: f32,
    pub shift_y: f32,
    pub clip_start: f32,
    pub clip_end: f32,
    /// Object the focus plane passes through.
    pub dof_object: Option<ObjectId>,
    /// Focus distance used without a focus object.
    pub dof_distance: f32,
    pub settings: CameraSettings,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            lens: 50.0,
            sensor_width: 32.0,
            sensor_height: 18.0,
            sensor_fit: SensorFit::Auto,
            shift_x: 0.0,
            shift_y: 0.0,
            clip_start: 0.1,
            clip_end: 100.0,
            dof_object: None,
            dof_distance: 0.0,
            settings: CameraSettings::default(),
        }
    }
}

impl CameraData {
    /// The sensor dimension selected by the fit mode.
    pub fn fitted_sensor(&self) -> f32 {
        match self.sensor_fit {
            SensorFit::Vertical => self.sensor_height,
            _ => self.sensor_width,
        }
    }
}
