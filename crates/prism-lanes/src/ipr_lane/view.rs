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

//! Viewport state and the projection math of the interactive camera.

use prism_core::math::{fov_degrees, Mat4, Vec2, SQRT_2};
use prism_data::scene::{CameraData, SensorFit};
use prism_data::ObjectId;

/// Sensor width the free viewport lens is measured against.
pub const FREE_VIEW_SENSOR: f32 = 64.0;

/// How the viewport looks at the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewPerspective {
    /// Through a scene camera.
    Camera,
    /// Free perspective navigation.
    #[default]
    Perspective,
    /// Orthographic navigation. Not translated.
    Orthographic,
}

/// One sample of the interactive viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub perspective: ViewPerspective,
    /// World to view transform.
    pub view_matrix: Mat4,
    /// Region size in pixels.
    pub width: u32,
    pub height: u32,
    /// Lens of the free perspective view, in millimetres.
    pub lens: f32,
    /// Camera-view zoom, in the host's `-30..=600` units.
    pub camera_zoom: f32,
    /// Camera-view pan, in units of the frame size.
    pub camera_offset: Vec2,
    /// Camera the viewport looks through in [`ViewPerspective::Camera`].
    pub camera: Option<ObjectId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            perspective: ViewPerspective::Perspective,
            view_matrix: Mat4::IDENTITY,
            width: 640,
            height: 480,
            lens: 50.0,
            camera_zoom: 0.0,
            camera_offset: Vec2::ZERO,
            camera: None,
        }
    }
}

impl ViewState {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Everything that drives the projection of the interactive camera.
///
/// Compared as a whole: any difference recomputes every derived parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionKey {
    Bound {
        zoom: f32,
        fit: SensorFit,
        sensor: f32,
        lens: f32,
        offset: Vec2,
        shift_x: f32,
        shift_y: f32,
    },
    Free {
        lens: f32,
    },
}

impl ProjectionKey {
    pub fn bound(view: &ViewState, camera: &CameraData) -> Self {
        let sensor = match camera.sensor_fit {
            SensorFit::Vertical => camera.sensor_height,
            _ => camera.sensor_width,
        };
        ProjectionKey::Bound {
            zoom: view.camera_zoom,
            fit: camera.sensor_fit,
            sensor,
            lens: camera.lens,
            offset: view.camera_offset,
            shift_x: camera.shift_x,
            shift_y: camera.shift_y,
        }
    }

    pub fn free(view: &ViewState) -> Self {
        ProjectionKey::Free { lens: view.lens }
    }
}

/// Derived projection parameters of the `__camera` node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Degrees.
    pub fov: f32,
    pub screen_window_min: Vec2,
    pub screen_window_max: Vec2,
}

/// Projection of a viewport looking through a scene camera.
///
/// The zoom maps to a frame scale `z = (sqrt(2) + zoom / 50)^2 / 4`; the
/// pan and the lens shift both move the screen window by `2z` frame units.
pub fn bound_projection(aspect: f32, key: &ProjectionKey) -> Option<Projection> {
    let ProjectionKey::Bound {
        zoom,
        fit,
        sensor,
        lens,
        offset,
        shift_x,
        shift_y,
    } = *key
    else {
        return None;
    };

    let mut z = (SQRT_2 + zoom / 50.0).powi(2) / 4.0;
    let scaled_sensor = if fit == SensorFit::Vertical {
        let s = (16.0 * sensor / 9.0) / z;
        z *= 9.0 / 16.0;
        s
    } else {
        sensor / z
    };

    let shx = 2.0 * z * (2.0 * offset.x + shift_x);
    let shy = 2.0 * z * (2.0 * offset.y + shift_y * aspect);
    Some(Projection {
        fov: fov_degrees(scaled_sensor, lens),
        screen_window_min: Vec2::new(-1.0 + shx, -1.0 + shy),
        screen_window_max: Vec2::new(1.0 + shx, 1.0 + shy),
    })
}

/// Projection of the free perspective viewport.
pub fn free_projection(lens: f32) -> Projection {
    Projection {
        fov: fov_degrees(FREE_VIEW_SENSOR, lens),
        screen_window_min: Vec2::new(-1.0, -1.0),
        screen_window_max: Vec2::new(1.0, 1.0),
    }
}

/// The camera transform the renderer expects for a view matrix.
pub fn camera_matrix(view_matrix: &Mat4) -> Option<Mat4> {
    view_matrix.inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prism_core::math::Vec3;

    fn key(zoom: f32, fit: SensorFit) -> ProjectionKey {
        ProjectionKey::Bound {
            zoom,
            fit,
            sensor: 36.0,
            lens: 50.0,
            offset: Vec2::ZERO,
            shift_x: 0.0,
            shift_y: 0.0,
        }
    }

    #[test]
    fn test_free_projection_uses_reference_sensor() {
        let p = free_projection(32.0);
        assert_relative_eq!(p.fov, 90.0, epsilon = 1e-4);
        assert_eq!(p.screen_window_min, Vec2::new(-1.0, -1.0));
        assert_eq!(p.screen_window_max, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_bound_projection_at_zero_zoom_halves_the_frame() {
        // zoom 0 gives z = 0.5, so the sensor reads twice as wide.
        let p = bound_projection(1.0, &key(0.0, SensorFit::Auto)).unwrap();
        assert_relative_eq!(p.fov, fov_degrees(72.0, 50.0), epsilon = 1e-4);
        assert_eq!(p.screen_window_min, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_bound_projection_vertical_fit() {
        let mut k = key(0.0, SensorFit::Vertical);
        if let ProjectionKey::Bound { sensor, .. } = &mut k {
            *sensor = 24.0;
        }
        let p = bound_projection(1.0, &k).unwrap();
        let expected = fov_degrees((16.0 * 24.0 / 9.0) / 0.5, 50.0);
        assert_relative_eq!(p.fov, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_bound_projection_shift_moves_window() {
        let k = ProjectionKey::Bound {
            zoom: 0.0,
            fit: SensorFit::Auto,
            sensor: 36.0,
            lens: 50.0,
            offset: Vec2::new(0.25, 0.0),
            shift_x: 0.0,
            shift_y: 0.5,
        };
        let p = bound_projection(2.0, &k).unwrap();
        // z = 0.5: shx = 2 * 0.5 * 0.5, shy = 2 * 0.5 * (0.5 * 2).
        assert_relative_eq!(p.screen_window_min.x, -0.5, epsilon = 1e-5);
        assert_relative_eq!(p.screen_window_max.x, 1.5, epsilon = 1e-5);
        assert_relative_eq!(p.screen_window_min.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.screen_window_max.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_free_key_has_no_bound_projection() {
        assert!(bound_projection(1.0, &ProjectionKey::Free { lens: 50.0 }).is_none());
    }

    #[test]
    fn test_camera_matrix_inverts_view() {
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let camera = camera_matrix(&view).unwrap();
        let t = camera.translation();
        assert_relative_eq!(t.z, 5.0, epsilon = 1e-5);
        assert_relative_eq!(t.x, 0.0, epsilon = 1e-5);
    }
}
