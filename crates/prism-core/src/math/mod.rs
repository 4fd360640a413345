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

//! Provides the mathematics primitives used while translating a scene.
//!
//! Vectors, a column-major 4x4 matrix and a linear color type. Angles are in
//! **radians** unless a function name says otherwise; the renderer boundary
//! converts to degrees with [`radians_to_degrees`].

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, PI, SQRT_2};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// --- Declare Sub-Modules ---

pub mod color;
pub mod matrix;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::color::LinearRgba;
pub use self::matrix::Mat4;
pub use self::vector::{Vec2, Vec3, Vec4};

// --- Utility Functions ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use prism_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
///
/// # Examples
///
/// ```
/// use prism_core::math::{radians_to_degrees, PI};
/// assert_eq!(radians_to_degrees(PI), 180.0);
/// ```
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Field of view, in degrees, of a pinhole with the given sensor size and
/// focal length (both in millimetres): `2 * atan(sensor / (2 * focal))`.
///
/// # Examples
///
/// ```
/// use prism_core::math::{fov_degrees, approx_eq_eps};
/// // A 36mm sensor behind a 18mm lens sees 90 degrees.
/// assert!(approx_eq_eps(fov_degrees(36.0, 18.0), 90.0, 1e-4));
/// ```
#[inline]
pub fn fov_degrees(sensor: f32, focal_length: f32) -> f32 {
    radians_to_degrees(2.0 * (sensor / (2.0 * focal_length)).atan())
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
///
/// # Examples
///
/// ```
/// use prism_core::math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_round_trip() {
        let angle = 0.75;
        assert_relative_eq!(degrees_to_radians(radians_to_degrees(angle)), angle);
    }

    #[test]
    fn test_fov_of_default_lens() {
        // 32mm sensor, 50mm lens.
        let fov = fov_degrees(32.0, 50.0);
        assert_relative_eq!(fov, 35.489_38, epsilon = 1e-3);
    }
}
