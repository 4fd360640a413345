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

//! Typed parameter values carried by renderer graph nodes.

use crate::math::{LinearRgba, Mat4, Vec2, Vec3};

use super::NodeId;

/// A literal parameter value.
///
/// Every kind the renderer accepts is a variant here, so converting a source
/// socket into a parameter is an exhaustive `match` rather than a lookup keyed
/// by a type-name string.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A boolean flag.
    Bool(bool),
    /// An unsigned 8-bit value (visibility masks, sidedness, subdivision counts).
    Byte(u8),
    /// A signed integer.
    Int(i32),
    /// An unsigned integer.
    UInt(u32),
    /// A single-precision float.
    Float(f32),
    /// A color without alpha.
    Rgb([f32; 3]),
    /// A color with alpha.
    Rgba([f32; 4]),
    /// A 3D vector.
    Vector(Vec3),
    /// A 2D vector.
    Vector2(Vec2),
    /// A string.
    Str(String),
    /// A matrix, already flattened in the renderer's row-major transposed layout.
    Matrix([f32; 16]),
}

impl ParamValue {
    /// Builds a matrix value from a source transform.
    #[inline]
    pub fn matrix(m: &Mat4) -> Self {
        ParamValue::Matrix(m.to_renderer_layout())
    }

    /// Builds a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        ParamValue::Str(s.into())
    }

    /// Builds an RGB value, dropping alpha.
    #[inline]
    pub fn rgb(color: LinearRgba) -> Self {
        ParamValue::Rgb(color.to_rgb_array())
    }

    /// The renderer's name for this value type.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "BOOL",
            ParamValue::Byte(_) => "BYTE",
            ParamValue::Int(_) => "INT",
            ParamValue::UInt(_) => "UINT",
            ParamValue::Float(_) => "FLOAT",
            ParamValue::Rgb(_) => "RGB",
            ParamValue::Rgba(_) => "RGBA",
            ParamValue::Vector(_) => "VECTOR",
            ParamValue::Vector2(_) => "VECTOR2",
            ParamValue::Str(_) => "STRING",
            ParamValue::Matrix(_) => "MATRIX",
        }
    }

    /// Returns the float payload, if this is a `Float`.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v)
    }
}

impl From<u8> for ParamValue {
    fn from(v: u8) -> Self {
        ParamValue::Byte(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::UInt(v)
    }
}

impl From<Vec2> for ParamValue {
    fn from(v: Vec2) -> Self {
        ParamValue::Vector2(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        ParamValue::Vector(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// A contiguous attribute buffer destined for a bulk upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamArray {
    /// One float per element.
    Float(Vec<f32>),
    /// Three floats per element.
    Vector(Vec<Vec3>),
    /// Two floats per element.
    Vector2(Vec<Vec2>),
    /// One `u32` per element.
    UInt(Vec<u32>),
    /// One byte per element.
    Byte(Vec<u8>),
    /// Strings, uploaded element by element.
    Str(Vec<String>),
}

impl ParamArray {
    /// Number of elements in the array.
    pub fn len(&self) -> usize {
        match self {
            ParamArray::Float(v) => v.len(),
            ParamArray::Vector(v) => v.len(),
            ParamArray::Vector2(v) => v.len(),
            ParamArray::UInt(v) => v.len(),
            ParamArray::Byte(v) => v.len(),
            ParamArray::Str(v) => v.len(),
        }
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The renderer's name for the element type.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamArray::Float(_) => "FLOAT",
            ParamArray::Vector(_) => "VECTOR",
            ParamArray::Vector2(_) => "VECTOR2",
            ParamArray::UInt(_) => "UINT",
            ParamArray::Byte(_) => "BYTE",
            ParamArray::Str(_) => "STRING",
        }
    }

    /// Views a float-based array as its flat component list.
    ///
    /// A vector array of `n` elements yields `3 * n` floats.
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            ParamArray::Float(v) => Some(v),
            ParamArray::Vector(v) => Some(bytemuck::cast_slice(v)),
            ParamArray::Vector2(v) => Some(bytemuck::cast_slice(v)),
            _ => None,
        }
    }

    /// Views a numeric array as raw bytes, ready for a single buffer copy.
    ///
    /// String arrays have no contiguous representation and return `None`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ParamArray::Float(v) => Some(bytemuck::cast_slice(v)),
            ParamArray::Vector(v) => Some(bytemuck::cast_slice(v)),
            ParamArray::Vector2(v) => Some(bytemuck::cast_slice(v)),
            ParamArray::UInt(v) => Some(bytemuck::cast_slice(v)),
            ParamArray::Byte(v) => Some(v),
            ParamArray::Str(_) => None,
        }
    }

    /// Returns the `u32` payload, if this is a `UInt` array.
    pub fn as_uints(&self) -> Option<&[u32]> {
        match self {
            ParamArray::UInt(v) => Some(v),
            _ => None,
        }
    }
}

/// A parameter slot on a [`super::SceneNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// A literal value.
    Value(ParamValue),
    /// A bulk attribute buffer.
    Array(ParamArray),
    /// A reference to another node (shader, instanced shape, mesh, camera).
    Node(NodeId),
    /// An array of node references (multi-shader lists, light filters).
    Nodes(Vec<NodeId>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_array_flattens_to_floats() {
        let arr = ParamArray::Vector(vec![Vec3::new(1.0, 2.0, 3.0); 4]);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.as_floats().map(<[f32]>::len), Some(12));
    }

    #[test]
    fn test_numeric_arrays_expose_bytes() {
        let arr = ParamArray::UInt(vec![0, 1, 2, 3]);
        assert_eq!(arr.as_bytes().map(<[u8]>::len), Some(16));
        let strings = ParamArray::Str(vec!["RGBA RGBA __filter __driver".into()]);
        assert!(strings.as_bytes().is_none(), "Strings have no contiguous layout");
    }

    #[test]
    fn test_matrix_value_uses_renderer_layout() {
        let v = ParamValue::matrix(&Mat4::IDENTITY);
        assert_eq!(v, ParamValue::Matrix(Mat4::IDENTITY.to_renderer_layout()));
        assert_eq!(v.type_name(), "MATRIX");
    }
}
