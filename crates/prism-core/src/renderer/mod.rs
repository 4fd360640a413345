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

//! Provides the backend-agnostic contracts of the renderer collaborator.
//!
//! The translation engine only ever talks to a renderer through [`Renderer`]:
//! nodes are created by type name, parameters are set by `(handle, name,
//! value)` triples, outputs are linked into inputs, and large attribute
//! buffers travel as one contiguous array per parameter. Image synthesis
//! reports tiles back through a callback that the caller owns for the
//! duration of one render call.

pub mod display;
pub mod error;

use crate::graph::{ParamArray, ParamValue};

pub use self::display::{DisplayHost, RenderResult, TileRect, TILE_CHANNELS};
pub use self::error::RenderError;

/// Opaque handle of a node living inside a renderer universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u64);

/// Outcome of one image-synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// All tiles were produced.
    Success,
    /// The callback requested an abort.
    Aborted,
    /// The renderer failed with a status code.
    Failed(i32),
}

impl RenderStatus {
    /// Status code as the renderer reports it (`0` on success, `1` on abort).
    pub fn code(self) -> i32 {
        match self {
            RenderStatus::Success => 0,
            RenderStatus::Aborted => 1,
            RenderStatus::Failed(code) => code,
        }
    }

    /// Returns `true` for [`RenderStatus::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, RenderStatus::Success)
    }
}

/// One tile notification delivered during image synthesis.
///
/// A tile without pixels announces that a bucket started (a highlight); the
/// same origin later arrives again with its finished pixels.
#[derive(Debug, Clone, Copy)]
pub struct TileEvent<'a> {
    /// Left edge in renderer space.
    pub x: i32,
    /// Bottom edge in renderer space.
    pub y: i32,
    /// Tile width.
    pub width: u32,
    /// Tile height.
    pub height: u32,
    /// RGBA8 pixels, `width * height * 4` bytes, when the tile is finished.
    pub pixels: Option<&'a [u8]>,
    /// Renderer memory in use when the tile was emitted, in bytes.
    pub used_memory: u64,
}

/// What the renderer should do after delivering a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileControl {
    /// Keep rendering.
    Continue,
    /// Stop as soon as possible and return [`RenderStatus::Aborted`].
    Abort,
}

/// The node-creation / parameter-set / link / bulk-upload API of a renderer.
pub trait Renderer {
    /// Returns a short, human-readable name for the backend.
    fn backend_name(&self) -> &str;

    /// Starts a fresh, empty universe, discarding any previous one.
    fn begin(&mut self);

    /// Releases the current universe.
    fn end(&mut self);

    /// Returns the universe's options node.
    fn options(&mut self) -> RenderHandle;

    /// Creates a node of `type_name` called `name`.
    fn create_node(&mut self, type_name: &str, name: &str) -> Result<RenderHandle, RenderError>;

    /// Finds a node by name.
    fn lookup(&self, name: &str) -> Option<RenderHandle>;

    /// Sets a literal parameter.
    fn set_value(
        &mut self,
        node: RenderHandle,
        param: &str,
        value: &ParamValue,
    ) -> Result<(), RenderError>;

    /// Uploads an attribute buffer in one call.
    fn set_array(
        &mut self,
        node: RenderHandle,
        param: &str,
        array: &ParamArray,
    ) -> Result<(), RenderError>;

    /// Points a parameter at another node.
    fn set_node(
        &mut self,
        node: RenderHandle,
        param: &str,
        target: RenderHandle,
    ) -> Result<(), RenderError>;

    /// Points a parameter at a list of nodes.
    fn set_nodes(
        &mut self,
        node: RenderHandle,
        param: &str,
        targets: &[RenderHandle],
    ) -> Result<(), RenderError>;

    /// Connects `source`'s output into `target`'s `input`.
    fn link(
        &mut self,
        source: RenderHandle,
        target: RenderHandle,
        input: &str,
    ) -> Result<(), RenderError>;

    /// Runs image synthesis, reporting tiles to `on_tile`.
    ///
    /// The callback may be invoked from the renderer's worker context; it
    /// must not call back into the renderer.
    fn render(&mut self, on_tile: &mut dyn FnMut(TileEvent<'_>) -> TileControl) -> RenderStatus;

    /// Memory currently used by the renderer, in bytes.
    fn used_memory(&self) -> u64;
}
