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

//! An in-memory renderer universe.

use prism_core::graph::{ParamArray, ParamValue};
use prism_core::renderer::{
    RenderError, RenderHandle, RenderStatus, Renderer, TileControl, TileEvent,
};
use std::collections::{BTreeMap, HashMap};

/// Bookkeeping cost charged per node by [`MemoryRenderer::used_memory`].
const NODE_OVERHEAD: u64 = 256;

/// A parameter as received by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedParam {
    /// A literal.
    Value(ParamValue),
    /// An uploaded buffer.
    Array(ParamArray),
    /// A node reference.
    Node(RenderHandle),
    /// A node array.
    Nodes(Vec<RenderHandle>),
}

/// A node of the in-memory universe.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    /// Renderer type name.
    pub type_name: String,
    /// Unique name.
    pub name: String,
    /// Parameters by name.
    pub params: BTreeMap<String, RecordedParam>,
    /// Input links by input name.
    pub links: BTreeMap<String, RenderHandle>,
}

impl MemoryNode {
    /// A literal parameter.
    pub fn value(&self, param: &str) -> Option<&ParamValue> {
        match self.params.get(param) {
            Some(RecordedParam::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// An array parameter.
    pub fn array(&self, param: &str) -> Option<&ParamArray> {
        match self.params.get(param) {
            Some(RecordedParam::Array(a)) => Some(a),
            _ => None,
        }
    }

    /// A node reference parameter.
    pub fn node_ref(&self, param: &str) -> Option<RenderHandle> {
        match self.params.get(param) {
            Some(RecordedParam::Node(h)) => Some(*h),
            _ => None,
        }
    }

    fn byte_size(&self) -> u64 {
        self.params
            .values()
            .map(|p| match p {
                RecordedParam::Array(a) => array_bytes(a),
                RecordedParam::Nodes(n) => (n.len() * 8) as u64,
                _ => 16,
            })
            .sum::<u64>()
            + NODE_OVERHEAD
    }
}

fn array_bytes(array: &ParamArray) -> u64 {
    let len = array.len() as u64;
    match array {
        ParamArray::Float(_) | ParamArray::UInt(_) => len * 4,
        ParamArray::Vector(_) => len * 12,
        ParamArray::Vector2(_) => len * 8,
        ParamArray::Byte(_) => len,
        ParamArray::Str(s) => s.iter().map(|s| s.len() as u64).sum(),
    }
}

/// A scripted render failure: every render with fewer than `min_samples`
/// AA samples returns `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FailureScript {
    min_samples: i32,
    status: i32,
}

/// A [`Renderer`] that keeps its universe in memory.
///
/// Rendering walks the image (or the border region) in buckets of the
/// options' `bucket_size`, announcing each bucket without pixels first and
/// then delivering it filled with a flat colour. Tile coordinates are
/// image coordinates, so a border region starts at its minimum corner.
#[derive(Debug)]
pub struct MemoryRenderer {
    active: bool,
    nodes: Vec<MemoryNode>,
    by_name: HashMap<String, RenderHandle>,
    options: Option<RenderHandle>,
    rejected_types: Vec<String>,
    failure: Option<FailureScript>,
    fill: [u8; 4],
    renders: Vec<i32>,
}

impl Default for MemoryRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRenderer {
    /// Creates an inactive renderer. Call [`Renderer::begin`] before use.
    pub fn new() -> Self {
        Self {
            active: false,
            nodes: Vec::new(),
            by_name: HashMap::new(),
            options: None,
            rejected_types: Vec::new(),
            failure: None,
            fill: [128, 128, 128, 255],
            renders: Vec::new(),
        }
    }

    /// Makes `create_node` reject `type_name`.
    pub fn reject_type(mut self, type_name: impl Into<String>) -> Self {
        self.rejected_types.push(type_name.into());
        self
    }

    /// Fails every render with fewer than `min_samples` AA samples.
    pub fn fail_below_samples(mut self, min_samples: i32, status: i32) -> Self {
        self.failure = Some(FailureScript {
            min_samples,
            status,
        });
        self
    }

    /// Fails every render.
    pub fn always_fail(self, status: i32) -> Self {
        self.fail_below_samples(i32::MAX, status)
    }

    /// Whether a universe is open.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of live nodes, the options node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live nodes of a type.
    pub fn count_type(&self, type_name: &str) -> usize {
        self.nodes.iter().filter(|n| n.type_name == type_name).count()
    }

    /// A node by name.
    pub fn node(&self, name: &str) -> Option<&MemoryNode> {
        self.by_name.get(name).and_then(|h| self.get(*h))
    }

    /// A node by handle.
    pub fn get(&self, handle: RenderHandle) -> Option<&MemoryNode> {
        self.nodes.get(Self::slot(handle)?)
    }

    /// All live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &MemoryNode> {
        self.nodes.iter()
    }

    /// `AA_samples` of every render call so far, in order.
    pub fn render_calls(&self) -> &[i32] {
        &self.renders
    }

    fn slot(handle: RenderHandle) -> Option<usize> {
        usize::try_from(handle.0).ok()?.checked_sub(1)
    }

    fn node_mut(&mut self, handle: RenderHandle) -> Result<&mut MemoryNode, RenderError> {
        Self::slot(handle)
            .and_then(|i| self.nodes.get_mut(i))
            .ok_or(RenderError::UnknownNode(handle))
    }

    fn check_target(&self, target: RenderHandle) -> Result<(), RenderError> {
        self.get(target).map(|_| ()).ok_or(RenderError::UnknownNode(target))
    }

    fn set(&mut self, node: RenderHandle, param: &str, value: RecordedParam) -> Result<(), RenderError> {
        if param.is_empty() {
            let name = self.get(node).map(|n| n.name.clone()).unwrap_or_default();
            return Err(RenderError::InvalidParameter {
                node: name,
                param: param.to_owned(),
                reason: "empty parameter name".to_owned(),
            });
        }
        self.node_mut(node)?.params.insert(param.to_owned(), value);
        Ok(())
    }

    fn option_int(&self, param: &str, default: i32) -> i32 {
        self.options
            .and_then(|h| self.get(h))
            .and_then(|n| n.value(param))
            .and_then(ParamValue::as_int)
            .unwrap_or(default)
    }

    /// `(min_x, min_y, max_x, max_y)` of the rendered area, exclusive max.
    fn image_bounds(&self) -> (i32, i32, i32, i32) {
        let xres = self.option_int("xres", 320);
        let yres = self.option_int("yres", 240);
        let has_region = self
            .options
            .and_then(|h| self.get(h))
            .is_some_and(|n| n.value("region_min_x").is_some());
        if has_region {
            let min_x = self.option_int("region_min_x", 0);
            let min_y = self.option_int("region_min_y", 0);
            let max_x = self.option_int("region_max_x", xres - 1) + 1;
            let max_y = self.option_int("region_max_y", yres - 1) + 1;
            (min_x, min_y, max_x.max(min_x), max_y.max(min_y))
        } else {
            (0, 0, xres, yres)
        }
    }
}

impl Renderer for MemoryRenderer {
    fn backend_name(&self) -> &str {
        "memory"
    }

    fn begin(&mut self) {
        self.nodes.clear();
        self.by_name.clear();
        self.options = None;
        self.active = true;
        log::debug!("memory renderer: universe opened");
    }

    fn end(&mut self) {
        self.nodes.clear();
        self.by_name.clear();
        self.options = None;
        self.active = false;
        log::debug!("memory renderer: universe released");
    }

    fn options(&mut self) -> RenderHandle {
        if let Some(handle) = self.options {
            return handle;
        }
        self.nodes.push(MemoryNode {
            type_name: "options".to_owned(),
            name: "options".to_owned(),
            params: BTreeMap::new(),
            links: BTreeMap::new(),
        });
        let handle = RenderHandle(self.nodes.len() as u64);
        self.by_name.insert("options".to_owned(), handle);
        self.options = Some(handle);
        handle
    }

    fn create_node(&mut self, type_name: &str, name: &str) -> Result<RenderHandle, RenderError> {
        if type_name.is_empty() || self.rejected_types.iter().any(|t| t == type_name) {
            return Err(RenderError::UnknownNodeType(type_name.to_owned()));
        }
        if type_name == "options" {
            return Ok(self.options());
        }
        self.nodes.push(MemoryNode {
            type_name: type_name.to_owned(),
            name: name.to_owned(),
            params: BTreeMap::new(),
            links: BTreeMap::new(),
        });
        let handle = RenderHandle(self.nodes.len() as u64);
        if self.by_name.insert(name.to_owned(), handle).is_some() {
            log::warn!("memory renderer: node name '{}' reused", name);
        }
        Ok(handle)
    }

    fn lookup(&self, name: &str) -> Option<RenderHandle> {
        self.by_name.get(name).copied()
    }

    fn set_value(&mut self, node: RenderHandle, param: &str, value: &ParamValue) -> Result<(), RenderError> {
        self.set(node, param, RecordedParam::Value(value.clone()))
    }

    fn set_array(&mut self, node: RenderHandle, param: &str, array: &ParamArray) -> Result<(), RenderError> {
        self.set(node, param, RecordedParam::Array(array.clone()))
    }

    fn set_node(&mut self, node: RenderHandle, param: &str, target: RenderHandle) -> Result<(), RenderError> {
        self.check_target(target)?;
        self.set(node, param, RecordedParam::Node(target))
    }

    fn set_nodes(&mut self, node: RenderHandle, param: &str, targets: &[RenderHandle]) -> Result<(), RenderError> {
        for target in targets {
            self.check_target(*target)?;
        }
        self.set(node, param, RecordedParam::Nodes(targets.to_vec()))
    }

    fn link(&mut self, source: RenderHandle, target: RenderHandle, input: &str) -> Result<(), RenderError> {
        self.check_target(source)?;
        self.node_mut(target)?.links.insert(input.to_owned(), source);
        Ok(())
    }

    fn render(&mut self, on_tile: &mut dyn FnMut(TileEvent<'_>) -> TileControl) -> RenderStatus {
        let samples = self.option_int("AA_samples", 1);
        self.renders.push(samples);
        if let Some(script) = self.failure {
            if samples < script.min_samples {
                log::debug!("memory renderer: scripted failure at {} samples", samples);
                return RenderStatus::Failed(script.status);
            }
        }

        let (min_x, min_y, max_x, max_y) = self.image_bounds();
        let bucket = self.option_int("bucket_size", 64).max(1);
        let used_memory = self.used_memory();
        let mut pixels: Vec<[u8; 4]> = Vec::new();

        for y in (min_y..max_y).step_by(bucket as usize) {
            for x in (min_x..max_x).step_by(bucket as usize) {
                let w = bucket.min(max_x - x) as u32;
                let h = bucket.min(max_y - y) as u32;
                let highlight = TileEvent {
                    x,
                    y,
                    width: w,
                    height: h,
                    pixels: None,
                    used_memory,
                };
                if on_tile(highlight) == TileControl::Abort {
                    return RenderStatus::Aborted;
                }
                pixels.clear();
                pixels.resize(w as usize * h as usize, self.fill);
                let done = TileEvent {
                    x,
                    y,
                    width: w,
                    height: h,
                    pixels: Some(bytemuck::cast_slice(&pixels)),
                    used_memory,
                };
                if on_tile(done) == TileControl::Abort {
                    return RenderStatus::Aborted;
                }
            }
        }
        RenderStatus::Success
    }

    fn used_memory(&self) -> u64 {
        self.nodes.iter().map(MemoryNode::byte_size).sum()
    }
}
