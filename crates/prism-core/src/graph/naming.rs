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

//! Renderer-legal, pass-unique node names.

/// Replaces every character outside `[-0-9A-Za-z_]` with `_`.
///
/// # Examples
///
/// ```
/// use prism_core::graph::naming::sanitize;
/// assert_eq!(sanitize("Cube.001 (copy)"), "Cube_001__copy_");
/// ```
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A monotonically increasing counter plus a sanitizer.
///
/// Produces `"{prefix}{n}::{sanitized}"`. Names are never reused within the
/// lifetime of one state, even when the source name repeats.
#[derive(Debug, Clone)]
pub struct NamingState {
    prefix: String,
    counter: u32,
}

impl NamingState {
    /// Creates a state whose names start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    /// Issues the next unique name for `source`.
    pub fn next_name(&mut self, source: &str) -> String {
        let name = format!("{}{}::{}", self.prefix, self.counter, sanitize(source));
        self.counter += 1;
        name
    }

    /// How many names were issued so far.
    pub fn issued(&self) -> u32 {
        self.counter
    }
}
