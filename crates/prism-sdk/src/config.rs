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

//! Engine configuration loaded from RON.

use anyhow::{Context, Result};
use prism_data::{RenderOptions, RenderSettings, Scene};
use prism_telemetry::logging::DEFAULT_FILTER;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

/// Settings a host can pin regardless of what the scene carries.
///
/// ```ron
/// (
///     log_filter: "debug",
///     options: Some((aa_samples: 6, progressive_refinement: false)),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Replaces the scene's renderer options.
    pub options: Option<RenderOptions>,
    /// Replaces the scene's render settings.
    pub render: Option<RenderSettings>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_FILTER.to_owned(),
            options: None,
            render: None,
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).context("Failed to parse engine configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine configuration {}", path.display()))?;
        Self::from_ron_str(&source).with_context(|| format!("In {}", path.display()))
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize engine configuration")
    }

    /// The scene as the engine should see it: borrowed when nothing is
    /// overridden.
    pub fn configured_scene<'a>(&self, scene: &'a Scene) -> Cow<'a, Scene> {
        if self.options.is_none() && self.render.is_none() {
            return Cow::Borrowed(scene);
        }
        let mut owned = scene.clone();
        if let Some(options) = &self.options {
            owned.options = options.clone();
        }
        if let Some(render) = &self.render {
            owned.render = render.clone();
        }
        Cow::Owned(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_ron_str("()").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_options_override_the_scene() {
        let config = EngineConfig::from_ron_str("(options: Some((aa_samples: 6)))").unwrap();
        let scene = Scene::new("s");
        let configured = config.configured_scene(&scene);
        assert!(matches!(configured, Cow::Owned(_)));
        assert_eq!(configured.options.aa_samples, 6);
        assert_eq!(
            configured.options.bucket_size,
            RenderOptions::default().bucket_size,
            "Unnamed option fields keep their defaults"
        );
    }

    #[test]
    fn test_no_override_borrows_the_scene() {
        let scene = Scene::new("s");
        assert!(matches!(EngineConfig::default().configured_scene(&scene), Cow::Borrowed(_)));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let err = EngineConfig::from_ron_str("(log_filter: 3)").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"), "got {err:#}");
    }
}
