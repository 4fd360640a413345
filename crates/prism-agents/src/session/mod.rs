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

//! The export session: what a final render keeps between the export and
//! the render call, and the lifecycle that guards it.

use anyhow::{bail, Result};
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Lifecycle state of an [`ExportSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Uninitialized,
    Active,
    Cached,
    Reset,
}

/// Data recorded by an export for the render that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    /// Name of the display driver node tiles are delivered through.
    pub driver: String,
    /// Border offset subtracted from every tile origin.
    pub offset: (i32, i32),
    /// Sample levels to retry through when a render fails.
    pub progressive: Option<RangeInclusive<i32>>,
}

/// Renderer state carried across host callbacks.
///
/// Transitions:
///
/// | call     | from                              | to              |
/// |----------|-----------------------------------|-----------------|
/// | `create` | `Uninitialized`, `Cached`, `Reset`| `Active`        |
/// | `cache`  | `Active`                          | `Cached`        |
/// | `reset`  | any                               | `Reset`         |
/// | `free`   | any                               | `Uninitialized` |
#[derive(Debug)]
pub struct ExportSession {
    state: SessionState,
    generation: Option<Uuid>,
    data: Option<SessionData>,
}

impl Default for ExportSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Uninitialized,
            generation: None,
            data: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Id of the current generation, allocated by every `create`.
    pub fn generation(&self) -> Option<Uuid> {
        self.generation
    }

    /// Starts a new generation.
    pub fn create(&mut self) -> Result<Uuid> {
        match self.state {
            SessionState::Uninitialized | SessionState::Cached | SessionState::Reset => {
                let generation = Uuid::new_v4();
                self.generation = Some(generation);
                self.data = None;
                self.state = SessionState::Active;
                log::debug!("session {} created", generation);
                Ok(generation)
            }
            SessionState::Active => bail!("Cannot create a session that is already active"),
        }
    }

    /// Records the export's data on the active generation.
    pub fn bind(&mut self, data: SessionData) -> Result<()> {
        if self.state != SessionState::Active {
            bail!("Cannot bind export data to a {:?} session", self.state);
        }
        self.data = Some(data);
        Ok(())
    }

    /// The bound data of an active or cached session.
    pub fn data(&self) -> Result<&SessionData> {
        match (self.state, &self.data) {
            (SessionState::Active | SessionState::Cached, Some(data)) => Ok(data),
            (state, _) => bail!("No export data in a {:?} session", state),
        }
    }

    /// Keeps the data of a finished render.
    pub fn cache(&mut self) -> Result<()> {
        if self.state != SessionState::Active {
            bail!("Cannot cache a {:?} session", self.state);
        }
        self.state = SessionState::Cached;
        Ok(())
    }

    /// Drops the data, forcing the next render to export again.
    pub fn reset(&mut self) {
        self.data = None;
        self.state = SessionState::Reset;
    }

    pub fn free(&mut self) {
        self.data = None;
        self.generation = None;
        self.state = SessionState::Uninitialized;
    }
}
