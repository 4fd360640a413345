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

//! Particle systems: hair strands and emitted points.

/// Identity of a particle system within the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleSystemId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParticleKind {
    #[default]
    Emitter,
    Hair,
}

/// How the particle system is drawn at render time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParticleRender {
    None,
    #[default]
    Halo,
    Line,
    Path,
    Object,
    Group,
    Billboard,
}

/// Where particles are emitted from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmitFrom {
    Vert,
    #[default]
    Face,
    Volume,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurveBasis {
    Bezier,
    BSpline,
    #[default]
    CatmullRom,
    Linear,
}

impl CurveBasis {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bezier => "bezier",
            Self::BSpline => "b-spline",
            Self::CatmullRom => "catmull-rom",
            Self::Linear => "linear",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurveMode {
    #[default]
    Ribbon,
    Thick,
    Oriented,
}

impl CurveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ribbon => "ribbon",
            Self::Thick => "thick",
            Self::Oriented => "oriented",
        }
    }
}

/// Settings of the curves shape produced from hair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSettings {
    pub basis: CurveBasis,
    pub mode: CurveMode,
    pub min_pixel_width: f32,
    /// UV layer sampled on the emitter at each strand root.
    pub uv_map: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointMode {
    #[default]
    Disk,
    Sphere,
    Quad,
}

impl PointMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disk => "disk",
            Self::Sphere => "sphere",
            Self::Quad => "quad",
        }
    }
}

/// Settings of the points shape produced from emitted particles.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSettings {
    pub mode: PointMode,
    /// Only used in quad mode.
    pub aspect: f32,
    /// Only used in quad mode.
    pub rotation: f32,
    pub min_pixel_width: f32,
    pub step_size: f32,
}

impl Default for PointSettings {
    fn default() -> Self {
        Self {
            mode: PointMode::Disk,
            aspect: 1.0,
            rotation: 0.0,
            min_pixel_width: 0.0,
            step_size: 0.0,
        }
    }
}

/// Shared particle settings block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSettings {
    pub kind: ParticleKind,
    pub render_type: ParticleRender,
    /// Strand subdivision exponent.
    pub render_step: u32,
    /// Emit parents alongside children.
    pub use_parent_particles: bool,
    /// Also render the emitting mesh.
    pub use_render_emitter: bool,
    /// 1-based material slot; 0 means no material.
    pub material: usize,
    pub particle_size: f32,
    pub emit_from: EmitFrom,
    pub curves: CurveSettings,
    pub points: PointSettings,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            kind: ParticleKind::Emitter,
            render_type: ParticleRender::Halo,
            render_step: 3,
            use_parent_particles: false,
            use_render_emitter: true,
            material: 1,
            particle_size: 0.05,
            emit_from: EmitFrom::Face,
            curves: CurveSettings::default(),
            points: PointSettings::default(),
        }
    }
}

/// The shape a particle system translates to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleOutput {
    Curves,
    Points,
}

impl ParticleSettings {
    /// Points per strand: `2^render_step + 1`.
    pub fn strand_steps(&self) -> u32 {
        (1u32 << self.render_step.min(31)) + 1
    }

    pub fn output(&self) -> Option<ParticleOutput> {
        match (self.kind, self.render_type) {
            (ParticleKind::Hair, ParticleRender::Path) => Some(ParticleOutput::Curves),
            (
                ParticleKind::Emitter,
                ParticleRender::Halo | ParticleRender::Line | ParticleRender::Path,
            ) => Some(ParticleOutput::Points),
            _ => None,
        }
    }
}

/// A particle system attached to an object through a modifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystem {
    pub id: ParticleSystemId,
    pub name: String,
    pub settings: ParticleSettings,
}
