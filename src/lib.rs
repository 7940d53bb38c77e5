//! Hexpop - A hexagonal-lattice bubble shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lattice, collisions, matching, ceiling)
//! - `settings`: Data-driven game tuning
//! - `error`: Configuration errors
//!
//! Rendering, input capture and frame scheduling live outside this crate.
//! A presentation layer feeds [`sim::TickInput`] into [`sim::tick`] and draws
//! from [`sim::GameState::snapshot`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Shots fired between ceiling advances
    pub const SHOTS_BEFORE_DROP: u32 = 5;
    /// Lattice depth, deeper than can ever be visible
    pub const MAX_ROWS: usize = 40;
    /// Logical rows visible on a typical surface
    pub const ROWS_VISIBLE: usize = 14;
    /// Minimum matching component size that pops
    pub const MATCH_THRESHOLD: usize = 3;

    /// Projectile speed (device px/s before DPR scaling is applied by layout)
    pub const PROJECTILE_SPEED: f32 = 900.0;
    /// Fixed integration substeps per frame
    pub const SUBSTEPS: u32 = 3;
    /// Per-frame elapsed time clamp (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Aim arc in degrees (screen space, y grows downward)
    pub const AIM_MIN_DEG: f32 = -165.0;
    pub const AIM_MAX_DEG: f32 = -15.0;
    /// Keyboard aim step (radians)
    pub const AIM_NUDGE: f32 = 0.06;

    /// Layout (css px, scaled by device pixel ratio)
    pub const MIN_RADIUS: f32 = 12.0;
    pub const MAX_RADIUS: f32 = 22.0;
    pub const RADIUS_DIVISOR: f32 = 32.0;
    pub const BOARD_MARGIN: f32 = 4.0;
    pub const EMITTER_INSET: f32 = 60.0;
    pub const MIN_COLS: usize = 8;
    pub const MAX_DPR: f32 = 2.0;

    /// Contact distance is 2R minus this slack (css px)
    pub const CONTACT_SLACK: f32 = 0.5;
    /// Nudge below the ceiling used when snapping a ceiling hit
    pub const CEILING_EPSILON: f32 = 0.0001;
}

/// Clamp an aim angle (radians) into the `[min, max]` arc
#[inline]
pub fn clamp_aim(angle: f32, min: f32, max: f32) -> f32 {
    angle.clamp(min, max)
}

/// Unit direction for an angle in screen space (y down)
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
