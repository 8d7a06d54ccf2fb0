//! Ring Drop - A radial falling-block puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, falling piece, movement rules, wedge geometry)
//! - `input`: Key code mapping and command dispatch
//! - `scene`: Seam to an external scene graph, with incremental mesh sync
//! - `settings`: Board configuration record

pub mod error;
pub mod input;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, GameError};
pub use settings::BoardConfig;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the native host (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Board dimensions
    pub const INNER_RADIUS: f32 = 200.0;
    pub const OUTER_RADIUS: f32 = 300.0;
    pub const SEGMENT_COUNT: u32 = 12;
    pub const RING_COUNT: u32 = 10;
    pub const LINE_HEIGHT: f32 = 50.0;

    /// Where new pieces appear
    pub const SPAWN_LINE: i32 = 9;
    pub const SPAWN_SEGMENT: i32 = 0;

    /// Gravity period: 100 frames at 60 fps
    pub const FALL_INTERVAL_SECS: f32 = 100.0 / 60.0;
    /// Maximum gravity steps per tick to prevent a stall from dumping the piece
    pub const MAX_FALL_STEPS: u32 = 4;
}

/// Wrap a segment index into `[0, segment_count)`
#[inline]
pub fn wrap_segment(segment: i32, segment_count: u32) -> i32 {
    segment.rem_euclid(segment_count as i32)
}

/// Convert polar (r, theta) at height z to cartesian (x, y, z)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32, z: f32) -> Vec3 {
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}
