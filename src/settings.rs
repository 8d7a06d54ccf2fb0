//! Board configuration
//!
//! One record holds every geometry and timing constant. Defaults match `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Geometry and timing for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    // === Geometry ===
    /// Radius of the inner face of every wedge
    pub inner_radius: f32,
    /// Radius of the outer face of every wedge
    pub outer_radius: f32,
    /// Cells per ring
    pub segment_count: u32,
    /// Height of one ring along z
    pub line_height: f32,
    /// Number of rings on the board
    pub ring_count: u32,

    // === Spawning ===
    pub spawn_line: i32,
    pub spawn_segment: i32,

    // === Timing ===
    /// Seconds between gravity steps
    pub fall_interval_secs: f32,

    // === Rules ===
    /// Reject angular shifts into settled cells.
    /// When off, a piece shifted into settled cells lands on the first free line above them.
    pub check_angular_collision: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            inner_radius: INNER_RADIUS,
            outer_radius: OUTER_RADIUS,
            segment_count: SEGMENT_COUNT,
            line_height: LINE_HEIGHT,
            ring_count: RING_COUNT,

            spawn_line: SPAWN_LINE,
            spawn_segment: SPAWN_SEGMENT,

            fall_interval_secs: FALL_INTERVAL_SECS,

            check_angular_collision: true,
        }
    }
}

impl BoardConfig {
    /// Angular width of one segment (radians)
    #[inline]
    pub fn slice_angle(&self) -> f32 {
        std::f32::consts::TAU / self.segment_count as f32
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_count == 0 {
            return Err(ConfigError::Invalid("segment_count must be at least 1".into()));
        }
        if self.ring_count == 0 {
            return Err(ConfigError::Invalid("ring_count must be at least 1".into()));
        }
        if self.spawn_line < 0 || self.spawn_line >= self.ring_count as i32 {
            return Err(ConfigError::Invalid(format!(
                "spawn_line {} outside 0..{}",
                self.spawn_line, self.ring_count
            )));
        }
        if self.spawn_segment < 0 || self.spawn_segment >= self.segment_count as i32 {
            return Err(ConfigError::Invalid(format!(
                "spawn_segment {} outside 0..{}",
                self.spawn_segment, self.segment_count
            )));
        }
        if !(self.inner_radius > 0.0 && self.inner_radius < self.outer_radius) {
            return Err(ConfigError::Invalid(format!(
                "radii must satisfy 0 < inner ({}) < outer ({})",
                self.inner_radius, self.outer_radius
            )));
        }
        if !(self.line_height > 0.0) {
            return Err(ConfigError::Invalid("line_height must be positive".into()));
        }
        if !(self.fall_interval_secs > 0.0) {
            return Err(ConfigError::Invalid("fall_interval_secs must be positive".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded board config from {}", path.display());
        Ok(config)
    }

    /// Write as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Board config saved to {}", path.as_ref().display());
        Ok(())
    }
}
