//! Wedge geometry for board cells
//!
//! Each (line, segment) cell is an annular wedge in cylindrical space:
//! - radial extent: inner_radius..outer_radius
//! - angular extent: segment * slice_angle..(segment + 1) * slice_angle
//! - height: line * line_height..(line + 1) * line_height

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;
use crate::settings::BoardConfig;

/// Eight corners of one cell:
/// outer-start, outer-end, inner-start, inner-end at the bottom face, then the same at the top.
/// Convex-hull mesh builders depend on this order.
pub fn cell_corners(config: &BoardConfig, line: i32, segment: i32) -> [Vec3; 8] {
    Wedge::for_cell(config, line, segment).corners()
}

/// Z-rotation applied to every wedge for the current base rotation
pub fn scene_rotation(config: &BoardConfig, base_rotation: u32) -> f32 {
    base_rotation as f32 * config.slice_angle()
}

/// Z-rotation of the whole scene that brings the spawn segment to the front
pub fn view_rotation(config: &BoardConfig) -> f32 {
    -std::f32::consts::FRAC_PI_2 - (config.spawn_segment as f32 + 0.5) * config.slice_angle()
}

/// A wedge in cylindrical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wedge {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Start angle (radians); not normalized, so segment 13 of 12 is one full turn on
    pub theta_start: f32,
    pub theta_end: f32,
    pub z_bottom: f32,
    pub z_top: f32,
}

impl Wedge {
    pub fn for_cell(config: &BoardConfig, line: i32, segment: i32) -> Self {
        let slice = config.slice_angle();
        Self {
            inner_radius: config.inner_radius,
            outer_radius: config.outer_radius,
            theta_start: segment as f32 * slice,
            theta_end: (segment + 1) as f32 * slice,
            z_bottom: line as f32 * config.line_height,
            z_top: (line + 1) as f32 * config.line_height,
        }
    }

    /// Corner points in mesh-builder order
    pub fn corners(&self) -> [Vec3; 8] {
        let face = |z: f32| {
            [
                polar_to_cartesian(self.outer_radius, self.theta_start, z),
                polar_to_cartesian(self.outer_radius, self.theta_end, z),
                polar_to_cartesian(self.inner_radius, self.theta_start, z),
                polar_to_cartesian(self.inner_radius, self.theta_end, z),
            ]
        };
        let [b0, b1, b2, b3] = face(self.z_bottom);
        let [t0, t1, t2, t3] = face(self.z_top);
        [b0, b1, b2, b3, t0, t1, t2, t3]
    }
}
