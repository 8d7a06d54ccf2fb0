//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod board;
pub mod piece;
pub mod state;
pub mod tick;
pub mod wedge;

pub use board::{Board, Cell, Color, Ring};
pub use piece::{ActivePiece, CellPos};
pub use state::{GameEvent, GamePhase, GameState, prototype_layout};
pub use tick::{StepOutcome, TickInput, rotate_piece, shift_angular, step_down, tick};
pub use wedge::{Wedge, cell_corners, scene_rotation, view_rotation};
