//! Key mapping from host key codes to game commands.
//!
//! Key codes follow the DOM `KeyboardEvent.code` names.

use crate::error::GameError;
use crate::sim::{GameState, StepOutcome, rotate_piece, shift_angular, step_down};

/// Discrete commands a player can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Shift the piece to the next segment (+1) while the view turns back one
    RotateLeft,
    /// Shift the piece to the previous segment (-1)
    RotateRight,
    SoftDrop,
    /// Rotate the piece's own shape
    RotatePiece,
}

/// Result of a successfully applied command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Angular shift; `false` if it was rejected
    Shifted(bool),
    Stepped(StepOutcome),
}

/// Map a key code to a command
pub fn command_for_key(code: &str) -> Option<Command> {
    match code {
        "KeyA" | "ArrowLeft" => Some(Command::RotateLeft),
        "KeyD" | "ArrowRight" => Some(Command::RotateRight),
        "KeyS" | "ArrowDown" => Some(Command::SoftDrop),
        "KeyW" | "ArrowUp" => Some(Command::RotatePiece),
        _ => None,
    }
}

/// Apply a command to the session
pub fn apply_command(state: &mut GameState, command: Command) -> Result<CommandOutcome, GameError> {
    match command {
        Command::RotateLeft => shift_angular(state, 1).map(CommandOutcome::Shifted),
        Command::RotateRight => shift_angular(state, -1).map(CommandOutcome::Shifted),
        Command::SoftDrop => step_down(state).map(CommandOutcome::Stepped),
        Command::RotatePiece => rotate_piece(state).map(|()| CommandOutcome::Shifted(false)),
    }
}

/// Map and apply in one go; unknown keys are ignored
pub fn handle_key(state: &mut GameState, code: &str) -> Option<Result<CommandOutcome, GameError>> {
    command_for_key(code).map(|command| apply_command(state, command))
}
