//! Movement rules and the gravity tick
//!
//! Angular shifts are collision-checked only when `check_angular_collision` is set.
//! A blocked downward step settles the piece, clears full rings and spawns the next one.
//! If an unchecked shift left the piece inside settled cells, it settles on the
//! first free line above them.

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_FALL_STEPS;
use crate::error::GameError;
use crate::wrap_segment;

/// Commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Shift the piece one segment up (+1); the view turns the other way
    pub rotate_left: bool,
    /// Shift the piece one segment down (-1)
    pub rotate_right: bool,
    /// Step the piece down one line
    pub soft_drop: bool,
}

/// What a `step_down` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The piece moved to `line`
    Moved { line: i32 },
    /// The piece could not move; it settled and a new piece spawned
    Settled { rings_cleared: u32 },
    /// There was no piece; one was spawned instead
    Spawned,
}

/// Shift the piece `delta` segments around the ring.
///
/// The base rotation counter-rotates by the same amount so the piece stays in
/// front of the viewer. Returns `Ok(false)` if the shift was rejected.
pub fn shift_angular(state: &mut GameState, delta: i32) -> Result<bool, GameError> {
    if state.phase == GamePhase::GameOver {
        return Err(GameError::GameOver);
    }
    let segment_count = state.config.segment_count;
    let Some(piece) = state.piece.as_mut() else {
        return Ok(false);
    };

    let segment = wrap_segment(piece.segment + delta, segment_count);
    if state.config.check_angular_collision && !piece.fits_at(&state.board, piece.line, segment) {
        log::warn!(
            "Angular shift blocked at line {}, segment {}",
            piece.line,
            segment
        );
        return Ok(false);
    }

    piece.segment = segment;
    let (line, segment) = (piece.line, piece.segment);
    state.base_rotation =
        wrap_segment(state.base_rotation as i32 - delta, segment_count) as u32;

    log::debug!(
        "Piece at line {}, segment {} (base rotation {})",
        line,
        segment,
        state.base_rotation
    );
    state.events.push(GameEvent::Moved { line, segment });
    state.events.push(GameEvent::Rotated {
        base_rotation: state.base_rotation,
    });
    Ok(true)
}

/// Move the piece one line toward the floor, or settle it if it cannot move
pub fn step_down(state: &mut GameState) -> Result<StepOutcome, GameError> {
    match state.phase {
        GamePhase::GameOver => return Err(GameError::GameOver),
        GamePhase::Spawning => {
            state.spawn_piece()?;
            return Ok(StepOutcome::Spawned);
        }
        GamePhase::Falling => {}
    }
    let Some(piece) = state.piece.as_mut() else {
        state.spawn_piece()?;
        return Ok(StepOutcome::Spawned);
    };

    if piece.fits_at(&state.board, piece.line - 1, piece.segment) {
        piece.line -= 1;
        let (line, segment) = (piece.line, piece.segment);
        log::debug!("Piece at line {}, segment {}", line, segment);
        state.events.push(GameEvent::Moved { line, segment });
        return Ok(StepOutcome::Moved { line });
    }

    // Lift out of settled cells left behind by an unchecked angular shift
    let ceiling = state.board.ring_count() as i32;
    let mut line = piece.line;
    while line < ceiling && !piece.fits_within(&state.board, line, piece.segment) {
        line += 1;
    }
    if line >= ceiling {
        log::info!("No room to settle at segment {}: game over", piece.segment);
        state.piece = None;
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        return Err(GameError::GameOver);
    }
    piece.line = line;

    let cells = piece.cells(state.config.segment_count);
    let color = piece.color;
    state.board.settle(&cells, color)?;
    state.piece = None;
    state.phase = GamePhase::Spawning;
    state.pieces_settled += 1;
    log::info!("Settled {} piece at {:?}", color.as_str(), cells);
    state.events.push(GameEvent::Settled { cells, color });

    let rings_cleared = state.board.clear_full_rings();
    if rings_cleared > 0 {
        state.rings_cleared += rings_cleared as u64;
        log::info!(
            "Cleared {} ring(s), {} total",
            rings_cleared,
            state.rings_cleared
        );
        state.events.push(GameEvent::RingsCleared(rings_cleared));
    }

    state.spawn_piece()?;
    Ok(StepOutcome::Settled { rings_cleared })
}

/// Rotate the piece's own shape
pub fn rotate_piece(state: &mut GameState) -> Result<(), GameError> {
    if state.phase == GamePhase::GameOver {
        return Err(GameError::GameOver);
    }
    log::warn!("Piece rotation not implemented");
    Err(GameError::NotImplemented("piece rotation"))
}

/// Advance the session by `dt` seconds.
///
/// One-shot commands apply first, then gravity steps once per elapsed
/// `fall_interval_secs`. A finished game ignores ticks.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), GameError> {
    if state.phase == GamePhase::GameOver {
        return Ok(());
    }

    state.time_ticks += 1;

    if input.rotate_left {
        shift_angular(state, 1)?;
    }
    if input.rotate_right {
        shift_angular(state, -1)?;
    }
    if input.soft_drop {
        step_down(state)?;
    }

    if state.phase == GamePhase::Spawning {
        state.spawn_piece()?;
    }

    let interval = state.config.fall_interval_secs;
    state.fall_accumulator += dt.max(0.0);

    let mut steps = 0;
    while state.fall_accumulator >= interval && steps < MAX_FALL_STEPS {
        state.fall_accumulator -= interval;
        steps += 1;
        step_down(state)?;
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    // Drop backlog beyond the step cap
    if state.fall_accumulator >= interval {
        state.fall_accumulator = 0.0;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BoardConfig;
    use crate::sim::board::{Board, Cell, Color};
    use crate::sim::piece::ActivePiece;
    use proptest::prelude::*;

    fn state_with_piece(board: Board, line: i32, segment: i32, color: Color) -> GameState {
        let mut state = GameState::with_board(BoardConfig::default(), board, 12345)
            .expect("spawn is clear");
        state.piece = Some(ActivePiece::single(line, segment, color));
        state.events.clear();
        state
    }

    #[test]
    fn test_fall_to_floor_then_settle() {
        let mut state = state_with_piece(Board::new(10, 12), 9, 0, Color::Red);

        for expected in (0..9).rev() {
            assert_eq!(
                step_down(&mut state),
                Ok(StepOutcome::Moved { line: expected })
            );
        }
        assert_eq!(state.piece.as_ref().map(|p| p.line), Some(0));
        assert!(!state.board.is_occupied(0, 0));

        assert_eq!(
            step_down(&mut state),
            Ok(StepOutcome::Settled { rings_cleared: 0 })
        );
        assert_eq!(state.board.get(0, 0), Some(Cell { color: Color::Red }));
        assert_eq!(state.board.occupied_cells().count(), 1);
        assert_eq!(state.pieces_settled, 1);

        let next = state.piece.as_ref().expect("new piece");
        assert_eq!((next.line, next.segment), (9, 0));
        assert_eq!(state.phase, GamePhase::Falling);
    }

    #[test]
    fn test_land_on_settled_cell() {
        let board = Board::from_cells(10, 12, [(3, 4, Color::Green)]);
        let mut state = state_with_piece(board, 6, 4, Color::Blue);

        assert_eq!(step_down(&mut state), Ok(StepOutcome::Moved { line: 5 }));
        assert_eq!(step_down(&mut state), Ok(StepOutcome::Moved { line: 4 }));
        assert_eq!(
            step_down(&mut state),
            Ok(StepOutcome::Settled { rings_cleared: 0 })
        );
        assert_eq!(state.board.get(4, 4), Some(Cell { color: Color::Blue }));
        assert_eq!(state.board.get(3, 4), Some(Cell { color: Color::Green }));
    }

    #[test]
    fn test_settle_completes_ring() {
        let mut cells: Vec<_> = (0..12)
            .filter(|&s| s != 5)
            .map(|s| (0, s, Color::Blue))
            .collect();
        cells.push((1, 8, Color::Green));
        let board = Board::from_cells(10, 12, cells);
        let mut state = state_with_piece(board, 0, 5, Color::Red);

        assert_eq!(
            step_down(&mut state),
            Ok(StepOutcome::Settled { rings_cleared: 1 })
        );
        assert_eq!(state.rings_cleared, 1);
        assert_eq!(state.board.get(0, 8), Some(Cell { color: Color::Green }));
        assert_eq!(state.board.occupied_cells().count(), 1);
        assert!(state.events.contains(&GameEvent::RingsCleared(1)));
    }

    #[test]
    fn test_settle_then_spawn_blocked() {
        let board = Board::from_cells(10, 12, (0..9).map(|l| (l, 0, Color::Green)));
        let mut state = state_with_piece(board, 9, 0, Color::Red);

        assert_eq!(
            step_down(&mut state),
            Err(GameError::SpawnBlocked { line: 9, segment: 0 })
        );
        assert!(state.board.is_occupied(9, 0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(step_down(&mut state), Err(GameError::GameOver));
        assert_eq!(shift_angular(&mut state, 1), Err(GameError::GameOver));
    }

    #[test]
    fn test_shift_down_then_up() {
        let mut state = state_with_piece(Board::new(10, 12), 9, 0, Color::Red);

        assert_eq!(shift_angular(&mut state, -1), Ok(true));
        assert_eq!(state.piece.as_ref().map(|p| p.segment), Some(11));
        assert_eq!(state.base_rotation, 1);

        assert_eq!(shift_angular(&mut state, 1), Ok(true));
        assert_eq!(state.piece.as_ref().map(|p| p.segment), Some(0));
        assert_eq!(state.base_rotation, 0);
    }

    #[test]
    fn test_shift_checked_by_default() {
        let board = Board::from_cells(10, 12, [(5, 1, Color::Red)]);
        let mut state = state_with_piece(board, 5, 0, Color::Blue);

        assert_eq!(shift_angular(&mut state, 1), Ok(false));
        assert_eq!(state.piece.as_ref().map(|p| p.segment), Some(0));
        assert_eq!(state.base_rotation, 0);
        assert_eq!(shift_angular(&mut state, -1), Ok(true));
    }

    #[test]
    fn test_unchecked_shift_ignores_settled_cells() {
        let board = Board::from_cells(10, 12, [(5, 1, Color::Red)]);
        let mut state = state_with_piece(board, 5, 0, Color::Blue);
        state.config.check_angular_collision = false;

        assert_eq!(shift_angular(&mut state, 1), Ok(true));
        assert_eq!(state.piece.as_ref().map(|p| p.segment), Some(1));
    }

    #[test]
    fn test_unchecked_shift_into_settled_cell_then_land() {
        let board = Board::from_cells(10, 12, crate::sim::prototype_layout());
        let mut state = state_with_piece(board, 0, 4, Color::Green);
        state.config.check_angular_collision = false;

        // (0, 3) is a settled Blue cell
        assert_eq!(shift_angular(&mut state, -1), Ok(true));
        assert_eq!(
            step_down(&mut state),
            Ok(StepOutcome::Settled { rings_cleared: 0 })
        );
        assert_eq!(state.board.get(0, 3), Some(Cell { color: Color::Blue }));
        assert_eq!(state.board.get(1, 3), Some(Cell { color: Color::Green }));
        assert_eq!(state.phase, GamePhase::Falling);

        // Gravity keeps working afterwards
        let interval = state.config.fall_interval_secs;
        assert_eq!(tick(&mut state, &TickInput::default(), interval), Ok(()));
        assert_eq!(state.piece.as_ref().map(|p| p.line), Some(8));
    }

    #[test]
    fn test_unchecked_shift_into_full_column_ends_game() {
        let board = Board::from_cells(10, 12, (0..10).map(|l| (l, 3, Color::Red)));
        let mut state = state_with_piece(board, 9, 4, Color::Blue);
        state.config.check_angular_collision = false;

        assert_eq!(shift_angular(&mut state, -1), Ok(true));
        assert_eq!(step_down(&mut state), Err(GameError::GameOver));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.piece.is_none());
        assert_eq!(state.board.get(9, 3), Some(Cell { color: Color::Red }));
    }

    #[test]
    fn test_rotate_piece_not_implemented() {
        let mut state = GameState::new(BoardConfig::default(), 1);
        let before = state.piece.clone();
        assert_eq!(
            rotate_piece(&mut state),
            Err(GameError::NotImplemented("piece rotation"))
        );
        assert_eq!(state.piece, before);
    }

    #[test]
    fn test_gravity_uses_wall_clock() {
        let mut state = GameState::new(BoardConfig::default(), 99);
        let interval = state.config.fall_interval_secs;
        let input = TickInput::default();

        // Just short of one interval: no fall
        tick(&mut state, &input, interval * 0.9).expect("tick");
        assert_eq!(state.piece.as_ref().map(|p| p.line), Some(9));

        tick(&mut state, &input, interval * 0.2).expect("tick");
        assert_eq!(state.piece.as_ref().map(|p| p.line), Some(8));
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_gravity_frame_rate_independent() {
        let mut slow = GameState::new(BoardConfig::default(), 5);
        let mut fast = GameState::new(BoardConfig::default(), 5);
        let input = TickInput::default();

        for _ in 0..60 {
            tick(&mut slow, &input, 1.0 / 30.0).expect("tick");
        }
        for _ in 0..240 {
            tick(&mut fast, &input, 1.0 / 120.0).expect("tick");
        }
        assert_eq!(
            slow.piece.as_ref().map(|p| p.line),
            fast.piece.as_ref().map(|p| p.line)
        );
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut state = GameState::new(BoardConfig::default(), 5);
        let interval = state.config.fall_interval_secs;
        tick(&mut state, &TickInput::default(), interval * 100.0).expect("tick");
        assert_eq!(
            state.piece.as_ref().map(|p| p.line),
            Some(9 - MAX_FALL_STEPS as i32)
        );
        assert_eq!(state.fall_accumulator, 0.0);
    }

    #[test]
    fn test_tick_applies_commands() {
        let mut state = GameState::new(BoardConfig::default(), 5);
        let input = TickInput {
            rotate_right: true,
            soft_drop: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0).expect("tick");
        let piece = state.piece.as_ref().expect("piece");
        assert_eq!((piece.line, piece.segment), (8, 11));
        assert_eq!(state.base_rotation, 1);

        let input = TickInput {
            rotate_left: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0).expect("tick");
        assert_eq!(state.piece.as_ref().map(|p| p.segment), Some(0));
        assert_eq!(state.base_rotation, 0);
    }

    #[test]
    fn test_tick_after_game_over_is_noop() {
        let mut state = GameState::new(BoardConfig::default(), 5);
        state.phase = GamePhase::GameOver;
        state.piece = None;
        let input = TickInput {
            soft_drop: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input, 10.0), Ok(()));
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(BoardConfig::default(), 2024);
        let mut b = GameState::new(BoardConfig::default(), 2024);
        let drop = TickInput {
            soft_drop: true,
            ..Default::default()
        };
        for i in 0..200 {
            let input = if i % 3 == 0 {
                TickInput {
                    rotate_left: true,
                    soft_drop: true,
                    ..Default::default()
                }
            } else {
                drop.clone()
            };
            let ra = tick(&mut a, &input, 1.0 / 60.0);
            let rb = tick(&mut b, &input, 1.0 / 60.0);
            assert_eq!(ra, rb);
        }
        assert_eq!(a.board, b.board);
        assert_eq!(a.piece, b.piece);
        assert_eq!(a.base_rotation, b.base_rotation);
    }

    proptest! {
        #[test]
        fn prop_step_down_decrements_until_blocked(line in 0i32..10, segment in 0i32..12) {
            let mut state = state_with_piece(Board::new(10, 12), line, segment, Color::Green);
            for expected in (0..line).rev() {
                prop_assert_eq!(step_down(&mut state), Ok(StepOutcome::Moved { line: expected }));
            }
            prop_assert_eq!(step_down(&mut state), Ok(StepOutcome::Settled { rings_cleared: 0 }));
            prop_assert_eq!(state.pieces_settled, 1);
            prop_assert!(state.board.is_occupied(0, segment));
        }

        #[test]
        fn prop_base_rotation_stays_in_range(shifts in proptest::collection::vec(-30i32..30, 0..40)) {
            let mut state = GameState::new(BoardConfig::default(), 3);
            for d in shifts {
                shift_angular(&mut state, d).expect("falling");
                prop_assert!(state.base_rotation < 12);
                let seg = state.piece.as_ref().map(|p| p.segment).unwrap_or_default();
                prop_assert_eq!((seg + state.base_rotation as i32) % 12, 0);
            }
        }
    }
}
