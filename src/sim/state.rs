//! Game state and core simulation types
//!
//! A `GameState` is one session: the settled board, the falling piece, and the
//! presentational base rotation. Hosts own it and pass it into every operation.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, Color};
use super::piece::{ActivePiece, CellPos};
use crate::error::GameError;
use crate::settings::BoardConfig;

/// Lifecycle of the falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No active piece; the next one is about to appear
    Spawning,
    /// A piece is falling and accepts moves
    Falling,
    /// Spawn was blocked; only `reset` leaves this phase
    GameOver,
}

/// Something the host may want to react to (refresh meshes, play a sound)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { line: i32, segment: i32, color: Color },
    Moved { line: i32, segment: i32 },
    Rotated { base_rotation: u32 },
    Settled { cells: Vec<CellPos>, color: Color },
    RingsCleared(u32),
    GameOver,
}

/// The starting board of the original prototype
pub fn prototype_layout() -> Vec<(i32, i32, Color)> {
    vec![
        (0, 2, Color::Red),
        (0, 3, Color::Blue),
        (0, 5, Color::Blue),
        (1, 2, Color::Green),
    ]
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Palette RNG
    rng: Pcg32,
    pub config: BoardConfig,
    pub board: Board,
    /// Falling piece, absent while spawning or after game over
    pub piece: Option<ActivePiece>,
    pub phase: GamePhase,
    /// View-relative angular offset, in `[0, segment_count)`
    pub base_rotation: u32,
    /// Seconds accumulated toward the next gravity step
    pub fall_accumulator: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub pieces_settled: u64,
    pub rings_cleared: u64,
    /// Pending events (newest last)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session on an empty board and spawn the first piece.
    /// `config` should already pass [`BoardConfig::validate`].
    pub fn new(config: BoardConfig, seed: u64) -> Self {
        let board = Board::new(config.ring_count, config.segment_count);
        let mut state = Self::empty(config, board, seed);
        if let Err(e) = state.spawn_piece() {
            log::warn!("Initial spawn failed: {}", e);
        }
        state
    }

    /// Create a session on a pre-seeded board.
    /// Fails with `SpawnBlocked` if the spawn position is already taken.
    pub fn with_board(config: BoardConfig, board: Board, seed: u64) -> Result<Self, GameError> {
        let mut state = Self::empty(config, board, seed);
        state.spawn_piece()?;
        Ok(state)
    }

    fn empty(config: BoardConfig, board: Board, seed: u64) -> Self {
        log::info!(
            "New session: seed={}, {} rings x {} segments",
            seed,
            board.ring_count(),
            board.segment_count()
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            board,
            piece: None,
            phase: GamePhase::Spawning,
            base_rotation: 0,
            fall_accumulator: 0.0,
            time_ticks: 0,
            pieces_settled: 0,
            rings_cleared: 0,
            events: Vec::new(),
        }
    }

    /// Pick a palette color uniformly at random
    fn random_color(&mut self) -> Color {
        let i = self.rng.random_range(0..Color::ALL.len());
        Color::ALL[i]
    }

    /// Spawn a new piece at the configured spawn position.
    ///
    /// On `SpawnBlocked` the session enters `GameOver`.
    pub fn spawn_piece(&mut self) -> Result<(), GameError> {
        let color = self.random_color();
        let piece = ActivePiece::single(self.config.spawn_line, self.config.spawn_segment, color);

        if piece.overlaps_at(&self.board, piece.line, piece.segment) {
            log::info!(
                "Spawn blocked at line {}, segment {}: game over",
                piece.line,
                piece.segment
            );
            self.piece = None;
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
            return Err(GameError::SpawnBlocked {
                line: piece.line,
                segment: piece.segment,
            });
        }

        log::info!(
            "Spawned {} piece at line {}, segment {}",
            color.as_str(),
            piece.line,
            piece.segment
        );
        self.events.push(GameEvent::Spawned {
            line: piece.line,
            segment: piece.segment,
            color,
        });
        self.piece = Some(piece);
        self.phase = GamePhase::Falling;
        Ok(())
    }

    /// Clear the board and start over (the only exit from `GameOver`)
    pub fn reset(&mut self) -> Result<(), GameError> {
        log::info!("Session reset");
        self.board.clear();
        self.piece = None;
        self.phase = GamePhase::Spawning;
        self.base_rotation = 0;
        self.fall_accumulator = 0.0;
        self.time_ticks = 0;
        self.pieces_settled = 0;
        self.rings_cleared = 0;
        self.events.clear();
        self.spawn_piece()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
