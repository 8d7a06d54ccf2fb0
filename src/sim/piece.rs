//! The falling piece

use serde::{Deserialize, Serialize};

use super::board::{Board, Color};
use crate::wrap_segment;

/// A (line, segment) pair
pub type CellPos = (i32, i32);

/// The currently falling block(s)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    /// Anchor line
    pub line: i32,
    /// Anchor segment, kept in `[0, segment_count)`
    pub segment: i32,
    /// Cell offsets from the anchor (line, segment)
    pub offsets: Vec<CellPos>,
    pub color: Color,
    /// Shape orientation in quarter turns (no shape rotates yet)
    pub orientation: u8,
}

impl ActivePiece {
    /// Single-cell piece at the anchor
    pub fn single(line: i32, segment: i32, color: Color) -> Self {
        Self {
            line,
            segment,
            offsets: vec![(0, 0)],
            color,
            orientation: 0,
        }
    }

    /// Absolute cells at an arbitrary anchor
    pub fn cells_at(&self, line: i32, segment: i32, segment_count: u32) -> Vec<CellPos> {
        self.offsets
            .iter()
            .map(|&(dl, ds)| (line + dl, wrap_segment(segment + ds, segment_count)))
            .collect()
    }

    /// Absolute cells at the current anchor
    pub fn cells(&self, segment_count: u32) -> Vec<CellPos> {
        self.cells_at(self.line, self.segment, segment_count)
    }

    /// True if the piece at (line, segment) overlaps a settled cell
    pub fn overlaps_at(&self, board: &Board, line: i32, segment: i32) -> bool {
        self.cells_at(line, segment, board.segment_count())
            .into_iter()
            .any(|(l, s)| board.is_occupied(l, s))
    }

    /// True if every cell is on the board and free
    pub fn fits_within(&self, board: &Board, line: i32, segment: i32) -> bool {
        let ceiling = board.ring_count() as i32;
        self.cells_at(line, segment, board.segment_count())
            .into_iter()
            .all(|(l, s)| (0..ceiling).contains(&l) && !board.is_occupied(l, s))
    }

    /// True if the piece can occupy (line, segment): no overlap, nothing below the floor
    pub fn fits_at(&self, board: &Board, line: i32, segment: i32) -> bool {
        self.cells_at(line, segment, board.segment_count())
            .into_iter()
            .all(|(l, s)| l >= 0 && !board.is_occupied(l, s))
    }
}
