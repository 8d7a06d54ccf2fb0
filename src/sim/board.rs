//! Board model: rings of settled cells
//!
//! Line 0 is the floor ring; lines count upward. Segments wrap around each ring,
//! so any integer segment is valid and is reduced modulo the segment count.
//! Out-of-range lines read as empty space.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::wrap_segment;

/// Piece/cell color (one per prototype material)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
    Green,
}

impl Color {
    /// Spawn palette
    pub const ALL: [Color; 3] = [Color::Red, Color::Blue, Color::Green];

    /// Diffuse color (0xRRGGBB)
    pub fn rgb(&self) -> u32 {
        match self {
            Color::Red => 0xcc0015,
            Color::Blue => 0x156289,
            Color::Green => 0x158950,
        }
    }

    /// Emissive color (0xRRGGBB)
    pub fn emissive(&self) -> u32 {
        match self {
            Color::Red => 0x402030,
            Color::Blue => 0x072534,
            Color::Green => 0x078820,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Green => "Green",
        }
    }
}

/// A settled cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub color: Color,
}

/// One ring of the board; always exactly `segment_count` slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    cells: Vec<Option<Cell>>,
}

impl Ring {
    fn empty(segment_count: u32) -> Self {
        Self {
            cells: vec![None; segment_count as usize],
        }
    }

    /// All slots occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn cells(&self) -> &[Option<Cell>] {
        &self.cells
    }
}

/// The settled part of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    segment_count: u32,
    /// Ordered floor-first
    rings: Vec<Ring>,
}

impl Board {
    /// Create an empty board
    ///
    /// # Panics
    ///
    /// If `segment_count` is zero. Configs from [`crate::BoardConfig::validate`] never are.
    pub fn new(ring_count: u32, segment_count: u32) -> Self {
        assert!(segment_count > 0, "board needs at least one segment per ring");
        Self {
            segment_count,
            rings: (0..ring_count).map(|_| Ring::empty(segment_count)).collect(),
        }
    }

    /// Create a board with the given cells already settled.
    /// Cells on out-of-range lines are dropped; later duplicates overwrite earlier ones.
    pub fn from_cells(
        ring_count: u32,
        segment_count: u32,
        cells: impl IntoIterator<Item = (i32, i32, Color)>,
    ) -> Self {
        let mut board = Self::new(ring_count, segment_count);
        for (line, segment, color) in cells {
            if let Some(slot) = board.slot_mut(line, segment) {
                *slot = Some(Cell { color });
            }
        }
        board
    }

    pub fn ring_count(&self) -> u32 {
        self.rings.len() as u32
    }

    pub fn segment_count(&self) -> u32 {
        self.segment_count
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    fn ring_index(&self, line: i32) -> Option<usize> {
        if line < 0 || line >= self.rings.len() as i32 {
            return None;
        }
        Some(line as usize)
    }

    fn slot_mut(&mut self, line: i32, segment: i32) -> Option<&mut Option<Cell>> {
        let ring = self.ring_index(line)?;
        let seg = wrap_segment(segment, self.segment_count) as usize;
        Some(&mut self.rings[ring].cells[seg])
    }

    /// Cell at (line, segment); `None` if empty or off the board
    pub fn get(&self, line: i32, segment: i32) -> Option<Cell> {
        let ring = self.ring_index(line)?;
        let seg = wrap_segment(segment, self.segment_count) as usize;
        self.rings[ring].cells[seg]
    }

    /// True if a settled cell exists at (line, segment).
    /// Lines below the floor and above the top ring are open space.
    pub fn is_occupied(&self, line: i32, segment: i32) -> bool {
        self.get(line, segment).is_some()
    }

    /// Check whether a ring is full (false for out-of-range lines)
    pub fn is_ring_full(&self, line: i32) -> bool {
        self.ring_index(line)
            .map(|i| self.rings[i].is_full())
            .unwrap_or(false)
    }

    /// Mark every listed cell occupied with `color`.
    ///
    /// All targets are validated before anything is written, so a failed settle
    /// leaves the board untouched.
    pub fn settle(&mut self, cells: &[(i32, i32)], color: Color) -> Result<(), GameError> {
        for (i, &(line, segment)) in cells.iter().enumerate() {
            let seg = wrap_segment(segment, self.segment_count);
            let duplicate = cells[..i]
                .iter()
                .any(|&(l, s)| l == line && wrap_segment(s, self.segment_count) == seg);
            if self.ring_index(line).is_none() || self.is_occupied(line, seg) || duplicate {
                log::error!("Invalid placement at line {}, segment {}", line, seg);
                return Err(GameError::InvalidPlacement { line, segment: seg });
            }
        }

        for &(line, segment) in cells {
            if let Some(slot) = self.slot_mut(line, segment) {
                *slot = Some(Cell { color });
            }
        }
        Ok(())
    }

    /// Remove every full ring, shifting the rings above it down by one line.
    /// Returns the number of rings removed.
    pub fn clear_full_rings(&mut self) -> u32 {
        let before = self.rings.len();
        self.rings.retain(|ring| !ring.is_full());
        let cleared = before - self.rings.len();

        // Refill at the top so the ring count stays fixed
        for _ in 0..cleared {
            self.rings.push(Ring::empty(self.segment_count));
        }
        cleared as u32
    }

    /// Iterate settled cells as (line, segment, cell), floor first
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.rings.iter().enumerate().flat_map(|(line, ring)| {
            ring.cells
                .iter()
                .enumerate()
                .filter_map(move |(seg, cell)| cell.map(|c| (line as i32, seg as i32, c)))
        })
    }

    /// Remove every settled cell
    pub fn clear(&mut self) {
        for ring in &mut self.rings {
            ring.cells.iter_mut().for_each(|c| *c = None);
        }
    }
}
