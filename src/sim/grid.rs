//! Occupancy grid: the single source of truth for what sits on the board

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lattice::Slot;

/// Bubble colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BubbleColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Teal,
    Orange,
}

impl BubbleColor {
    /// Full palette, in draw order
    pub const ALL: [BubbleColor; 7] = [
        BubbleColor::Red,
        BubbleColor::Blue,
        BubbleColor::Green,
        BubbleColor::Yellow,
        BubbleColor::Purple,
        BubbleColor::Teal,
        BubbleColor::Orange,
    ];

    /// CSS color for renderers
    pub fn hex(self) -> &'static str {
        match self {
            BubbleColor::Red => "#e74c3c",
            BubbleColor::Blue => "#3498db",
            BubbleColor::Green => "#2ecc71",
            BubbleColor::Yellow => "#f1c40f",
            BubbleColor::Purple => "#9b59b6",
            BubbleColor::Teal => "#1abc9c",
            BubbleColor::Orange => "#e67e22",
        }
    }

    /// Uniform pick from a non-empty palette
    pub fn random_from<R: Rng>(palette: &[BubbleColor], rng: &mut R) -> BubbleColor {
        match palette.len() {
            0 => BubbleColor::Red,
            n => palette[rng.random_range(0..n)],
        }
    }
}

/// A bubble resting in the lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub color: BubbleColor,
}

/// Bounded rows x cols map of slot -> optional bubble
///
/// Out-of-bounds reads return `None` and out-of-bounds writes are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Bubble>>,
}

impl OccupancyGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, slot: Slot) -> Option<usize> {
        (slot.row < self.rows && slot.col < self.cols).then(|| slot.row * self.cols + slot.col)
    }

    pub fn in_bounds(&self, slot: Slot) -> bool {
        self.index(slot).is_some()
    }

    pub fn get(&self, slot: Slot) -> Option<Bubble> {
        self.index(slot).and_then(|i| self.cells[i])
    }

    pub fn color_at(&self, slot: Slot) -> Option<BubbleColor> {
        self.get(slot).map(|b| b.color)
    }

    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    /// Place a bubble; returns false (and changes nothing) if out of bounds
    pub fn set(&mut self, slot: Slot, color: BubbleColor) -> bool {
        match self.index(slot) {
            Some(i) => {
                self.cells[i] = Some(Bubble { color });
                true
            }
            None => {
                log::warn!("Ignoring write to out-of-bounds slot {slot:?}");
                false
            }
        }
    }

    /// Empty a slot, returning what was there
    pub fn clear(&mut self, slot: Slot) -> Option<Bubble> {
        let i = self.index(slot)?;
        self.cells[i].take()
    }

    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    /// Occupied slots in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Slot, Bubble)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|b| (Slot::new(i / cols, i % cols), b)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Distinct colors on the board, in palette order
    pub fn colors_present(&self) -> Vec<BubbleColor> {
        let mut seen = [false; BubbleColor::ALL.len()];
        for bubble in self.cells.iter().flatten() {
            seen[bubble.color as usize] = true;
        }
        BubbleColor::ALL
            .iter()
            .zip(seen)
            .filter_map(|(&color, present)| present.then_some(color))
            .collect()
    }

    /// Move every row down by one; the bottom row falls off and row 0 becomes empty
    pub fn shift_down(&mut self) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let keep = (self.rows - 1) * self.cols;
        self.cells.copy_within(0..keep, self.cols);
        self.cells[..self.cols].fill(None);
    }

    /// Fill a row with random colors at the given occupancy probability
    pub fn fill_row<R: Rng>(
        &mut self,
        row: usize,
        fill: f64,
        palette: &[BubbleColor],
        rng: &mut R,
    ) {
        if row >= self.rows {
            return;
        }
        for col in 0..self.cols {
            let cell = if rng.random_bool(fill.clamp(0.0, 1.0)) {
                Some(Bubble {
                    color: BubbleColor::random_from(palette, rng),
                })
            } else {
                None
            };
            self.cells[row * self.cols + col] = cell;
        }
    }

    /// Change the column count, keeping existing bubbles where they still fit
    pub fn resize_cols(&mut self, cols: usize) {
        if cols == self.cols {
            return;
        }
        let mut cells = vec![None; self.rows * cols];
        for row in 0..self.rows {
            for col in 0..self.cols.min(cols) {
                cells[row * cols + col] = self.cells[row * self.cols + col];
            }
        }
        self.cols = cols;
        self.cells = cells;
    }
}
