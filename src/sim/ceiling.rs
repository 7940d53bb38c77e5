//! Creeping ceiling
//!
//! Every few shots the ceiling moves half a hex height toward the emitter.
//! Once a full hex height has built up the offset is converted into a real
//! row: the grid shifts down and a fresh row is generated at the top.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{BubbleColor, OccupancyGrid};

/// Result of one ceiling advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CeilingAdvance {
    /// Only the sub-row offset grew
    Crept,
    /// A full row was inserted at the top
    RowInserted,
}

/// Sub-row compression accumulator, kept in `[0, row_height)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ceiling {
    offset: f32,
}

impl Ceiling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels the ceiling has crept past the last materialized row
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Boundary y for a given base top pad
    pub fn boundary(&self, base_top_pad: f32) -> f32 {
        base_top_pad + self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Advance by half a row, inserting a new top row when a full row accrues
    pub fn advance<R: Rng>(
        &mut self,
        grid: &mut OccupancyGrid,
        row_height: f32,
        fill: f64,
        palette: &[BubbleColor],
        rng: &mut R,
    ) -> CeilingAdvance {
        self.offset += row_height * 0.5;
        if self.offset < row_height {
            return CeilingAdvance::Crept;
        }

        grid.shift_down();
        grid.fill_row(0, fill, palette, rng);
        self.offset = (self.offset - row_height).max(0.0);
        CeilingAdvance::RowInserted
    }

    /// Rescale the offset after the row height changed (surface resize)
    ///
    /// The offset is kept as a whole number of half-row steps so the next
    /// advances still land exactly on a full row.
    pub fn rescale(&mut self, old_row_height: f32, new_row_height: f32) {
        if old_row_height > 0.0 && new_row_height > 0.0 {
            let halves = (self.offset / (old_row_height * 0.5)).round().clamp(0.0, 1.0);
            self.offset = halves * (new_row_height * 0.5);
        } else {
            self.offset = 0.0;
        }
    }
}
