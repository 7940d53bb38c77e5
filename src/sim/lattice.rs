//! Hexagonal lattice geometry
//!
//! Slots are addressed by (row, col) in an "odd-r" offset layout: odd rows sit
//! one radius to the right of even rows. Rows are stacked half a hex height
//! apart, so the vertical step is `R * sqrt(3) / 2`.
//!
//! Neighbor directions depend on the parity of the row being queried. The
//! offset tables below are symmetric: if B is a neighbor of A, A is a neighbor
//! of B.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// A discrete lattice position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
}

impl Slot {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn parity(self) -> Parity {
        Parity::of(self.row)
    }
}

/// Row parity, selects the neighbor offset table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    #[inline]
    pub fn of(row: usize) -> Self {
        if row & 1 == 1 { Parity::Odd } else { Parity::Even }
    }

    /// (d_row, d_col) offsets of the six neighbors of a slot in a row of this parity
    #[inline]
    pub fn neighbor_offsets(self) -> &'static [(i32, i32); 6] {
        &NEIGHBOR_OFFSETS[self as usize]
    }
}

/// Neighbor offsets indexed by [`Parity`]
const NEIGHBOR_OFFSETS: [[(i32, i32); 6]; 2] = [
    // Even rows: the rows above and below are shifted right, so reach left
    [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)],
    // Odd rows: the rows above and below are shifted left, so reach right
    [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)],
];

/// Surface-derived layout, recomputed on resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
    /// Bubble radius (device px)
    pub radius: f32,
    pub margin: f32,
    pub left_pad: f32,
    /// Top pad with the ceiling fully retracted
    pub base_top_pad: f32,
    pub cols: usize,
    pub emitter: Vec2,
    /// Contact distance is `2R - contact_slack`
    pub contact_slack: f32,
}

impl Layout {
    /// Derive layout from surface size and device pixel ratio
    pub fn for_surface(width: f32, height: f32, dpr: f32, settings: &Settings) -> Self {
        let dpr = if dpr.is_finite() { dpr.clamp(1.0, settings.max_dpr.max(1.0)) } else { 1.0 };
        let width = width.max(0.0);
        let height = height.max(0.0);
        let margin = settings.board_margin * dpr;
        let radius = (width.min(height) / settings.radius_divisor)
            .floor()
            .clamp(settings.min_radius * dpr, settings.max_radius * dpr);
        let cols = ((width - 2.0 * margin - radius) / (2.0 * radius)).floor();
        let cols = if cols.is_finite() && cols > 0.0 { cols as usize } else { 0 };

        Self {
            width,
            height,
            dpr,
            radius,
            margin,
            left_pad: radius + margin,
            base_top_pad: radius + margin,
            cols: cols.max(settings.min_cols),
            emitter: Vec2::new(width * 0.5, height - settings.emitter_inset * dpr),
            contact_slack: settings.contact_slack * dpr,
        }
    }

    /// Full hex height `R * sqrt(3)`
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.radius * 3.0_f32.sqrt()
    }

    /// Lattice for the given ceiling offset
    pub fn lattice(&self, rows: usize, ceiling_offset: f32) -> Lattice {
        Lattice {
            radius: self.radius,
            left_pad: self.left_pad,
            top_pad: self.base_top_pad + ceiling_offset,
            rows,
            cols: self.cols,
        }
    }

    /// Horizontal reflection bounds for projectile centers
    pub fn wall_bounds(&self) -> (f32, f32) {
        (
            self.left_pad + self.radius,
            self.width - self.left_pad - self.radius,
        )
    }
}

/// Coordinate mapping for one frame's lattice placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    pub radius: f32,
    pub left_pad: f32,
    /// Y of row 0 centers; also the ceiling boundary
    pub top_pad: f32,
    pub rows: usize,
    pub cols: usize,
}

impl Lattice {
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.radius * 3.0_f32.sqrt()
    }

    /// Vertical distance between adjacent rows
    #[inline]
    pub fn row_step(&self) -> f32 {
        self.row_height() * 0.5
    }

    #[inline]
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as u64) < self.rows as u64 && (col as u64) < self.cols as u64
    }

    #[inline]
    pub fn contains(&self, slot: Slot) -> bool {
        slot.row < self.rows && slot.col < self.cols
    }

    /// Signed offset from a slot, bounds-checked
    pub fn offset(&self, slot: Slot, d_row: i32, d_col: i32) -> Option<Slot> {
        let row = slot.row as i64 + d_row as i64;
        let col = slot.col as i64 + d_col as i64;
        self.in_bounds(row, col).then(|| Slot::new(row as usize, col as usize))
    }

    /// Center of a slot
    pub fn slot_to_position(&self, slot: Slot) -> Vec2 {
        let stagger = match slot.parity() {
            Parity::Odd => self.radius,
            Parity::Even => 0.0,
        };
        Vec2::new(
            self.left_pad + slot.col as f32 * (2.0 * self.radius) + stagger,
            self.top_pad + slot.row as f32 * self.row_step(),
        )
    }

    /// Nearest in-bounds slot to a point
    ///
    /// Approximates row and column from the inverse formulas, then searches
    /// +-2 rows and columns for the minimum Euclidean distance. The first
    /// minimum found (row-major, top-left first) wins ties. Returns `None`
    /// only if the whole search window is out of bounds.
    pub fn position_to_slot(&self, pos: Vec2) -> Option<Slot> {
        if !pos.is_finite() {
            return None;
        }
        // Far-away points only need to land just outside the grid
        let row_approx = ((pos.y - self.top_pad) / self.row_step())
            .round()
            .clamp(0.0, self.rows as f32 + 2.0) as i64;
        let stagger = match Parity::of(row_approx as usize) {
            Parity::Odd => self.radius,
            Parity::Even => 0.0,
        };
        let col_approx = ((pos.x - self.left_pad - stagger) / (2.0 * self.radius))
            .round()
            .clamp(-3.0, self.cols as f32 + 2.0) as i64;

        let mut best: Option<(Slot, f32)> = None;
        for d_row in -2..=2 {
            for d_col in -2..=2 {
                let (row, col) = (row_approx + d_row, col_approx + d_col);
                if !self.in_bounds(row, col) {
                    continue;
                }
                let slot = Slot::new(row as usize, col as usize);
                let d2 = pos.distance_squared(self.slot_to_position(slot));
                if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
                    best = Some((slot, d2));
                }
            }
        }
        best.map(|(slot, _)| slot)
    }

    /// The six raw neighbor addresses of a slot, before any bounds filtering
    pub fn raw_neighbors(&self, slot: Slot) -> [(i64, i64); 6] {
        let offsets = slot.parity().neighbor_offsets();
        offsets.map(|(dr, dc)| (slot.row as i64 + dr as i64, slot.col as i64 + dc as i64))
    }

    /// In-bounds neighbors of a slot
    pub fn neighbors(&self, slot: Slot) -> impl Iterator<Item = Slot> + '_ {
        slot.parity()
            .neighbor_offsets()
            .iter()
            .filter_map(move |&(dr, dc)| self.offset(slot, dr, dc))
    }

    /// In-bounds slots within +-2 rows and columns of `center`
    pub fn window(&self, center: Slot) -> impl Iterator<Item = Slot> + '_ {
        (-2..=2).flat_map(move |dr| (-2..=2).filter_map(move |dc| self.offset(center, dr, dc)))
    }
}
