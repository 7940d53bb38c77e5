//! Same-color connected component matching
//!
//! Search and removal are separate phases: the component is collected against
//! an unmodified grid, then cleared in one pass.

use std::collections::HashSet;

use super::grid::OccupancyGrid;
use super::lattice::{Lattice, Slot};
use crate::consts::MATCH_THRESHOLD;

/// Every occupied slot connected to `start` through same-colored neighbors
///
/// Empty if `start` is empty or out of bounds. Order is discovery order.
pub fn same_color_component(grid: &OccupancyGrid, lattice: &Lattice, start: Slot) -> Vec<Slot> {
    let Some(color) = grid.color_at(start) else {
        return Vec::new();
    };

    let mut seen = HashSet::from([start]);
    let mut stack = vec![start];
    let mut component = Vec::new();

    while let Some(slot) = stack.pop() {
        component.push(slot);
        for neighbor in lattice.neighbors(slot) {
            if grid.color_at(neighbor) == Some(color) && seen.insert(neighbor) {
                stack.push(neighbor);
            }
        }
    }

    component
}

/// Pop the component containing `start` if it has at least three members
///
/// Returns the number of bubbles removed (0 when the component is too small).
pub fn pop_matches(grid: &mut OccupancyGrid, lattice: &Lattice, start: Slot) -> usize {
    let component = same_color_component(grid, lattice, start);
    if component.len() < MATCH_THRESHOLD {
        return 0;
    }
    for &slot in &component {
        grid.clear(slot);
    }
    component.len()
}
