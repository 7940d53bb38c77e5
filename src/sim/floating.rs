//! Floating cluster removal
//!
//! A bubble stays on the board only while some chain of occupied neighbors
//! (any color) links it to row 0. Reachability is computed on the unmodified
//! grid before anything is cleared.

use std::collections::VecDeque;

use super::grid::OccupancyGrid;
use super::lattice::{Lattice, Slot};

/// Occupied slots with no path to row 0, in row-major order
pub fn floating_slots(grid: &OccupancyGrid, lattice: &Lattice) -> Vec<Slot> {
    let cols = grid.cols();
    let mut visited = vec![false; grid.rows() * cols];
    let mut queue = VecDeque::new();

    for col in 0..cols {
        let slot = Slot::new(0, col);
        if grid.is_occupied(slot) {
            visited[col] = true;
            queue.push_back(slot);
        }
    }

    while let Some(slot) = queue.pop_front() {
        for neighbor in lattice.neighbors(slot) {
            let idx = neighbor.row * cols + neighbor.col;
            if grid.is_occupied(neighbor) && !visited[idx] {
                visited[idx] = true;
                queue.push_back(neighbor);
            }
        }
    }

    grid.occupied()
        .filter(|(slot, _)| !visited[slot.row * cols + slot.col])
        .map(|(slot, _)| slot)
        .collect()
}

/// Clear every floating bubble, returning how many fell
pub fn drop_floating(grid: &mut OccupancyGrid, lattice: &Lattice) -> usize {
    let floating = floating_slots(grid, lattice);
    for &slot in &floating {
        grid.clear(slot);
    }
    floating.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::BubbleColor;

    fn setup() -> (OccupancyGrid, Lattice) {
        let lattice = Lattice {
            radius: 10.0,
            left_pad: 14.0,
            top_pad: 14.0,
            rows: 10,
            cols: 6,
        };
        (OccupancyGrid::new(lattice.rows, lattice.cols), lattice)
    }

    #[test]
    fn test_anchored_chain_stays() {
        let (mut grid, lattice) = setup();
        // (0,2) -> (1,1) -> (2,1) -> (3,0): alternating parity chain
        for slot in [Slot::new(0, 2), Slot::new(1, 1), Slot::new(2, 1), Slot::new(3, 0)] {
            grid.set(slot, BubbleColor::Red);
        }
        assert_eq!(drop_floating(&mut grid, &lattice), 0);
        assert_eq!(grid.occupied_count(), 4);
    }

    #[test]
    fn test_detached_cluster_falls() {
        let (mut grid, lattice) = setup();
        grid.set(Slot::new(0, 0), BubbleColor::Blue);
        grid.set(Slot::new(4, 3), BubbleColor::Green);
        grid.set(Slot::new(4, 4), BubbleColor::Yellow);
        assert_eq!(drop_floating(&mut grid, &lattice), 2);
        assert_eq!(grid.occupied_count(), 1);
        assert!(grid.is_occupied(Slot::new(0, 0)));
    }

    #[test]
    fn test_clearing_row_zero_drops_dependents() {
        let (mut grid, lattice) = setup();
        for col in 0..lattice.cols {
            grid.set(Slot::new(0, col), BubbleColor::Teal);
        }
        grid.set(Slot::new(1, 2), BubbleColor::Red);
        grid.set(Slot::new(2, 2), BubbleColor::Orange);
        assert_eq!(drop_floating(&mut grid, &lattice), 0);

        for col in 0..lattice.cols {
            grid.clear(Slot::new(0, col));
        }
        assert_eq!(drop_floating(&mut grid, &lattice), 2);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_empty_grid() {
        let (mut grid, lattice) = setup();
        assert!(floating_slots(&grid, &lattice).is_empty());
        assert_eq!(drop_floating(&mut grid, &lattice), 0);
    }
}
