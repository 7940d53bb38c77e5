//! Collision detection and lattice placement
//!
//! A projectile in flight reflects off the side walls, and stops when it
//! touches the ceiling or comes within `2R - slack` of a resting bubble. On
//! contact it is snapped into the nearest free lattice slot.

use glam::Vec2;

use super::grid::{BubbleColor, OccupancyGrid};
use super::lattice::{Lattice, Slot};

/// What the projectile touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Top edge crossed the ceiling boundary
    Ceiling,
    /// Within contact distance of the bubble in this slot
    Bubble(Slot),
}

/// A detected contact and the slot the projectile should snap into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub kind: ContactKind,
    pub target: Slot,
}

/// Reflect a projectile off the side walls
///
/// `bounds` are the leftmost and rightmost allowed center x. A center past a
/// bound is mirrored back across it and the horizontal velocity is pointed
/// away from that wall. Vertical motion is untouched. Returns true on bounce.
pub fn reflect_walls(pos: &mut Vec2, vel: &mut Vec2, bounds: (f32, f32)) -> bool {
    let (left, right) = bounds;
    if pos.x <= left {
        pos.x = left + (left - pos.x);
        vel.x = vel.x.abs();
        true
    } else if pos.x >= right {
        pos.x = right - (pos.x - right);
        vel.x = -vel.x.abs();
        true
    } else {
        false
    }
}

/// Nearest empty slot among the six neighbors of `slot` and `slot` itself
///
/// Candidates are checked in neighbor-table order followed by `slot`; on
/// equal distance the first candidate checked wins.
pub fn nearest_empty_neighbor(
    grid: &OccupancyGrid,
    lattice: &Lattice,
    pos: Vec2,
    slot: Slot,
) -> Option<Slot> {
    let mut best: Option<(Slot, f32)> = None;
    for candidate in lattice.neighbors(slot).chain(lattice.contains(slot).then_some(slot)) {
        if grid.is_occupied(candidate) || !grid.in_bounds(candidate) {
            continue;
        }
        let d2 = pos.distance_squared(lattice.slot_to_position(candidate));
        if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
            best = Some((candidate, d2));
        }
    }
    best.map(|(slot, _)| slot)
}

/// Check a projectile center against the ceiling and nearby bubbles
///
/// The ceiling wins over bubble contact. Bubbles are scanned within +-2 rows
/// and columns of the projectile's nearest slot, in row-major order; the first
/// one in range decides the contact. If that bubble has no free slot around
/// it the contact is dropped for this step.
pub fn detect_contact(
    grid: &OccupancyGrid,
    lattice: &Lattice,
    pos: Vec2,
    contact_slack: f32,
    ceiling_epsilon: f32,
) -> Option<Contact> {
    let r = lattice.radius;

    if pos.y - r <= lattice.top_pad {
        let target = lattice.position_to_slot(Vec2::new(pos.x, lattice.top_pad + ceiling_epsilon))?;
        return Some(Contact {
            kind: ContactKind::Ceiling,
            target,
        });
    }

    let center = lattice.position_to_slot(pos)?;
    let reach = (2.0 * r - contact_slack).max(0.0);
    let hit = lattice.window(center).find(|&slot| {
        grid.is_occupied(slot) && pos.distance_squared(lattice.slot_to_position(slot)) <= reach * reach
    })?;

    match nearest_empty_neighbor(grid, lattice, pos, hit) {
        Some(target) => Some(Contact {
            kind: ContactKind::Bubble(hit),
            target,
        }),
        None => {
            log::warn!("Contact with {hit:?} but no free slot around it");
            None
        }
    }
}

/// Write a projectile into the grid at `target`
///
/// If `target` is already taken the nearest free neighbor of it is used
/// instead. Returns the slot written, or `None` when nothing was placed.
pub fn snap(
    grid: &mut OccupancyGrid,
    lattice: &Lattice,
    target: Slot,
    color: BubbleColor,
) -> Option<Slot> {
    if !lattice.contains(target) || !grid.in_bounds(target) {
        log::warn!("Snap target {target:?} is out of bounds");
        return None;
    }
    let slot = if grid.is_occupied(target) {
        let center = lattice.slot_to_position(target);
        match nearest_empty_neighbor(grid, lattice, center, target) {
            Some(alt) => alt,
            None => {
                log::warn!("No free slot around occupied target {target:?}");
                return None;
            }
        }
    } else {
        target
    };
    grid.set(slot, color).then_some(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OccupancyGrid, Lattice) {
        let lattice = Lattice {
            radius: 10.0,
            left_pad: 14.0,
            top_pad: 14.0,
            rows: 20,
            cols: 8,
        };
        (OccupancyGrid::new(lattice.rows, lattice.cols), lattice)
    }

    #[test]
    fn test_reflect_left_wall() {
        let mut pos = Vec2::new(20.0, 100.0);
        let mut vel = Vec2::new(-300.0, -500.0);
        assert!(reflect_walls(&mut pos, &mut vel, (24.0, 200.0)));
        assert_eq!(pos, Vec2::new(28.0, 100.0));
        assert_eq!(vel, Vec2::new(300.0, -500.0));
    }

    #[test]
    fn test_reflect_right_wall() {
        let mut pos = Vec2::new(205.0, 50.0);
        let mut vel = Vec2::new(300.0, -500.0);
        assert!(reflect_walls(&mut pos, &mut vel, (24.0, 200.0)));
        assert_eq!(pos, Vec2::new(195.0, 50.0));
        assert_eq!(vel, Vec2::new(-300.0, -500.0));
    }

    #[test]
    fn test_no_reflection_inside() {
        let mut pos = Vec2::new(100.0, 50.0);
        let mut vel = Vec2::new(-300.0, -500.0);
        assert!(!reflect_walls(&mut pos, &mut vel, (24.0, 200.0)));
        assert_eq!(vel.x, -300.0);
    }

    #[test]
    fn test_ceiling_contact_takes_priority() {
        let (mut grid, lattice) = setup();
        let slot = Slot::new(0, 3);
        grid.set(slot, BubbleColor::Red);
        let pos = lattice.slot_to_position(slot) + Vec2::new(2.0, 5.0);
        let contact = detect_contact(&grid, &lattice, pos, 0.5, 0.0001).expect("contact");
        assert_eq!(contact.kind, ContactKind::Ceiling);
        assert_eq!(contact.target, slot);
    }

    #[test]
    fn test_bubble_contact_snaps_to_nearest_empty_neighbor() {
        let (mut grid, lattice) = setup();
        for col in 0..lattice.cols {
            grid.set(Slot::new(0, col), BubbleColor::Blue);
        }
        // Approach (0,3) from straight below
        let anchor = lattice.slot_to_position(Slot::new(0, 3));
        let pos = anchor + Vec2::new(0.0, 19.0);
        let contact = detect_contact(&grid, &lattice, pos, 0.5, 0.0001).expect("contact");
        assert!(matches!(contact.kind, ContactKind::Bubble(_)));
        assert!(!grid.is_occupied(contact.target));
        let target_pos = lattice.slot_to_position(contact.target);
        assert!(target_pos.y > anchor.y);
    }

    #[test]
    fn test_no_contact_in_open_space() {
        let (mut grid, lattice) = setup();
        grid.set(Slot::new(0, 0), BubbleColor::Green);
        let pos = lattice.slot_to_position(Slot::new(12, 6));
        assert_eq!(detect_contact(&grid, &lattice, pos, 0.5, 0.0001), None);
    }

    #[test]
    fn test_nearest_empty_neighbor_tie_break() {
        let (mut grid, lattice) = setup();
        let slot = Slot::new(4, 4);
        grid.set(slot, BubbleColor::Red);
        // All four diagonal neighbors are equally far from the center
        let center = lattice.slot_to_position(slot);
        let first = nearest_empty_neighbor(&grid, &lattice, center, slot);
        assert_eq!(first, Some(Slot::new(3, 3)));

        grid.set(Slot::new(3, 3), BubbleColor::Red);
        let second = nearest_empty_neighbor(&grid, &lattice, center, slot);
        assert_eq!(second, Some(Slot::new(3, 4)));
    }

    #[test]
    fn test_nearest_empty_neighbor_prefers_coarse_slot_when_free() {
        let (grid, lattice) = setup();
        let slot = Slot::new(5, 2);
        let pos = lattice.slot_to_position(slot);
        assert_eq!(nearest_empty_neighbor(&grid, &lattice, pos, slot), Some(slot));
    }

    #[test]
    fn test_snap_reresolves_occupied_target() {
        let (mut grid, lattice) = setup();
        grid.set(Slot::new(2, 2), BubbleColor::Yellow);
        let placed = snap(&mut grid, &lattice, Slot::new(2, 2), BubbleColor::Teal).expect("placed");
        assert_ne!(placed, Slot::new(2, 2));
        assert_eq!(grid.color_at(placed), Some(BubbleColor::Teal));
        assert_eq!(grid.color_at(Slot::new(2, 2)), Some(BubbleColor::Yellow));
    }

    #[test]
    fn test_snap_fails_when_surrounded() {
        let (mut grid, lattice) = setup();
        let target = Slot::new(3, 3);
        grid.set(target, BubbleColor::Red);
        for n in lattice.neighbors(target).collect::<Vec<_>>() {
            grid.set(n, BubbleColor::Red);
        }
        let before = grid.clone();
        assert_eq!(snap(&mut grid, &lattice, target, BubbleColor::Blue), None);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_snap_out_of_bounds_is_noop() {
        let (mut grid, lattice) = setup();
        assert_eq!(snap(&mut grid, &lattice, Slot::new(99, 0), BubbleColor::Blue), None);
        assert!(grid.is_empty());
    }
}
