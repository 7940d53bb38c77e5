//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable frame time, capped and split into fixed substeps
//! - Seeded RNG only
//! - Stable iteration order (row-major over the lattice)
//! - No rendering or platform dependencies

pub mod ceiling;
pub mod collision;
pub mod floating;
pub mod grid;
pub mod lattice;
pub mod matching;
pub mod state;
pub mod tick;

pub use ceiling::{Ceiling, CeilingAdvance};
pub use collision::{Contact, ContactKind, detect_contact, nearest_empty_neighbor, reflect_walls, snap};
pub use floating::{drop_floating, floating_slots};
pub use grid::{Bubble, BubbleColor, OccupancyGrid};
pub use lattice::{Lattice, Layout, Parity, Slot};
pub use matching::{pop_matches, same_color_component};
pub use state::{
    BubbleView, Emitter, GameEvent, GamePhase, GameState, Outcome, Projectile, ProjectileState,
    Snapshot, end_of_game,
};
pub use tick::{TickInput, tick};
