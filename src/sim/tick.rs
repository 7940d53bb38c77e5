//! Frame update
//!
//! Applies one frame of input, then integrates the projectile in fixed
//! substeps until it either stays in flight or contacts the board.

use super::collision::{detect_contact, reflect_walls};
use super::state::{GamePhase, GameState};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Absolute aim angle (pointer position)
    pub aim: Option<f32>,
    /// Keyboard aim nudges, in multiples of the configured step (negative is left)
    pub nudge: f32,
    /// Launch the current bubble
    pub fire: bool,
    /// Exchange current and next bubbles
    pub swap: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a new game
    pub restart: bool,
}

impl TickInput {
    pub fn aim_and_fire(angle: f32) -> Self {
        Self {
            aim: Some(angle),
            fire: true,
            ..Default::default()
        }
    }
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    apply_input(state, input);

    if state.phase != GamePhase::Playing || !state.emitter.current.is_moving() {
        return;
    }

    let dt = if dt.is_finite() { dt.clamp(0.0, state.settings.max_frame_dt) } else { 0.0 };
    let substeps = state.settings.substeps.max(1);
    let step = dt / substeps as f32;
    let bounds = state.layout.wall_bounds();
    let slack = state.layout.contact_slack;
    let epsilon = state.settings.ceiling_epsilon;

    for _ in 0..substeps {
        let lattice = state.lattice();
        let projectile = &mut state.emitter.current;
        projectile.pos += projectile.vel * step;
        reflect_walls(&mut projectile.pos, &mut projectile.vel, bounds);
        let pos = projectile.pos;

        if let Some(contact) = detect_contact(&state.grid, &lattice, pos, slack, epsilon) {
            // A failed snap leaves the projectile flying into the next frame
            if state.resolve_contact(contact).is_none() {
                log::warn!("Projectile at {pos} could not be placed");
            }
            break;
        }
    }
}

/// Inputs are applied in a fixed order: restart, pause, aim, nudge, swap, fire
fn apply_input(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
    }
    if input.pause {
        state.toggle_pause();
    }
    if let Some(angle) = input.aim {
        state.aim(angle);
    }
    if input.nudge != 0.0 {
        state.nudge_aim(input.nudge);
    }
    if input.swap {
        state.swap_current_and_next();
    }
    if input.fire {
        state.fire();
    }
}
