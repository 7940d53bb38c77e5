//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; the presentation
//! layer reads it through [`GameState::snapshot`] and never writes to it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ceiling::{Ceiling, CeilingAdvance};
use super::collision::{Contact, snap};
use super::floating::drop_floating;
use super::grid::{BubbleColor, OccupancyGrid};
use super::lattice::{Lattice, Layout, Slot};
use super::matching::pop_matches;
use crate::settings::Settings;
use crate::{clamp_aim, direction_from_angle};

/// Straight up in screen space
const AIM_UP: f32 = -std::f32::consts::FRAC_PI_2;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Board cleared
    Won,
    /// Bubbles reached the emitter
    Lost,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Aiming or a shot in flight
    Playing,
    /// Simulation frozen; rendering continues
    Paused,
    /// Session ended
    GameOver(Outcome),
}

impl GamePhase {
    pub fn is_game_over(self) -> bool {
        matches!(self, GamePhase::GameOver(_))
    }
}

/// Projectile state - waiting at the emitter or flying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    Loaded,
    InFlight,
}

/// A bubble owned by the emitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: BubbleColor,
    pub state: ProjectileState,
}

impl Projectile {
    pub fn loaded(origin: Vec2, color: BubbleColor) -> Self {
        Self {
            pos: origin,
            vel: Vec2::ZERO,
            color,
            state: ProjectileState::Loaded,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.state == ProjectileState::InFlight
    }

    /// Start constant-velocity flight along `angle`
    pub fn launch(&mut self, angle: f32, speed: f32) {
        self.vel = direction_from_angle(angle) * speed;
        self.state = ProjectileState::InFlight;
    }

    /// Back to the emitter, at rest
    pub fn rehome(&mut self, origin: Vec2) {
        self.pos = origin;
        self.vel = Vec2::ZERO;
        self.state = ProjectileState::Loaded;
    }
}

/// The fixed launcher with its current and preloaded bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    /// Aim angle in radians (screen space, y down)
    pub angle: f32,
    /// Set while a shot is in flight
    pub cooldown: bool,
    pub current: Projectile,
    pub next: Projectile,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { color: BubbleColor },
    Placed { slot: Slot, color: BubbleColor },
    Popped { count: usize },
    Dropped { count: usize },
    CeilingCrept { offset: f32 },
    RowInserted,
    GameOver(Outcome),
}

/// A resting bubble as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubbleView {
    pub slot: Slot,
    pub pos: Vec2,
    pub color: BubbleColor,
}

/// Read-only view of everything needed to draw a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub radius: f32,
    pub ceiling_y: f32,
    pub emitter: Vec2,
    pub bubbles: Vec<BubbleView>,
    pub current: Projectile,
    pub next: Projectile,
    pub aim_angle: f32,
    pub shots_fired: u32,
    pub shots_until_drop: u32,
    pub paused: bool,
    pub game_over: bool,
    pub phase: GamePhase,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub layout: Layout,
    /// Seed the session RNG was created from
    pub seed: u64,
    pub grid: OccupancyGrid,
    pub emitter: Emitter,
    pub ceiling: Ceiling,
    pub shots_fired: u32,
    pub phase: GamePhase,
    events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Start a new session
    ///
    /// Settings that fail validation are replaced by the defaults.
    pub fn new(settings: Settings, layout: Layout, seed: u64) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({e}); using defaults");
                Settings::default()
            }
        };
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = seeded_grid(&settings, &layout, &mut rng);
        let emitter = load_emitter(layout.emitter, &grid, &settings, &mut rng);
        log::info!(
            "New game: seed {seed}, {} cols, radius {}, {} bubbles",
            layout.cols,
            layout.radius,
            grid.occupied_count()
        );

        Self {
            settings,
            layout,
            seed,
            grid,
            emitter,
            ceiling: Ceiling::new(),
            shots_fired: 0,
            phase: GamePhase::Playing,
            events: Vec::new(),
            rng,
        }
    }

    /// New session with default settings for a surface
    pub fn for_surface(width: f32, height: f32, dpr: f32, seed: u64) -> Self {
        let settings = Settings::default();
        let layout = Layout::for_surface(width, height, dpr, &settings);
        Self::new(settings, layout, seed)
    }

    /// Lattice mapping for the current ceiling position
    pub fn lattice(&self) -> Lattice {
        self.layout.lattice(self.grid.rows(), self.ceiling.offset())
    }

    /// Y of the ceiling boundary
    pub fn ceiling_y(&self) -> f32 {
        self.ceiling.boundary(self.layout.base_top_pad)
    }

    pub fn shots_until_drop(&self) -> u32 {
        self.settings.shots_until_drop(self.shots_fired)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fire and swap are only honoured while playing with no shot in flight
    fn can_act(&self) -> bool {
        self.phase == GamePhase::Playing && !self.emitter.cooldown
    }

    /// Point the emitter, clamped to the configured arc
    pub fn aim(&mut self, angle: f32) {
        if !angle.is_finite() {
            return;
        }
        let (min, max) = self.settings.aim_range();
        self.emitter.angle = clamp_aim(angle, min, max);
    }

    /// Rotate the aim by `steps` keyboard nudges
    pub fn nudge_aim(&mut self, steps: f32) {
        self.aim(self.emitter.angle + steps * self.settings.aim_nudge);
    }

    /// Launch the current bubble; returns false when gated
    pub fn fire(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        let speed = self.settings.projectile_speed;
        self.emitter.current.launch(self.emitter.angle, speed);
        self.emitter.cooldown = true;
        self.events.push(GameEvent::Fired {
            color: self.emitter.current.color,
        });
        true
    }

    /// Exchange current and next bubbles; returns false when gated
    pub fn swap_current_and_next(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        let origin = self.layout.emitter;
        let emitter = &mut self.emitter;
        std::mem::swap(&mut emitter.current, &mut emitter.next);
        emitter.current.rehome(origin);
        emitter.next.rehome(origin);
        true
    }

    /// Flip between playing and paused; ignored after game over
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            over @ GamePhase::GameOver(_) => over,
        };
    }

    /// Fresh board, emitter, counters and ceiling; layout and settings are kept
    pub fn restart(&mut self) {
        self.grid = seeded_grid(&self.settings, &self.layout, &mut self.rng);
        self.emitter = load_emitter(self.layout.emitter, &self.grid, &self.settings, &mut self.rng);
        self.ceiling.reset();
        self.shots_fired = 0;
        self.phase = GamePhase::Playing;
        self.events.clear();
        log::info!("Game restarted with {} bubbles", self.grid.occupied_count());
    }

    /// Apply a new surface size
    pub fn resize(&mut self, width: f32, height: f32, dpr: f32) {
        let old_row_height = self.layout.row_height();
        self.layout = Layout::for_surface(width, height, dpr, &self.settings);
        self.grid.resize_cols(self.layout.cols);
        self.ceiling.rescale(old_row_height, self.layout.row_height());

        let origin = self.layout.emitter;
        for projectile in [&mut self.emitter.current, &mut self.emitter.next] {
            if !projectile.is_moving() {
                projectile.rehome(origin);
            }
        }
        log::info!(
            "Resized to {width}x{height} @{dpr}: {} cols, radius {}",
            self.layout.cols,
            self.layout.radius
        );
    }

    /// Commit the in-flight projectile at a contact
    ///
    /// Returns the slot written, or `None` if no free slot was found; in that
    /// case the projectile keeps flying.
    pub fn resolve_contact(&mut self, contact: Contact) -> Option<Slot> {
        let lattice = self.lattice();
        let color = self.emitter.current.color;
        let slot = snap(&mut self.grid, &lattice, contact.target, color)?;
        self.after_placement(slot, color);
        Some(slot)
    }

    /// Matching, floating removal, reload, ceiling and end-of-game checks
    fn after_placement(&mut self, slot: Slot, color: BubbleColor) {
        let lattice = self.lattice();
        self.events.push(GameEvent::Placed { slot, color });

        let popped = pop_matches(&mut self.grid, &lattice, slot);
        let dropped = drop_floating(&mut self.grid, &lattice);
        if popped > 0 {
            self.events.push(GameEvent::Popped { count: popped });
        }
        if dropped > 0 {
            self.events.push(GameEvent::Dropped { count: dropped });
        }
        log::debug!("Placed {color:?} at {slot:?}: popped {popped}, dropped {dropped}");

        self.reload();
        self.shots_fired += 1;
        if self.shots_fired % self.settings.drop_interval() == 0 {
            self.advance_ceiling();
        }
        self.check_game_over();
    }

    /// Promote next to current and preload a fresh bubble
    fn reload(&mut self) {
        let fresh = Projectile::loaded(
            self.layout.emitter,
            fresh_color(&self.grid, &self.settings, &mut self.rng),
        );
        let mut current = std::mem::replace(&mut self.emitter.next, fresh);
        current.rehome(self.layout.emitter);
        self.emitter.current = current;
        self.emitter.cooldown = false;
    }

    /// Move the ceiling half a row toward the emitter
    pub fn advance_ceiling(&mut self) -> CeilingAdvance {
        let row_height = self.layout.row_height();
        let palette = self.settings.palette();
        let advance = self.ceiling.advance(
            &mut self.grid,
            row_height,
            self.settings.new_row_fill,
            palette,
            &mut self.rng,
        );
        match advance {
            CeilingAdvance::Crept => self.events.push(GameEvent::CeilingCrept {
                offset: self.ceiling.offset(),
            }),
            CeilingAdvance::RowInserted => {
                log::info!("Ceiling inserted a new row after {} shots", self.shots_fired);
                self.events.push(GameEvent::RowInserted);
            }
        }
        advance
    }

    /// Update the phase from the board; loss is checked before win
    pub fn check_game_over(&mut self) -> Option<Outcome> {
        if self.is_game_over() {
            return None;
        }
        let outcome = end_of_game(&self.grid, &self.lattice(), self.layout.emitter.y)?;
        self.phase = GamePhase::GameOver(outcome);
        self.events.push(GameEvent::GameOver(outcome));
        log::info!("Game over: {outcome:?} after {} shots", self.shots_fired);
        Some(outcome)
    }

    pub fn snapshot(&self) -> Snapshot {
        let lattice = self.lattice();
        Snapshot {
            radius: self.layout.radius,
            ceiling_y: self.ceiling_y(),
            emitter: self.layout.emitter,
            bubbles: self
                .grid
                .occupied()
                .map(|(slot, bubble)| BubbleView {
                    slot,
                    pos: lattice.slot_to_position(slot),
                    color: bubble.color,
                })
                .collect(),
            current: self.emitter.current,
            next: self.emitter.next,
            aim_angle: self.emitter.angle,
            shots_fired: self.shots_fired,
            shots_until_drop: self.shots_until_drop(),
            paused: self.is_paused(),
            game_over: self.is_game_over(),
            phase: self.phase,
        }
    }
}

/// Loss if any bubble's lower edge reaches `emitter_y - 2R`, else win if empty
pub fn end_of_game(grid: &OccupancyGrid, lattice: &Lattice, emitter_y: f32) -> Option<Outcome> {
    let limit = emitter_y - 2.0 * lattice.radius;
    let reached = grid
        .occupied()
        .any(|(slot, _)| lattice.slot_to_position(slot).y + lattice.radius >= limit);
    if reached {
        Some(Outcome::Lost)
    } else if grid.is_empty() {
        Some(Outcome::Won)
    } else {
        None
    }
}

/// Board colors when any remain, otherwise the configured palette
fn fresh_color(grid: &OccupancyGrid, settings: &Settings, rng: &mut Pcg32) -> BubbleColor {
    let present = grid.colors_present();
    if present.is_empty() {
        BubbleColor::random_from(settings.palette(), rng)
    } else {
        BubbleColor::random_from(&present, rng)
    }
}

fn seeded_grid(settings: &Settings, layout: &Layout, rng: &mut Pcg32) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(settings.max_rows, layout.cols);
    for row in 0..settings.seed_row_count() {
        grid.fill_row(row, settings.seed_fill, settings.palette(), rng);
    }
    grid
}

fn load_emitter(origin: Vec2, grid: &OccupancyGrid, settings: &Settings, rng: &mut Pcg32) -> Emitter {
    let current = Projectile::loaded(origin, fresh_color(grid, settings, rng));
    let next = Projectile::loaded(origin, fresh_color(grid, settings, rng));
    Emitter {
        angle: AIM_UP,
        cooldown: false,
        current,
        next,
    }
}
