//! Hexpop headless driver
//!
//! Runs a seeded, self-aiming session against the simulation core and prints
//! a summary (or the final frame snapshot as JSON). Useful for replaying a
//! seed, tuning settings files and smoke-testing the core without a renderer.

mod cli {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;
    use hexpop::sim::{GameEvent, GamePhase, GameState, Layout, TickInput, tick};
    use hexpop::{ConfigError, Settings};

    /// Frame time used by the headless loop
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Frames a single shot may take before the run is abandoned
    const MAX_FLIGHT_FRAMES: u32 = 1200;

    #[derive(Parser)]
    #[command(name = "hexpop")]
    #[command(author, version, about = "Run a headless bubble shooter session")]
    pub struct Cli {
        /// Random seed for the session
        #[arg(short, long, default_value_t = 12345)]
        pub seed: u64,

        /// JSON settings file (missing fields use defaults)
        #[arg(short = 'c', long, value_name = "FILE")]
        pub settings: Option<PathBuf>,

        /// Surface width in css px
        #[arg(short = 'w', long, default_value_t = 480.0)]
        pub width: f32,

        /// Surface height in css px
        #[arg(short = 'H', long, default_value_t = 800.0)]
        pub height: f32,

        /// Device pixel ratio
        #[arg(short, long, default_value_t = 1.0)]
        pub dpr: f32,

        /// Stop after this many shots
        #[arg(short = 'n', long, default_value_t = 200)]
        pub max_shots: u32,

        /// Print the final snapshot as JSON instead of a summary
        #[arg(long)]
        pub snapshot: bool,

        /// Print the effective settings as JSON and exit
        #[arg(long)]
        pub print_settings: bool,
    }

    #[derive(Debug, Default)]
    struct Totals {
        popped: usize,
        dropped: usize,
        rows_inserted: usize,
    }

    impl Totals {
        fn record(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::Popped { count } => self.popped += count,
                    GameEvent::Dropped { count } => self.dropped += count,
                    GameEvent::RowInserted => self.rows_inserted += 1,
                    _ => {}
                }
            }
        }
    }

    /// Aim at the lowest bubble matching the loaded color, else straight up
    fn choose_aim(state: &GameState) -> f32 {
        let lattice = state.lattice();
        let origin = state.layout.emitter;
        let color = state.emitter.current.color;
        let target = state
            .grid
            .occupied()
            .filter(|(_, bubble)| bubble.color == color)
            .map(|(slot, _)| lattice.slot_to_position(slot))
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap_or(Vec2::new(origin.x, 0.0));
        let to = target - origin;
        to.y.atan2(to.x)
    }

    pub fn run(cli: Cli) -> Result<(), ConfigError> {
        let settings = match &cli.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if cli.print_settings {
            println!("{}", settings.to_json()?);
            return Ok(());
        }

        let layout = Layout::for_surface(
            cli.width * cli.dpr,
            cli.height * cli.dpr,
            cli.dpr,
            &settings,
        );
        let mut state = GameState::new(settings, layout, cli.seed);
        let mut totals = Totals::default();

        'shots: while state.shots_fired < cli.max_shots && !state.is_game_over() {
            let aim = choose_aim(&state);
            tick(&mut state, &TickInput::aim_and_fire(aim), FRAME_DT);
            let mut frames = 0;
            while state.emitter.cooldown {
                if frames == MAX_FLIGHT_FRAMES {
                    log::warn!("Shot {} never landed; stopping", state.shots_fired + 1);
                    break 'shots;
                }
                tick(&mut state, &TickInput::default(), FRAME_DT);
                frames += 1;
            }
            totals.record(&state.drain_events());
        }

        if cli.snapshot {
            match serde_json::to_string_pretty(&state.snapshot()) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to serialize snapshot: {e}"),
            }
            return Ok(());
        }

        let result = match state.phase {
            GamePhase::GameOver(outcome) => format!("{outcome:?}"),
            _ => "Unfinished".to_string(),
        };
        println!("seed:          {}", state.seed);
        println!("result:        {result}");
        println!("shots fired:   {}", state.shots_fired);
        println!("popped:        {}", totals.popped);
        println!("dropped:       {}", totals.dropped);
        println!("rows inserted: {}", totals.rows_inserted);
        println!("remaining:     {}", state.grid.occupied_count());
        Ok(())
    }

}

fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Hexpop (headless) starting...");

    if let Err(e) = cli::run(cli::Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
