//! Escape room headless driver.
//!
//! Runs the game core without a window at a fixed 60 Hz step and logs what a
//! real host would draw or play: HUD intents, audio cues and game signals.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults on failure) and apply CLI overrides
//! 2. Build the [`Game`] and start the run (room 1, or the saved room with
//!    `--resume`)
//! 3. Each frame:
//!    - let the autoplay bot aim and press interact (`--autoplay`)
//!    - tick the core
//!    - drain and log HUD intents, audio cues and game signals
//! 4. Stop on victory, game over, or after `--frames` frames, and print the
//!    final run snapshot as JSON
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --autoplay --seed 42
//! ```

use clap::Parser;
use escaperoom::autoplay::AutoPlayer;
use escaperoom::events::flow::GameSignal;
use escaperoom::game::Game;
use escaperoom::resources::gameconfig::GameConfig;
use std::path::PathBuf;

/// Fixed simulation step.
const FRAME_DELTA: f32 = 1.0 / 60.0;

/// Escape room game core, headless.
#[derive(Parser)]
#[command(version, about = "Runs the escape room core headless and logs its output.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON room catalog replacing the built-in rooms.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Seed for puzzle generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate before stopping.
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// Let a bot solve the rooms.
    #[arg(long)]
    autoplay: bool,

    /// Start in the room after the last saved one.
    #[arg(long)]
    resume: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{e}; using default configuration");
    }
    if cli.catalog.is_some() {
        config.catalog_path = cli.catalog.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.autoplay {
        // The bot teleports around the room and cannot dodge.
        config.capture_ends_run = false;
    }

    let mut game = Game::new(config);
    let room = if cli.resume { game.resume_room() } else { 1 };
    if let Err(e) = game.start_at(room) {
        log::error!("Cannot start in room {room}: {e}");
        std::process::exit(1);
    }
    log::info!("Escape room started: {} rooms", game.total_rooms());

    let mut bot = cli.autoplay.then(AutoPlayer::new);
    let mut finished = false;
    for _ in 0..cli.frames {
        if let Some(bot) = bot.as_mut() {
            bot.step(&mut game, FRAME_DELTA);
        }
        game.tick(FRAME_DELTA);

        for cmd in game.drain_hud() {
            log::info!("hud: {cmd:?}");
        }
        for cue in game.drain_audio() {
            log::debug!("audio: {cue:?}");
        }
        for signal in game.drain_signals() {
            log::info!("signal: {signal:?}");
            if matches!(signal, GameSignal::Victory | GameSignal::GameOver { .. }) {
                finished = true;
            }
        }
        if finished {
            break;
        }
    }

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}
