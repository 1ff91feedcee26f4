use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use megamine_core::*;

mod render;
mod script;
mod settings;

use settings::{BoardSettings, Preset, Settings};

/// Replays recorded pointer samples against a board and prints where the match ended up.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a standard board
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    height: Option<Coord>,

    #[arg(long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print a JSON summary instead of the board
    #[arg(long)]
    json: bool,

    /// JSON array of pointer samples
    script: PathBuf,
}

impl Args {
    fn board(&self) -> BoardSettings {
        BoardSettings {
            preset: self.preset,
            width: self.width,
            height: self.height,
            mines: self.mines,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let config = settings.board_config(args.board())?;
    let seed = args
        .seed
        .or(settings.seed)
        .unwrap_or_else(|| Utc::now().timestamp_micros() as u64);
    log::info!("{}x{} board, {} mines, seed {}", config.width, config.height, config.mines, seed);

    let samples = script::load(&args.script)?;
    log::debug!("Loaded {} samples", samples.len());

    let mut game = Match::new(config, seed).context("Could not create board")?;
    if let Some(last) = script::play(&mut game, &samples)? {
        log::debug!("Replay ended at {:?} in phase {:?}", last, game.phase());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&render::Summary::of(&game))?);
    } else {
        print!("{}", render::text(&game));
    }
    Ok(())
}
