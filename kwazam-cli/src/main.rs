//! Kwazam command-line driver
//!
//! Every command works on a save file: load it, act, write it back.
//!
//! ```text
//! kwazam new game.txt
//! kwazam moves game.txt 3,4
//! kwazam play game.txt 3,4 3,3 --switch
//! kwazam show game.txt
//! ```

mod config;
mod render;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kwazam_core::{Game, GameEvent, GameOptions, Pos};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "kwazam", about = "Play Kwazam chess through save files")]
struct Cli {
    /// Config file (defaults to ./kwazam.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG and the config file
    #[arg(long, global = true)]
    log: Option<String>,

    /// Switch the turn after every move
    #[arg(long, global = true)]
    auto_switch: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a fresh game
    New { file: PathBuf },
    /// Print the board
    Show { file: PathBuf },
    /// List where the piece on a square may go
    Moves {
        file: PathBuf,
        #[arg(value_parser = parse_pos)]
        from: Pos,
    },
    /// Move a piece
    Play {
        file: PathBuf,
        #[arg(value_parser = parse_pos)]
        from: Pos,
        #[arg(value_parser = parse_pos)]
        to: Pos,
        /// Hand over the turn after the move
        #[arg(long)]
        switch: bool,
    },
    /// Hand over the turn: flip the board, swap Time/Plus when due
    Switch { file: PathBuf },
}

/// Parse `x,y`.
fn parse_pos(s: &str) -> Result<Pos, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", s))?;
    let x = x.trim().parse::<i8>().map_err(|e| format!("bad column '{}': {}", x, e))?;
    let y = y.trim().parse::<i8>().map_err(|e| format!("bad row '{}': {}", y, e))?;
    let pos = Pos::new(x, y);
    if !pos.is_valid() {
        return Err(format!("{} is off the board", pos));
    }
    Ok(pos)
}

fn init_tracing(flag: Option<&str>, config: &CliConfig) -> Result<()> {
    let filter = match flag {
        Some(directives) => EnvFilter::try_new(directives).context("invalid --log filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Print what the engine announces.
fn announce(game: &mut Game) {
    game.subscribe(|event| match event {
        GameEvent::PieceSwitch => println!("Time and Plus pieces switched"),
        GameEvent::PlayerWin(index) => println!("Player {} wins", index),
        GameEvent::PieceMove | GameEvent::NewGame => {}
    });
}

fn open_game(path: &Path, options: GameOptions) -> Result<Game> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut game = Game::with_options(options);
    game.try_load(BufReader::new(file))
        .with_context(|| format!("failed to load {}", path.display()))?;
    debug!(path = %path.display(), "loaded");
    Ok(game)
}

fn write_game(path: &Path, game: &Game) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    game.try_save(BufWriter::new(file))
        .with_context(|| format!("failed to save {}", path.display()))?;
    debug!(path = %path.display(), "saved");
    Ok(())
}

fn print_game(game: &Game, highlight: &[Pos]) {
    print!("{}", render::board(game, highlight));
    println!("{}", render::status(game));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::resolve(cli.config.as_deref()).context("failed to load config")?;
    init_tracing(cli.log.as_deref(), &config)?;

    let mut options = config.game;
    if cli.auto_switch {
        options = options.with_auto_switch_turn(true);
    }

    match cli.command {
        Command::New { file } => {
            let game = Game::with_options(options);
            write_game(&file, &game)?;
            print_game(&game, &[]);
        }
        Command::Show { file } => {
            let game = open_game(&file, options)?;
            print_game(&game, &[]);
        }
        Command::Moves { file, from } => {
            let game = open_game(&file, options)?;
            let destinations = game.legal_destinations(from);
            if destinations.is_empty() {
                println!("No moves from {}", from);
            } else {
                let list: Vec<String> = destinations.iter().map(Pos::to_string).collect();
                println!("{} -> {}", from, list.join(" "));
            }
            print_game(&game, &destinations);
        }
        Command::Play { file, from, to, switch } => {
            let mut game = open_game(&file, options)?;
            announce(&mut game);
            if game.is_over() {
                bail!("the game is over; start a new one");
            }
            if game.has_played() {
                bail!("{} already moved; run `kwazam switch` first", game.current_side());
            }
            let Some(report) = game.play_piece_move(from, to) else {
                bail!("illegal move {} -> {}", from, to);
            };
            if let Some(captured) = report.captured {
                println!("Captured {} {}", captured.side(), captured.kind());
            }
            if switch && !options.auto_switch_turn && !game.is_over() {
                game.switch_turn();
            }
            write_game(&file, &game)?;
            print_game(&game, &[]);
        }
        Command::Switch { file } => {
            let mut game = open_game(&file, options)?;
            announce(&mut game);
            if !game.switch_turn() {
                bail!("the game is over; start a new one");
            }
            write_game(&file, &game)?;
            print_game(&game, &[]);
        }
    }
    Ok(())
}
