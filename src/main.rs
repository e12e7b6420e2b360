mod builders;
mod drawables;
mod drawing;
mod engine;
mod grid;
mod latch;
mod picture;
mod position;
#[cfg(unix)]
mod signals;
mod terminal;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use log::{LevelFilter, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use builders::{GameData, Layout, SetupError, picture_game, text_game};
use drawing::{DrawingEngine, Key, Surface};
use engine::{GameEngine, Outcome};
use picture::Picture;
#[cfg(unix)]
use signals::SignalGuard;
use terminal::TerminalSurface;

fn valid_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if size < 2 {
        return Err("Minimum SIZE is 2".to_string());
    }
    Ok(size)
}

#[derive(Parser)]
#[command(name = "sliding_puzzle")]
#[command(about = "SlidingPuzzle game", long_about = None)]
struct Args {
    /// Number of columns and rows (game board size is SIZE x SIZE)
    #[arg(value_name = "SIZE", value_parser = valid_size)]
    size: usize,

    /// Slice this picture into tiles instead of using numbered tiles
    #[arg(short, long, value_name = "FILE")]
    picture: Option<PathBuf>,

    /// Seed for shuffling the board
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable debug messages
    #[arg(short, long, default_value = "false")]
    debug: bool,

    /// Write log messages to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<(), SetupError> {
    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    if let Some(path) = &args.log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

fn build_game(
    size: usize,
    picture: Option<&Picture>,
    area: (u16, u16),
) -> Result<(Layout, GameData), SetupError> {
    let layout = Layout::fit(size, area)?;
    let data = match picture {
        Some(picture) => picture_game(&layout, picture),
        None => text_game(&layout),
    };
    Ok((layout, data))
}

fn play(args: &Args) -> Result<Option<Outcome>, SetupError> {
    // Load the picture before the terminal is taken over, so errors print normally
    let picture = match &args.picture {
        Some(path) => Some(Picture::open(path)?),
        None => None,
    };

    let surface = TerminalSurface::open()?;
    let (layout, data) = build_game(args.size, picture.as_ref(), surface.size()?)?;
    info!(
        "Board {0}x{0} with {1}x{2} tiles",
        layout.size, layout.tile_width, layout.tile_height
    );

    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let engine = Arc::new(GameEngine::new(layout.size, &data, rng));
    #[cfg(unix)]
    let _signals = {
        let engine = Arc::clone(&engine);
        SignalGuard::new(move || engine.handle_cancel())?
    };

    let GameData {
        board, text_box, ..
    } = data;
    let mut drawing = DrawingEngine::new(surface);
    drawing.add_to_canvas(Arc::new(board));
    drawing.add_to_canvas(text_box);

    let bindings: [(Key, fn(&GameEngine)); 6] = [
        (Key::ArrowLeft, GameEngine::move_blank_left),
        (Key::ArrowRight, GameEngine::move_blank_right),
        (Key::ArrowUp, GameEngine::move_blank_up),
        (Key::ArrowDown, GameEngine::move_blank_down),
        (Key::Enter, GameEngine::handle_confirm),
        (Key::Escape, GameEngine::handle_cancel),
    ];
    for (key, action) in bindings {
        let engine = Arc::clone(&engine);
        drawing.set_callback(key, move || action(&engine));
    }

    let runner = Arc::clone(&engine);
    let game = thread::Builder::new()
        .name("game-engine".to_string())
        .spawn(move || runner.run())?;

    drawing.run_until(|| game.is_finished())?;
    // The terminal is restored here, before the outcome is reported
    drop(drawing);

    let outcome = game.join().ok();
    info!("Game engine stopped in phase {:?}", engine.phase());
    Ok(outcome)
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match play(&args) {
        Ok(Some(Outcome::Solved { elapsed })) => {
            info!("Puzzle solved in {} seconds", elapsed.as_secs());
        }
        Ok(Some(Outcome::Cancelled)) => info!("Game cancelled"),
        Ok(None) => {
            eprintln!("Error: the game engine stopped unexpectedly");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
