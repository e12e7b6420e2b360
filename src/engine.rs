//! Rules and flow of the sliding puzzle.
//!
//! The engine owns the grid of tiles and runs the game through its phases:
//!
//! * `Intro`: the welcome message is shown and moves are ignored until the player confirms.
//! * `Shuffling`: the message is hidden and the board is scrambled with random legal moves.
//! * `Playing`: the player slides tiles until the board is back in its solved order.
//! * `Solved`: the elapsed time is shown and moves are ignored until the player confirms.
//!
//! Input arrives from another thread through the `move_*` and `handle_*` callbacks. Moves are
//! applied immediately; confirm and cancel are latched and picked up by [`GameEngine::run`] on its
//! next poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use log::{debug, info, trace};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::builders::GameData;
use crate::drawables::{TextBox, Tile};
use crate::grid::Grid;
use crate::latch::Latch;
use crate::position::{Direction, Position};

/// Random moves attempted by a shuffle. Moves into the board edge are dropped, so fewer
/// actually happen.
pub const SHUFFLE_MOVES: usize = 2000;

pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

const WELCOME_TEXT: &str = "Welcome to SlidingPuzzle\n\
                            Use arrow keys to move the empty tile.\n\
                            Press Escape to exit.\n\
                            Press Enter to start.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Shuffling,
    Playing,
    Solved,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Cancelled,
    Solved { elapsed: Duration },
}

pub struct GameEngine {
    grid: Mutex<Grid<Arc<Tile>>>,
    blank: Arc<Tile>,
    solved_order: Vec<Arc<Tile>>,
    text_box: Arc<TextBox>,
    confirm: Latch,
    cancel: Latch,
    allow_moving: AtomicBool,
    phase: Mutex<Phase>,
    rng: Mutex<ChaCha8Rng>,
    poll_interval: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameEngine {
    /// Create an engine for a `size` x `size` board. The blank tile goes first, followed by the
    /// other tiles in row-major order; this arrangement is the solution.
    pub fn new(size: usize, data: &GameData, rng: ChaCha8Rng) -> Self {
        let items: Vec<Arc<Tile>> = std::iter::once(&data.blank)
            .chain(&data.tiles)
            .cloned()
            .collect();
        let grid = Grid::new(size, items);
        assert!(
            grid.lookup(Position::default()).is_blank(),
            "Blank tile must start in the top-left corner"
        );
        let solved_order = grid.items().to_vec();

        GameEngine {
            grid: Mutex::new(grid),
            blank: Arc::clone(&data.blank),
            solved_order,
            text_box: Arc::clone(&data.text_box),
            confirm: Latch::new(),
            cancel: Latch::new(),
            allow_moving: AtomicBool::new(false),
            phase: Mutex::new(Phase::Intro),
            rng: Mutex::new(rng),
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn phase(&self) -> Phase {
        *lock(&self.phase)
    }

    /// Tiles in their current board order.
    #[cfg(test)]
    pub fn tiles(&self) -> Vec<Arc<Tile>> {
        lock(&self.grid).items().to_vec()
    }

    pub fn move_blank_down(&self) {
        self.move_blank(Direction::Down);
    }

    pub fn move_blank_up(&self) {
        self.move_blank(Direction::Up);
    }

    pub fn move_blank_left(&self) {
        self.move_blank(Direction::Left);
    }

    pub fn move_blank_right(&self) {
        self.move_blank(Direction::Right);
    }

    pub fn handle_confirm(&self) {
        self.confirm.set();
    }

    pub fn handle_cancel(&self) {
        self.cancel.set();
    }

    /// Slide the tile next to the blank into it. Returns false, leaving the board untouched, if
    /// there is no tile on that side or moves are not allowed right now.
    pub fn move_blank(&self, direction: Direction) -> bool {
        let mut grid = lock(&self.grid);
        let blank = grid.position_of(&self.blank);
        let target = blank + direction.offset();

        if !grid.contains(target) {
            return false;
        }
        if !self.allow_moving.load(Ordering::Acquire) {
            return false;
        }

        grid.swap(blank, target);
        trace!("Moved {direction}: blank {blank} -> {target}");
        true
    }

    pub fn is_solved(&self) -> bool {
        lock(&self.grid).matches(&self.solved_order)
    }

    /// Scramble the board with random legal moves, favouring down and right. Returns the moves
    /// that took effect, in order.
    pub fn shuffle(&self) -> Vec<Direction> {
        let mut candidates: ArrayVec<Direction, 10> = ArrayVec::new();
        for (direction, weight) in [
            (Direction::Down, 3),
            (Direction::Right, 3),
            (Direction::Left, 2),
            (Direction::Up, 2),
        ] {
            for _ in 0..weight {
                candidates.push(direction);
            }
        }

        let mut rng = lock(&self.rng);
        let mut applied = Vec::new();
        for _ in 0..SHUFFLE_MOVES {
            if let Some(&direction) = candidates.choose(&mut *rng) {
                if self.move_blank(direction) {
                    applied.push(direction);
                }
            }
        }
        debug!(
            "Shuffled with {} of {} attempted moves",
            applied.len(),
            SHUFFLE_MOVES
        );
        applied
    }

    fn set_phase(&self, phase: Phase) {
        info!("Entering phase {phase:?}");
        *lock(&self.phase) = phase;
    }

    /// Play one game. Returns when the player cancels, or confirms after solving the puzzle.
    pub fn run(&self) -> Outcome {
        self.text_box.set_text(WELCOME_TEXT);
        self.text_box.set_visible(true);
        self.set_phase(Phase::Intro);

        while !self.confirm.take() {
            if self.cancel.take() {
                info!("Cancelled before starting");
                return Outcome::Cancelled;
            }
            thread::sleep(self.poll_interval);
        }

        let started = Instant::now();
        self.set_phase(Phase::Shuffling);
        self.text_box.set_visible(false);
        self.allow_moving.store(true, Ordering::Release);
        self.shuffle();
        self.set_phase(Phase::Playing);

        while !self.is_solved() {
            if self.cancel.take() {
                info!("Cancelled while playing");
                return Outcome::Cancelled;
            }
            thread::sleep(self.poll_interval);
        }

        let elapsed = started.elapsed();
        self.allow_moving.store(false, Ordering::Release);
        self.text_box.set_text(&format!(
            "Congratulations\nYou solved the puzzle in {} seconds.\nPress enter to exit.",
            elapsed.as_secs()
        ));
        self.text_box.set_visible(true);
        self.set_phase(Phase::Solved);
        info!("Solved in {:.1}s", elapsed.as_secs_f64());

        while !self.confirm.take() {
            thread::sleep(self.poll_interval);
        }
        Outcome::Solved { elapsed }
    }
}
