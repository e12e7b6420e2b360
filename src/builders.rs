//! Build the drawables a game needs: the blank tile, the other tiles in solved order, the message
//! box, and the board holding the tiles.

use std::fmt;
use std::io;
use std::sync::Arc;

use log::debug;

use crate::drawables::{Board, Drawable, TextBox, Tile};
use crate::picture::Picture;
use crate::position::Position;

/// Largest board drawn, in character cells. Bigger terminals leave the rest empty.
const MAX_BOARD_WIDTH: u16 = 100;
const MAX_BOARD_HEIGHT: u16 = 70;

const MIN_TILE_HEIGHT: u16 = 3;

/// Error type for setting up a game session.
#[derive(Debug)]
pub enum SetupError {
    /// IO error talking to the terminal
    Io(io::Error),
    /// The picture could not be read or decoded
    Image(image::ImageError),
    /// The terminal cannot fit a board of this size
    BoardTooLarge { size: usize, columns: u16, rows: u16 },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Io(err) => write!(f, "IO error: {}", err),
            SetupError::Image(err) => write!(f, "Invalid picture: {}", err),
            SetupError::BoardTooLarge {
                size,
                columns,
                rows,
            } => write!(
                f,
                "A {size}x{size} board does not fit in a {columns}x{rows} terminal"
            ),
        }
    }
}

impl std::error::Error for SetupError {}

impl From<io::Error> for SetupError {
    fn from(err: io::Error) -> Self {
        SetupError::Io(err)
    }
}

impl From<image::ImageError> for SetupError {
    fn from(err: image::ImageError) -> Self {
        SetupError::Image(err)
    }
}

/// Tile dimensions, in character cells, for a board of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub size: usize,
    pub tile_width: u16,
    pub tile_height: u16,
}

impl Layout {
    /// Largest tiles that let a `size` x `size` board fit in `area` (columns, rows).
    pub fn fit(size: usize, area: (u16, u16)) -> Result<Self, SetupError> {
        let (columns, rows) = area;
        let too_large = SetupError::BoardTooLarge {
            size,
            columns,
            rows,
        };
        let Ok(cells) = u16::try_from(size) else {
            return Err(too_large);
        };
        if cells == 0 {
            return Err(too_large);
        }

        let tile_width = columns.min(MAX_BOARD_WIDTH) / cells;
        let tile_height = rows.min(MAX_BOARD_HEIGHT) / cells;
        let label_width = (size * size - 1).to_string().len() as u16;
        if tile_width < label_width + 2 || tile_height < MIN_TILE_HEIGHT {
            return Err(too_large);
        }

        Ok(Layout {
            size,
            tile_width,
            tile_height,
        })
    }

    pub fn board_width(&self) -> u16 {
        self.tile_width * self.size as u16
    }

    pub fn board_height(&self) -> u16 {
        self.tile_height * self.size as u16
    }
}

/// Everything drawn during a game.
pub struct GameData {
    pub blank: Arc<Tile>,
    /// Non-blank tiles in solved, row-major order, following the blank.
    pub tiles: Vec<Arc<Tile>>,
    pub text_box: Arc<TextBox>,
    pub board: Board,
}

/// Numbered tiles labelled `1..size*size`.
pub fn text_game(layout: &Layout) -> GameData {
    let count = layout.size * layout.size;
    let tiles = (1..count)
        .map(|value| {
            Arc::new(Tile::value(
                &value.to_string(),
                layout.tile_width,
                layout.tile_height,
            ))
        })
        .collect();
    debug!("Built {} numbered tiles", count - 1);
    assemble(layout, tiles)
}

/// Tiles cut out of a picture. The top-left cell is replaced by the blank tile.
pub fn picture_game(layout: &Layout, picture: &Picture) -> GameData {
    let tiles = picture
        .cells(layout.size, layout.tile_width, layout.tile_height)
        .into_iter()
        .skip(1)
        .map(|rows| Arc::new(Tile::picture(rows, layout.tile_width, layout.tile_height)))
        .collect::<Vec<_>>();
    debug!("Built {} picture tiles", tiles.len());
    assemble(layout, tiles)
}

fn assemble(layout: &Layout, tiles: Vec<Arc<Tile>>) -> GameData {
    let blank = Arc::new(Tile::blank(layout.tile_width, layout.tile_height));
    for (index, tile) in std::iter::once(&blank).chain(&tiles).enumerate() {
        tile.set_cell(Position::new(
            (index % layout.size) as i32,
            (index / layout.size) as i32,
        ));
    }

    let mut board = Board::new(
        layout.board_width(),
        layout.board_height(),
        Position::default(),
    );
    board.add_drawable(Arc::clone(&blank) as Arc<dyn Drawable>);
    for tile in &tiles {
        board.add_drawable(Arc::clone(tile) as Arc<dyn Drawable>);
    }

    // Centred over the board, half its size
    let width = layout.board_width() / 2;
    let height = (layout.board_height() / 2)
        .max(MIN_TILE_HEIGHT)
        .min(layout.board_height());
    let text_box = Arc::new(TextBox::new(
        "",
        width,
        height,
        Position::new(
            (layout.board_width() / 4) as i32,
            (layout.board_height() / 4) as i32,
        ),
    ));

    GameData {
        blank,
        tiles,
        text_box,
        board,
    }
}
