//! Things that can be put on the screen.
//!
//! Every drawable knows where it sits relative to its parent, how large it is, whether it is
//! visible, and what its character rows look like. Drawables may own children, which are drawn
//! on top of them and clipped to their area.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::grid::Placed;
use crate::position::Position;

pub trait Drawable: Send + Sync {
    /// Top-left corner in character cells, relative to the parent.
    fn position(&self) -> Position;

    /// (width, height) in character cells.
    fn size(&self) -> (u16, u16);

    fn is_visible(&self) -> bool;

    /// Character rows to paint, top to bottom. Spaces are painted too.
    fn rows(&self) -> Vec<String>;

    fn children(&self) -> &[Arc<dyn Drawable>] {
        &[]
    }
}

fn read<T: Clone>(lock: &RwLock<T>) -> T {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write<T>(lock: &RwLock<T>, value: T) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = value;
}

/// What is painted on a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Face {
    Blank,
    Value(String),
    Picture(Vec<String>),
}

/// A movable board tile. Its position is kept in board cells and scaled by the tile size when
/// drawn.
#[derive(Debug)]
pub struct Tile {
    face: Face,
    width: u16,
    height: u16,
    data: Vec<String>,
    cell: RwLock<Position>,
}

impl Tile {
    pub fn blank(width: u16, height: u16) -> Self {
        Self::with_face(Face::Blank, width, height)
    }

    pub fn value(label: &str, width: u16, height: u16) -> Self {
        Self::with_face(Face::Value(label.to_string()), width, height)
    }

    pub fn picture(rows: Vec<String>, width: u16, height: u16) -> Self {
        Self::with_face(Face::Picture(rows), width, height)
    }

    fn with_face(face: Face, width: u16, height: u16) -> Self {
        let data = render_face(&face, width as usize, height as usize);
        Tile {
            face,
            width,
            height,
            data,
            cell: RwLock::new(Position::default()),
        }
    }

    #[cfg(test)]
    pub fn face(&self) -> &Face {
        &self.face
    }

    pub fn is_blank(&self) -> bool {
        self.face == Face::Blank
    }

    /// Board cell the tile currently occupies.
    pub fn cell(&self) -> Position {
        read(&self.cell)
    }

    pub fn set_cell(&self, cell: Position) {
        write(&self.cell, cell);
    }
}

fn render_face(face: &Face, width: usize, height: usize) -> Vec<String> {
    match face {
        Face::Blank => vec![" ".repeat(width); height],
        Face::Value(label) => {
            let inner = width.saturating_sub(2);
            let edge = format!(" {} ", "-".repeat(inner));
            let middle = format!("|{}|", " ".repeat(inner));
            let mut rows = vec![middle; height];
            if let Some(first) = rows.first_mut() {
                *first = edge.clone();
            }
            if let Some(last) = rows.last_mut() {
                *last = edge;
            }
            if height > 0 {
                rows[height / 2] = format!("|{:^inner$}|", label);
            }
            rows
        }
        Face::Picture(rows) => (0..height)
            .map(|y| {
                let row = rows.get(y).map(String::as_str).unwrap_or("");
                let mut line: String = row.chars().take(width).collect();
                let len = line.chars().count();
                line.extend(std::iter::repeat_n(' ', width - len));
                line
            })
            .collect(),
    }
}

impl Drawable for Tile {
    fn position(&self) -> Position {
        let cell = self.cell();
        Position::new(
            cell.x * self.width as i32,
            cell.y * self.height as i32,
        )
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn rows(&self) -> Vec<String> {
        self.data.clone()
    }
}

impl Placed for Arc<Tile> {
    fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }

    fn place(&self) -> Position {
        self.cell()
    }

    fn set_place(&self, place: Position) {
        self.set_cell(place);
    }
}

/// Framed message box. Lines are word-wrapped and centred; whatever does not fit is dropped.
#[derive(Debug)]
pub struct TextBox {
    position: Position,
    width: u16,
    height: u16,
    text: RwLock<String>,
    data: RwLock<Vec<String>>,
    visible: AtomicBool,
}

impl TextBox {
    pub fn new(text: &str, width: u16, height: u16, position: Position) -> Self {
        let text_box = TextBox {
            position,
            width,
            height,
            text: RwLock::new(String::new()),
            data: RwLock::new(Vec::new()),
            visible: AtomicBool::new(true),
        };
        text_box.set_text(text);
        text_box
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        read(&self.text)
    }

    pub fn set_text(&self, text: &str) {
        let width = self.width as usize;
        let height = self.height as usize;
        let inner = width.saturating_sub(2);
        let border = "#".repeat(width);

        let mut data = vec![border.clone()];
        let lines = text.split('\n').flat_map(|line| wrap(line, inner));
        for line in lines {
            if data.len() >= height.saturating_sub(1) {
                break;
            }
            data.push(format!("#{:^inner$}#", line));
        }
        while data.len() < height {
            data.push(format!("#{}#", " ".repeat(inner)));
        }
        if let Some(last) = data.last_mut() {
            *last = border;
        }

        write(&self.text, text.to_string());
        write(&self.data, data);
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }
}

/// Greedy word wrap. Words longer than the width are split.
fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

impl Drawable for TextBox {
    fn position(&self) -> Position {
        self.position
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    fn rows(&self) -> Vec<String> {
        read(&self.data)
    }
}

/// Transparent container holding the tiles of the board.
pub struct Board {
    position: Position,
    width: u16,
    height: u16,
    children: Vec<Arc<dyn Drawable>>,
}

impl Board {
    pub fn new(width: u16, height: u16, position: Position) -> Self {
        Board {
            position,
            width,
            height,
            children: Vec::new(),
        }
    }

    pub fn add_drawable(&mut self, drawable: Arc<dyn Drawable>) {
        self.children.push(drawable);
    }
}

impl Drawable for Board {
    fn position(&self) -> Position {
        self.position
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn rows(&self) -> Vec<String> {
        Vec::new()
    }

    fn children(&self) -> &[Arc<dyn Drawable>] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_tile_rows() {
        let tile = Tile::value("7", 6, 5);
        assert_eq!(
            tile.rows(),
            vec![" ---- ", "|    |", "| 7  |", "|    |", " ---- "]
        );
    }

    #[test]
    fn test_blank_tile_rows() {
        let tile = Tile::blank(3, 2);
        assert!(tile.is_blank());
        assert_eq!(tile.rows(), vec!["   ", "   "]);
    }

    #[test]
    fn test_picture_tile_pads_and_truncates() {
        let tile = Tile::picture(vec!["abcdef".to_string(), "x".to_string()], 4, 3);
        assert_eq!(tile.rows(), vec!["abcd", "x   ", "    "]);
    }

    #[test]
    fn test_blank_tile_is_drawn() {
        // The blank is painted as spaces, so it stays visible and covers what was under it
        let tile = Tile::blank(2, 2);
        assert!(tile.is_visible());
        assert!(tile.children().is_empty());
    }

    #[test]
    fn test_tile_position_scales_cell() {
        let tile = Tile::value("1", 8, 4);
        tile.set_cell(Position::new(2, 1));
        assert_eq!(tile.cell(), Position::new(2, 1));
        assert_eq!(tile.position(), Position::new(16, 4));
    }

    #[test]
    fn test_tile_identity() {
        let a = Arc::new(Tile::value("1", 4, 3));
        let b = Arc::new(Tile::value("1", 4, 3));
        assert!(a.is_same(&Arc::clone(&a)));
        assert!(!a.is_same(&b));
    }

    #[test]
    fn test_visibility() {
        let text_box = TextBox::new("hi", 10, 4, Position::new(1, 1));
        assert!(text_box.is_visible());
        text_box.set_visible(false);
        assert!(!text_box.is_visible());
    }

    #[test]
    fn test_text_box_layout() {
        let text_box = TextBox::new("Hello\nWorld", 9, 5, Position::default());
        assert_eq!(
            text_box.rows(),
            vec!["#########", "# Hello #", "# World #", "#       #", "#########"]
        );
        assert_eq!(text_box.text(), "Hello\nWorld");
    }

    #[test]
    fn test_text_box_drops_overflow() {
        let text_box = TextBox::new("one\ntwo\nthree\nfour", 9, 4, Position::default());
        let rows = text_box.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], "#  one  #");
        assert_eq!(rows[2], "#  two  #");
        assert_eq!(rows[3], "#########");
    }

    #[test]
    fn test_set_text_replaces_rows() {
        let text_box = TextBox::new("a", 5, 3, Position::default());
        text_box.set_text("b");
        assert_eq!(text_box.rows()[1], "# b #");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("short", 10), vec!["short"]);
        assert_eq!(
            wrap("Use arrow keys to move", 10),
            vec!["Use arrow", "keys to", "move"]
        );
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("anything", 0).is_empty());
    }

    #[test]
    fn test_board_children() {
        let mut board = Board::new(10, 10, Position::new(2, 3));
        board.add_drawable(Arc::new(Tile::blank(5, 5)));
        board.add_drawable(Arc::new(Tile::value("1", 5, 5)));
        assert_eq!(board.children().len(), 2);
        assert!(board.rows().is_empty());
        assert_eq!(board.position(), Position::new(2, 3));
    }
}
