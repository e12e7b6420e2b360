//! Redraw loop shared by all presentation surfaces.
//!
//! The [`DrawingEngine`] keeps a canvas of drawables and a table of key callbacks. Each frame it
//! paints the canvas into a [`ScreenBuffer`], hands the buffer to its [`Surface`], and waits up
//! to one refresh interval for a key press to dispatch.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};

use crate::drawables::Drawable;
use crate::position::Position;

pub const REFRESH_INTERVAL: Duration = Duration::from_millis(1000 / 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

pub type Callback = Box<dyn Fn() + Send + Sync>;

/// Somewhere frames can be shown and key presses come from.
pub trait Surface {
    /// (columns, rows) available for drawing.
    fn size(&self) -> io::Result<(u16, u16)>;

    fn present(&mut self, frame: &ScreenBuffer) -> io::Result<()>;

    /// Wait up to `timeout` for a key press.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(position: Position, (width, height): (u16, u16)) -> Self {
        Rect {
            left: position.x,
            top: position.y,
            right: position.x + width as i32,
            bottom: position.y + height as i32,
        }
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Character grid a frame is composed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            width,
            height,
            cells: vec![' '; width as usize * height as usize],
        }
    }

    pub fn area(&self) -> Rect {
        Rect::new(Position::default(), (self.width, self.height))
    }

    /// Write `text` starting at `at`, skipping characters outside `clip`.
    pub fn put(&mut self, at: Position, text: &str, clip: &Rect) {
        let clip = clip.intersect(&self.area());
        for (dx, ch) in text.chars().enumerate() {
            let x = at.x + dx as i32;
            if clip.contains(x, at.y) {
                self.cells[at.y as usize * self.width as usize + x as usize] = ch;
            }
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .take(self.height as usize)
            .map(|row| row.iter().collect())
            .collect()
    }
}

/// Paint a drawable and its children. Children are offset by their parent's position and
/// clipped to its area; a hidden drawable hides its children too.
pub fn compose(frame: &mut ScreenBuffer, drawable: &dyn Drawable, origin: Position, clip: &Rect) {
    if !drawable.is_visible() {
        return;
    }
    let position = origin + drawable.position();
    let area = Rect::new(position, drawable.size()).intersect(clip);

    for (dy, row) in drawable.rows().iter().enumerate() {
        frame.put(position + Position::new(0, dy as i32), row, &area);
    }
    for child in drawable.children() {
        compose(frame, child.as_ref(), position, &area);
    }
}

pub struct DrawingEngine<S: Surface> {
    surface: S,
    canvas: Vec<Arc<dyn Drawable>>,
    callbacks: HashMap<Key, Callback>,
    refresh: Duration,
}

impl<S: Surface> DrawingEngine<S> {
    pub fn new(surface: S) -> Self {
        DrawingEngine {
            surface,
            canvas: Vec::new(),
            callbacks: HashMap::new(),
            refresh: REFRESH_INTERVAL,
        }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Add a drawable on top of those already on the canvas.
    pub fn add_to_canvas(&mut self, drawable: Arc<dyn Drawable>) {
        self.canvas.push(drawable);
    }

    pub fn set_callback<F>(&mut self, key: Key, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.insert(key, Box::new(callback));
    }

    /// Compose the canvas into a frame the size of the surface.
    pub fn render(&self) -> io::Result<ScreenBuffer> {
        let (width, height) = self.surface.size()?;
        let mut frame = ScreenBuffer::new(width, height);
        let area = frame.area();
        for drawable in &self.canvas {
            compose(&mut frame, drawable.as_ref(), Position::default(), &area);
        }
        Ok(frame)
    }

    /// Draw one frame, then wait for and dispatch at most one key press.
    pub fn draw(&mut self) -> io::Result<()> {
        let frame = self.render()?;
        self.surface.present(&frame)?;

        if let Some(key) = self.surface.poll_key(self.refresh)? {
            trace!("Key pressed: {key:?}");
            if let Some(callback) = self.callbacks.get(&key) {
                callback();
            }
        }
        Ok(())
    }

    /// Redraw until `finished` returns true.
    pub fn run_until<F: Fn() -> bool>(&mut self, finished: F) -> io::Result<()> {
        debug!("Starting redraw loop");
        while !finished() {
            self.draw()?;
        }
        // Last frame, so the final state is on screen
        let frame = self.render()?;
        self.surface.present(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawables::{Board, TextBox, Tile};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory surface fed with scripted key presses.
    struct ScriptedSurface {
        size: (u16, u16),
        keys: VecDeque<Key>,
        frames: Vec<ScreenBuffer>,
    }

    impl ScriptedSurface {
        fn new(size: (u16, u16), keys: &[Key]) -> Self {
            ScriptedSurface {
                size,
                keys: keys.iter().copied().collect(),
                frames: Vec::new(),
            }
        }
    }

    impl Surface for ScriptedSurface {
        fn size(&self) -> io::Result<(u16, u16)> {
            Ok(self.size)
        }

        fn present(&mut self, frame: &ScreenBuffer) -> io::Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<Key>> {
            Ok(self.keys.pop_front())
        }
    }

    #[test]
    fn test_put_clips() {
        let mut frame = ScreenBuffer::new(5, 2);
        let clip = Rect::new(Position::new(1, 0), (3, 2));
        frame.put(Position::new(0, 0), "abcdef", &clip);
        frame.put(Position::new(3, 1), "xyz", &frame.area());
        frame.put(Position::new(0, 5), "offscreen", &frame.area());
        assert_eq!(frame.lines(), vec![" bcd ", "   xy"]);
    }

    #[test]
    fn test_compose_tree() {
        let mut board = Board::new(6, 3, Position::new(1, 1));
        let tile = Arc::new(Tile::value("1", 3, 3));
        tile.set_cell(Position::new(1, 0));
        board.add_drawable(tile.clone());
        board.add_drawable(Arc::new(Tile::blank(3, 3)));

        let mut frame = ScreenBuffer::new(8, 5);
        let area = frame.area();
        compose(&mut frame, &board, Position::default(), &area);
        assert_eq!(
            frame.lines(),
            vec!["        ", "     -  ", "    |1| ", "     -  ", "        "]
        );
    }

    #[test]
    fn test_children_clipped_to_parent() {
        let mut board = Board::new(4, 3, Position::default());
        let tile = Arc::new(Tile::value("2", 3, 3));
        tile.set_cell(Position::new(1, 0));
        board.add_drawable(tile);

        let mut frame = ScreenBuffer::new(8, 3);
        let area = frame.area();
        compose(&mut frame, &board, Position::default(), &area);
        assert_eq!(frame.lines(), vec!["        ", "   |    ", "        "]);
    }

    #[test]
    fn test_hidden_drawable_not_painted() {
        let text_box = TextBox::new("hi", 4, 3, Position::default());
        text_box.set_visible(false);
        let mut frame = ScreenBuffer::new(4, 3);
        let area = frame.area();
        compose(&mut frame, &text_box, Position::default(), &area);
        assert_eq!(frame.lines(), vec!["    "; 3]);
    }

    #[test]
    fn test_canvas_order() {
        let mut engine = DrawingEngine::new(ScriptedSurface::new((6, 3), &[]));
        engine.add_to_canvas(Arc::new(Tile::value("1", 6, 3)));
        engine.add_to_canvas(Arc::new(TextBox::new("", 4, 3, Position::new(1, 0))));

        let frame = engine.render().unwrap();
        assert_eq!(frame.lines(), vec![" #### ", "|#  #|", " #### "]);
    }

    #[test]
    fn test_keys_dispatch_to_callbacks() {
        let presses = Arc::new(AtomicUsize::new(0));
        let enters = Arc::new(AtomicUsize::new(0));
        let keys = [Key::ArrowUp, Key::Enter, Key::Escape, Key::ArrowUp];
        let mut engine = DrawingEngine::new(ScriptedSurface::new((4, 2), &keys));

        let counter = Arc::clone(&presses);
        engine.set_callback(Key::ArrowUp, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&enters);
        engine.set_callback(Key::Enter, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for _ in 0..keys.len() + 1 {
            engine.draw().unwrap();
        }
        assert_eq!(presses.load(Ordering::SeqCst), 2);
        assert_eq!(enters.load(Ordering::SeqCst), 1);
        assert_eq!(engine.surface().frames.len(), keys.len() + 1);
    }

    #[test]
    fn test_run_until() {
        let enters = Arc::new(AtomicUsize::new(0));
        let mut engine = DrawingEngine::new(ScriptedSurface::new((4, 2), &[Key::Enter; 3]));
        let counter = Arc::clone(&enters);
        engine.set_callback(Key::Enter, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        engine
            .run_until(|| enters.load(Ordering::SeqCst) >= 2)
            .unwrap();
        assert_eq!(enters.load(Ordering::SeqCst), 2);
        // Two frames with key dispatch plus the closing frame
        assert_eq!(engine.surface().frames.len(), 3);
    }
}
