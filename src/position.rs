use std::fmt;
use std::ops::Add;

/// A coordinate on the board (grid cells) or on the screen (character cells).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[cfg(test)]
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// Offset from the blank tile to the tile that slides into it.
    ///
    /// The direction names the way the *numbered* tile travels, so `Down`
    /// pulls in the tile above the blank.
    pub fn offset(&self) -> Position {
        match self {
            Direction::Down => Position::new(0, -1),
            Direction::Up => Position::new(0, 1),
            Direction::Left => Position::new(1, 0),
            Direction::Right => Position::new(-1, 0),
        }
    }

    #[cfg(test)]
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        assert_eq!(Position::new(2, 3) + Position::new(-1, 4), Position::new(1, 7));
        assert_eq!(Position::new(0, 0) + Position::default(), Position::new(0, 0));
    }

    #[test]
    fn test_offset_table() {
        assert_eq!(Direction::Down.offset(), Position::new(0, -1));
        assert_eq!(Direction::Up.offset(), Position::new(0, 1));
        assert_eq!(Direction::Left.offset(), Position::new(1, 0));
        assert_eq!(Direction::Right.offset(), Position::new(-1, 0));
    }

    #[test]
    fn test_opposite_cancels_offset() {
        for dir in ALL_DIRECTIONS {
            let there = Position::new(5, 5) + dir.offset();
            assert_eq!(there + dir.opposite().offset(), Position::new(5, 5));
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(1, -2).to_string(), "(1, -2)");
        assert_eq!(Direction::Left.to_string(), "Left");
    }
}
