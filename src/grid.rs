use crate::position::Position;

/// Something stored in a [`Grid`] that keeps track of its own place.
///
/// The grid rewrites the place of an item whenever it moves it, so readers that only hold the
/// item (the renderer) see where it currently sits.
pub trait Placed {
    /// Identity comparison. Two distinct items may look alike but are never the same.
    fn is_same(&self, other: &Self) -> bool;
    fn place(&self) -> Position;
    fn set_place(&self, place: Position);
}

/// Square container assigning each stored item an (x, y) coordinate in row-major order.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    width: usize,
    items: Vec<T>,
}

impl<T: Placed> Grid<T> {
    /// Panics if `items` does not hold exactly `width * width` entries.
    pub fn new(width: usize, items: Vec<T>) -> Self {
        assert!(
            items.len() == width * width,
            "Grid of width {} needs {} items, got {}",
            width,
            width * width,
            items.len()
        );
        let grid = Grid { width, items };
        for (index, item) in grid.items.iter().enumerate() {
            item.set_place(grid.to_position(index));
        }
        grid
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether the position lies on the board.
    pub fn contains(&self, position: Position) -> bool {
        let width = self.width as i32;
        position.x >= 0 && position.x < width && position.y >= 0 && position.y < width
    }

    /// Item stored at the given position. The position must be on the board.
    pub fn lookup(&self, position: Position) -> &T {
        &self.items[self.to_index(position)]
    }

    /// Position of the given item. Panics if the item is not stored in the grid.
    pub fn position_of(&self, item: &T) -> Position {
        match self.items.iter().position(|other| other.is_same(item)) {
            Some(index) => self.to_position(index),
            None => panic!("Item not found in grid"),
        }
    }

    /// Swap the items at the two positions, along with the places they report.
    pub fn swap(&mut self, lhs: Position, rhs: Position) {
        let (l, r) = (self.to_index(lhs), self.to_index(rhs));
        self.items.swap(l, r);

        let place = self.items[l].place();
        self.items[l].set_place(self.items[r].place());
        self.items[r].set_place(place);
    }

    /// Whether the grid holds exactly these items, in this order.
    pub fn matches(&self, order: &[T]) -> bool {
        self.items.len() == order.len()
            && self.items.iter().zip(order).all(|(a, b)| a.is_same(b))
    }

    fn to_index(&self, position: Position) -> usize {
        assert!(self.contains(position), "Position {} off the board", position);
        position.y as usize * self.width + position.x as usize
    }

    fn to_position(&self, index: usize) -> Position {
        Position::new((index % self.width) as i32, (index / self.width) as i32)
    }
}
