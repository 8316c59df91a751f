use macroquad::prelude::*;

// Fixed playfield: 800x600 pixels at 20px per cell.
pub const BLOCK_SIZE: i32 = 20;
pub const GRID_WIDTH: i32 = 40;
pub const GRID_HEIGHT: i32 = 30;
pub const SCREEN_WIDTH: i32 = GRID_WIDTH * BLOCK_SIZE;
pub const SCREEN_HEIGHT: i32 = GRID_HEIGHT * BLOCK_SIZE;

/// A position on the game grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < GRID_WIDTH && self.y >= 0 && self.y < GRID_HEIGHT
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(
            (self.x * BLOCK_SIZE) as f32,
            (self.y * BLOCK_SIZE) as f32,
            BLOCK_SIZE as f32,
            BLOCK_SIZE as f32,
        )
    }
}

/// Direction the snake can move.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset (dx, dy) for one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// True if turning from `self` to `other` would be a 180-degree turn.
    pub fn is_opposite(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deltas() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Up));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Right.is_opposite(Direction::Down));
    }

    #[test]
    fn bounds_checking() {
        assert!(Cell::new(0, 0).in_bounds());
        assert!(Cell::new(GRID_WIDTH - 1, GRID_HEIGHT - 1).in_bounds());
        assert!(!Cell::new(-1, 0).in_bounds());
        assert!(!Cell::new(0, -1).in_bounds());
        assert!(!Cell::new(GRID_WIDTH, 0).in_bounds());
        assert!(!Cell::new(0, GRID_HEIGHT).in_bounds());
    }
}
