use macroquad::rand::gen_range;

use crate::grid::{Cell, GRID_HEIGHT, GRID_WIDTH};

/// A single food cell. Respawn draws each axis independently over the whole
/// grid and deliberately does not exclude snake-occupied cells: food may sit
/// under the body until the head reaches that cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub(crate) position: Cell,
}

impl Food {
    pub fn new() -> Self {
        let mut food = Self {
            position: Cell::new(0, 0),
        };
        food.respawn();
        food
    }

    pub fn respawn(&mut self) {
        self.position = Cell::new(gen_range(0, GRID_WIDTH), gen_range(0, GRID_HEIGHT));
    }

    pub fn get_position(&self) -> Cell {
        self.position
    }
}

impl Default for Food {
    fn default() -> Self {
        Self::new()
    }
}
