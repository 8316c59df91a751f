use crate::grid::{Cell, Direction, GRID_HEIGHT, GRID_WIDTH};

/// The snake body: head first, tail last, length >= 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: Vec<Cell>,
    current_direction: Direction,
    grow_pending: bool,
}

impl Snake {
    /// Spawn at grid center, laid out horizontally leftwards from the head,
    /// moving right. Length is clamped to at least 1.
    pub fn new(initial_length: i32) -> Self {
        let head = Cell::new(GRID_WIDTH / 2, GRID_HEIGHT / 2);
        let segments = (0..initial_length.max(1))
            .map(|i| head.offset(-i, 0))
            .collect();
        Self {
            segments,
            current_direction: Direction::Right,
            grow_pending: false,
        }
    }

    pub fn get_head(&self) -> Cell {
        self.segments[0]
    }

    /// Overwrite only the head cell. Used for wrap-around correction after
    /// `update`, not as a general mutator.
    pub fn set_head(&mut self, head: Cell) {
        self.segments[0] = head;
    }

    pub fn segments(&self) -> &[Cell] {
        &self.segments
    }

    /// One movement step: prepend a new head one cell along the current
    /// direction, then drop the tail unless growth is pending.
    pub fn update(&mut self) {
        let (dx, dy) = self.current_direction.delta();
        let new_head = self.get_head().offset(dx, dy);
        self.segments.insert(0, new_head);
        if self.grow_pending {
            self.grow_pending = false;
        } else {
            self.segments.pop();
        }
    }

    /// Ignored if the new direction is the exact opposite of the direction
    /// as last set (not the last realized movement vector).
    pub fn set_direction(&mut self, new_direction: Direction) {
        if self.current_direction.is_opposite(new_direction) {
            return;
        }
        self.current_direction = new_direction;
    }

    pub fn direction(&self) -> Direction {
        self.current_direction
    }

    /// Keep the tail on the next `update`. Idempotent within a tick.
    pub fn grow(&mut self) {
        self.grow_pending = true;
    }

    pub fn has_self_collision(&self) -> bool {
        let head = self.get_head();
        self.segments[1..].contains(&head)
    }

    pub fn get_length(&self) -> i32 {
        self.segments.len() as i32
    }
}
