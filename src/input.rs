use std::collections::HashSet;

use macroquad::prelude::*;

use crate::grid::Direction;

/// The six rebindable logical actions, in keybind-screen row order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Pause,
    Resume,
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Pause,
        Action::Resume,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Pause => "PAUSE",
            Action::Resume => "RESUME",
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Action -> physical keys. Every action keeps a non-empty key list; the
/// defaults bind arrows plus WASD for movement and Escape for pause/resume.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    bindings: [Vec<KeyCode>; 6],
}

impl Default for KeyBindings {
    fn default() -> Self {
        // Indexed by Action::ALL order.
        Self {
            bindings: [
                vec![KeyCode::Escape],
                vec![KeyCode::Escape],
                vec![KeyCode::Up, KeyCode::W],
                vec![KeyCode::Down, KeyCode::S],
                vec![KeyCode::Left, KeyCode::A],
                vec![KeyCode::Right, KeyCode::D],
            ],
        }
    }
}

impl KeyBindings {
    pub fn keys(&self, action: Action) -> &[KeyCode] {
        &self.bindings[action.index()]
    }

    /// Replace the action's key set with exactly the one pressed key.
    pub fn rebind(&mut self, action: Action, key: KeyCode) {
        self.bindings[action.index()] = vec![key];
    }
}

/// Per-frame input snapshot. Polled once from macroquad at the top of the
/// frame so the state machine itself never touches the window.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub keys_down: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    /// One key captured this frame, for rebinding.
    pub last_key_pressed: Option<KeyCode>,
    pub mouse_pos: Vec2,
    pub mouse_pressed: bool,
    pub mouse_down: bool,
}

impl FrameInput {
    pub fn poll() -> Self {
        let (mx, my) = mouse_position();
        Self {
            keys_down: get_keys_down(),
            keys_pressed: get_keys_pressed(),
            last_key_pressed: get_last_key_pressed(),
            mouse_pos: Vec2::new(mx, my),
            mouse_pressed: is_mouse_button_pressed(MouseButton::Left),
            mouse_down: is_mouse_button_down(MouseButton::Left),
        }
    }

    /// True if any key bound to the action is currently held.
    pub fn is_action_down(&self, bindings: &KeyBindings, action: Action) -> bool {
        bindings.keys(action).iter().any(|k| self.keys_down.contains(k))
    }

    /// True if any key bound to the action was pressed this frame.
    pub fn is_action_pressed(&self, bindings: &KeyBindings, action: Action) -> bool {
        bindings.keys(action).iter().any(|k| self.keys_pressed.contains(k))
    }

    /// Directional resolution with fixed priority Up > Down > Left > Right:
    /// simultaneous opposing holds never combine.
    pub fn held_direction(&self, bindings: &KeyBindings) -> Option<Direction> {
        if self.is_action_down(bindings, Action::Up) {
            Some(Direction::Up)
        } else if self.is_action_down(bindings, Action::Down) {
            Some(Direction::Down)
        } else if self.is_action_down(bindings, Action::Left) {
            Some(Direction::Left)
        } else if self.is_action_down(bindings, Action::Right) {
            Some(Direction::Right)
        } else {
            None
        }
    }

    pub fn clicked(&self, rect: Rect) -> bool {
        self.mouse_pressed && rect.contains(self.mouse_pos)
    }
}

/// Display name for the keybinds screen.
pub fn key_name(key: KeyCode) -> String {
    match key {
        KeyCode::Escape => "ESC".to_string(),
        KeyCode::Up => "UP".to_string(),
        KeyCode::Down => "DOWN".to_string(),
        KeyCode::Left => "LEFT".to_string(),
        KeyCode::Right => "RIGHT".to_string(),
        KeyCode::Space => "SPACE".to_string(),
        KeyCode::Enter => "ENTER".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}
