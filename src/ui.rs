//! Panel layout and per-state drawing. Layout rectangles live here so the
//! update routines hit-test the exact same geometry the draw routines paint.

use macroquad::prelude::*;

use crate::game::{AppState, Game};
use crate::input::{key_name, Action, FrameInput};
use crate::timing::Countdown;

pub const BUTTON_WIDTH: f32 = 200.0;
pub const BUTTON_HEIGHT: f32 = 50.0;
const BUTTON_SPACING: f32 = 20.0;

const SCREEN_W: f32 = crate::grid::SCREEN_WIDTH as f32;
const SCREEN_H: f32 = crate::grid::SCREEN_HEIGHT as f32;

fn button_stack<const N: usize>(start_y: f32) -> [Rect; N] {
    let x = SCREEN_W / 2.0 - BUTTON_WIDTH / 2.0;
    std::array::from_fn(|i| {
        Rect::new(
            x,
            start_y + i as f32 * (BUTTON_HEIGHT + BUTTON_SPACING),
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        )
    })
}

/// Start menu: Play, Settings, Quit, centered vertically.
pub fn menu_buttons() -> [Rect; 3] {
    let total = 3.0 * BUTTON_HEIGHT + 2.0 * BUTTON_SPACING;
    button_stack((SCREEN_H - total) / 2.0)
}

/// Pause menu: Resume, Settings, Restart, Main Menu, centered below the title.
pub fn pause_buttons() -> [Rect; 4] {
    let total = 4.0 * BUTTON_HEIGHT + 3.0 * BUTTON_SPACING;
    let title_bottom = 80.0 + 60.0;
    let available = SCREEN_H - title_bottom - 20.0;
    button_stack(title_bottom + (available - total) / 2.0 + 20.0)
}

/// Confirmation dialogs: (Yes, No) flanking the screen center.
pub fn confirm_buttons() -> (Rect, Rect) {
    let y = SCREEN_H / 2.0 + 40.0;
    (
        Rect::new(SCREEN_W / 2.0 - BUTTON_WIDTH - 10.0, y, BUTTON_WIDTH, BUTTON_HEIGHT),
        Rect::new(SCREEN_W / 2.0 + 10.0, y, BUTTON_WIDTH, BUTTON_HEIGHT),
    )
}

pub fn length_slider() -> Rect {
    Rect::new(100.0, 150.0, 200.0, 10.0)
}

pub fn tick_rate_slider() -> Rect {
    Rect::new(100.0, 250.0, 200.0, 10.0)
}

pub fn wrapping_checkbox() -> Rect {
    Rect::new(100.0, 345.0, 20.0, 20.0)
}

pub fn keybinds_button() -> Rect {
    Rect::new(100.0, 410.0, 200.0, 40.0)
}

pub fn back_button() -> Rect {
    Rect::new(SCREEN_W - 120.0, SCREEN_H - 60.0, 100.0, 40.0)
}

pub fn keybind_row(index: usize) -> Rect {
    Rect::new(100.0, 100.0 + index as f32 * 50.0, 400.0, 40.0)
}

fn button_fill(rect: Rect, mouse: Vec2) -> Color {
    // Hover feedback.
    if rect.contains(mouse) { GRAY } else { LIGHTGRAY }
}

fn draw_label_in_rect(text: &str, rect: Rect, font_size: u16, color: Color) {
    let dims = measure_text(text, None, font_size, 1.0);
    let x = rect.x + (rect.w - dims.width) / 2.0;
    let y = rect.y + (rect.h + dims.offset_y) / 2.0;
    draw_text(text, x, y, font_size as f32, color);
}

fn draw_button(text: &str, rect: Rect, mouse: Vec2) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, button_fill(rect, mouse));
    draw_label_in_rect(text, rect, 30, BLACK);
}

fn draw_text_centered(text: &str, y: f32, font_size: u16, color: Color) {
    let dims = measure_text(text, None, font_size, 1.0);
    draw_text(text, (SCREEN_W - dims.width) / 2.0, y, font_size as f32, color);
}

fn draw_slider(rect: Rect, ratio: f32, value_text: &str) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, LIGHTGRAY);
    let knob_x = rect.x + ratio * rect.w - 5.0;
    draw_rectangle(knob_x, rect.y - 5.0, 10.0, 20.0, DARKGRAY);
    draw_text(value_text, rect.x + rect.w + 20.0, rect.y + 10.0, 20.0, DARKBLUE);
}

impl Game {
    /// Render the current state. Read-only; the background is cleared once
    /// per frame before any other draw call.
    pub fn draw(&self, input: &FrameInput, now_ms: f64) {
        clear_background(WHITE);
        match self.state {
            AppState::StartMenu => self.draw_start_menu(input),
            AppState::Settings => self.draw_settings(input),
            AppState::Keybinds => self.draw_keybinds(input),
            AppState::Countdown => draw_countdown(&self.countdown, now_ms),
            AppState::Playing => self.draw_playfield(),
            AppState::Pause => self.draw_pause(input),
            AppState::ConfirmRestart => draw_confirm("Restart game?", input),
            AppState::ConfirmMainMenu => draw_confirm("Return to Main Menu?", input),
            AppState::GameOver => self.draw_game_over(),
        }
    }

    fn draw_start_menu(&self, input: &FrameInput) {
        draw_text_centered("SNAKEY", 130.0, 60, DARKBLUE);
        let [play, settings, quit] = menu_buttons();
        draw_button("PLAY", play, input.mouse_pos);
        draw_button("SETTINGS", settings, input.mouse_pos);
        draw_button("QUIT", quit, input.mouse_pos);
    }

    fn draw_settings(&self, input: &FrameInput) {
        draw_text_centered("SETTINGS", 55.0, 40, DARKBLUE);

        draw_text("INITIAL SNAKE LENGTH", 100.0, 125.0, 20.0, DARKGRAY);
        let length_ratio = (self.settings.initial_snake_length - 1) as f32 / 9.0;
        draw_slider(
            length_slider(),
            length_ratio,
            &self.settings.initial_snake_length.to_string(),
        );

        draw_text("TICK RATE (ms)", 100.0, 225.0, 20.0, DARKGRAY);
        let tick_ratio = (self.settings.tick_rate_ms - 50) as f32 / 450.0;
        draw_slider(
            tick_rate_slider(),
            tick_ratio,
            &self.settings.tick_rate_ms.to_string(),
        );

        let checkbox = wrapping_checkbox();
        draw_text("WRAPPING", checkbox.x + 40.0, checkbox.y + 16.0, 20.0, DARKGRAY);
        draw_rectangle(checkbox.x, checkbox.y, checkbox.w, checkbox.h, LIGHTGRAY);
        if self.settings.wrapping_enabled {
            draw_line(checkbox.x, checkbox.y, checkbox.x + checkbox.w, checkbox.y + checkbox.h, 2.0, DARKBLUE);
            draw_line(checkbox.x, checkbox.y + checkbox.h, checkbox.x + checkbox.w, checkbox.y, 2.0, DARKBLUE);
        }

        draw_button("KEYBINDS", keybinds_button(), input.mouse_pos);
        draw_button("BACK", back_button(), input.mouse_pos);
    }

    fn draw_keybinds(&self, input: &FrameInput) {
        draw_text_centered("KEYBINDS", 55.0, 40, DARKBLUE);
        for (i, action) in Action::ALL.into_iter().enumerate() {
            let row = keybind_row(i);
            draw_rectangle(row.x, row.y, row.w, row.h, LIGHTGRAY);
            draw_text(action.label(), row.x + 10.0, row.y + 26.0, 20.0, DARKBLUE);
            // Rebinding collapses a set to one key, so the first is the one to show.
            let key = self.bindings.keys(action)[0];
            draw_text(&key_name(key), row.x + 250.0, row.y + 26.0, 20.0, MAROON);
            if self.pending_rebind == Some(action) {
                draw_rectangle_lines(row.x, row.y, row.w, row.h, 2.0, RED);
            }
        }
        draw_button("BACK", back_button(), input.mouse_pos);
    }

    fn draw_playfield(&self) {
        let food = self.food.get_position().to_rect();
        draw_rectangle(food.x, food.y, food.w, food.h, RED);
        for segment in self.snake.segments() {
            let rect = segment.to_rect();
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, GREEN);
        }
    }

    fn draw_pause(&self, input: &FrameInput) {
        self.draw_playfield();
        draw_rectangle(0.0, 0.0, SCREEN_W, SCREEN_H, Color::new(1.0, 1.0, 1.0, 0.8));
        draw_text_centered("PAUSED", 130.0, 60, DARKBLUE);
        let [resume, settings, restart, main_menu] = pause_buttons();
        draw_button("RESUME", resume, input.mouse_pos);
        draw_button("SETTINGS", settings, input.mouse_pos);
        draw_button("RESTART", restart, input.mouse_pos);
        draw_button("MAIN MENU", main_menu, input.mouse_pos);
    }

    fn draw_game_over(&self) {
        draw_text_centered("GAME OVER", 150.0, 60, MAROON);
        let length = format!("Length: {}", self.snake.get_length());
        draw_text_centered(&length, 220.0, 30, DARKBLUE);
        let best = format!("BEST LENGTH: {}", self.best_length);
        draw_text_centered(&best, 270.0, 30, DARKBLUE);
        draw_text_centered("Click anywhere to return", 365.0, 20, DARKGRAY);
    }
}

fn draw_countdown(countdown: &Countdown, now_ms: f64) {
    let text = format!("Starting in {}...", countdown.remaining_secs(now_ms) + 1);
    draw_text_centered(&text, SCREEN_H / 2.0, 40, DARKBLUE);
}

fn draw_confirm(question: &str, input: &FrameInput) {
    draw_text_centered(question, 130.0, 40, MAROON);
    let (yes, no) = confirm_buttons();
    draw_button("YES", yes, input.mouse_pos);
    draw_button("NO", no, input.mouse_pos);
}
