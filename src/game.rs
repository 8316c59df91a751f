use macroquad::prelude::*;

use crate::food::Food;
use crate::grid::{GRID_HEIGHT, GRID_WIDTH};
use crate::input::{Action, FrameInput, KeyBindings};
use crate::snake::Snake;
use crate::timing::{Countdown, TickScheduler};
use crate::ui;

/// The nine application states. Exactly one is active per frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AppState {
    StartMenu,
    Settings,
    Keybinds,
    Countdown,
    Playing,
    Pause,
    ConfirmRestart,
    ConfirmMainMenu,
    GameOver,
}

/// Gameplay configuration, mutated only through the settings screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GameSettings {
    pub initial_snake_length: i32,
    pub tick_rate_ms: i32,
    pub wrapping_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            initial_snake_length: 3,
            tick_rate_ms: 100,
            wrapping_enabled: true,
        }
    }
}

impl GameSettings {
    /// Slider-relative position 0.0..=1.0 -> length 1..=10, linear.
    pub fn set_length_from_slider(&mut self, pos: f32) {
        self.initial_snake_length = (1 + (pos * 9.0) as i32).clamp(1, 10);
    }

    /// Slider-relative position 0.0..=1.0 -> tick rate 50..=500 ms, linear.
    pub fn set_tick_rate_from_slider(&mut self, pos: f32) {
        self.tick_rate_ms = (50 + (pos * 450.0) as i32).clamp(50, 500);
    }
}

/// The top-level controller: owns the snake, food, keybindings and timers,
/// and runs one state's update routine per frame.
pub struct Game {
    pub(crate) state: AppState,
    /// Only used to return from Settings to whichever screen opened it.
    pub(crate) previous_state: AppState,
    pub(crate) settings: GameSettings,
    pub(crate) best_length: i32,
    pub(crate) snake: Snake,
    pub(crate) food: Food,
    pub(crate) bindings: KeyBindings,
    pub(crate) ticks: TickScheduler,
    pub(crate) countdown: Countdown,
    /// Keybind row awaiting a key capture, if any.
    pub(crate) pending_rebind: Option<Action>,
    quit_requested: bool,
}

impl Game {
    pub fn new() -> Self {
        let settings = GameSettings::default();
        Self {
            state: AppState::StartMenu,
            previous_state: AppState::StartMenu,
            settings,
            best_length: 0,
            snake: Snake::new(settings.initial_snake_length),
            food: Food::new(),
            bindings: KeyBindings::default(),
            ticks: TickScheduler::new(0.0),
            countdown: Countdown::started_at(0.0),
            pending_rebind: None,
            quit_requested: false,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn best_length(&self) -> i32 {
        self.best_length
    }

    /// Advance exactly one logical frame: dispatch to the active state's
    /// update routine. `now_ms` is a monotonic millisecond timestamp.
    pub fn update(&mut self, input: &FrameInput, now_ms: f64) {
        match self.state {
            AppState::StartMenu => self.update_start_menu(input, now_ms),
            AppState::Settings => self.update_settings(input),
            AppState::Keybinds => self.update_keybinds(input),
            AppState::Countdown => self.update_countdown(now_ms),
            AppState::Playing => self.update_playing(input, now_ms),
            AppState::Pause => self.update_pause(input),
            AppState::ConfirmRestart => self.update_confirm_restart(input, now_ms),
            AppState::ConfirmMainMenu => self.update_confirm_main_menu(input),
            AppState::GameOver => self.update_game_over(input),
        }
    }

    fn update_start_menu(&mut self, input: &FrameInput, now_ms: f64) {
        let [play, settings, quit] = ui::menu_buttons();
        if input.clicked(play) {
            self.countdown = Countdown::started_at(now_ms);
            self.state = AppState::Countdown;
        } else if input.clicked(settings) {
            self.previous_state = AppState::StartMenu;
            self.state = AppState::Settings;
        } else if input.clicked(quit) {
            info!("quit requested, best length this run: {}", self.best_length);
            self.quit_requested = true;
        }
    }

    fn update_settings(&mut self, input: &FrameInput) {
        // Sliders track the cursor for as long as the button is held.
        if input.mouse_down {
            let slider = ui::length_slider();
            if slider.contains(input.mouse_pos) {
                self.settings
                    .set_length_from_slider((input.mouse_pos.x - slider.x) / slider.w);
            }
            let slider = ui::tick_rate_slider();
            if slider.contains(input.mouse_pos) {
                self.settings
                    .set_tick_rate_from_slider((input.mouse_pos.x - slider.x) / slider.w);
            }
        }
        if input.mouse_pressed {
            if ui::wrapping_checkbox().contains(input.mouse_pos) {
                self.settings.wrapping_enabled = !self.settings.wrapping_enabled;
            }
            if ui::keybinds_button().contains(input.mouse_pos) {
                self.state = AppState::Keybinds;
            }
            if ui::back_button().contains(input.mouse_pos) {
                self.state = self.previous_state;
            }
        }
    }

    fn update_keybinds(&mut self, input: &FrameInput) {
        if input.mouse_pressed {
            for (i, action) in Action::ALL.into_iter().enumerate() {
                if ui::keybind_row(i).contains(input.mouse_pos) {
                    self.pending_rebind = Some(action);
                    break;
                }
            }
            if ui::back_button().contains(input.mouse_pos) {
                self.state = AppState::Settings;
            }
        }
        if let Some(action) = self.pending_rebind {
            if let Some(key) = input.last_key_pressed {
                self.bindings.rebind(action, key);
                self.pending_rebind = None;
                info!("rebound {:?} to {:?}", action, key);
            }
        }
    }

    fn update_countdown(&mut self, now_ms: f64) {
        if self.countdown.expired(now_ms) {
            self.start_round(now_ms);
        }
    }

    /// Fresh snake at the configured length, fresh food, re-armed tick
    /// scheduler. Used for countdown completion and restart confirmation.
    fn start_round(&mut self, now_ms: f64) {
        self.snake = Snake::new(self.settings.initial_snake_length);
        self.food.respawn();
        self.ticks.restart(now_ms);
        self.state = AppState::Playing;
        info!(
            "round start: length {}, tick {}ms, wrapping {}",
            self.settings.initial_snake_length, self.settings.tick_rate_ms,
            self.settings.wrapping_enabled
        );
    }

    fn update_playing(&mut self, input: &FrameInput, now_ms: f64) {
        if input.is_action_pressed(&self.bindings, Action::Pause) {
            self.state = AppState::Pause;
            return;
        }
        // Direction reads raw input every frame so turns land between ticks.
        if let Some(direction) = input.held_direction(&self.bindings) {
            self.snake.set_direction(direction);
        }
        // The interval is read from settings here, not captured at round
        // start, so a tick-rate change made from the pause menu takes
        // effect as soon as play resumes.
        if self.ticks.fire(self.settings.tick_rate_ms, now_ms) {
            self.step();
        }
    }

    /// One simulation step: move, then resolve wrap/crash, self-collision
    /// and food, in that order.
    fn step(&mut self) {
        self.snake.update();
        let mut head = self.snake.get_head();
        if self.settings.wrapping_enabled {
            let mut wrapped = false;
            if head.x < 0 {
                head.x = GRID_WIDTH - 1;
                wrapped = true;
            } else if head.x >= GRID_WIDTH {
                head.x = 0;
                wrapped = true;
            }
            if head.y < 0 {
                head.y = GRID_HEIGHT - 1;
                wrapped = true;
            } else if head.y >= GRID_HEIGHT {
                head.y = 0;
                wrapped = true;
            }
            if wrapped {
                self.snake.set_head(head);
            }
        } else if !head.in_bounds() {
            self.game_over();
            return;
        }
        if self.snake.has_self_collision() {
            self.game_over();
            return;
        }
        if head == self.food.get_position() {
            self.snake.grow();
            self.food.respawn();
        }
    }

    fn game_over(&mut self) {
        let length = self.snake.get_length();
        self.best_length = self.best_length.max(length);
        self.state = AppState::GameOver;
        info!("game over at length {}, best {}", length, self.best_length);
    }

    fn update_pause(&mut self, input: &FrameInput) {
        let [resume, settings, restart, main_menu] = ui::pause_buttons();
        if input.clicked(resume) {
            self.state = AppState::Playing;
        } else if input.clicked(settings) {
            self.previous_state = AppState::Pause;
            self.state = AppState::Settings;
        } else if input.clicked(restart) {
            self.state = AppState::ConfirmRestart;
        } else if input.clicked(main_menu) {
            self.state = AppState::ConfirmMainMenu;
        }

        if input.is_action_pressed(&self.bindings, Action::Resume) {
            self.state = AppState::Playing;
        }
    }

    fn update_confirm_restart(&mut self, input: &FrameInput, now_ms: f64) {
        let (yes, no) = ui::confirm_buttons();
        if input.clicked(yes) {
            self.start_round(now_ms);
        } else if input.clicked(no) {
            self.state = AppState::Pause;
        }
    }

    fn update_confirm_main_menu(&mut self, input: &FrameInput) {
        let (yes, no) = ui::confirm_buttons();
        if input.clicked(yes) {
            self.state = AppState::StartMenu;
        } else if input.clicked(no) {
            self.state = AppState::Pause;
        }
    }

    fn update_game_over(&mut self, input: &FrameInput) {
        if input.mouse_pressed {
            self.state = AppState::StartMenu;
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, Direction};

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn click_at(pos: Vec2) -> FrameInput {
        FrameInput {
            mouse_pos: pos,
            mouse_pressed: true,
            mouse_down: true,
            ..Default::default()
        }
    }

    fn click_in(rect: Rect) -> FrameInput {
        click_at(rect.point() + rect.size() / 2.0)
    }

    fn drag_at(pos: Vec2) -> FrameInput {
        FrameInput {
            mouse_pos: pos,
            mouse_down: true,
            ..Default::default()
        }
    }

    fn press(key: KeyCode) -> FrameInput {
        FrameInput {
            keys_down: [key].into_iter().collect(),
            keys_pressed: [key].into_iter().collect(),
            last_key_pressed: Some(key),
            ..Default::default()
        }
    }

    fn hold(key: KeyCode) -> FrameInput {
        FrameInput {
            keys_down: [key].into_iter().collect(),
            ..Default::default()
        }
    }

    /// A game already in Playing with a 100ms tick armed at t=0.
    fn playing_game() -> Game {
        let mut game = Game::new();
        game.state = AppState::Countdown;
        game.countdown = Countdown::started_at(0.0);
        game.update(&idle(), 3000.0);
        assert_eq!(game.state, AppState::Playing);
        game
    }

    #[test]
    fn play_click_enters_countdown_then_playing() {
        let mut game = Game::new();
        let [play, _, _] = ui::menu_buttons();
        game.update(&click_in(play), 500.0);
        assert_eq!(game.state, AppState::Countdown);

        // Not yet elapsed.
        game.update(&idle(), 3400.0);
        assert_eq!(game.state, AppState::Countdown);

        game.update(&idle(), 3500.0);
        assert_eq!(game.state, AppState::Playing);
        assert_eq!(game.snake.get_length(), game.settings.initial_snake_length);
    }

    #[test]
    fn quit_click_requests_exit() {
        let mut game = Game::new();
        let [_, _, quit] = ui::menu_buttons();
        game.update(&click_in(quit), 0.0);
        assert!(game.quit_requested());
    }

    #[test]
    fn settings_remembers_where_it_was_opened_from() {
        let mut game = Game::new();
        let [_, settings, _] = ui::menu_buttons();
        game.update(&click_in(settings), 0.0);
        assert_eq!(game.state, AppState::Settings);
        game.update(&click_in(ui::back_button()), 0.0);
        assert_eq!(game.state, AppState::StartMenu);

        let mut game = playing_game();
        game.update(&press(KeyCode::Escape), 3010.0);
        assert_eq!(game.state, AppState::Pause);
        let [_, settings, _, _] = ui::pause_buttons();
        game.update(&click_in(settings), 3020.0);
        assert_eq!(game.state, AppState::Settings);
        game.update(&click_in(ui::back_button()), 3030.0);
        assert_eq!(game.state, AppState::Pause);
    }

    #[test]
    fn slider_drag_maps_linearly() {
        let mut game = Game::new();
        game.state = AppState::Settings;

        let slider = ui::length_slider();
        let mid = Vec2::new(slider.x + slider.w / 2.0, slider.y + slider.h / 2.0);
        game.update(&drag_at(mid), 0.0);
        assert_eq!(game.settings.initial_snake_length, 5);

        let slider = ui::tick_rate_slider();
        let mid = Vec2::new(slider.x + slider.w / 2.0, slider.y + slider.h / 2.0);
        game.update(&drag_at(mid), 0.0);
        assert_eq!(game.settings.tick_rate_ms, 275);
    }

    #[test]
    fn slider_endpoint_mapping() {
        let mut settings = GameSettings::default();
        settings.set_length_from_slider(0.0);
        assert_eq!(settings.initial_snake_length, 1);
        settings.set_length_from_slider(1.0);
        assert_eq!(settings.initial_snake_length, 10);

        settings.set_tick_rate_from_slider(0.0);
        assert_eq!(settings.tick_rate_ms, 50);
        settings.set_tick_rate_from_slider(1.0);
        assert_eq!(settings.tick_rate_ms, 500);
    }

    #[test]
    fn wrapping_checkbox_toggles_on_press_edge_only() {
        let mut game = Game::new();
        game.state = AppState::Settings;
        assert!(game.settings.wrapping_enabled);

        game.update(&click_in(ui::wrapping_checkbox()), 0.0);
        assert!(!game.settings.wrapping_enabled);

        // Held but not newly pressed: no further toggle.
        let rect = ui::wrapping_checkbox();
        let held = FrameInput {
            mouse_pos: rect.point() + rect.size() / 2.0,
            mouse_down: true,
            ..Default::default()
        };
        game.update(&held, 0.0);
        assert!(!game.settings.wrapping_enabled);

        game.update(&click_in(ui::wrapping_checkbox()), 0.0);
        assert!(game.settings.wrapping_enabled);
    }

    #[test]
    fn keybind_row_click_then_key_press_rebinds() {
        let mut game = Game::new();
        game.state = AppState::Settings;
        game.update(&click_in(ui::keybinds_button()), 0.0);
        assert_eq!(game.state, AppState::Keybinds);

        // Row 2 is Up.
        game.update(&click_in(ui::keybind_row(2)), 0.0);
        assert_eq!(game.pending_rebind, Some(Action::Up));

        game.update(&press(KeyCode::I), 0.0);
        assert_eq!(game.pending_rebind, None);
        assert_eq!(game.bindings.keys(Action::Up), &[KeyCode::I]);

        game.update(&click_in(ui::back_button()), 0.0);
        assert_eq!(game.state, AppState::Settings);
    }

    #[test]
    fn pause_press_leaves_snake_and_food_untouched() {
        let mut game = playing_game();
        let snake_before = game.snake.clone();
        let food_before = game.food.clone();
        game.update(&press(KeyCode::Escape), 3050.0);
        assert_eq!(game.state, AppState::Pause);
        assert_eq!(game.snake, snake_before);
        assert_eq!(game.food, food_before);
    }

    #[test]
    fn pause_menu_routes() {
        let [resume, _, restart, main_menu] = ui::pause_buttons();

        let mut game = playing_game();
        game.state = AppState::Pause;
        game.update(&click_in(resume), 4000.0);
        assert_eq!(game.state, AppState::Playing);

        game.state = AppState::Pause;
        game.update(&press(KeyCode::Escape), 4000.0);
        assert_eq!(game.state, AppState::Playing);

        game.state = AppState::Pause;
        game.update(&click_in(restart), 4000.0);
        assert_eq!(game.state, AppState::ConfirmRestart);

        game.state = AppState::Pause;
        game.update(&click_in(main_menu), 4000.0);
        assert_eq!(game.state, AppState::ConfirmMainMenu);
    }

    #[test]
    fn confirm_dialogs() {
        let (yes, no) = ui::confirm_buttons();

        let mut game = playing_game();
        game.snake.grow();
        game.snake.update();
        let grown = game.snake.get_length();
        game.state = AppState::ConfirmRestart;
        game.update(&click_in(no), 5000.0);
        assert_eq!(game.state, AppState::Pause);

        game.state = AppState::ConfirmRestart;
        game.update(&click_in(yes), 5000.0);
        assert_eq!(game.state, AppState::Playing);
        // Brand-new body, not the grown one.
        assert_eq!(game.snake.get_length(), game.settings.initial_snake_length);
        assert_ne!(game.snake.get_length(), grown);

        game.state = AppState::ConfirmMainMenu;
        game.update(&click_in(no), 5000.0);
        assert_eq!(game.state, AppState::Pause);

        game.state = AppState::ConfirmMainMenu;
        game.update(&click_in(yes), 5000.0);
        assert_eq!(game.state, AppState::StartMenu);
    }

    #[test]
    fn tick_gating_in_playing() {
        let mut game = playing_game(); // tick armed at 3000, 100ms
        let head = game.snake.get_head();
        game.update(&idle(), 3040.0);
        game.update(&idle(), 3080.0);
        assert_eq!(game.snake.get_head(), head);
        game.update(&idle(), 3110.0);
        assert_eq!(game.snake.get_head(), head.offset(1, 0));
    }

    #[test]
    fn tick_rate_change_from_pause_applies_mid_round() {
        let mut game = playing_game(); // 100ms tick, reference at 3000
        game.update(&press(KeyCode::Escape), 3010.0);
        assert_eq!(game.state, AppState::Pause);

        // Pause -> Settings, drag the tick slider to its midpoint (275ms),
        // Back, resume.
        let [_, settings, _, _] = ui::pause_buttons();
        game.update(&click_in(settings), 3020.0);
        let slider = ui::tick_rate_slider();
        let mid = Vec2::new(slider.x + slider.w / 2.0, slider.y + slider.h / 2.0);
        game.update(&drag_at(mid), 3030.0);
        assert_eq!(game.settings.tick_rate_ms, 275);
        game.update(&click_in(ui::back_button()), 3040.0);
        game.update(&press(KeyCode::Escape), 3050.0);
        assert_eq!(game.state, AppState::Playing);

        // 150ms after the reference: the old 100ms cadence would have
        // stepped already; the new 275ms one must not.
        let head = game.snake.get_head();
        game.update(&idle(), 3150.0);
        assert_eq!(game.snake.get_head(), head);

        game.update(&idle(), 3280.0);
        assert_eq!(game.snake.get_head(), head.offset(1, 0));
    }

    #[test]
    fn movement_scenario_length_three() {
        let mut game = playing_game();
        assert_eq!(
            game.snake.segments(),
            &[Cell::new(20, 15), Cell::new(19, 15), Cell::new(18, 15)]
        );
        game.update(&idle(), 3100.0);
        assert_eq!(game.snake.get_head(), Cell::new(21, 15));
        assert_eq!(game.snake.get_length(), 3);
        assert!(!game.snake.segments().contains(&Cell::new(18, 15)));
    }

    #[test]
    fn held_key_steers_between_ticks() {
        let mut game = playing_game();
        game.update(&hold(KeyCode::W), 3010.0); // no tick yet
        assert_eq!(game.snake.direction(), Direction::Up);
        game.update(&idle(), 3100.0);
        assert_eq!(game.snake.get_head(), Cell::new(20, 14));
    }

    #[test]
    fn wrapping_carries_the_head_across_both_edges() {
        let mut game = playing_game();
        game.snake = Snake::new(1);
        game.snake.set_head(Cell::new(GRID_WIDTH - 1, 15));
        game.update(&idle(), 3100.0);
        assert_eq!(game.snake.get_head(), Cell::new(0, 15));
        assert_eq!(game.state, AppState::Playing);

        game.snake.set_head(Cell::new(5, 0));
        game.update(&hold(KeyCode::W), 3200.0);
        assert_eq!(game.snake.get_head(), Cell::new(5, GRID_HEIGHT - 1));

        game.snake.set_head(Cell::new(0, 10));
        let mut game2 = game;
        game2.snake.set_direction(Direction::Left);
        game2.update(&idle(), 3300.0);
        assert_eq!(game2.snake.get_head(), Cell::new(GRID_WIDTH - 1, 10));
    }

    #[test]
    fn wall_hit_without_wrapping_is_game_over() {
        let mut game = playing_game();
        game.settings.wrapping_enabled = false;
        game.snake = Snake::new(1);
        game.snake.set_head(Cell::new(GRID_WIDTH - 1, 15));
        game.update(&idle(), 3100.0);
        assert_eq!(game.state, AppState::GameOver);
        assert_eq!(game.best_length(), 1);
    }

    #[test]
    fn best_length_is_a_high_water_mark() {
        let mut game = playing_game();
        game.settings.wrapping_enabled = false;
        game.snake = Snake::new(4);
        game.snake.set_head(Cell::new(GRID_WIDTH - 1, 15));
        game.update(&idle(), 3100.0);
        assert_eq!(game.best_length(), 4);

        // A shorter death later does not lower it.
        game.state = AppState::Playing;
        game.ticks.restart(4000.0);
        game.snake = Snake::new(1);
        game.snake.set_head(Cell::new(GRID_WIDTH - 1, 15));
        game.update(&idle(), 4100.0);
        assert_eq!(game.state, AppState::GameOver);
        assert_eq!(game.best_length(), 4);
    }

    #[test]
    fn self_collision_is_game_over() {
        let mut game = playing_game();
        game.snake = Snake::new(5);
        // Pin food far away so the loop below cannot grow the snake.
        game.food.position = Cell::new(0, 0);
        game.snake.set_direction(Direction::Down);
        game.update(&idle(), 3100.0);
        game.snake.set_direction(Direction::Left);
        game.update(&idle(), 3200.0);
        game.snake.set_direction(Direction::Up);
        game.update(&idle(), 3300.0);
        assert_eq!(game.state, AppState::GameOver);
        assert_eq!(game.best_length(), 5);
    }

    #[test]
    fn eating_grows_and_respawns_food() {
        let mut game = playing_game();
        let length = game.snake.get_length();
        game.food.position = game.snake.get_head().offset(1, 0);
        game.update(&idle(), 3100.0); // head lands on food, growth pending
        game.update(&idle(), 3200.0);
        assert_eq!(game.snake.get_length(), length + 1);
        assert!(game.food.get_position().in_bounds());
    }

    #[test]
    fn game_over_click_returns_to_start_menu() {
        let mut game = playing_game();
        game.state = AppState::GameOver;
        game.update(&click_at(Vec2::new(400.0, 300.0)), 6000.0);
        assert_eq!(game.state, AppState::StartMenu);
    }

    #[test]
    fn restart_uses_the_configured_length() {
        let mut game = Game::new();
        game.settings.initial_snake_length = 7;
        game.state = AppState::Countdown;
        game.countdown = Countdown::started_at(0.0);
        game.update(&idle(), 3000.0);
        assert_eq!(game.snake.get_length(), 7);
    }
}
