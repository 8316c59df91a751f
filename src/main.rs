use macroquad::prelude::*;

use snakey::game::Game;
use snakey::grid::{SCREEN_HEIGHT, SCREEN_WIDTH};
use snakey::input::FrameInput;

fn window_conf() -> Conf {
    Conf {
        window_title: "SNAKEY".to_owned(),
        window_width: SCREEN_WIDTH,
        window_height: SCREEN_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Seed the shared RNG once; Food::respawn draws from it for the rest of
    // the process lifetime.
    macroquad::rand::srand(macroquad::miniquad::date::now() as u64);

    let mut game = Game::new();
    loop {
        let input = FrameInput::poll();
        let now_ms = get_time() * 1000.0;
        game.update(&input, now_ms);
        if game.quit_requested() {
            break;
        }
        game.draw(&input, now_ms);
        next_frame().await;
    }
}
