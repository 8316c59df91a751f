pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod snake;
pub mod timing;
pub mod ui;
