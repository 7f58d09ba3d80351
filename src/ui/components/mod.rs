pub mod hud;
pub mod keyboard;
pub mod menu;
pub mod progress_bar;
pub mod summary;
pub mod word_board;
