pub mod app;
mod board;
mod dialogs;
mod hud;
mod state;
