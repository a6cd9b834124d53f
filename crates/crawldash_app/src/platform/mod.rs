mod app;
mod commands;
mod config;
mod effects;
mod ui;

pub use app::run_app;
