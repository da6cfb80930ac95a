// ABOUTME: CLI module for formkit
// ABOUTME: Exposes argument parsing, the application runner, and commands

pub mod app;
pub mod args;
pub mod commands;

pub use app::App;
pub use args::{Args, Commands};
