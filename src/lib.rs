// ABOUTME: Library crate for hive, declarative tmux sessions from YAML
// The binary is a thin wrapper; everything it does is reachable from here for testing

pub mod app;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod templates;
pub mod tmux;
