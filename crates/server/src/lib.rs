//! CLI and local web interface for clipsqueeze.

pub mod api;
pub mod cli;
pub mod commands;
pub mod state;
