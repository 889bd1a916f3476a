//! Quiesce command-line front end
//!
//! Argument parsing, configuration layering and the long-running watch loop.

pub mod args;
pub mod config;
pub mod daemon;

pub use args::Cli;
pub use config::Settings;
