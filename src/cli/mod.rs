//! Command-line interface definitions.
//!
//! - `Cli`, `Commands`: CLI argument definitions via clap
//! - `Display`: formatted terminal output with colors and status

mod commands;
mod display;

pub use commands::{Cli, Commands};
pub use display::Display;
