//! Tooling & Integration Layer
//!
//! Command-line entry points for inspecting the command table, checking a
//! configuration and driving a single link end to end.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
