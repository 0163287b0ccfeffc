//! Integration tests for the Twitch attribute bridge

mod cli_contracts;
mod helix_end_to_end;
mod lifecycle;
mod shared_connection;
mod support;
