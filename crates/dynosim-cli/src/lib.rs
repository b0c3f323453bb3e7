//! dynosim CLI library.
//!
//! This crate provides the command-line surface for the dynosim projection
//! engine: subcommand argument types, handlers, and output formatting shared
//! between the binary and its integration tests.

pub mod commands;
pub mod output;
