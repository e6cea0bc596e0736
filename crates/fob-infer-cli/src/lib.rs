//! Command-line front end for `fob-infer`.
//!
//! - `fob-infer symbols <FILES>...` prints the symbol table of the given units
//! - `fob-infer lookup <FILES>... --line L --column C` resolves the symbol at a
//!   position and lists completions

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
