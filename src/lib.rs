//! Leadboard - a sales pipeline board for the command line
//!
//! This library provides:
//! - The board store: stage transitions gated by confirmation, WIP limits
//!   and derived per-stage views
//! - Lead and activity models with SQLite persistence
//! - Filter parsing and evaluation
//! - The CLI front end
//!
//! # Example
//!
//! ```no_run
//! use leadboard::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod board;
pub mod cli;
pub mod config;
pub mod db;
pub mod filter;
pub mod models;
pub mod repo;
pub mod seed;
pub mod utils;
