//! # Neural Connect Four
//!
//! A Connect Four game played in the terminal against a neural-network bot.
//! The bot scores every column with a Burn model; when its favourite column
//! is full, a random column is tried until one is legal.
//!
//! ## Modules
//!
//! - [`game`]: Board, win/draw evaluation, sessions and the turn controller
//! - [`ai`]: Move proposers, scoring policies, networks, state encoding
//! - [`ui`]: Terminal UI: game view and hover preview projection
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

#![recursion_limit = "256"]

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
