//! Swarmfall headless runner.
//!
//! Wires the simulation crates to a command line: a fixed-rate game loop
//! thread for real-time runs and a scripted driver for fast batch runs.

pub mod cli;
pub mod error;
pub mod game_loop;
pub mod headless;
pub mod state;

pub use swarmfall_core as core;
