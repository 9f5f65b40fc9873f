//! Core types and definitions for the swarmfall simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, ability tables, the
//! save-store interface and constants. It has no ECS world and no runtime.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod params;
pub mod state;
pub mod storage;
pub mod types;
