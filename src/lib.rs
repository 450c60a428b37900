//! Cup Stack (workspace facade crate).
//!
//! Re-exports the engine crates under one roof as `cup_stack::{types, core, engine}`
//! and carries the pieces the headless host binary is built from.

pub mod config;
pub mod host;

pub use cup_stack_core as core;
pub use cup_stack_engine as engine;
pub use cup_stack_types as types;
