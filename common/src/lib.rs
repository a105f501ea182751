//! Shared data model for the strata workspace.
//!
//! Everything the engine consumes or produces lives here so that the CLI and
//! any other front end can depend on plain data without pulling in the engine.

pub mod config;
pub mod error;
pub mod network;
pub mod result;
