//! Layered reachability diagnostics: resolution, transport, handshake and
//! application checks run as an ordered pipeline per target, with bounded
//! concurrency across targets.

pub mod benchmark;
pub mod checks;
pub mod engine;
pub mod pipeline;
pub mod retry;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod fakes;

pub use engine::Engine;
