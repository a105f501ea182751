#![cfg(test)]

mod pipeline;
mod scheduler;
mod support;
