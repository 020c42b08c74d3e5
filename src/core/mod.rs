//! Core statusline orchestration

pub mod generator;

pub use generator::{GeneratorOptions, StatuslineGenerator};
