//! Evolutionary search over the sliders of a remote energy model.
//!
//! A population of candidate slider settings is scored by an external
//! evaluator, ranked, and bred into the next generation through elitism,
//! rank-biased selection, crossover and mutation.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;
