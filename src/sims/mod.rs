//! The suite's simpler teaching routines: single-pass numeric simulations
//! over uniform random draws, independent of the gas engine.
//!
//! Each routine is a pure function over a caller-supplied RNG so results are
//! reproducible under a fixed seed.

pub mod boltzmann;
pub mod coin;
pub mod compartments;
pub mod monte_carlo;
pub mod random_walk;
