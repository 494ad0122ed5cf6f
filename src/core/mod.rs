//! The 2D ideal-gas particle engine.
//!
//! A discrete-time N-body simulator: positions advance under periodic
//! boundaries, overlapping pairs exchange elastic impulses, and macroscopic
//! observables (pressure, temperature, RMS speed, speed distribution) are
//! derived from the microscopic ensemble at a sampling cadence.

pub mod collision;
pub mod config;
pub mod engine;
pub mod histogram;
pub mod motion;
pub mod particle;
pub mod thermo;

pub use config::{GasConfig, BOLTZMANN_CONSTANT};
pub use engine::{Measurement, RunState, SimulationEngine, StepOutput};
pub use histogram::{HistogramBin, SpeedHistogram};
pub use particle::{Particle, DIM};
pub use thermo::{Observables, PressureHistory, PressureSample};
