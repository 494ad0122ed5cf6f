use std::collections::VecDeque;

use crate::core::config::{GasConfig, BOLTZMANN_CONSTANT};
use crate::core::particle::Particle;

/// Macroscopic observables derived from the instantaneous ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    /// Root-mean-square speed, sqrt(mean(vx^2 + vy^2)).
    pub rms_velocity: f64,
    /// Total kinetic energy, 0.5 * m * sum(vx^2 + vy^2).
    pub kinetic_energy: f64,
    /// Temperature from 2D equipartition: mean kinetic energy per particle
    /// over k_B (two degrees of freedom, so no 3/2 factor).
    pub temperature: f64,
    /// Wall pressure estimate, see [`measure`].
    pub pressure: f64,
}

/// One entry of the bounded pressure series.
///
/// `index` is a display ordinal, not wall-clock time: after the FIFO drops
/// its oldest entry the remaining samples are re-indexed contiguously from 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureSample {
    pub index: u32,
    pub pressure: f64,
}

/// Bounded FIFO of the most recent pressure samples.
#[derive(Debug, Clone)]
pub struct PressureHistory {
    samples: VecDeque<PressureSample>,
    capacity: usize,
}

impl PressureHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, dropping the oldest and re-indexing 1..N on overflow.
    pub fn push(&mut self, pressure: f64) {
        let next_index = self.samples.back().map_or(1, |s| s.index + 1);
        self.samples.push_back(PressureSample {
            index: next_index,
            pressure,
        });
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
            for (i, s) in self.samples.iter_mut().enumerate() {
                s.index = (i + 1) as u32;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &PressureSample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<PressureSample> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Measure the ensemble's macroscopic observables.
///
/// Pressure is a momentum-transfer proxy: a particle currently within one
/// radius of any box edge (outside `[radius, L - radius]` on either axis) is
/// counted as undergoing a wall reflection this step and contributes
/// `2 m |v|`; the total is divided by `perimeter * dt` with perimeter `4 L`
/// (2D pressure is force per unit length). The engine's boundaries actually
/// wrap, so no reflection ever occurs; the edge zone stands in for the wall
/// contacts a reflective box would see at the same density.
///
/// The ensemble is guaranteed non-empty by construction; empty input would
/// make every mean undefined and is rejected at initialization instead.
pub fn measure(particles: &[Particle], config: &GasConfig) -> Observables {
    debug_assert!(!particles.is_empty());
    let n = particles.len() as f64;
    let l = config.box_size;
    let sum_v_sq: f64 = particles.iter().map(|p| p.speed_squared()).sum();

    let rms_velocity = (sum_v_sq / n).sqrt();
    let kinetic_energy = 0.5 * config.mass * sum_v_sq;
    let temperature = kinetic_energy / n / BOLTZMANN_CONSTANT;

    let mut momentum_transfer = 0.0;
    for p in particles {
        let near_edge = p.r[0] - config.radius < 0.0
            || p.r[0] + config.radius > l
            || p.r[1] - config.radius < 0.0
            || p.r[1] + config.radius > l;
        if near_edge {
            momentum_transfer += 2.0 * config.mass * p.speed();
        }
    }
    let pressure = momentum_transfer / (4.0 * l * config.timestep);

    Observables {
        rms_velocity,
        kinetic_energy,
        temperature,
        pressure,
    }
}
