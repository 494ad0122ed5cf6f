use crate::core::particle::{Particle, DIM};

/// Advance a particle's position by `v * dt` (explicit Euler drift).
#[inline]
pub fn integrate(p: &mut Particle, dt: f64) {
    for k in 0..DIM {
        p.r[k] += p.v[k] * dt;
    }
}

/// Fold a coordinate into `[0, box_size)` by shifting exactly one period.
///
/// A single shift suffices because one step's displacement is always smaller
/// than the box. The wrap is a torus topology: velocity is never touched
/// here, unlike the collision resolver.
#[inline]
pub fn wrap(coordinate: f64, box_size: f64) -> f64 {
    if coordinate < 0.0 {
        coordinate + box_size
    } else if coordinate >= box_size {
        coordinate - box_size
    } else {
        coordinate
    }
}

/// Apply the periodic wrap to both axes of a particle.
#[inline]
pub fn wrap_position(p: &mut Particle, box_size: f64) {
    for k in 0..DIM {
        p.r[k] = wrap(p.r[k], box_size);
    }
}
