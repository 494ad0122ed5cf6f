use rand::Rng;

use crate::error::{Error, Result};

/// One multinomial distribution round.
#[derive(Debug, Clone, PartialEq)]
pub struct CompartmentSample {
    /// Particles that landed in each compartment.
    pub counts: Vec<u32>,
    /// How many compartments hold exactly `i` particles; length
    /// `max(counts) + 1`.
    pub occupancy_frequencies: Vec<u32>,
}

/// Drop each of `particles` into one of `compartments` uniformly at random.
pub fn occupy_compartments(
    particles: u32,
    compartments: u32,
    rng: &mut impl Rng,
) -> Result<CompartmentSample> {
    if particles == 0 {
        return Err(Error::InvalidParam("particles must be > 0".into()));
    }
    if compartments == 0 {
        return Err(Error::InvalidParam("compartments must be > 0".into()));
    }

    let mut counts = vec![0u32; compartments as usize];
    for _ in 0..particles {
        let c = rng.random_range(0..compartments) as usize;
        counts[c] += 1;
    }

    let max_count = counts.iter().copied().max().unwrap_or(0);
    let mut occupancy_frequencies = vec![0u32; max_count as usize + 1];
    for &c in &counts {
        occupancy_frequencies[c as usize] += 1;
    }

    Ok(CompartmentSample {
        counts,
        occupancy_frequencies,
    })
}

/// Probability that a given compartment holds exactly `occupancy` of `n`
/// particles when each lands in one of `compartments` uniformly: the
/// binomial pmf `C(n, j) p^j (1-p)^(n-j)` with `p = 1/compartments`,
/// evaluated in log space to survive large `n`.
pub fn binomial_reference(n: u32, compartments: u32, occupancy: u32) -> Result<f64> {
    if compartments == 0 {
        return Err(Error::InvalidParam("compartments must be > 0".into()));
    }
    if occupancy > n {
        return Ok(0.0);
    }
    let p = 1.0 / compartments as f64;
    let ln_pmf = ln_factorial(n) - ln_factorial(occupancy) - ln_factorial(n - occupancy)
        + occupancy as f64 * p.ln()
        + (n - occupancy) as f64 * (1.0 - p).ln();
    Ok(ln_pmf.exp())
}

/// ln(n!) by direct summation.
fn ln_factorial(n: u32) -> f64 {
    (2..=n).map(|j| (j as f64).ln()).sum()
}
