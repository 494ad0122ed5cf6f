use rand::Rng;

use crate::error::{Error, Result};

/// Sample-count ladder used by the presentation layer's convergence sweep.
pub const DEFAULT_SCHEDULE: [u64; 18] = [
    100, 200, 300, 400, 500, 1000, 2000, 3000, 4000, 5000, 10_000, 20_000, 30_000, 40_000, 50_000,
    100_000, 500_000, 1_000_000,
];

/// Result of one Monte-Carlo π estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiEstimate {
    pub estimate: f64,
    /// |estimate - π| / π.
    pub relative_error: f64,
    pub hits: u64,
    pub samples: u64,
}

/// Estimate π by uniform sampling of the unit square.
///
/// Draws `samples` points in `[-0.5, 0.5]^2` and counts those inside the
/// inscribed circle of radius 0.5; the hit ratio times 4 estimates π.
pub fn estimate_pi(samples: u64, rng: &mut impl Rng) -> Result<PiEstimate> {
    if samples == 0 {
        return Err(Error::InvalidParam("samples must be > 0".into()));
    }
    let mut hits = 0u64;
    for _ in 0..samples {
        let x = rng.random::<f64>() - 0.5;
        let y = rng.random::<f64>() - 0.5;
        if x * x + y * y <= 0.25 {
            hits += 1;
        }
    }
    let estimate = 4.0 * hits as f64 / samples as f64;
    Ok(PiEstimate {
        estimate,
        relative_error: (estimate - std::f64::consts::PI).abs() / std::f64::consts::PI,
        hits,
        samples,
    })
}

/// Run [`estimate_pi`] once per entry of `schedule`.
pub fn convergence(schedule: &[u64], rng: &mut impl Rng) -> Result<Vec<PiEstimate>> {
    schedule.iter().map(|&n| estimate_pi(n, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn zero_samples_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(estimate_pi(0, &mut rng).is_err());
    }

    #[test]
    fn estimate_lands_near_pi() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(2024);
        let est = estimate_pi(100_000, &mut rng)?;
        // Standard error at 1e5 samples is ~0.005; allow a wide margin.
        assert!(
            (est.estimate - std::f64::consts::PI).abs() < 0.05,
            "estimate {} too far from pi",
            est.estimate
        );
        Ok(())
    }

    #[test]
    fn seeded_runs_reproduce() -> crate::error::Result<()> {
        let a = estimate_pi(10_000, &mut StdRng::seed_from_u64(7))?;
        let b = estimate_pi(10_000, &mut StdRng::seed_from_u64(7))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn convergence_runs_the_whole_schedule() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(3);
        let series = convergence(&DEFAULT_SCHEDULE[..5], &mut rng)?;
        assert_eq!(series.len(), 5);
        assert!(series.iter().all(|e| e.hits <= e.samples));
        Ok(())
    }
}
