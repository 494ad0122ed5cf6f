use rand::Rng;

use crate::error::{Error, Result};

/// Diffusivity of an isolated walker on the square lattice (infinite
/// dilution), in lattice units.
pub const DILUTE_DIFFUSIVITY: f64 = 0.25;

/// One displacement bin of the 1D walk's end-position distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkBin {
    pub displacement: i64,
    /// Fraction of cycles ending at this displacement.
    pub measured: f64,
    /// Continuous Gaussian limit, exp(ln(2 / (N pi)) / 2 - i^2 / 2N).
    pub theoretical: f64,
}

/// Aggregated output of the 1D lattice walk.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeWalk1d {
    /// Positions of the final cycle's walk, one entry per jump, starting at
    /// the origin (length `jumps + 1`).
    pub last_trajectory: Vec<i64>,
    /// End-position distribution over `[-jumps, jumps]` with the Gaussian
    /// comparison curve.
    pub distribution: Vec<WalkBin>,
    /// RMS displacement over every interval length; entry `i` is the RMS
    /// over all same-cycle position pairs `i + 1` jumps apart.
    pub rms_displacement: Vec<f64>,
}

/// Walk a 1D lattice for `cycles` independent walks of `jumps` steps each.
///
/// Each jump moves +1 with `step_probability` and -1 otherwise. End
/// positions beyond `max_displacement` fall outside the tallied window
/// (they still contribute to the normalization, matching a fixed-width
/// display window).
pub fn walk_lattice_1d(
    cycles: u32,
    jumps: u32,
    step_probability: f64,
    max_displacement: u32,
    rng: &mut impl Rng,
) -> Result<LatticeWalk1d> {
    if cycles == 0 {
        return Err(Error::InvalidParam("cycles must be > 0".into()));
    }
    if jumps == 0 {
        return Err(Error::InvalidParam("jumps must be > 0".into()));
    }
    if !(0.0..=1.0).contains(&step_probability) {
        return Err(Error::InvalidParam(
            "step_probability must be within [0, 1]".into(),
        ));
    }
    if max_displacement == 0 {
        return Err(Error::InvalidParam("max_displacement must be > 0".into()));
    }

    let window = max_displacement as i64;
    let mut tally = vec![0u64; 2 * max_displacement as usize + 1];
    let mut rms_sum = vec![0.0f64; jumps as usize];
    let mut rms_count = vec![0u64; jumps as usize];
    let mut last_trajectory = Vec::new();

    for cycle in 0..cycles {
        let mut position = 0i64;
        let mut trajectory = Vec::with_capacity(jumps as usize + 1);
        trajectory.push(position);

        for step in 0..jumps as usize {
            if rng.random::<f64>() < step_probability {
                position += 1;
            } else {
                position -= 1;
            }
            trajectory.push(position);

            // Average the squared displacement over every time origin, so
            // each interval length is sampled many times per cycle.
            for origin in 0..=step {
                let interval = step - origin;
                let displacement = (position - trajectory[origin]) as f64;
                rms_sum[interval] += displacement * displacement;
                rms_count[interval] += 1;
            }
        }

        if position.abs() <= window {
            tally[(position + window) as usize] += 1;
        }
        if cycle == cycles - 1 {
            last_trajectory = trajectory;
        }
    }

    let n = jumps as f64;
    let distribution = (-(jumps as i64)..=jumps as i64)
        .map(|i| {
            let measured = if i.abs() <= window {
                tally[(i + window) as usize] as f64 / cycles as f64
            } else {
                0.0
            };
            let theoretical =
                (0.5 * (2.0 / (n * std::f64::consts::PI)).ln() - (i * i) as f64 / (2.0 * n)).exp();
            WalkBin {
                displacement: i,
                measured,
                theoretical,
            }
        })
        .collect();

    let rms_displacement = rms_sum
        .iter()
        .zip(&rms_count)
        .map(|(&sum, &count)| (sum / count.max(1) as f64).sqrt())
        .collect();

    Ok(LatticeWalk1d {
        last_trajectory,
        distribution,
        rms_displacement,
    })
}

/// Non-overlapping random placement of walkers on a square lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkerPlacement {
    /// Occupied (x, y) lattice sites, one per walker.
    pub positions: Vec<[u32; 2]>,
    /// Site coverage theta = walkers / lattice_size^2.
    pub coverage: f64,
    /// Fraction of jump attempts a walker would see unblocked, 1 - theta.
    pub blocking_factor: f64,
}

/// Place `walkers` on distinct sites of a `lattice_size` x `lattice_size`
/// grid by rejection sampling.
pub fn place_walkers_2d(
    walkers: u32,
    lattice_size: u32,
    rng: &mut impl Rng,
) -> Result<WalkerPlacement> {
    if walkers == 0 {
        return Err(Error::InvalidParam("walkers must be > 0".into()));
    }
    if lattice_size == 0 {
        return Err(Error::InvalidParam("lattice_size must be > 0".into()));
    }
    let sites = lattice_size as u64 * lattice_size as u64;
    if u64::from(walkers) >= sites {
        return Err(Error::InvalidParam(format!(
            "{walkers} walkers cannot occupy distinct sites of a {lattice_size}x{lattice_size} \
             lattice with at least one site free"
        )));
    }

    let mut occupied = vec![false; sites as usize];
    let mut positions = Vec::with_capacity(walkers as usize);
    for _ in 0..walkers {
        loop {
            let x = rng.random_range(0..lattice_size);
            let y = rng.random_range(0..lattice_size);
            let site = (x as usize) * lattice_size as usize + y as usize;
            if !occupied[site] {
                occupied[site] = true;
                positions.push([x, y]);
                break;
            }
        }
    }

    let coverage = walkers as f64 / sites as f64;
    Ok(WalkerPlacement {
        positions,
        coverage,
        blocking_factor: 1.0 - coverage,
    })
}

/// Site-blocking estimate of the collective diffusivity at coverage
/// `theta`: D = D0 (1 - theta).
pub fn site_blocking_diffusivity(coverage: f64) -> f64 {
    DILUTE_DIFFUSIVITY * (1.0 - coverage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn walk_lengths_are_consistent() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let walk = walk_lattice_1d(20, 50, 0.5, 100, &mut rng)?;
        assert_eq!(walk.last_trajectory.len(), 51);
        assert_eq!(walk.distribution.len(), 101);
        assert_eq!(walk.rms_displacement.len(), 50);
        Ok(())
    }

    #[test]
    fn distribution_mass_accounts_for_every_cycle() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(6);
        let walk = walk_lattice_1d(500, 40, 0.5, 40, &mut rng)?;
        let mass: f64 = walk.distribution.iter().map(|b| b.measured).sum();
        // Window covers all reachable sites, so nothing is lost.
        assert!((mass - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn rms_grows_sublinearly_with_interval() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let walk = walk_lattice_1d(300, 64, 0.5, 64, &mut rng)?;
        let short = walk.rms_displacement[3];
        let long = walk.rms_displacement[63];
        // Diffusive scaling: rms ~ sqrt(interval), far from ballistic.
        assert!(long > short);
        assert!(long < short * 16.0 / 2.0, "rms {long} looks ballistic");
        Ok(())
    }

    #[test]
    fn biased_walk_drifts() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(8);
        let walk = walk_lattice_1d(200, 100, 0.9, 100, &mut rng)?;
        let mean: f64 = walk
            .distribution
            .iter()
            .map(|b| b.displacement as f64 * b.measured)
            .sum();
        // Expected drift (2p - 1) * jumps = 80.
        assert!((mean - 80.0).abs() < 5.0, "mean displacement {mean}");
        Ok(())
    }

    #[test]
    fn placement_never_doubles_up() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(9);
        let placement = place_walkers_2d(150, 20, &mut rng)?;
        let mut seen = std::collections::HashSet::new();
        for site in &placement.positions {
            assert!(seen.insert(*site), "site {site:?} occupied twice");
        }
        assert!((placement.coverage - 150.0 / 400.0).abs() < 1e-12);
        assert!((placement.blocking_factor - (1.0 - 150.0 / 400.0)).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn full_lattice_rejected() {
        let mut rng = StdRng::seed_from_u64(10);
        assert!(place_walkers_2d(400, 20, &mut rng).is_err());
    }

    #[test]
    fn diffusivity_interpolates_to_zero_at_full_coverage() {
        assert!((site_blocking_diffusivity(0.0) - DILUTE_DIFFUSIVITY).abs() < 1e-12);
        assert!(site_blocking_diffusivity(1.0).abs() < 1e-12);
    }
}
