use rand::Rng;

use crate::error::{Error, Result};

/// Outcome of repeated coin-flip cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinFlipSeries {
    /// Heads counted in each cycle.
    pub heads_per_cycle: Vec<u32>,
    /// Running fraction of heads over all flips so far, one entry per cycle.
    pub cumulative_head_fraction: Vec<f64>,
    /// Running fraction of tails, one entry per cycle.
    pub cumulative_tail_fraction: Vec<f64>,
    /// How many cycles produced exactly `i` heads; length
    /// `flips_per_cycle + 1`.
    pub head_count_frequencies: Vec<u32>,
}

/// Flip a fair coin `flips_per_cycle` times per cycle for `cycles` cycles.
pub fn flip_coins(cycles: u32, flips_per_cycle: u32, rng: &mut impl Rng) -> Result<CoinFlipSeries> {
    if cycles == 0 {
        return Err(Error::InvalidParam("cycles must be > 0".into()));
    }
    if flips_per_cycle == 0 {
        return Err(Error::InvalidParam("flips_per_cycle must be > 0".into()));
    }

    let mut heads_per_cycle = Vec::with_capacity(cycles as usize);
    let mut head_fraction = Vec::with_capacity(cycles as usize);
    let mut tail_fraction = Vec::with_capacity(cycles as usize);
    let mut frequencies = vec![0u32; flips_per_cycle as usize + 1];
    let mut cumulative_heads = 0u64;
    let mut cumulative_tails = 0u64;

    for cycle in 0..cycles {
        let mut heads = 0u32;
        for _ in 0..flips_per_cycle {
            if rng.random::<f64>() < 0.5 {
                heads += 1;
            }
        }
        heads_per_cycle.push(heads);
        frequencies[heads as usize] += 1;
        cumulative_heads += u64::from(heads);
        cumulative_tails += u64::from(flips_per_cycle - heads);
        let flips_so_far = (u64::from(cycle) + 1) * u64::from(flips_per_cycle);
        head_fraction.push(cumulative_heads as f64 / flips_so_far as f64);
        tail_fraction.push(cumulative_tails as f64 / flips_so_far as f64);
    }

    Ok(CoinFlipSeries {
        heads_per_cycle,
        cumulative_head_fraction: head_fraction,
        cumulative_tail_fraction: tail_fraction,
        head_count_frequencies: frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn zero_cycles_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(flip_coins(0, 100, &mut rng).is_err());
    }

    #[test]
    fn heads_and_tails_always_balance() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let series = flip_coins(200, 100, &mut rng)?;
        for (h, t) in series
            .cumulative_head_fraction
            .iter()
            .zip(&series.cumulative_tail_fraction)
        {
            assert!((h + t - 1.0).abs() < 1e-12);
        }
        let total_cycles: u32 = series.head_count_frequencies.iter().sum();
        assert_eq!(total_cycles, 200);
        Ok(())
    }

    #[test]
    fn fractions_settle_near_one_half() -> crate::error::Result<()> {
        let mut rng = StdRng::seed_from_u64(99);
        let series = flip_coins(1000, 100, &mut rng)?;
        let last = *series.cumulative_head_fraction.last().unwrap();
        assert!(
            (last - 0.5).abs() < 0.01,
            "head fraction {last} drifted from 0.5"
        );
        Ok(())
    }
}
