use crate::error::{Error, Result};

/// Number of energy levels the presentation layer displays (0..=20).
pub const DEFAULT_LEVEL_COUNT: usize = 21;

/// Normalized populations of one energy level under three level-structure
/// assumptions, at the same reduced temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPopulation {
    /// Level index; doubles as the reduced energy.
    pub energy: u32,
    /// Non-degenerate levels: p_i ∝ exp(-beta i).
    pub uniform: f64,
    /// Linear degeneracy g_i = i + 1: p_i ∝ (i + 1) exp(-beta i).
    pub degenerate: f64,
    /// Rigid rotor, g_i = 2i + 1 and E_i = i (i + 1):
    /// p_i ∝ (2i + 1) exp(-beta i (i + 1)).
    pub rotor: f64,
}

/// Closed-form Boltzmann level populations at reduced temperature
/// `temperature` (beta = 1 / T), each of the three weightings normalized to
/// sum to 1 over the displayed levels.
pub fn level_populations(temperature: f64, levels: usize) -> Result<Vec<LevelPopulation>> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(Error::InvalidParam(
            "temperature must be finite and > 0".into(),
        ));
    }
    if levels == 0 {
        return Err(Error::InvalidParam("levels must be > 0".into()));
    }

    let beta = 1.0 / temperature;
    let mut uniform = Vec::with_capacity(levels);
    let mut degenerate = Vec::with_capacity(levels);
    let mut rotor = Vec::with_capacity(levels);
    for i in 0..levels {
        let e = i as f64;
        uniform.push((-beta * e).exp());
        degenerate.push((e + 1.0) * (-beta * e).exp());
        rotor.push((2.0 * e + 1.0) * (-beta * e * (e + 1.0)).exp());
    }

    let normalize = |values: &mut Vec<f64>| {
        let total: f64 = values.iter().sum();
        for v in values.iter_mut() {
            *v /= total;
        }
    };
    normalize(&mut uniform);
    normalize(&mut degenerate);
    normalize(&mut rotor);

    Ok((0..levels)
        .map(|i| LevelPopulation {
            energy: i as u32,
            uniform: uniform[i],
            degenerate: degenerate[i],
            rotor: rotor[i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populations_each_sum_to_one() -> Result<()> {
        let levels = level_populations(1.0, DEFAULT_LEVEL_COUNT)?;
        let (mut su, mut sd, mut sr) = (0.0, 0.0, 0.0);
        for l in &levels {
            su += l.uniform;
            sd += l.degenerate;
            sr += l.rotor;
        }
        assert!((su - 1.0).abs() < 1e-12);
        assert!((sd - 1.0).abs() < 1e-12);
        assert!((sr - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn uniform_population_decreases_monotonically() -> Result<()> {
        let levels = level_populations(2.5, DEFAULT_LEVEL_COUNT)?;
        for pair in levels.windows(2) {
            assert!(pair[0].uniform > pair[1].uniform);
        }
        Ok(())
    }

    #[test]
    fn high_temperature_flattens_the_uniform_weighting() -> Result<()> {
        let cold = level_populations(0.5, 10)?;
        let hot = level_populations(50.0, 10)?;
        assert!(hot[9].uniform > cold[9].uniform);
        assert!(hot[0].uniform < cold[0].uniform);
        Ok(())
    }

    #[test]
    fn non_positive_temperature_rejected() {
        assert!(level_populations(0.0, 10).is_err());
        assert!(level_populations(-1.0, 10).is_err());
    }
}
