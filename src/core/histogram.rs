use crate::core::config::{GasConfig, BOLTZMANN_CONSTANT};
use crate::core::particle::Particle;

/// One histogram bin: the bin's lower speed edge, the peak-normalized
/// empirical count and the peak-normalized theoretical density at that edge.
///
/// The two curves are normalized independently (each to a maximum of 1), so
/// they compare in shape only, not in absolute scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub velocity: f64,
    pub measured: f64,
    pub theoretical: f64,
}

/// Most probable speed of a 2D Maxwell ensemble, sqrt(2 k_B T / m).
#[inline]
pub fn most_probable_speed(temperature: f64, mass: f64) -> f64 {
    (2.0 * BOLTZMANN_CONSTANT * temperature / mass).sqrt()
}

/// 2D Maxwell speed density (unnormalized shape),
/// f(v) = (m v / k_B T) * exp(-m v^2 / 2 k_B T).
#[inline]
fn maxwell_density(v: f64, temperature: f64, mass: f64) -> f64 {
    let kt = BOLTZMANN_CONSTANT * temperature;
    (mass * v / kt) * (-mass * v * v / (2.0 * kt)).exp()
}

/// Fixed-bin speed histogram.
///
/// The velocity domain `[0, 3 * v_p(T_max))` is computed once from the
/// configured maximum temperature, so bins never resize as the run
/// temperature changes; they are only repopulated. Speeds past the domain
/// land in the last bin.
#[derive(Debug, Clone)]
pub struct SpeedHistogram {
    bin_count: usize,
    bin_width: f64,
    mass: f64,
}

impl SpeedHistogram {
    pub fn new(config: &GasConfig) -> Self {
        let max_velocity = 3.0 * most_probable_speed(config.max_temperature, config.mass);
        Self {
            bin_count: config.bin_count,
            bin_width: max_velocity / config.bin_count as f64,
            mass: config.mass,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Bin the ensemble's speeds and evaluate the Maxwell curve at the
    /// current temperature.
    pub fn sample(&self, particles: &[Particle], temperature: f64) -> Vec<HistogramBin> {
        let mut counts = vec![0u32; self.bin_count];
        for p in particles {
            let bin = ((p.speed() / self.bin_width) as usize).min(self.bin_count - 1);
            counts[bin] += 1;
        }
        let max_count = counts.iter().copied().max().unwrap_or(0);

        let theoretical: Vec<f64> = (0..self.bin_count)
            .map(|i| maxwell_density(i as f64 * self.bin_width, temperature, self.mass))
            .collect();
        let max_theoretical = theoretical.iter().copied().fold(0.0_f64, f64::max);

        (0..self.bin_count)
            .map(|i| HistogramBin {
                velocity: i as f64 * self.bin_width,
                measured: if max_count > 0 {
                    counts[i] as f64 / max_count as f64
                } else {
                    0.0
                },
                theoretical: if max_theoretical > 0.0 {
                    theoretical[i] / max_theoretical
                } else {
                    0.0
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn bins_cover_three_most_probable_speeds_at_band_top() {
        let config = GasConfig::default();
        let h = SpeedHistogram::new(&config);
        let span = h.bin_width() * h.bin_count() as f64;
        let expected = 3.0 * most_probable_speed(config.max_temperature, config.mass);
        assert!((span - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn both_curves_peak_at_one() -> Result<()> {
        let config = GasConfig::default();
        let h = SpeedHistogram::new(&config);
        let v = most_probable_speed(300.0, config.mass);
        let particles: Vec<Particle> = (0..50)
            .map(|i| Particle::new([0.0, 0.0], [v * (0.2 + 0.03 * i as f64), 0.0]))
            .collect::<Result<_>>()?;
        let bins = h.sample(&particles, 300.0);
        let max_measured = bins.iter().map(|b| b.measured).fold(0.0_f64, f64::max);
        let max_theoretical = bins.iter().map(|b| b.theoretical).fold(0.0_f64, f64::max);
        assert!((max_measured - 1.0).abs() < 1e-12);
        assert!((max_theoretical - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn tail_speeds_land_in_last_bin() -> Result<()> {
        let config = GasConfig::default();
        let h = SpeedHistogram::new(&config);
        let huge = 100.0 * most_probable_speed(config.max_temperature, config.mass);
        let particles = vec![Particle::new([0.0, 0.0], [huge, 0.0])?];
        let bins = h.sample(&particles, 300.0);
        assert_eq!(bins.last().map(|b| b.measured), Some(1.0));
        assert!(bins[..bins.len() - 1].iter().all(|b| b.measured == 0.0));
        Ok(())
    }

    #[test]
    fn theoretical_peak_sits_near_most_probable_speed() {
        let config = GasConfig::default();
        let h = SpeedHistogram::new(&config);
        let t = 400.0;
        let bins = h.sample(&[], t);
        let peak_bin = bins
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.theoretical.total_cmp(&b.1.theoretical))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let peak_v = peak_bin as f64 * h.bin_width();
        let v_p = most_probable_speed(t, config.mass);
        assert!(
            (peak_v - v_p).abs() <= h.bin_width(),
            "theoretical peak at {peak_v}, expected near {v_p}"
        );
    }
}
