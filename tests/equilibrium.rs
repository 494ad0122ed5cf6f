use gaslab::core::{GasConfig, SimulationEngine, BOLTZMANN_CONSTANT};
use gaslab::error::Result;

fn engine(temperature: f64, count: usize, seed: u64) -> Result<SimulationEngine> {
    SimulationEngine::new(GasConfig::default(), temperature, count, Some(seed))
}

/// End-to-end: a 100-particle ensemble at 300 K, run for 1000 steps with a
/// fixed seed. All positions must end inside the box and the measured
/// temperature must be the right order of magnitude. The ensemble is small,
/// so the bound is deliberately loose; this catches unit errors, not
/// precision regressions.
#[test]
fn thousand_steps_at_300k() -> Result<()> {
    let mut e = engine(300.0, 100, 42)?;
    e.advance(1000)?;

    let l = e.config().box_size;
    for (i, p) in e.particles.iter().enumerate() {
        assert!(
            p.r.iter().all(|&x| (0.0..l).contains(&x)),
            "particle {i} at {:?} escaped the box",
            p.r
        );
    }

    let m = e.measure_now();
    let t = m.observables.temperature;
    assert!(
        t > 100.0 && t < 900.0,
        "measured temperature {t} K not within a factor of 3 of 300 K"
    );
    Ok(())
}

/// Freshly drawn velocities should carry the configured temperature:
/// in 2D, mean kinetic energy per particle is exactly k_B T.
#[test]
fn initialization_matches_target_temperature() -> Result<()> {
    let mut e = engine(600.0, 400, 99)?;
    let t = e.measure_now().observables.temperature;
    let spread = (t - 600.0).abs() / 600.0;
    // 400 particles put the standard error of T around 3%; allow 15%.
    assert!(spread < 0.15, "initialized at {t} K, wanted 600 K");
    Ok(())
}

/// RMS speed, kinetic energy and temperature are three views of the same
/// second moment and must agree exactly.
#[test]
fn observables_are_mutually_consistent() -> Result<()> {
    let mut e = engine(300.0, 100, 5)?;
    e.advance(57)?;
    let n = e.particles.len() as f64;
    let mass = e.config().mass;
    let obs = e.measure_now().observables;

    let ke_from_rms = 0.5 * mass * n * obs.rms_velocity * obs.rms_velocity;
    assert!((ke_from_rms - obs.kinetic_energy).abs() < 1e-9 * obs.kinetic_energy);

    let t_from_ke = obs.kinetic_energy / n / BOLTZMANN_CONSTANT;
    assert!((t_from_ke - obs.temperature).abs() < 1e-9 * obs.temperature);
    Ok(())
}

/// Both histogram curves are peak-normalized to exactly 1.
#[test]
fn histogram_curves_peak_at_one() -> Result<()> {
    let mut e = engine(300.0, 200, 17)?;
    e.advance(30)?;
    let hist = e.measure_now().histogram;
    assert_eq!(hist.len(), e.config().bin_count);
    let max_measured = hist.iter().map(|b| b.measured).fold(0.0_f64, f64::max);
    let max_theoretical = hist.iter().map(|b| b.theoretical).fold(0.0_f64, f64::max);
    assert!((max_measured - 1.0).abs() < 1e-12);
    assert!((max_theoretical - 1.0).abs() < 1e-12);
    Ok(())
}

/// The pressure FIFO holds at most 50 samples, re-indexed 1..50 after
/// overflow.
#[test]
fn pressure_history_is_bounded_and_contiguous() -> Result<()> {
    let mut e = engine(300.0, 100, 23)?;
    for _ in 0..75 {
        e.measure_now();
    }
    let history = e.pressure_history();
    assert_eq!(history.len(), e.config().history_len);
    for (i, s) in history.iter().enumerate() {
        assert_eq!(s.index, (i + 1) as u32);
        assert!(s.pressure.is_finite() && s.pressure >= 0.0);
    }
    Ok(())
}

/// Measurements ride the deterministic sampling counter: exactly one in
/// every `sample_interval` steps carries them.
#[test]
fn measurements_appear_on_schedule() -> Result<()> {
    let mut e = engine(300.0, 64, 31)?;
    let interval = e.config().sample_interval;
    let mut sampled = 0usize;
    let total = 5 * interval;
    for s in 1..=total {
        let out = e.step()?;
        if out.measurement.is_some() {
            sampled += 1;
            assert_eq!(s % interval, 0, "measurement off schedule at step {s}");
        }
    }
    assert_eq!(sampled, 5);
    Ok(())
}

/// The sampled measurement also lands in the pressure history, so a run's
/// history grows with its sampled steps.
#[test]
fn sampled_steps_feed_the_history() -> Result<()> {
    let mut e = engine(300.0, 64, 37)?;
    let interval = e.config().sample_interval;
    e.advance(3 * interval)?;
    assert_eq!(e.pressure_history().len(), 3);
    Ok(())
}
