//! Python bindings for the gaslab simulation core.
//!
//! The presentation layer drives everything through [`IdealGas`] (one engine
//! per page) and the free functions wrapping the simpler teaching routines.
//! Heavy computation releases the GIL.

use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

pub mod core;
pub mod error;
pub mod sims;

use crate::core::{GasConfig, Measurement, SimulationEngine, StepOutput, DIM};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    }
}

fn positions_array<'py>(
    py: Python<'py>,
    positions: &[[f64; DIM]],
) -> Bound<'py, PyArray2<f64>> {
    let mut arr = Array2::<f64>::zeros((positions.len(), DIM));
    for (i, r) in positions.iter().enumerate() {
        for k in 0..DIM {
            arr[[i, k]] = r[k];
        }
    }
    arr.into_pyarray(py)
}

/// Add a measurement's fields to a step/observables dict.
fn set_measurement(d: &Bound<'_, PyDict>, py: Python<'_>, m: &Measurement) -> PyResult<()> {
    d.set_item("rms_velocity", m.observables.rms_velocity)?;
    d.set_item("kinetic_energy", m.observables.kinetic_energy)?;
    d.set_item("temperature", m.observables.temperature)?;
    d.set_item("pressure", m.observables.pressure)?;

    let mut history = Array2::<f64>::zeros((m.pressure_history.len(), 2));
    for (i, s) in m.pressure_history.iter().enumerate() {
        history[[i, 0]] = f64::from(s.index);
        history[[i, 1]] = s.pressure;
    }
    d.set_item("pressure_history", history.into_pyarray(py))?;

    let hist = PyDict::new(py);
    let velocity: Vec<f64> = m.histogram.iter().map(|b| b.velocity).collect();
    let measured: Vec<f64> = m.histogram.iter().map(|b| b.measured).collect();
    let theoretical: Vec<f64> = m.histogram.iter().map(|b| b.theoretical).collect();
    hist.set_item("velocity", velocity.into_pyarray(py))?;
    hist.set_item("measured", measured.into_pyarray(py))?;
    hist.set_item("theoretical", theoretical.into_pyarray(py))?;
    d.set_item("histogram", hist)?;
    Ok(())
}

fn step_dict(py: Python<'_>, out: &StepOutput) -> PyResult<Py<PyDict>> {
    let d = PyDict::new(py);
    d.set_item("positions", positions_array(py, &out.positions))?;
    if let Some(m) = &out.measurement {
        set_measurement(&d, py, m)?;
    }
    Ok(d.into())
}

/// The 2D ideal-gas engine.
///
/// Construction lays the ensemble out on a grid with Maxwell–Boltzmann
/// velocities at the requested temperature; the host's refresh loop then
/// calls `tick()` once per frame while the run flag is up. Measurement
/// fields appear in the step dict every `sample_interval`-th step.
#[pyclass]
pub struct IdealGas {
    engine: SimulationEngine,
}

#[pymethods]
impl IdealGas {
    /// Create a new engine.
    ///
    /// Parameters
    /// - temperature: target temperature in K (within the configured band)
    /// - particle_count: ensemble size (> 0)
    /// - seed: RNG seed for reproducibility; None for nondeterministic
    /// - remaining keywords: per-field overrides of the default
    ///   configuration (monoatomic Argon in a 10 nm periodic box)
    ///
    /// Errors: raises ValueError on any invalid configuration, including a
    /// particle count whose inscribed grid would overlap discs.
    #[new]
    #[pyo3(signature = (
        temperature,
        particle_count,
        seed=None,
        box_size=None,
        timestep=None,
        mass=None,
        radius=None,
        min_temperature=None,
        max_temperature=None,
        bin_count=None,
        history_len=None,
        sample_interval=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        temperature: f64,
        particle_count: usize,
        seed: Option<u64>,
        box_size: Option<f64>,
        timestep: Option<f64>,
        mass: Option<f64>,
        radius: Option<f64>,
        min_temperature: Option<f64>,
        max_temperature: Option<f64>,
        bin_count: Option<usize>,
        history_len: Option<usize>,
        sample_interval: Option<u64>,
    ) -> PyResult<Self> {
        let mut config = GasConfig::default();
        if let Some(v) = box_size {
            config.box_size = v;
        }
        if let Some(v) = timestep {
            config.timestep = v;
        }
        if let Some(v) = mass {
            config.mass = v;
        }
        if let Some(v) = radius {
            config.radius = v;
        }
        if let Some(v) = min_temperature {
            config.min_temperature = v;
        }
        if let Some(v) = max_temperature {
            config.max_temperature = v;
        }
        if let Some(v) = bin_count {
            config.bin_count = v;
        }
        if let Some(v) = history_len {
            config.history_len = v;
        }
        if let Some(v) = sample_interval {
            config.sample_interval = v;
        }
        let engine =
            SimulationEngine::new(config, temperature, particle_count, seed).map_err(py_err)?;
        Ok(Self { engine })
    }

    /// Raise the run flag; subsequent `tick()` calls advance the simulation.
    fn start(&mut self) {
        self.engine.start();
    }

    /// Lower the run flag; the next `tick()` declines without side effects.
    fn stop(&mut self) {
        self.engine.stop();
    }

    fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Execute one step unconditionally and return its dict.
    fn step(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let out = self.engine.step().map_err(py_err)?;
        step_dict(py, &out)
    }

    /// Run-flag-gated step for the refresh loop; None while idle.
    fn tick(&mut self, py: Python<'_>) -> PyResult<Option<Py<PyDict>>> {
        match self.engine.tick().map_err(py_err)? {
            Some(out) => Ok(Some(step_dict(py, &out)?)),
            None => Ok(None),
        }
    }

    /// Advance `steps` steps (releases the GIL) and return the last step's
    /// dict.
    fn run(&mut self, py: Python<'_>, steps: u64) -> PyResult<Py<PyDict>> {
        let engine = &mut self.engine;
        let out = py.detach(|| engine.advance(steps)).map_err(py_err)?;
        step_dict(py, &out)
    }

    /// Discard the ensemble and derived history, regenerate at the given
    /// temperature and particle count, and force idle.
    fn reinitialize(&mut self, temperature: f64, particle_count: usize) -> PyResult<()> {
        self.engine
            .reinitialize(temperature, particle_count)
            .map_err(py_err)
    }

    /// Positions as an (N, 2) float64 array.
    fn positions<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        positions_array(py, &self.engine.positions())
    }

    /// Velocities as an (N, 2) float64 array.
    fn velocities<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        positions_array(py, &self.engine.velocities())
    }

    /// Measure immediately, without stepping. Appends to the pressure
    /// history exactly like a sampled step.
    fn observables(&mut self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let m = self.engine.measure_now();
        let d = PyDict::new(py);
        set_measurement(&d, py, &m)?;
        Ok(d.into())
    }

    fn particle_count(&self) -> usize {
        self.engine.particles.len()
    }

    fn step_count(&self) -> u64 {
        self.engine.step_count()
    }

    /// The configured target temperature (not the measured one).
    fn temperature(&self) -> f64 {
        self.engine.temperature()
    }
}

/// Estimate π by uniform sampling of the unit square (releases the GIL).
#[pyfunction]
#[pyo3(signature = (samples, seed=None))]
fn estimate_pi(py: Python<'_>, samples: u64, seed: Option<u64>) -> PyResult<Py<PyDict>> {
    let mut rng = seeded_rng(seed);
    let est = py
        .detach(|| sims::monte_carlo::estimate_pi(samples, &mut rng))
        .map_err(py_err)?;
    let d = PyDict::new(py);
    d.set_item("estimate", est.estimate)?;
    d.set_item("relative_error", est.relative_error)?;
    d.set_item("hits", est.hits)?;
    d.set_item("samples", est.samples)?;
    Ok(d.into())
}

/// Run the π estimator over a sample-count ladder and return arrays of the
/// per-run results.
#[pyfunction]
#[pyo3(signature = (schedule=None, seed=None))]
fn pi_convergence(
    py: Python<'_>,
    schedule: Option<Vec<u64>>,
    seed: Option<u64>,
) -> PyResult<Py<PyDict>> {
    let schedule = schedule.unwrap_or_else(|| sims::monte_carlo::DEFAULT_SCHEDULE.to_vec());
    let mut rng = seeded_rng(seed);
    let series = py
        .detach(|| sims::monte_carlo::convergence(&schedule, &mut rng))
        .map_err(py_err)?;
    let d = PyDict::new(py);
    let samples: Vec<u64> = series.iter().map(|e| e.samples).collect();
    let estimates: Vec<f64> = series.iter().map(|e| e.estimate).collect();
    let errors: Vec<f64> = series.iter().map(|e| e.relative_error).collect();
    d.set_item("samples", samples.into_pyarray(py))?;
    d.set_item("estimate", estimates.into_pyarray(py))?;
    d.set_item("relative_error", errors.into_pyarray(py))?;
    Ok(d.into())
}

/// Flip a fair coin in cycles and return the per-cycle statistics.
#[pyfunction]
#[pyo3(signature = (cycles, flips_per_cycle=100, seed=None))]
fn flip_coins(
    py: Python<'_>,
    cycles: u32,
    flips_per_cycle: u32,
    seed: Option<u64>,
) -> PyResult<Py<PyDict>> {
    let mut rng = seeded_rng(seed);
    let series = sims::coin::flip_coins(cycles, flips_per_cycle, &mut rng).map_err(py_err)?;
    let d = PyDict::new(py);
    d.set_item("heads_per_cycle", series.heads_per_cycle.into_pyarray(py))?;
    d.set_item(
        "cumulative_head_fraction",
        series.cumulative_head_fraction.into_pyarray(py),
    )?;
    d.set_item(
        "cumulative_tail_fraction",
        series.cumulative_tail_fraction.into_pyarray(py),
    )?;
    d.set_item(
        "head_count_frequencies",
        series.head_count_frequencies.into_pyarray(py),
    )?;
    Ok(d.into())
}

/// Distribute particles uniformly over compartments and tally occupancies.
#[pyfunction]
#[pyo3(signature = (particles, compartments, seed=None))]
fn occupy_compartments(
    py: Python<'_>,
    particles: u32,
    compartments: u32,
    seed: Option<u64>,
) -> PyResult<Py<PyDict>> {
    let mut rng = seeded_rng(seed);
    let sample = sims::compartments::occupy_compartments(particles, compartments, &mut rng)
        .map_err(py_err)?;
    let d = PyDict::new(py);
    d.set_item("counts", sample.counts.into_pyarray(py))?;
    d.set_item(
        "occupancy_frequencies",
        sample.occupancy_frequencies.into_pyarray(py),
    )?;
    Ok(d.into())
}

/// Exact binomial occupancy probabilities for 0..=max_occupancy particles in
/// one compartment.
#[pyfunction]
fn binomial_reference(
    py: Python<'_>,
    particles: u32,
    compartments: u32,
    max_occupancy: u32,
) -> PyResult<Py<numpy::PyArray1<f64>>> {
    let pmf: Vec<f64> = (0..=max_occupancy)
        .map(|j| sims::compartments::binomial_reference(particles, compartments, j))
        .collect::<error::Result<_>>()
        .map_err(py_err)?;
    Ok(pmf.into_pyarray(py).unbind())
}

/// 1D lattice walk: end-position distribution, Gaussian comparison curve and
/// RMS displacement per interval (releases the GIL).
#[pyfunction]
#[pyo3(signature = (cycles, jumps, step_probability=0.5, max_displacement=1000, seed=None))]
fn walk_lattice_1d(
    py: Python<'_>,
    cycles: u32,
    jumps: u32,
    step_probability: f64,
    max_displacement: u32,
    seed: Option<u64>,
) -> PyResult<Py<PyDict>> {
    let mut rng = seeded_rng(seed);
    let walk = py
        .detach(|| {
            sims::random_walk::walk_lattice_1d(
                cycles,
                jumps,
                step_probability,
                max_displacement,
                &mut rng,
            )
        })
        .map_err(py_err)?;
    let d = PyDict::new(py);
    d.set_item("last_trajectory", walk.last_trajectory.into_pyarray(py))?;
    let displacement: Vec<i64> = walk.distribution.iter().map(|b| b.displacement).collect();
    let measured: Vec<f64> = walk.distribution.iter().map(|b| b.measured).collect();
    let theoretical: Vec<f64> = walk.distribution.iter().map(|b| b.theoretical).collect();
    d.set_item("displacement", displacement.into_pyarray(py))?;
    d.set_item("measured", measured.into_pyarray(py))?;
    d.set_item("theoretical", theoretical.into_pyarray(py))?;
    d.set_item("rms_displacement", walk.rms_displacement.into_pyarray(py))?;
    Ok(d.into())
}

/// Place walkers on distinct sites of a square lattice and report the
/// site-blocking diffusivity estimate.
#[pyfunction]
#[pyo3(signature = (walkers, lattice_size, seed=None))]
fn place_walkers_2d(
    py: Python<'_>,
    walkers: u32,
    lattice_size: u32,
    seed: Option<u64>,
) -> PyResult<Py<PyDict>> {
    let mut rng = seeded_rng(seed);
    let placement =
        sims::random_walk::place_walkers_2d(walkers, lattice_size, &mut rng).map_err(py_err)?;
    let mut arr = Array2::<u32>::zeros((placement.positions.len(), 2));
    for (i, site) in placement.positions.iter().enumerate() {
        arr[[i, 0]] = site[0];
        arr[[i, 1]] = site[1];
    }
    let d = PyDict::new(py);
    d.set_item("positions", arr.into_pyarray(py))?;
    d.set_item("coverage", placement.coverage)?;
    d.set_item("blocking_factor", placement.blocking_factor)?;
    d.set_item(
        "diffusivity",
        sims::random_walk::site_blocking_diffusivity(placement.coverage),
    )?;
    Ok(d.into())
}

/// Closed-form Boltzmann level populations under three level structures.
#[pyfunction]
#[pyo3(signature = (temperature, levels=sims::boltzmann::DEFAULT_LEVEL_COUNT))]
fn boltzmann_levels(py: Python<'_>, temperature: f64, levels: usize) -> PyResult<Py<PyDict>> {
    let populations = sims::boltzmann::level_populations(temperature, levels).map_err(py_err)?;
    let d = PyDict::new(py);
    let energy: Vec<u32> = populations.iter().map(|l| l.energy).collect();
    let uniform: Vec<f64> = populations.iter().map(|l| l.uniform).collect();
    let degenerate: Vec<f64> = populations.iter().map(|l| l.degenerate).collect();
    let rotor: Vec<f64> = populations.iter().map(|l| l.rotor).collect();
    d.set_item("energy", energy.into_pyarray(py))?;
    d.set_item("uniform", uniform.into_pyarray(py))?;
    d.set_item("degenerate", degenerate.into_pyarray(py))?;
    d.set_item("rotor", rotor.into_pyarray(py))?;
    Ok(d.into())
}

/// The gaslab Python module entry point.
#[pymodule]
fn gaslab(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<IdealGas>()?;
    m.add_function(wrap_pyfunction!(estimate_pi, m)?)?;
    m.add_function(wrap_pyfunction!(pi_convergence, m)?)?;
    m.add_function(wrap_pyfunction!(flip_coins, m)?)?;
    m.add_function(wrap_pyfunction!(occupy_compartments, m)?)?;
    m.add_function(wrap_pyfunction!(binomial_reference, m)?)?;
    m.add_function(wrap_pyfunction!(walk_lattice_1d, m)?)?;
    m.add_function(wrap_pyfunction!(place_walkers_2d, m)?)?;
    m.add_function(wrap_pyfunction!(boltzmann_levels, m)?)?;
    Ok(())
}
