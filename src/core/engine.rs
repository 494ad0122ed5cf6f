use rand::{rng, rngs::StdRng, Rng, SeedableRng};

use crate::core::collision::resolve_collisions;
use crate::core::config::{GasConfig, BOLTZMANN_CONSTANT};
use crate::core::histogram::{HistogramBin, SpeedHistogram};
use crate::core::motion::{integrate, wrap_position};
use crate::core::particle::{Particle, DIM};
use crate::core::thermo::{measure, Observables, PressureHistory, PressureSample};
use crate::error::{Error, Result};

/// Run state of the engine. The host scheduler calls [`SimulationEngine::tick`]
/// once per refresh; while `Idle` the tick declines and the ensemble stays
/// frozen at its last-known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Everything a sampled step publishes beyond positions.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub observables: Observables,
    pub pressure_history: Vec<PressureSample>,
    pub histogram: Vec<HistogramBin>,
}

/// Output of one simulation step.
///
/// `measurement` is `Some` only on sampled steps (every
/// `sample_interval`-th), amortizing the O(n) estimator cost.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub positions: Vec<[f64; DIM]>,
    pub measurement: Option<Measurement>,
}

/// The ideal-gas engine: owns the ensemble, the seeded RNG, the run flag and
/// the measurement components, and orchestrates one discrete step at a time.
///
/// Single-threaded by design: a step runs to completion before the next is
/// scheduled, so there is no locking and no partial-step visibility.
/// Re-initialization forces `Idle` first, so an in-progress run never has
/// its ensemble swapped out from under it.
#[derive(Debug)]
pub struct SimulationEngine {
    config: GasConfig,
    temperature: f64,
    /// The ensemble. Public for scripted setups and tests; the simulation
    /// itself mutates particles only through the integrator, the wrap and
    /// the collision resolver.
    pub particles: Vec<Particle>,
    state: RunState,
    rng: StdRng,
    steps: u64,
    history: PressureHistory,
    histogram: SpeedHistogram,
    degenerate_warned: bool,
}

impl SimulationEngine {
    /// Create an engine and initialize its ensemble.
    ///
    /// Parameters
    /// - `config`: validated named configuration (see [`GasConfig`])
    /// - `temperature`: target temperature in K, within the configured band
    /// - `particle_count`: ensemble size (> 0)
    /// - `seed`: RNG seed for reproducibility; `None` for nondeterministic
    ///
    /// Errors: `Error::InvalidParam` on any configuration violation,
    /// including a particle count whose inscribed grid cannot fit in the box
    /// without overlapping discs.
    pub fn new(
        config: GasConfig,
        temperature: f64,
        particle_count: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        config.validate()?;
        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        let history = PressureHistory::new(config.history_len);
        let histogram = SpeedHistogram::new(&config);
        let mut engine = Self {
            config,
            temperature,
            particles: Vec::new(),
            state: RunState::Idle,
            rng,
            steps: 0,
            history,
            histogram,
            degenerate_warned: false,
        };
        engine.reinitialize(temperature, particle_count)?;
        Ok(engine)
    }

    /// Discard the ensemble and all derived history, then regenerate.
    ///
    /// Forces `Idle`. Particles are laid out on a square grid inscribed in
    /// the box, with per-axis Maxwell–Boltzmann velocity components drawn by
    /// a Box–Muller transform scaled to the requested temperature.
    pub fn reinitialize(&mut self, temperature: f64, particle_count: usize) -> Result<()> {
        if particle_count == 0 {
            return Err(Error::InvalidParam("particle_count must be > 0".into()));
        }
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(Error::InvalidParam(
                "temperature must be finite and > 0".into(),
            ));
        }
        if temperature < self.config.min_temperature || temperature > self.config.max_temperature {
            return Err(Error::InvalidParam(format!(
                "temperature {} K outside configured band [{}, {}] K",
                temperature, self.config.min_temperature, self.config.max_temperature
            )));
        }

        let grid = (particle_count as f64).sqrt().ceil() as usize;
        let spacing = self.config.box_size / (grid + 1) as f64;
        if spacing < 2.0 * self.config.radius {
            return Err(Error::InvalidParam(format!(
                "{particle_count} particles cannot fit the inscribed grid without overlap \
                 (spacing {spacing:e} < diameter {:e}); use a larger box or fewer particles",
                2.0 * self.config.radius
            )));
        }

        self.stop();
        self.temperature = temperature;
        self.steps = 0;
        self.degenerate_warned = false;
        self.history.clear();

        // Thermal velocity scale per axis: sqrt(k_B T / m).
        let scale = (BOLTZMANN_CONSTANT * temperature / self.config.mass).sqrt();
        let mut particles = Vec::with_capacity(particle_count);
        'grid: for i in 0..grid {
            for j in 0..grid {
                if particles.len() == particle_count {
                    break 'grid;
                }
                let r = [(i + 1) as f64 * spacing, (j + 1) as f64 * spacing];
                let v = [
                    scale * self.normal_variate(),
                    scale * self.normal_variate(),
                ];
                particles.push(Particle::new(r, v)?);
            }
        }
        self.particles = particles;
        Ok(())
    }

    /// Standard normal variate via the Box–Muller transform.
    fn normal_variate(&mut self) -> f64 {
        // 1 - U keeps the log argument in (0, 1], avoiding ln(0).
        let u1: f64 = 1.0 - self.rng.random::<f64>();
        let u2: f64 = self.rng.random();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    pub fn start(&mut self) {
        self.state = RunState::Running;
    }

    pub fn stop(&mut self) {
        self.state = RunState::Idle;
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &GasConfig {
        &self.config
    }

    /// The configured (target) temperature of the current ensemble.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    pub fn velocities(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.v).collect()
    }

    /// Execute one discrete step: collision resolution, then per-particle
    /// integration and periodic wrap, then (on every `sample_interval`-th
    /// step) a measurement.
    ///
    /// Errors: `Error::NonFinite` if any particle component is NaN/∞ after
    /// the motion update: the engine drops to `Idle` and must be
    /// re-initialized; the fault is never carried into a following step.
    pub fn step(&mut self) -> Result<StepOutput> {
        let skipped = resolve_collisions(&mut self.particles, self.config.radius);
        if skipped > 0 && !self.degenerate_warned {
            self.degenerate_warned = true;
            log::warn!(
                "skipped {skipped} coincident particle pair(s) this step; \
                 leaving velocities unchanged"
            );
        }

        let dt = self.config.timestep;
        let l = self.config.box_size;
        for p in &mut self.particles {
            integrate(p, dt);
            wrap_position(p, l);
        }
        self.check_finite()?;
        self.steps += 1;

        let measurement = if self.steps % self.config.sample_interval == 0 {
            Some(self.measure_now())
        } else {
            None
        };

        Ok(StepOutput {
            positions: self.positions(),
            measurement,
        })
    }

    /// Run-flag-gated step for the host's refresh scheduler. Returns `None`
    /// without touching any state while `Idle` (cooperative cancellation:
    /// stopping simply makes the next tick decline).
    pub fn tick(&mut self) -> Result<Option<StepOutput>> {
        if !self.is_running() {
            return Ok(None);
        }
        self.step().map(Some)
    }

    /// Execute `steps` consecutive steps and return the last output.
    pub fn advance(&mut self, steps: u64) -> Result<StepOutput> {
        if steps == 0 {
            return Err(Error::InvalidParam("steps must be > 0".into()));
        }
        let mut last = self.step()?;
        for _ in 1..steps {
            last = self.step()?;
        }
        Ok(last)
    }

    /// Measure immediately, outside the sampling cadence. Appends to the
    /// pressure history like any sampled step.
    pub fn measure_now(&mut self) -> Measurement {
        let observables = measure(&self.particles, &self.config);
        self.history.push(observables.pressure);
        Measurement {
            observables,
            pressure_history: self.history.to_vec(),
            histogram: self.histogram.sample(&self.particles, self.temperature),
        }
    }

    pub fn pressure_history(&self) -> Vec<PressureSample> {
        self.history.to_vec()
    }

    fn check_finite(&mut self) -> Result<()> {
        if let Some(i) = self.particles.iter().position(|p| !p.is_finite()) {
            self.state = RunState::Idle;
            return Err(Error::NonFinite(format!(
                "particle {i} left the representable range; re-initialize the ensemble"
            )));
        }
        Ok(())
    }
}
