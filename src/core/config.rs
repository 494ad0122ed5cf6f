use crate::error::{Error, Result};

/// Boltzmann constant in J/K.
pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;

// ====================
// Reference gas: monoatomic Argon in a 10 nm box
// ====================
pub const ARGON_MASS: f64 = 6.633e-26; // kg
pub const ARGON_RADIUS: f64 = 1.88e-10; // m (van der Waals radius)
pub const DEFAULT_BOX_SIZE: f64 = 1e-8; // m
pub const DEFAULT_TIMESTEP: f64 = 5e-14; // s

// ====================
// Measurement defaults
// ====================
pub const DEFAULT_MIN_TEMPERATURE: f64 = 100.0; // K
pub const DEFAULT_MAX_TEMPERATURE: f64 = 1000.0; // K
pub const DEFAULT_BIN_COUNT: usize = 40;
pub const DEFAULT_HISTORY_LEN: usize = 50;
pub const DEFAULT_SAMPLE_INTERVAL: u64 = 10; // measure every Nth step

/// Named configuration for the ideal-gas engine.
///
/// All particles share `mass` and `radius` (monoatomic gas). The temperature
/// band bounds what `initialize` accepts; the histogram's fixed velocity
/// domain is derived from `max_temperature`, so the band cannot change
/// mid-run without re-initialization.
#[derive(Debug, Clone)]
pub struct GasConfig {
    /// Particle mass in kg.
    pub mass: f64,
    /// Hard-disc radius in m.
    pub radius: f64,
    /// Edge length of the square periodic box in m.
    pub box_size: f64,
    /// Fixed integration timestep in s.
    pub timestep: f64,
    /// Lowest accepted initialization temperature in K.
    pub min_temperature: f64,
    /// Highest accepted initialization temperature in K; also fixes the
    /// histogram's velocity domain.
    pub max_temperature: f64,
    /// Number of speed-histogram bins.
    pub bin_count: usize,
    /// Capacity of the pressure-history FIFO.
    pub history_len: usize,
    /// Measurements are taken every `sample_interval`-th step.
    pub sample_interval: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            mass: ARGON_MASS,
            radius: ARGON_RADIUS,
            box_size: DEFAULT_BOX_SIZE,
            timestep: DEFAULT_TIMESTEP,
            min_temperature: DEFAULT_MIN_TEMPERATURE,
            max_temperature: DEFAULT_MAX_TEMPERATURE,
            bin_count: DEFAULT_BIN_COUNT,
            history_len: DEFAULT_HISTORY_LEN,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }
}

impl GasConfig {
    /// Validate the configuration.
    ///
    /// Errors with `Error::InvalidParam` naming the offending field; called
    /// by the engine before any particle is created.
    pub fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !self.box_size.is_finite() || self.box_size <= 0.0 {
            return Err(Error::InvalidParam(
                "box_size must be finite and > 0".into(),
            ));
        }
        if self.box_size < 2.0 * self.radius {
            return Err(Error::InvalidParam(
                "box_size must be at least 2 * radius".into(),
            ));
        }
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(Error::InvalidParam(
                "timestep must be finite and > 0".into(),
            ));
        }
        if !self.min_temperature.is_finite() || self.min_temperature <= 0.0 {
            return Err(Error::InvalidParam(
                "min_temperature must be finite and > 0".into(),
            ));
        }
        if !self.max_temperature.is_finite() || self.max_temperature < self.min_temperature {
            return Err(Error::InvalidParam(
                "max_temperature must be finite and >= min_temperature".into(),
            ));
        }
        if self.bin_count == 0 {
            return Err(Error::InvalidParam("bin_count must be > 0".into()));
        }
        if self.history_len == 0 {
            return Err(Error::InvalidParam("history_len must be > 0".into()));
        }
        if self.sample_interval == 0 {
            return Err(Error::InvalidParam(
                "sample_interval must be > 0".into(),
            ));
        }
        Ok(())
    }
}
