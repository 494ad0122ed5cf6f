use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Configuration problems are rejected up front and never recovered
/// automatically; a `NonFinite` fault is fatal for the current run and
/// requires re-initialization.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Two particle centers are too close to define a contact normal.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// NaN or infinity appeared in particle state.
    #[error("non-finite state: {0}")]
    NonFinite(String),
}
