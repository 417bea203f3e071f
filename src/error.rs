//! Error types raised while setting up or running a battle.

use thiserror::Error;

/// Failures surfaced by the simulator core.
///
/// Every variant is fatal for the battle it belongs to; nothing here is
/// retried.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("species '{0}' not found in game master")]
    MissingSpecies(String),

    #[error("move '{0}' not found in game master")]
    MissingMove(String),

    #[error("no CP multiplier for level {0}")]
    MissingLevel(f64),

    #[error("battle did not converge after {rounds} charge rounds without a fast move")]
    NonConvergence { rounds: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
