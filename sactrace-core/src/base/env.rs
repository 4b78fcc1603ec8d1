//! Environment.
use super::{Act, Step};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Phase-space projection `(x, z)` of an environment state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Component along x.
    pub x: f64,

    /// Component along z.
    pub z: f64,
}

/// Represents a simulated environment driven by a policy.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// State of the environment, which is also what the policy observes.
    type State: Clone + Debug;

    /// Action of the environment.
    type Act: Act;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial state.
    fn reset(&mut self) -> Result<Self::State>;

    /// Forces the current state of the environment.
    fn set_state(&mut self, state: Self::State) -> Result<()>;

    /// The current state.
    fn state(&self) -> &Self::State;

    /// Performs an environment step.
    fn step(&mut self, act: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;

    /// Phase-space projection of the current state.
    ///
    /// Environments that do not track such a projection keep the default, and callers
    /// fall back to `(0, z_coordinate())`.
    fn projection(&self) -> Option<Projection> {
        None
    }

    /// The z coordinate derived from the current state.
    fn z_coordinate(&self) -> f64 {
        0.0
    }

    /// Projection of the current state, derived when the environment exposes none.
    fn projection_or_derived(&self) -> Projection {
        self.projection().unwrap_or_else(|| Projection {
            x: 0.0,
            z: self.z_coordinate(),
        })
    }
}

/// Diagnostics computed from a logged state vector.
///
/// The renderer receives an implementation of this trait for the environment a run was
/// trained on, so state logs can be turned into Bloch-sphere coordinates or concurrence.
pub trait StateDiagnostics {
    /// Bloch vector `(x, y, z)` of a state.
    fn bloch_vector(&self, _state: &[f64]) -> Option<[f64; 3]> {
        None
    }

    /// Concurrence of a state.
    fn concurrence(&self, _state: &[f64]) -> Option<f64> {
        None
    }
}
