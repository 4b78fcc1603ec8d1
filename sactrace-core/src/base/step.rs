//! Environment step.
use super::Env;
use crate::record::Record;

/// Outcome of one environment step.
///
/// An environment emits a [`Step`] object at every interaction step.
pub struct Step<E: Env> {
    /// State after the step.
    pub state: E::State,

    /// Reward.
    pub reward: f64,

    /// Multi-objective signal, reported by some environments next to the reward.
    pub multi_obj: Option<Vec<f64>>,

    /// Information defined by the environment.
    pub info: Record,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(state: E::State, reward: f64) -> Self {
        Step {
            state,
            reward,
            multi_obj: None,
            info: Record::empty(),
        }
    }

    /// Attaches a multi-objective signal.
    pub fn with_multi_obj(mut self, multi_obj: Vec<f64>) -> Self {
        self.multi_obj = Some(multi_obj);
        self
    }

    /// Attaches environment information.
    pub fn with_info(mut self, info: Record) -> Self {
        self.info = info;
        self
    }
}
