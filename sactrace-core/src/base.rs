//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::{Env, Projection, StateDiagnostics};
pub use policy::Policy;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
pub use step::Step;

/// An action applied to an environment.
///
/// Actions live in a hybrid space: at every step a policy may pick one of a small set of
/// discrete modes together with a continuous control vector. Environments without a
/// discrete mode return `None` from [`Act::discrete`].
pub trait Act: Clone + Debug {
    /// The discrete mode, if the action space has one.
    fn discrete(&self) -> Option<usize>;

    /// The continuous control vector.
    fn continuous(&self) -> &[f64];

    /// Returns the number of continuous components.
    fn len(&self) -> usize {
        self.continuous().len()
    }

    /// The columns of this action in an action log, without the step index.
    ///
    /// The discrete tag, when present, comes first as an integer-valued float.
    fn to_log_row(&self) -> Vec<f64> {
        self.discrete()
            .map(|d| d as f64)
            .into_iter()
            .chain(self.continuous().iter().copied())
            .collect()
    }
}

/// An action made of a discrete mode and a continuous control vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HybridAct {
    /// Discrete mode.
    pub discrete: usize,

    /// Continuous control.
    pub continuous: Vec<f64>,
}

impl HybridAct {
    /// Constructs a [`HybridAct`].
    pub fn new(discrete: usize, continuous: Vec<f64>) -> Self {
        Self {
            discrete,
            continuous,
        }
    }
}

impl Act for HybridAct {
    fn discrete(&self) -> Option<usize> {
        Some(self.discrete)
    }

    fn continuous(&self) -> &[f64] {
        &self.continuous
    }
}

/// A purely continuous action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuousAct(pub Vec<f64>);

impl Act for ContinuousAct {
    fn discrete(&self) -> Option<usize> {
        None
    }

    fn continuous(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for ContinuousAct {
    fn from(v: Vec<f64>) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_row_puts_discrete_tag_first() {
        let act = HybridAct::new(2, vec![0.5, -1.0]);
        assert_eq!(act.to_log_row(), vec![2.0, 0.5, -1.0]);
        assert_eq!(act.len(), 2);

        let act = ContinuousAct::from(vec![0.25]);
        assert_eq!(act.to_log_row(), vec![0.25]);
    }
}
