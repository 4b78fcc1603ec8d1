//! Evaluate a [`Policy`] on an [`Env`].
use crate::{
    logs::LogTable,
    record::{Record, RecordValue},
    Env, Policy,
};
use anyhow::Result;
use std::path::Path;
mod config;
mod policy_evaluator;
mod trajectory;
pub use config::EvaluatorConfig;
pub use policy_evaluator::PolicyEvaluator;
pub use trajectory::{Trajectory, TrajectoryStep};

/// Evaluate [`Policy`].
pub trait Evaluator<E: Env> {
    /// Evaluate [`Policy`].
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Evaluation>;
}

/// Result of an evaluation run.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Running return after the last step.
    pub running_return: f64,

    /// Running multi-objective vector after the last step, if the environment reports one.
    pub running_multi_obj: Option<Vec<f64>>,

    /// Per-step diagnostics.
    pub trajectory: Trajectory,

    /// Trace of `[step, running_return]` rows.
    pub running_rewards: LogTable,

    /// Trace of `[step, (discrete), continuous...]` rows.
    pub actions: LogTable,

    /// Trace of `[step, obj_0, ...]` rows. Empty without multi-objective signal.
    pub running_multi_objs: LogTable,
}

impl Evaluation {
    /// The running return, followed by the running multi-objective vector if there is one.
    pub fn returns(&self) -> Vec<f64> {
        std::iter::once(self.running_return)
            .chain(self.running_multi_obj.iter().flatten().copied())
            .collect()
    }

    /// Summary as a [`Record`].
    pub fn record(&self) -> Record {
        let mut record = Record::from_scalar("running_return", self.running_return);
        if let Some(obj) = &self.running_multi_obj {
            record.insert("running_multi_obj", RecordValue::Array1(obj.clone()));
        }
        record
    }

    /// Writes the traces to the given files.
    ///
    /// The multi-objective trace is written only if it holds rows.
    pub fn write_traces(
        &self,
        running_reward: &Path,
        actions: &Path,
        running_multi_obj: &Path,
    ) -> Result<()> {
        self.running_rewards.save(running_reward)?;
        self.actions.save(actions)?;
        if !self.running_multi_objs.is_empty() {
            self.running_multi_objs.save(running_multi_obj)?;
        }
        Ok(())
    }
}
