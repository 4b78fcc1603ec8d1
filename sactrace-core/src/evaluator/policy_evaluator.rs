use super::{Evaluation, Evaluator, EvaluatorConfig, Trajectory, TrajectoryStep};
use crate::{
    error::SactraceError,
    logs::LogTable,
    record::{NullRecorder, Record, RecordValue, Recorder},
    stats::RunningReturn,
    Act, Env, Policy,
};
use anyhow::Result;
use log::{debug, info};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs a fixed policy for a fixed number of steps and tracks its running return.
///
/// The environment is reset, or forced to the state given with
/// [`PolicyEvaluator::with_initial_state`], then the policy and the environment interact as
///
/// ```mermaid
/// graph LR
///     P[Policy]-->|Env::Act|E[Env]
///     E -->|Env::State|P
///     E -->|"Step&lt;E: Env&gt;"|R[RunningReturn]
///     R -->|running return|T[Traces]
/// ```
///
/// At every step `i` the evaluator appends
///
/// * `[i, running_return]` to the running reward trace,
/// * `[i, discrete, u_0, ...]` (or `[i, u_0, ...]` without a discrete part) to the action trace,
/// * `[i, obj_0, ...]` to the multi-objective trace, if the environment reports one.
///
/// The traces are written to the files set in [`EvaluatorConfig`], if any.
pub struct PolicyEvaluator<E: Env> {
    config: EvaluatorConfig,
    env: E,
    initial_state: Option<E::State>,
}

impl<E: Env> PolicyEvaluator<E> {
    /// Builds the environment and checks the configuration.
    pub fn new(env_config: &E::Config, config: EvaluatorConfig) -> Result<Self> {
        if config.steps == 0 {
            return Err(SactraceError::ZeroSteps.into());
        }
        if !(0.0..1.0).contains(&config.gamma) {
            return Err(SactraceError::InvalidGamma(config.gamma).into());
        }
        Ok(Self {
            env: E::build(env_config, config.seed)?,
            config,
            initial_state: None,
        })
    }

    /// Starts every evaluation from `state` instead of a freshly reset one.
    pub fn with_initial_state(mut self, state: E::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates `policy`, writing a [`Record`] per step to `recorder`.
    pub fn evaluate_with_recorder<P, R>(&mut self, policy: &mut P, recorder: &mut R) -> Result<Evaluation>
    where
        P: Policy<E>,
        R: Recorder,
    {
        let mut state = self.env.reset()?;
        if let Some(initial) = &self.initial_state {
            self.env.set_state(initial.clone())?;
            state = initial.clone();
        }

        let mut running = RunningReturn::new(self.config.gamma)?;
        let mut trajectory = Trajectory {
            initial: self.env.projection_or_derived(),
            steps: Vec::with_capacity(self.config.steps),
        };
        let mut running_rewards = LogTable::empty();
        let mut actions = LogTable::empty();
        let mut running_multi_objs = LogTable::empty();

        for i in 0..self.config.steps {
            let act = policy.sample(&state);
            let step = self.env.step(&act)?;
            let projection = self.env.projection_or_derived();
            let value = running.update(step.reward, step.multi_obj.as_deref())?;

            running_rewards.push_row(vec![i as f64, value]);
            actions.push_row(
                std::iter::once(i as f64)
                    .chain(act.to_log_row())
                    .collect(),
            );
            if step.multi_obj.is_some() {
                if let Some(obj) = running.multi_obj() {
                    running_multi_objs.push_row(
                        std::iter::once(i as f64)
                            .chain(obj.iter().copied())
                            .collect(),
                    );
                }
            }

            let mut record = Record::from_slice(&[
                ("step", RecordValue::Scalar(i as f64)),
                ("reward", RecordValue::Scalar(step.reward)),
                ("running_reward", RecordValue::Scalar(value)),
                ("continuous", RecordValue::Array1(act.continuous().to_vec())),
                ("x", RecordValue::Scalar(projection.x)),
                ("z", RecordValue::Scalar(projection.z)),
            ]);
            if let Some(d) = act.discrete() {
                record.insert("discrete", RecordValue::Scalar(d as f64));
            }
            if let Some(obj) = running.multi_obj() {
                record.insert("running_multi_obj", RecordValue::Array1(obj.to_vec()));
            }
            recorder.write(step.info.merge(record));

            trajectory.steps.push(TrajectoryStep {
                discrete: act.discrete(),
                continuous: act.continuous().to_vec(),
                reward: step.reward,
                projection,
            });
            state = step.state;
        }

        let evaluation = Evaluation {
            running_return: running.value().unwrap_or(0.0),
            running_multi_obj: running.multi_obj().map(|v| v.to_vec()),
            trajectory,
            running_rewards,
            actions,
            running_multi_objs,
        };
        debug!("Running return after {} steps: {}", self.config.steps, evaluation.running_return);

        if let Some(path) = &self.config.running_reward_file {
            evaluation.running_rewards.save(path)?;
            info!("Saved running rewards to {:?}", path);
        }
        if let Some(path) = &self.config.actions_file {
            evaluation.actions.save(path)?;
            info!("Saved actions to {:?}", path);
        }
        if let Some(path) = &self.config.running_multi_obj_file {
            if !evaluation.running_multi_objs.is_empty() {
                evaluation.running_multi_objs.save(path)?;
                info!("Saved running multi-objectives to {:?}", path);
            }
        }

        Ok(evaluation)
    }
}

impl<E: Env> Evaluator<E> for PolicyEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Evaluation> {
        self.evaluate_with_recorder(policy, &mut NullRecorder::new())
    }
}
