//! Evaluate a policy and look at its running return and last actions.
use anyhow::Result;
use log::info;
use sactrace_core::{
    logs::{LogFiles, LogSchema},
    Env, Evaluation, Evaluator as _, EvaluatorConfig, Policy, PolicyEvaluator,
};
use sactrace_plot::{plot_log_files, ActionPlotConfig, PlotConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempdir::TempDir;

/// Configuration of [`test_policy`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct TestPolicyConfig {
    /// Evaluation run. If `actions_file` is set, the actions are kept there.
    pub evaluator: EvaluatorConfig,

    /// Skips the figure.
    pub suppress_show: bool,

    /// Number of last actions shown.
    pub actions_to_plot: usize,

    /// Range of the y axis of the actions.
    pub actions_ylim: Option<(f64, f64)>,

    /// Whether actions carry a discrete tag.
    pub hybrid: bool,

    /// Where the figure is written.
    pub figure_file: PathBuf,
}

impl Default for TestPolicyConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorConfig::default(),
            suppress_show: false,
            actions_to_plot: 400,
            actions_ylim: None,
            hybrid: true,
            figure_file: PathBuf::from("test_policy.png"),
        }
    }
}

impl TestPolicyConfig {
    /// Sets the evaluation run.
    pub fn evaluator(mut self, v: EvaluatorConfig) -> Self {
        self.evaluator = v;
        self
    }

    /// Skips the figure.
    pub fn suppress_show(mut self, v: bool) -> Self {
        self.suppress_show = v;
        self
    }

    /// Sets the number of last actions shown.
    pub fn actions_to_plot(mut self, v: usize) -> Self {
        self.actions_to_plot = v;
        self
    }

    /// Sets whether actions carry a discrete tag.
    pub fn hybrid(mut self, v: bool) -> Self {
        self.hybrid = v;
        self
    }

    /// Sets where the figure is written.
    pub fn figure_file(mut self, v: impl Into<PathBuf>) -> Self {
        self.figure_file = v.into();
        self
    }
}

/// Outcome of [`test_policy`].
#[derive(Clone, Debug)]
pub struct PolicyTest {
    /// The evaluation.
    pub evaluation: Evaluation,

    /// The figure, unless suppressed.
    pub figure: Option<PathBuf>,
}

impl PolicyTest {
    /// The running return, followed by the running multi-objective vector if there is one.
    pub fn returns(&self) -> Vec<f64> {
        self.evaluation.returns()
    }
}

fn show(evaluation: &Evaluation, config: &TestPolicyConfig, dir: &Path) -> Result<PathBuf> {
    let schema = LogSchema::default();
    let running_reward = dir.join(&schema.running_reward_file);
    let running_multi_obj = dir.join(&schema.running_multi_obj_file);
    let actions = match &config.evaluator.actions_file {
        Some(path) => path.clone(),
        None => dir.join(&schema.actions_file),
    };
    evaluation.write_traces(&running_reward, &actions, &running_multi_obj)?;

    let files = LogFiles::default()
        .running_reward(Some(running_reward))
        .running_multi_obj(Some(running_multi_obj))
        .actions(Some(actions));
    let plot_config = PlotConfig::default()
        .actions_per_log(1)
        .actions_to_plot(config.actions_to_plot)
        .actions(ActionPlotConfig::default().ylim(config.actions_ylim));
    plot_log_files(&files, config.hybrid, &plot_config, &config.figure_file)?;
    Ok(config.figure_file.clone())
}

/// Runs `policy` on a fresh environment, optionally starting from `initial_state`, and
/// draws its running return and last actions unless `suppress_show` is set.
///
/// The running return is a bias-corrected moving average with the evaluator's `gamma`,
/// which need not be the discount factor used in training.
pub fn test_policy<E, P>(
    env_config: &E::Config,
    policy: &mut P,
    config: &TestPolicyConfig,
    initial_state: Option<E::State>,
) -> Result<PolicyTest>
where
    E: Env,
    P: Policy<E>,
{
    let mut evaluator = PolicyEvaluator::<E>::new(env_config, config.evaluator.clone())?;
    if let Some(state) = initial_state {
        evaluator = evaluator.with_initial_state(state);
    }
    let evaluation = evaluator.evaluate(policy)?;
    info!("Running return: {:?}", evaluation.returns());

    let figure = if config.suppress_show {
        None
    } else {
        let tmp = TempDir::new("sactrace")?;
        Some(show(&evaluation, config, tmp.path())?)
    };
    Ok(PolicyTest { evaluation, figure })
}
