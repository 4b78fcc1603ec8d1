use anyhow::Result;
use sactrace::{
    sactrace_core::{logs::LogTable, EvaluatorConfig, HybridAct, Step},
    test_policy, TestPolicyConfig,
};
use tempdir::TempDir;

/// A qubit-like toy whose reward is the overlap of the control with a target.
struct TargetEnv {
    target: f64,
    u: f64,
}

impl sactrace::sactrace_core::Env for TargetEnv {
    type Config = f64;
    type State = f64;
    type Act = HybridAct;

    fn build(config: &f64, _seed: i64) -> Result<Self> {
        Ok(Self {
            target: *config,
            u: 0.0,
        })
    }

    fn reset(&mut self) -> Result<f64> {
        self.u = 0.0;
        Ok(0.0)
    }

    fn set_state(&mut self, state: f64) -> Result<()> {
        self.u = state;
        Ok(())
    }

    fn state(&self) -> &f64 {
        &self.u
    }

    fn step(&mut self, act: &HybridAct) -> Result<Step<Self>> {
        self.u = act.continuous[0];
        let reward = 1.0 - (self.u - self.target).abs();
        Ok(Step::new(self.u, reward).with_multi_obj(vec![reward, act.discrete as f64]))
    }

    fn z_coordinate(&self) -> f64 {
        self.u
    }
}

#[test]
fn test_policy_returns_running_return_and_objectives() -> Result<()> {
    let config = TestPolicyConfig::default()
        .suppress_show(true)
        .evaluator(EvaluatorConfig::default().gamma(0.5).steps(50));
    let mut policy = |_: &f64| HybridAct::new(1, vec![0.25]);
    let test = test_policy::<TargetEnv, _>(&0.25, &mut policy, &config, None)?;

    let returns = test.returns();
    assert_eq!(returns.len(), 3);
    assert!((returns[0] - 1.0).abs() < 1e-12);
    assert!((returns[1] - 1.0).abs() < 1e-12);
    assert!((returns[2] - 1.0).abs() < 1e-12);
    assert!(test.figure.is_none());
    assert_eq!(test.evaluation.trajectory.len(), 50);
    Ok(())
}

#[test]
fn test_policy_keeps_actions_file() -> Result<()> {
    let dir = TempDir::new("test_policy")?;
    let actions_file = dir.path().join("det_policy").join("actions.txt");
    let config = TestPolicyConfig::default().suppress_show(true).evaluator(
        EvaluatorConfig::default()
            .steps(20)
            .actions_file(&actions_file),
    );
    let mut t = 0;
    let mut policy = |_: &f64| {
        t += 1;
        HybridAct::new(t % 2, vec![0.1 * t as f64])
    };
    test_policy::<TargetEnv, _>(&0.0, &mut policy, &config, Some(0.5))?;

    let actions = LogTable::load(&actions_file)?;
    assert_eq!(actions.n_rows(), 20);
    assert_eq!(actions.row(0).unwrap(), &[0.0, 1.0, 0.1][..]);
    assert_eq!(actions.column(1)[1], 0.0);
    Ok(())
}
