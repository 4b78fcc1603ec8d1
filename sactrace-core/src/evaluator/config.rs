//! Configuration of [`PolicyEvaluator`](super::PolicyEvaluator).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`PolicyEvaluator`](super::PolicyEvaluator).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EvaluatorConfig {
    /// Decay rate of the running return, in `[0, 1)`.
    pub gamma: f64,

    /// Number of environment steps.
    pub steps: usize,

    /// Seed passed to the environment.
    pub seed: i64,

    /// If set, the action trace is written here.
    pub actions_file: Option<PathBuf>,

    /// If set, the running return trace is written here.
    pub running_reward_file: Option<PathBuf>,

    /// If set, the running multi-objective trace is written here.
    pub running_multi_obj_file: Option<PathBuf>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            steps: 2000,
            seed: 42,
            actions_file: None,
            running_reward_file: None,
            running_multi_obj_file: None,
        }
    }
}

impl EvaluatorConfig {
    /// Sets the decay rate of the running return.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the number of environment steps.
    pub fn steps(mut self, v: usize) -> Self {
        self.steps = v;
        self
    }

    /// Sets the seed of the environment.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Writes the action trace to `path`.
    pub fn actions_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.actions_file = Some(path.into());
        self
    }

    /// Writes the running return trace to `path`.
    pub fn running_reward_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.running_reward_file = Some(path.into());
        self
    }

    /// Writes the running multi-objective trace to `path`.
    pub fn running_multi_obj_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.running_multi_obj_file = Some(path.into());
        self
    }

    /// Constructs [`EvaluatorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`EvaluatorConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_evaluator_config() -> Result<()> {
        let config = EvaluatorConfig::default()
            .gamma(0.997)
            .steps(500)
            .actions_file("some/directory/actions.txt");

        let dir = TempDir::new("evaluator_config")?;
        let path = dir.path().join("evaluator_config.yaml");
        config.save(&path)?;
        let config_ = EvaluatorConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
