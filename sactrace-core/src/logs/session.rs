use super::{LogFiles, LogSchema};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a training run writes its logs and state, and which logs are enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSession {
    /// Log directory of the run.
    pub log_dir: PathBuf,

    /// Directory of the saved training state.
    pub state_dir: PathBuf,

    /// Whether the running reward is logged.
    pub log_running_reward: bool,

    /// Whether the running loss is logged.
    pub log_running_loss: bool,

    /// Whether the running multi-objective is logged.
    pub log_running_multi_obj: bool,

    /// Whether actions are logged.
    pub log_actions: bool,

    /// Running reward log.
    pub running_reward_file: PathBuf,

    /// Running loss log.
    pub running_loss_file: PathBuf,

    /// Running multi-objective log.
    pub running_multi_obj_file: PathBuf,

    /// Action log.
    pub actions_file: PathBuf,
}

impl LogSession {
    /// A session with every log enabled at the default locations of `schema`.
    pub fn new(log_dir: impl AsRef<Path>, schema: &LogSchema) -> Self {
        let log_dir = log_dir.as_ref().to_path_buf();
        Self {
            state_dir: log_dir.join(&schema.state_dir),
            log_running_reward: true,
            log_running_loss: true,
            log_running_multi_obj: true,
            log_actions: true,
            running_reward_file: log_dir.join(&schema.running_reward_file),
            running_loss_file: log_dir.join(&schema.running_loss_file),
            running_multi_obj_file: log_dir.join(&schema.running_multi_obj_file),
            actions_file: log_dir.join(&schema.actions_file),
            log_dir,
        }
    }

    /// Enables or disables the running reward log.
    pub fn log_running_reward(mut self, v: bool) -> Self {
        self.log_running_reward = v;
        self
    }

    /// Enables or disables the running loss log.
    pub fn log_running_loss(mut self, v: bool) -> Self {
        self.log_running_loss = v;
        self
    }

    /// Enables or disables the running multi-objective log.
    pub fn log_running_multi_obj(mut self, v: bool) -> Self {
        self.log_running_multi_obj = v;
        self
    }

    /// Enables or disables the action log.
    pub fn log_actions(mut self, v: bool) -> Self {
        self.log_actions = v;
        self
    }

    /// The enabled logs.
    pub fn files(&self) -> LogFiles {
        let enabled = |on: bool, path: &PathBuf| if on { Some(path.clone()) } else { None };
        LogFiles {
            running_reward: enabled(self.log_running_reward, &self.running_reward_file),
            running_loss: enabled(self.log_running_loss, &self.running_loss_file),
            running_multi_obj: enabled(self.log_running_multi_obj, &self.running_multi_obj_file),
            actions: enabled(self.log_actions, &self.actions_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_logs_are_absent() {
        let session = LogSession::new("run", &LogSchema::default()).log_running_loss(false);
        let files = session.files();
        assert_eq!(files.running_loss, None);
        assert_eq!(files.actions, Some(Path::new("run").join("actions.txt")));
        assert_eq!(session.state_dir, Path::new("run").join("state"));
    }
}
