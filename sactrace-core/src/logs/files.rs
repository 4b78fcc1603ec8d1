use super::{LogSchema, LogTable};
use crate::error::SactraceError;
use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

/// Number of quantities (columns besides the step) in a log file, zero if it does not exist.
pub fn count_quantities(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(0);
    }
    Ok(LogTable::load(path)?.n_quantities())
}

/// Locations of the four logs read when rendering a run.
///
/// A location set to `None`, or pointing to a file that does not exist, is treated as an
/// absent log.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogFiles {
    /// Running reward log.
    pub running_reward: Option<PathBuf>,

    /// Running loss log.
    pub running_loss: Option<PathBuf>,

    /// Running multi-objective log.
    pub running_multi_obj: Option<PathBuf>,

    /// Action log.
    pub actions: Option<PathBuf>,
}

fn existing(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| p.exists())
}

impl LogFiles {
    /// Default locations inside `log_dir`.
    pub fn resolve(log_dir: impl AsRef<Path>, schema: &LogSchema) -> Self {
        let log_dir = log_dir.as_ref();
        Self {
            running_reward: Some(log_dir.join(&schema.running_reward_file)),
            running_loss: Some(log_dir.join(&schema.running_loss_file)),
            running_multi_obj: Some(log_dir.join(&schema.running_multi_obj_file)),
            actions: Some(log_dir.join(&schema.actions_file)),
        }
    }

    /// Replaces the running reward location.
    pub fn running_reward(mut self, path: Option<PathBuf>) -> Self {
        self.running_reward = path;
        self
    }

    /// Replaces the running loss location.
    pub fn running_loss(mut self, path: Option<PathBuf>) -> Self {
        self.running_loss = path;
        self
    }

    /// Replaces the running multi-objective location.
    pub fn running_multi_obj(mut self, path: Option<PathBuf>) -> Self {
        self.running_multi_obj = path;
        self
    }

    /// Replaces the action log location.
    pub fn actions(mut self, path: Option<PathBuf>) -> Self {
        self.actions = path;
        self
    }

    /// Applies the locations set in `overrides` on top of `self`.
    pub fn with_overrides(self, overrides: &LogFiles) -> Self {
        Self {
            running_reward: overrides.running_reward.clone().or(self.running_reward),
            running_loss: overrides.running_loss.clone().or(self.running_loss),
            running_multi_obj: overrides
                .running_multi_obj
                .clone()
                .or(self.running_multi_obj),
            actions: overrides.actions.clone().or(self.actions),
        }
    }

    /// Running reward log, if it exists.
    pub fn existing_running_reward(&self) -> Option<&Path> {
        existing(&self.running_reward)
    }

    /// Running loss log, if it exists.
    pub fn existing_running_loss(&self) -> Option<&Path> {
        existing(&self.running_loss)
    }

    /// Running multi-objective log, if it exists.
    pub fn existing_running_multi_obj(&self) -> Option<&Path> {
        existing(&self.running_multi_obj)
    }

    /// Action log, if it exists.
    pub fn existing_actions(&self) -> Option<&Path> {
        existing(&self.actions)
    }

    /// Number of rows of the first existing log among reward, loss and actions.
    pub fn count_lines(&self) -> Result<usize> {
        let path = self
            .existing_running_reward()
            .or_else(|| self.existing_running_loss())
            .or_else(|| self.existing_actions())
            .ok_or(SactraceError::NoFilesToCountLines)?;
        let n = LogTable::load(path)?.n_rows();
        debug!("{:?} has {} lines", path, n);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_count_quantities() -> Result<()> {
        let dir = TempDir::new("log_files")?;
        let path = dir.path().join("running_multi_obj.txt");
        assert_eq!(count_quantities(&path)?, 0);

        fs::write(&path, "0 1.0 2.0 3.0\n")?;
        assert_eq!(count_quantities(&path)?, 3);
        Ok(())
    }

    #[test]
    fn test_count_lines_prefers_reward() -> Result<()> {
        let dir = TempDir::new("log_files")?;
        let files = LogFiles::resolve(dir.path(), &LogSchema::default());
        assert!(matches!(
            files.count_lines().unwrap_err().downcast_ref::<SactraceError>(),
            Some(SactraceError::NoFilesToCountLines)
        ));

        fs::write(dir.path().join("actions.txt"), "0 1 0.5\n1 0 0.2\n2 1 0.1\n")?;
        assert_eq!(files.count_lines()?, 3);

        fs::write(dir.path().join("running_reward.txt"), "0 0.5\n")?;
        assert_eq!(files.count_lines()?, 1);
        Ok(())
    }

    #[test]
    fn test_overrides_win() {
        let files = LogFiles::resolve("run", &LogSchema::default());
        let overrides = LogFiles::default().actions(Some(PathBuf::from("/tmp/acts.txt")));
        let files = files.with_overrides(&overrides).running_loss(None);
        assert_eq!(files.actions, Some(PathBuf::from("/tmp/acts.txt")));
        assert_eq!(
            files.running_reward,
            Some(Path::new("run").join("running_reward.txt"))
        );
        assert_eq!(files.running_loss, None);
        assert_eq!(files.existing_running_loss(), None);
    }
}
