//! Names of the files a training run writes into its log directory.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// File layout and action mode of a family of training runs.
///
/// Runs with a discrete action tag in front of the continuous controls are `hybrid`. The
/// schema is passed explicitly to everything reading a log directory.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LogSchema {
    /// Running reward log.
    pub running_reward_file: String,

    /// Running loss log.
    pub running_loss_file: String,

    /// Running multi-objective log.
    pub running_multi_obj_file: String,

    /// Action log.
    pub actions_file: String,

    /// Parameter file with `key:\tvalue` rows.
    pub params_file: String,

    /// Directory, relative to the log directory, holding the saved training state.
    pub state_dir: String,

    /// Compressed training state, inside `state_dir`.
    pub saved_state_file: String,

    /// Uncompressed training state, inside `state_dir`.
    pub saved_state_uncompressed_file: String,

    /// Whether actions carry a discrete tag.
    pub hybrid: bool,
}

impl Default for LogSchema {
    fn default() -> Self {
        Self {
            running_reward_file: "running_reward.txt".to_string(),
            running_loss_file: "running_loss.txt".to_string(),
            running_multi_obj_file: "running_multi_obj.txt".to_string(),
            actions_file: "actions.txt".to_string(),
            params_file: "params.txt".to_string(),
            state_dir: "state".to_string(),
            saved_state_file: "saved_state.zip".to_string(),
            saved_state_uncompressed_file: "saved_state.bin".to_string(),
            hybrid: true,
        }
    }
}

impl LogSchema {
    /// Default layout for runs with discrete and continuous actions.
    pub fn hybrid() -> Self {
        Self::default()
    }

    /// Default layout for runs with continuous actions only.
    pub fn continuous() -> Self {
        Self::default().set_hybrid(false)
    }

    /// Sets the action mode.
    pub fn set_hybrid(mut self, v: bool) -> Self {
        self.hybrid = v;
        self
    }

    /// Sets the name of the running reward log.
    pub fn running_reward_file(mut self, v: impl Into<String>) -> Self {
        self.running_reward_file = v.into();
        self
    }

    /// Sets the name of the running loss log.
    pub fn running_loss_file(mut self, v: impl Into<String>) -> Self {
        self.running_loss_file = v.into();
        self
    }

    /// Sets the name of the running multi-objective log.
    pub fn running_multi_obj_file(mut self, v: impl Into<String>) -> Self {
        self.running_multi_obj_file = v.into();
        self
    }

    /// Sets the name of the action log.
    pub fn actions_file(mut self, v: impl Into<String>) -> Self {
        self.actions_file = v.into();
        self
    }

    /// Sets the name of the parameter file.
    pub fn params_file(mut self, v: impl Into<String>) -> Self {
        self.params_file = v.into();
        self
    }

    /// Sets the name of the state directory.
    pub fn state_dir(mut self, v: impl Into<String>) -> Self {
        self.state_dir = v.into();
        self
    }

    /// Constructs [`LogSchema`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`LogSchema`].
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
    fn test_serde_log_schema() -> Result<()> {
        let schema = LogSchema::continuous()
            .actions_file("acts.txt")
            .state_dir("saved");

        let dir = TempDir::new("log_schema")?;
        let path = dir.path().join("schema.yaml");
        schema.save(&path)?;
        let schema_ = LogSchema::load(&path)?;
        assert_eq!(schema, schema_);
        assert!(!schema_.hybrid);
        assert_eq!(schema_.actions_file, "acts.txt");
        Ok(())
    }
}
