//! Parameter file of a training run.
//!
//! Each row is `key:\tvalue`. Keys and values are kept as strings.
use crate::{error::SactraceError, logs::LogSchema};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufWriter, Write},
    iter::FromIterator,
    path::Path,
};

const DELIMITER: &str = ":\t";

/// Parameters of a training run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Parses the content of a parameter file.
    pub fn parse(text: &str, path: &Path) -> Result<Self, SactraceError> {
        let mut map = BTreeMap::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) =
                line.split_once(DELIMITER)
                    .ok_or_else(|| SactraceError::MalformedParams {
                        path: path.to_path_buf(),
                        line: i + 1,
                    })?;
            map.insert(key.to_string(), value.to_string());
        }
        Ok(Self(map))
    }

    /// Loads a parameter file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameter file {:?}", path))?;
        Ok(Self::parse(&text, path)?)
    }

    /// Loads the parameter file of a log directory.
    pub fn from_log_dir(log_dir: impl AsRef<Path>, schema: &LogSchema) -> Result<Self> {
        Self::load(log_dir.as_ref().join(&schema.params_file))
    }

    /// Writes the parameters, one `key:\tvalue` row each.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for (k, v) in self.0.iter() {
            writeln!(writer, "{}{}{}", k, DELIMITER, v)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.as_str())
    }

    /// Value of `key`, an error if it is missing.
    pub fn require(&self, key: &str) -> Result<&str, SactraceError> {
        self.get(key)
            .ok_or_else(|| SactraceError::ParamKeyError(key.to_string()))
    }

    /// Name of the environment class the run was trained on.
    pub fn env_name(&self) -> Result<&str, SactraceError> {
        self.require("env_name")
    }

    /// Sets a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Iterates over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Returns `true` if every condition matches exactly. A missing key never matches.
    pub fn matches<K, V>(&self, conditions: &[(K, V)]) -> bool
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        conditions
            .iter()
            .all(|(k, v)| self.get(k.as_ref()) == Some(v.as_ref()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_parse_params() -> Result<()> {
        let params = Params::parse(
            "env_name:\tTwoLevelFridge\ngamma:\t0.997\n\nb:\t2.5: not a delimiter\n",
            Path::new("params.txt"),
        )?;
        assert_eq!(params.env_name()?, "TwoLevelFridge");
        assert_eq!(params.get("gamma"), Some("0.997"));
        assert_eq!(params.get("b"), Some("2.5: not a delimiter"));
        assert!(params.require("dt").is_err());
        Ok(())
    }

    #[test]
    fn test_malformed_row() {
        let err = Params::parse("a:\t1\nb 2\n", Path::new("params.txt")).unwrap_err();
        assert!(matches!(err, SactraceError::MalformedParams { line: 2, .. }));
    }

    #[test]
    fn test_save_and_matches() -> Result<()> {
        let dir = TempDir::new("params")?;
        let schema = LogSchema::default();
        let params: Params = vec![("env_name", "Qubit"), ("dt", "0.1")].into_iter().collect();
        params.save(dir.path().join(&schema.params_file))?;

        let loaded = Params::from_log_dir(dir.path(), &schema)?;
        assert_eq!(loaded, params);
        assert!(loaded.matches(&[("dt", "0.1")]));
        assert!(!loaded.matches(&[("dt", "0.10")]));
        assert!(!loaded.matches(&[("b", "1")]));
        assert!(loaded.matches::<&str, &str>(&[]));
        Ok(())
    }
}
