//! Persisted training state.
//!
//! The compressed form is a zip archive holding a single deflated entry with the bincode
//! encoding of the value. The uncompressed form is the bare bincode encoding. Loading tries the
//! compressed file first and falls back to the uncompressed one.
use crate::{error::SactraceError, logs::LogSchema, logs::LogSession, params::Params};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use zip::{write::FileOptions, CompressionMethod, ZipArchive, ZipWriter};

const ENTRY_NAME: &str = "state.bincode";

/// A loaded value, tagged with the form it was read from.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// Read from the compressed file.
    Compressed(T),

    /// Read from the uncompressed fallback.
    Uncompressed(T),
}

impl<T> Loaded<T> {
    /// The loaded value.
    pub fn into_inner(self) -> T {
        match self {
            Self::Compressed(t) | Self::Uncompressed(t) => t,
        }
    }

    /// Returns `true` if the value was read from the compressed file.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed(_))
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Saves `data` compressed.
pub fn save_compressed<T: Serialize>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(ENTRY_NAME, options)?;
    zip.write_all(&bincode::serialize(data)?)?;
    zip.finish()?.flush()?;
    Ok(())
}

/// Saves `data` uncompressed.
pub fn save_uncompressed<T: Serialize>(path: impl AsRef<Path>, data: &T) -> Result<()> {
    let path = path.as_ref();
    create_parent(path)?;
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

fn load_compressed<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
    let entry = archive
        .by_name(ENTRY_NAME)
        .with_context(|| format!("No state entry in {:?}", path))?;
    Ok(bincode::deserialize_from(entry)?)
}

fn load_uncompressed<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

/// Loads a value saved with [`save_compressed`], falling back to one saved with
/// [`save_uncompressed`] when the compressed file cannot be read or decoded.
///
/// Fails with [`SactraceError::StateNotFound`] when neither file exists, and with the
/// decoding error of the existing file otherwise.
pub fn load<T: DeserializeOwned>(
    compressed: impl AsRef<Path>,
    uncompressed: Option<&Path>,
) -> Result<Loaded<T>> {
    let compressed = compressed.as_ref();
    let compressed_err = match load_compressed(compressed) {
        Ok(data) => return Ok(Loaded::Compressed(data)),
        Err(e) => e.context(format!("Failed to load {:?}", compressed)),
    };
    if compressed.exists() {
        warn!("{:#}", compressed_err);
    }

    if let Some(path) = uncompressed {
        match load_uncompressed(path) {
            Ok(data) => {
                info!("Loaded {:?} instead of {:?}", path, compressed);
                return Ok(Loaded::Uncompressed(data));
            }
            Err(e) if path.exists() => {
                return Err(e.context(format!("Failed to load {:?}", path)));
            }
            Err(_) => {}
        }
    }

    if compressed.exists() {
        return Err(compressed_err);
    }
    Err(SactraceError::StateNotFound {
        compressed: compressed.to_path_buf(),
        uncompressed: uncompressed.map(|p| p.to_path_buf()),
    }
    .into())
}

/// Internal state of a training run, saved to resume it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainState {
    /// Device the networks were trained on.
    pub device: String,

    /// Directory the run saves its data into.
    pub save_data_dir: PathBuf,

    /// Parameters of the environment.
    pub env_params: Params,

    /// Hyper-parameters of the training algorithm.
    pub training_hyperparams: BTreeMap<String, f64>,

    /// Log locations of the run.
    pub log_session: LogSession,

    /// Current environment state.
    pub state: Vec<f64>,

    /// Number of environment steps done.
    pub steps_done: usize,

    /// Running reward, `None` before the first step.
    pub running_reward: Option<f64>,

    /// Running loss components.
    pub running_loss: Option<Vec<f64>>,

    /// Running multi-objective vector.
    pub running_multi_obj: Option<Vec<f64>>,

    /// Actions not yet flushed to the action log.
    pub actions: Vec<Vec<f64>>,
}

impl TrainState {
    /// An empty state for a run logging into `log_dir`.
    pub fn new(log_dir: impl AsRef<Path>, schema: &LogSchema) -> Self {
        let log_dir = log_dir.as_ref();
        Self {
            device: "cpu".to_string(),
            save_data_dir: log_dir.to_path_buf(),
            env_params: Params::default(),
            training_hyperparams: BTreeMap::new(),
            log_session: LogSession::new(log_dir, schema),
            state: vec![],
            steps_done: 0,
            running_reward: None,
            running_loss: None,
            running_multi_obj: None,
            actions: vec![],
        }
    }

    /// Saves the state compressed into the state directory of its log session.
    pub fn save(&self, schema: &LogSchema) -> Result<PathBuf> {
        let path = self.log_session.state_dir.join(&schema.saved_state_file);
        save_compressed(&path, self)?;
        info!("Saved training state to {:?}", path);
        Ok(path)
    }

    /// Loads the state saved in `log_dir`.
    pub fn load(log_dir: impl AsRef<Path>, schema: &LogSchema) -> Result<Loaded<Self>> {
        let state_dir = log_dir.as_ref().join(&schema.state_dir);
        let uncompressed = state_dir.join(&schema.saved_state_uncompressed_file);
        load(
            state_dir.join(&schema.saved_state_file),
            Some(uncompressed.as_path()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Inner {
        name: String,
        values: Vec<f64>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Nested {
        a: u32,
        b: BTreeMap<String, Inner>,
        c: Option<Vec<Vec<f64>>>,
    }

    fn nested() -> Nested {
        let mut b = BTreeMap::new();
        b.insert(
            "x".to_string(),
            Inner {
                name: "first".to_string(),
                values: vec![1.0, -2.5],
            },
        );
        b.insert(
            "y".to_string(),
            Inner {
                name: "second".to_string(),
                values: vec![],
            },
        );
        Nested {
            a: 7,
            b,
            c: Some(vec![vec![0.1], vec![]]),
        }
    }

    #[test]
    fn test_compressed_round_trip() -> Result<()> {
        let dir = TempDir::new("persist")?;
        let path = dir.path().join("state").join("saved_state.zip");
        let data = nested();
        save_compressed(&path, &data)?;

        let loaded = load::<Nested>(&path, None)?;
        assert!(loaded.is_compressed());
        assert_eq!(loaded.into_inner(), data);
        Ok(())
    }

    #[test]
    fn test_fallback_to_uncompressed() -> Result<()> {
        let dir = TempDir::new("persist")?;
        let compressed = dir.path().join("saved_state.zip");
        let uncompressed = dir.path().join("saved_state.bin");
        let data = nested();
        save_uncompressed(&uncompressed, &data)?;

        let loaded = load::<Nested>(&compressed, Some(&uncompressed))?;
        assert_eq!(loaded, Loaded::Uncompressed(data));
        Ok(())
    }

    #[test]
    fn test_corrupt_compressed_falls_back() -> Result<()> {
        let dir = TempDir::new("persist")?;
        let compressed = dir.path().join("saved_state.zip");
        let uncompressed = dir.path().join("saved_state.bin");
        fs::write(&compressed, b"not a zip archive")?;
        let data = nested();
        save_uncompressed(&uncompressed, &data)?;

        let loaded = load::<Nested>(&compressed, Some(&uncompressed))?;
        assert_eq!(loaded, Loaded::Uncompressed(data));

        // Without a fallback, the decoding error is reported.
        let err = load::<Nested>(&compressed, None).unwrap_err();
        assert!(err.downcast_ref::<SactraceError>().is_none());
        Ok(())
    }

    #[test]
    fn test_missing_state() -> Result<()> {
        let dir = TempDir::new("persist")?;
        let compressed = dir.path().join("saved_state.zip");
        let uncompressed = dir.path().join("saved_state.bin");
        let err = load::<Nested>(&compressed, Some(&uncompressed)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SactraceError>(),
            Some(SactraceError::StateNotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_train_state_round_trip() -> Result<()> {
        let dir = TempDir::new("persist")?;
        let schema = LogSchema::default();
        let mut state = TrainState::new(dir.path(), &schema);
        state.env_params.insert("env_name", "Qubit");
        state.training_hyperparams.insert("gamma".to_string(), 0.997);
        state.state = vec![0.5, 0.5];
        state.steps_done = 1200;
        state.running_reward = Some(0.25);
        state.running_multi_obj = Some(vec![0.1, 0.2]);
        state.actions = vec![vec![1.0, 0.3]];

        state.save(&schema)?;
        let loaded = TrainState::load(dir.path(), &schema)?;
        assert_eq!(loaded, Loaded::Compressed(state));
        Ok(())
    }
}
