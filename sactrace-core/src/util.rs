//! Helpers for browsing log directories and slicing action traces.
use crate::{
    error::SactraceError,
    logs::{LogSchema, LogTable, WindowSpec},
    params::Params,
};
use anyhow::Result;
use log::{info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

/// Log directories in `main_dir` whose parameters satisfy all `conditions`.
///
/// Subdirectories without a readable parameter file are skipped. The result is sorted.
pub fn log_dirs_given_criteria<K, V>(
    main_dir: impl AsRef<Path>,
    conditions: &[(K, V)],
    schema: &LogSchema,
) -> Result<Vec<PathBuf>>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut dirs = vec![];
    for entry in fs::read_dir(main_dir.as_ref())? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        match Params::from_log_dir(&path, schema) {
            Ok(params) => {
                if params.matches(conditions) {
                    dirs.push(path);
                }
            }
            Err(e) => warn!("Skip {:?}: {}", path, e),
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// The last `n` running rewards of a run and their mean.
pub fn last_rewards_and_avg(
    log_dir: impl AsRef<Path>,
    n: usize,
    schema: &LogSchema,
) -> Result<(Vec<f64>, f64)> {
    let path = log_dir.as_ref().join(&schema.running_reward_file);
    let rewards = LogTable::load(&path)?
        .window(&WindowSpec::default().last(n))
        .column(1);
    if rewards.is_empty() {
        return Err(SactraceError::EmptyLog(path).into());
    }
    let avg = rewards.iter().sum::<f64>() / rewards.len() as f64;
    Ok((rewards, avg))
}

/// Times, and the continuous actions taken at them, where the discrete action was `target`.
pub fn action_times<T: Clone>(
    times: &[f64],
    dacts: &[usize],
    uacts: &[T],
    target: usize,
) -> (Vec<f64>, Vec<T>) {
    dacts
        .iter()
        .zip(times.iter().zip(uacts))
        .filter(|(d, _)| **d == target)
        .map(|(_, (t, u))| (*t, u.clone()))
        .unzip()
}

/// Indices at which the discrete action was `target`.
pub fn action_indices(dacts: &[usize], target: usize) -> Vec<usize> {
    dacts
        .iter()
        .enumerate()
        .filter_map(|(i, d)| if *d == target { Some(i) } else { None })
        .collect()
}

/// Nearest integer, ties to even.
pub fn nearest_int(x: f64) -> i64 {
    x.round_ties_even() as i64
}

/// Logs the wall time spent between its construction and drop.
///
/// ```
/// use sactrace_core::util::MeasureDuration;
///
/// {
///     let _timer = MeasureDuration::new("loading logs");
///     // ...
/// } // "Time: ... for loading logs" is logged here
/// ```
pub struct MeasureDuration {
    what: String,
    start: Instant,
}

impl MeasureDuration {
    /// Starts measuring.
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            start: Instant::now(),
        }
    }

    /// Time elapsed so far.
    pub fn duration(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for MeasureDuration {
    fn drop(&mut self) {
        info!("Time: {:?} for {}", self.duration(), self.what);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn write_run(main_dir: &Path, name: &str, params: &str, rewards: &str) -> Result<()> {
        let dir = main_dir.join(name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("params.txt"), params)?;
        fs::write(dir.join("running_reward.txt"), rewards)?;
        Ok(())
    }

    #[test]
    fn test_log_dirs_given_criteria() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let main = TempDir::new("log_dirs")?;
        let schema = LogSchema::default();
        write_run(main.path(), "a", "b:\t1\ndt:\t0.1\n", "0 1\n")?;
        write_run(main.path(), "b", "b:\t2\ndt:\t0.1\n", "0 1\n")?;
        write_run(main.path(), "c", "dt:\t0.1\n", "0 1\n")?;
        fs::create_dir_all(main.path().join("no_params"))?;
        fs::write(main.path().join("file.txt"), "")?;

        let dirs = log_dirs_given_criteria(main.path(), &[("dt", "0.1")], &schema)?;
        assert_eq!(dirs.len(), 3);

        let dirs = log_dirs_given_criteria(main.path(), &[("b", "1"), ("dt", "0.1")], &schema)?;
        assert_eq!(dirs, vec![main.path().join("a")]);
        Ok(())
    }

    #[test]
    fn test_last_rewards_and_avg() -> Result<()> {
        let main = TempDir::new("last_rewards")?;
        let schema = LogSchema::default();
        write_run(main.path(), "run", "", "0 1.0\n1 2.0\n2 3.0\n3 5.0\n")?;

        let (rewards, avg) = last_rewards_and_avg(main.path().join("run"), 2, &schema)?;
        assert_eq!(rewards, vec![3.0, 5.0]);
        assert_eq!(avg, 4.0);

        let (rewards, _) = last_rewards_and_avg(main.path().join("run"), 10, &schema)?;
        assert_eq!(rewards.len(), 4);

        write_run(main.path(), "empty", "", "")?;
        assert!(last_rewards_and_avg(main.path().join("empty"), 3, &schema).is_err());
        Ok(())
    }

    #[test]
    fn test_action_selection() {
        let times = [0.0, 0.5, 1.0, 1.5];
        let dacts = [0, 2, 0, 1];
        let uacts = [[0.1], [0.2], [0.3], [0.4]];
        let (t, u) = action_times(&times, &dacts, &uacts, 0);
        assert_eq!(t, vec![0.0, 1.0]);
        assert_eq!(u, vec![[0.1], [0.3]]);
        assert_eq!(action_indices(&dacts, 0), vec![0, 2]);
        assert!(action_indices(&dacts, 3).is_empty());
    }

    #[test]
    fn test_nearest_int() {
        assert_eq!(nearest_int(2.4), 2);
        assert_eq!(nearest_int(2.5), 2);
        assert_eq!(nearest_int(3.5), 4);
        assert_eq!(nearest_int(-1.6), -2);
    }
}
