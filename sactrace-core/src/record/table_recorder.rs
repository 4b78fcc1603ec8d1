use super::{Record, Recorder};
use crate::logs::format_row;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Appends selected values of each record as a row of a whitespace-separated log file.
///
/// The row is the concatenation of the values of `keys`, in order. Scalars take one column,
/// 1-dimensional arrays one column per element. Records missing one of the keys are skipped.
pub struct TableRecorder {
    path: PathBuf,
    keys: Vec<String>,
    writer: BufWriter<File>,
}

impl TableRecorder {
    /// Opens `path` for appending, creating the file and its parent directories if needed.
    pub fn new<P, K>(path: P, keys: &[K]) -> Result<Self>
    where
        P: AsRef<Path>,
        K: AsRef<str>,
    {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;
        Ok(Self {
            path,
            keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
            writer: BufWriter::new(file),
        })
    }

    /// The log file written by this recorder.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Recorder for TableRecorder {
    fn write(&mut self, record: Record) {
        let row = match record.numeric_row(&self.keys) {
            Some(row) => row,
            None => {
                debug!("Skip record without numeric keys {:?}", self.keys);
                return;
            }
        };
        if let Err(e) = writeln!(self.writer, "{}", format_row(&row)) {
            warn!("Failed to append to {:?}: {}", self.path, e);
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for TableRecorder {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{logs::LogTable, record::RecordValue};
    use tempdir::TempDir;

    #[test]
    fn test_rows_are_appended_in_key_order() -> Result<()> {
        let dir = TempDir::new("table_recorder")?;
        let path = dir.path().join("logs").join("actions.txt");

        let mut recorder = TableRecorder::new(&path, &["step", "act"])?;
        for i in 0..3 {
            recorder.write(Record::from_slice(&[
                ("step", RecordValue::Scalar(i as f64)),
                ("act", RecordValue::Array1(vec![1.0, 0.1 * i as f64])),
            ]));
        }
        recorder.write(Record::from_scalar("step", 9.0));
        recorder.flush()?;

        let table = LogTable::load(&path)?;
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.column(0), vec![0.0, 1.0, 2.0]);
        assert_eq!(table.column(2), vec![0.0, 0.1, 0.2]);
        Ok(())
    }
}
