use crate::error::SactraceError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

/// Formats a value the way `numpy.savetxt` does by default (`%.18e`).
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = format!("{:.18e}", v);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}

/// Formats a row of a log table.
pub fn format_row(row: &[f64]) -> String {
    row.iter()
        .map(|v| format_value(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Selection of a contiguous slice of log rows.
///
/// `up_to_line` cuts the table after the given 0-based row, `last` keeps only the last rows
/// of what remains. Both are clamped to the available data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Keep at most this many rows, counted backwards from the cutoff.
    pub last: Option<usize>,

    /// Last row (0-based, inclusive) to consider.
    pub up_to_line: Option<usize>,

    /// Replace the step column with `0, 1, ..., M-1`.
    pub count_from_zero: bool,

    /// Replace the step column with `0, dt, ..., (M-1) dt`. Takes precedence over
    /// `count_from_zero`.
    pub dt: Option<f64>,
}

impl WindowSpec {
    /// Keeps at most the last `k` rows.
    pub fn last(mut self, k: usize) -> Self {
        self.last = Some(k);
        self
    }

    /// Cuts the table after row `line`.
    pub fn up_to_line(mut self, line: usize) -> Self {
        self.up_to_line = Some(line);
        self
    }

    /// Sets an optional cutoff.
    pub fn up_to(mut self, line: Option<usize>) -> Self {
        self.up_to_line = line;
        self
    }

    /// Reindexes the step column from zero.
    pub fn count_from_zero(mut self, v: bool) -> Self {
        self.count_from_zero = v;
        self
    }

    /// Rescales the step column to a uniform time step.
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }
}

/// A whitespace-delimited numeric table, one row per logged step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogTable {
    rows: Vec<Vec<f64>>,
}

impl LogTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let n_cols = first.len();
            if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
                return Err(SactraceError::MalformedLog {
                    path: Default::default(),
                    line: i + 1,
                    reason: format!("expected {} columns, found {}", n_cols, row.len()),
                }
                .into());
            }
        }
        Ok(Self { rows })
    }

    /// Appends a row. The caller keeps the number of columns constant.
    pub fn push_row(&mut self, row: Vec<f64>) {
        self.rows.push(row);
    }

    /// Parses a table from text. Blank lines and lines starting with `#` are ignored.
    pub fn parse(text: &str, path: &Path) -> Result<Self, SactraceError> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|s| s.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SactraceError::MalformedLog {
                    path: path.to_path_buf(),
                    line: i + 1,
                    reason: e.to_string(),
                })?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(SactraceError::MalformedLog {
                        path: path.to_path_buf(),
                        line: i + 1,
                        reason: format!("expected {} columns, found {}", first.len(), row.len()),
                    });
                }
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    /// Loads a table from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read log file {:?}", path))?;
        Ok(Self::parse(&text, path)?)
    }

    /// Writes the table, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        for row in self.rows.iter() {
            writeln!(writer, "{}", format_row(row))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, zero for an empty table.
    pub fn n_cols(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    /// Number of logged quantities, i.e. columns besides the step index.
    pub fn n_quantities(&self) -> usize {
        self.n_cols().saturating_sub(1)
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// The `i`-th row.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(|r| r.as_slice())
    }

    /// The `j`-th column.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.get(j).copied()).collect()
    }

    /// Pairs of `(step, value)` for column `j`.
    pub fn series(&self, j: usize) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .filter_map(|r| Some((*r.first()?, *r.get(j)?)))
            .collect()
    }

    /// Range of row indices selected by `spec`.
    pub fn window_range(&self, spec: &WindowSpec) -> std::ops::Range<usize> {
        let n = self.rows.len();
        if n == 0 {
            return 0..0;
        }
        let end = spec.up_to_line.map_or(n - 1, |l| l.min(n - 1)) + 1;
        let count = spec.last.map_or(end, |k| k.min(end));
        (end - count)..end
    }

    /// Selects the rows described by `spec`.
    pub fn window(&self, spec: &WindowSpec) -> LogTable {
        let mut rows = self.rows[self.window_range(spec)].to_vec();
        if let Some(dt) = spec.dt {
            for (i, row) in rows.iter_mut().enumerate() {
                row[0] = i as f64 * dt;
            }
        } else if spec.count_from_zero {
            for (i, row) in rows.iter_mut().enumerate() {
                row[0] = i as f64;
            }
        }
        LogTable { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn steps(n: usize, offset: usize) -> LogTable {
        LogTable::from_rows(
            (0..n)
                .map(|i| vec![(i + offset) as f64, (i * i) as f64])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_format_value_matches_numpy() {
        assert_eq!(format_value(1.0), "1.000000000000000000e+00");
        assert_eq!(format_value(-0.015), "-1.499999999999999944e-02");
        assert_eq!(format_value(12345.0), "1.234500000000000000e+04");
        assert_eq!(format_value(0.0), "0.000000000000000000e+00");
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new("log_table")?;
        let path = dir.path().join("sub").join("running_reward.txt");
        let table = LogTable::from_rows(vec![vec![0.0, 0.1], vec![1.0, -3.25e-7]])?;
        table.save(&path)?;
        assert_eq!(LogTable::load(&path)?, table);
        Ok(())
    }

    #[test]
    fn test_single_row_is_a_row() {
        let table = LogTable::parse("0 1.5 2.5\n", Path::new("x")).unwrap();
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.n_quantities(), 2);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = LogTable::parse("0 1\n1 2 3\n", Path::new("x")).unwrap_err();
        assert!(matches!(err, SactraceError::MalformedLog { line: 2, .. }));
        assert!(LogTable::parse("0 a\n", Path::new("x")).is_err());
        assert!(LogTable::from_rows(vec![vec![0.0], vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_window_is_idempotent() {
        let table = steps(50, 100);
        let spec = WindowSpec::default().last(20);
        let once = table.window(&spec);
        let twice = once.window(&spec);
        assert_eq!(once, twice);
        assert_eq!(once.column(0).first(), Some(&130.0));
        assert_eq!(once.column(0).last(), Some(&149.0));
    }

    #[test]
    fn test_window_clamps_to_available_rows() {
        let table = steps(7, 0);
        let window = table.window(&WindowSpec::default().last(400));
        assert_eq!(window, table);

        let window = table.window(&WindowSpec::default().last(400).up_to_line(1000));
        assert_eq!(window, table);

        let window = table.window(&WindowSpec::default().last(5).up_to_line(2));
        assert_eq!(window.column(0), vec![0.0, 1.0, 2.0]);

        let window = table.window(&WindowSpec::default().last(0));
        assert!(window.is_empty());

        assert!(LogTable::empty().window(&WindowSpec::default().last(3)).is_empty());
    }

    #[test]
    fn test_window_up_to_line() {
        let table = steps(10, 0);
        let window = table.window(&WindowSpec::default().up_to_line(3));
        assert_eq!(window.column(0), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(window.column(1), vec![0.0, 1.0, 4.0, 9.0]);

        let window = table.window(&WindowSpec::default().last(2).up_to_line(3));
        assert_eq!(window.column(0), vec![2.0, 3.0]);
    }

    #[test]
    fn test_count_from_zero() {
        let table = steps(30, 1000);
        let window = table.window(&WindowSpec::default().last(6).count_from_zero(true));
        assert_eq!(window.column(0), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(window.column(1), table.window(&WindowSpec::default().last(6)).column(1));
    }

    #[test]
    fn test_uniform_time_step() {
        let table = steps(4, 17);
        let window = table.window(&WindowSpec::default().dt(0.5));
        assert_eq!(window.column(0), vec![0.0, 0.5, 1.0, 1.5]);
    }
}
