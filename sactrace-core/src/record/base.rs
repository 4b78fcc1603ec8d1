//! Base implementation of records.
use crate::error::SactraceError;
use std::collections::{hash_map::Iter, HashMap};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, like a reward or a running return.
    Scalar(f64),

    /// A 1-dimensional array, like a continuous action.
    Array1(Vec<f64>),

    /// A text value.
    String(String),
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use sactrace_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("running_reward", 0.5);
/// record.insert("env_name", RecordValue::String("qubit".to_string()));
///
/// assert_eq!(record.get_scalar("running_reward").unwrap(), 0.5);
/// assert!(record.get_scalar("env_name").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f64) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// Values of `record` win over values of `self` sharing the same key.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f64, SactraceError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(SactraceError::RecordValueTypeError("Scalar".to_string())),
            None => Err(SactraceError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not a 1-dimensional array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f64>, SactraceError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(SactraceError::RecordValueTypeError("Array1".to_string())),
            None => Err(SactraceError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flattens the values of the given keys into a row of numbers.
    ///
    /// Scalars contribute one column and 1-dimensional arrays one column per element.
    /// Returns `None` if a key is missing or holds a non-numeric value.
    pub fn numeric_row(&self, keys: &[String]) -> Option<Vec<f64>> {
        let mut row = Vec::new();
        for k in keys {
            match self.0.get(k)? {
                RecordValue::Scalar(v) => row.push(*v),
                RecordValue::Array1(vs) => row.extend_from_slice(vs),
                _ => return None,
            }
        }
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_second_record() {
        let a = Record::from_slice(&[
            ("reward", RecordValue::Scalar(1.0)),
            ("step", RecordValue::Scalar(0.0)),
        ]);
        let b = Record::from_scalar("reward", 2.0);
        let merged = a.merge(b);
        assert_eq!(merged.get_scalar("reward").unwrap(), 2.0);
        assert_eq!(merged.get_scalar("step").unwrap(), 0.0);
    }

    #[test]
    fn test_numeric_row() {
        let record = Record::from_slice(&[
            ("step", RecordValue::Scalar(3.0)),
            ("act", RecordValue::Array1(vec![1.0, 0.5])),
            ("name", RecordValue::String("x".to_string())),
        ]);
        let keys = vec!["step".to_string(), "act".to_string()];
        assert_eq!(record.numeric_row(&keys), Some(vec![3.0, 1.0, 0.5]));

        let keys = vec!["step".to_string(), "name".to_string()];
        assert_eq!(record.numeric_row(&keys), None);

        let keys = vec!["missing".to_string()];
        assert_eq!(record.numeric_row(&keys), None);
    }
}
