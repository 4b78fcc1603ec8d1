//! Records of values observed during evaluation, and recorders consuming them.
//!
//! [`Record`] is a string-keyed map of [`RecordValue`]s. The evaluator writes one record per
//! environment step into a [`Recorder`]; a [`TableRecorder`] turns selected keys into rows of
//! a whitespace-separated log file, the format read back by [`crate::logs::LogTable`].
//!
//! ```rust
//! use sactrace_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("step", RecordValue::Scalar(1.0));
//! record.insert("reward", RecordValue::Scalar(-1.0));
//! record.insert("act", RecordValue::Array1(vec![0.0, 0.3]));
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod table_recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use table_recorder::TableRecorder;
