//! Policy evaluation and log figures for reinforcement learning experiments.
//!
//! Sactrace consists of the following crates:
//!
//! * [sactrace-core](sactrace_core) evaluates a fixed policy on an environment, keeps a
//!   bias-corrected running return, and reads and writes the flat text logs, parameter
//!   files and saved training states of a run.
//! * [sactrace-plot](sactrace_plot) draws the logs of a run as panel figures, animations,
//!   a summary figure and state diagnostics.
//! * `sactrace` ties both together with [`test_policy`] and the `sactrace` command line
//!   tool.
pub use sactrace_core;
pub use sactrace_plot;

mod test_policy;
pub use test_policy::{test_policy, PolicyTest, TestPolicyConfig};
