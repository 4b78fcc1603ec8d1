#![warn(missing_docs)]
//! Evaluation of policies and handling of the flat text logs of reinforcement learning runs.
//!
//! The crate is the data side of `sactrace`. A [`PolicyEvaluator`] drives an [`Env`] with a
//! fixed [`Policy`], keeps a bias-corrected running return (see [`stats`]) and collects the
//! trajectory of actions and state projections. The traces end up as whitespace-separated
//! tables ([`logs::LogTable`]) that the plotting crate reads back through windows
//! ([`logs::WindowSpec`]).
//!
//! ```no_run
//! use sactrace_core::logs::{LogTable, WindowSpec};
//!
//! # fn main() -> anyhow::Result<()> {
//! let table = LogTable::load("run/actions.txt")?;
//! let last = table.window(&WindowSpec::default().last(400).count_from_zero(true));
//! assert!(last.n_rows() <= 400);
//! # Ok(())
//! # }
//! ```
pub mod error;
pub mod logs;
pub mod params;
pub mod persist;
pub mod record;
pub mod stats;
pub mod util;

mod base;
pub use base::{
    Act, ContinuousAct, Env, HybridAct, Policy, Projection, StateDiagnostics, Step,
};

mod evaluator;
pub use evaluator::{
    Evaluation, Evaluator, EvaluatorConfig, PolicyEvaluator, Trajectory, TrajectoryStep,
};
