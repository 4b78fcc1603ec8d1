//! Flat numeric log files and windows over them.
//!
//! Every log is a whitespace-separated table with one row per logged step. The first column
//! is the step index, the remaining columns are quantities:
//!
//! | Log               | Columns                                                           |
//! |-------------------|-------------------------------------------------------------------|
//! | running reward    | `step, running_reward`                                            |
//! | multi-objective   | `step, obj_0, ..., obj_{K-1}`                                     |
//! | running loss      | `step, Q, Pi, alpha(_d), alpha_c/entropy, entropy_d, entropy_c, ...` |
//! | actions (hybrid)  | `step, discrete, u_0, ...`                                        |
//! | actions           | `step, u_0, ...`                                                  |
mod files;
mod schema;
mod session;
mod table;
pub use files::{count_quantities, LogFiles};
pub use schema::LogSchema;
pub use session::LogSession;
pub use table::{format_row, format_value, LogTable, WindowSpec};
