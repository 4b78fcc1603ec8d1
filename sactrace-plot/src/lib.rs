#![warn(missing_docs)]
//! Figures of the logs written by reinforcement learning runs.
//!
//! The panel figure stacks one panel per logged quantity:
//!
//! ```text
//! +--------------------------------+
//! | running reward                 |
//! | multi-objective, one per obj   |
//! | running loss, one per column   |
//! | last actions                   |
//! +--------------------------------+
//! ```
//!
//! Panels of logs that do not exist are left out ([`PanelLayout`]). Actions are drawn in one
//! of four styles ([`LineStyle`]). Figures are written as PNG files with [`plot_logs`],
//! [`paper_plot`] and [`plot_state_diagnostics`], and as GIF animations with
//! [`animate_logs`].
//!
//! ```no_run
//! use sactrace_core::logs::{LogFiles, LogSchema};
//! use sactrace_plot::{plot_logs, PlotConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = PlotConfig::default().actions_to_plot(1200);
//! let path = plot_logs("logs/run_0", &LogSchema::hybrid(), &LogFiles::default(), &config)?;
//! println!("{:?}", path);
//! # Ok(())
//! # }
//! ```
pub mod actions;
mod animation;
mod chart;
mod config;
mod cycles;
mod diagnostics;
pub mod error;
mod layout;
mod paper;
mod palette;
mod render;
mod ticks;

pub use actions::{action_trace, segments, LineStyle, Segment, Shape};
pub use animation::{animate_logs, frame_lines};
pub use config::{
    ActionPlotConfig, AnimationConfig, DiagnosticsConfig, PaperPlotConfig, PlotConfig,
};
pub use cycles::{CycleStroke, OttoCycle};
pub use diagnostics::{plot_state_diagnostics, StateWindow, TaggedPoint};
pub use error::RenderError;
pub use layout::{loss_panel, Panel, PanelKind, PanelLayout};
pub use paper::{paper_plot, reward_marks, PaperFigure};
pub use palette::{parse_color, Palette};
pub use render::{plot_log_files, plot_logs, LogFigure, PanelData};
pub use ticks::k_notation;
