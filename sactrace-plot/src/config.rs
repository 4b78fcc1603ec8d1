//! Configurations of the figures.
use crate::cycles::OttoCycle;
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let file = File::open(path)?;
    let rdr = BufReader::new(file);
    let b = serde_yaml::from_reader(rdr)?;
    Ok(b)
}

fn save_yaml<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(serde_yaml::to_string(value)?.as_bytes())?;
    Ok(())
}

/// How an action trace is drawn.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct ActionPlotConfig {
    /// One of `constant`, `scatter`, `plot` or `scatter_plot`. If `None`, `constant_steps`
    /// picks between `constant` and `scatter`.
    pub line_style: Option<String>,

    /// Draws piecewise-constant actions when no line style is given.
    pub constant_steps: bool,

    /// Reindexes the x axis from zero.
    pub count_from_zero: bool,

    /// Rescales the x axis to a uniform time step.
    pub dt: Option<f64>,

    /// Colors indexed by discrete action, or by component without discrete actions.
    pub custom_colors: Option<Vec<String>>,

    /// Omits the gray lines joining consecutive actions in `constant` style.
    pub hide_gray_vertical_line: bool,

    /// In `scatter` style, discrete actions drawn as full-height vertical markers.
    pub vertical_line_indices: Vec<usize>,

    /// Range of the y axis.
    pub ylim: Option<(f64, f64)>,

    /// Label of the y axis.
    pub ylabel: Option<String>,

    /// Label of the x axis.
    pub xlabel: Option<String>,

    /// Writes x ticks as multiples of 1000, e.g. `1.5k`.
    pub k_notation: bool,

    /// Shows two x ticks only.
    pub two_xticks: bool,

    /// Width of lines in pixels.
    pub line_width: u32,

    /// Radius of points in pixels.
    pub marker_size: u32,
}

impl Default for ActionPlotConfig {
    fn default() -> Self {
        Self {
            line_style: None,
            constant_steps: false,
            count_from_zero: false,
            dt: None,
            custom_colors: None,
            hide_gray_vertical_line: false,
            vertical_line_indices: vec![],
            ylim: None,
            ylabel: None,
            xlabel: None,
            k_notation: true,
            two_xticks: false,
            line_width: 2,
            marker_size: 2,
        }
    }
}

impl ActionPlotConfig {
    /// Sets the line style.
    pub fn line_style(mut self, v: impl Into<String>) -> Self {
        self.line_style = Some(v.into());
        self
    }

    /// Draws piecewise-constant actions when no line style is given.
    pub fn constant_steps(mut self, v: bool) -> Self {
        self.constant_steps = v;
        self
    }

    /// Reindexes the x axis from zero.
    pub fn count_from_zero(mut self, v: bool) -> Self {
        self.count_from_zero = v;
        self
    }

    /// Rescales the x axis to a uniform time step.
    pub fn dt(mut self, v: f64) -> Self {
        self.dt = Some(v);
        self
    }

    /// Sets the colors.
    pub fn custom_colors(mut self, v: Vec<String>) -> Self {
        self.custom_colors = Some(v);
        self
    }

    /// Omits the gray guide lines.
    pub fn hide_gray_vertical_line(mut self, v: bool) -> Self {
        self.hide_gray_vertical_line = v;
        self
    }

    /// Sets the discrete actions drawn as vertical markers in `scatter` style.
    pub fn vertical_line_indices(mut self, v: Vec<usize>) -> Self {
        self.vertical_line_indices = v;
        self
    }

    /// Sets the range of the y axis.
    pub fn ylim(mut self, v: Option<(f64, f64)>) -> Self {
        self.ylim = v;
        self
    }

    /// Enables or disables `k` notation of x ticks.
    pub fn k_notation(mut self, v: bool) -> Self {
        self.k_notation = v;
        self
    }

    /// Shows two x ticks only.
    pub fn two_xticks(mut self, v: bool) -> Self {
        self.two_xticks = v;
        self
    }

    /// Sets the label of the x axis.
    pub fn xlabel(mut self, v: impl Into<String>) -> Self {
        self.xlabel = Some(v.into());
        self
    }

    /// Sets the width of lines.
    pub fn line_width(mut self, v: u32) -> Self {
        self.line_width = v;
        self
    }
}

/// Configuration of [`plot_logs`](crate::plot_logs).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct PlotConfig {
    /// Number of actions taken between two rows of the reward and loss logs.
    pub actions_per_log: usize,

    /// Number of last actions shown.
    pub actions_to_plot: usize,

    /// Draws logs up to this row of the reward and loss logs. All rows if `None`.
    pub plot_to_file_line: Option<usize>,

    /// Range of the y axis of the running reward.
    pub running_reward_ylim: Option<(f64, f64)>,

    /// Appended to the file name of the figure.
    pub extra_str: String,

    /// Width of the figure in pixels.
    pub width: u32,

    /// Height of one panel in pixels.
    pub panel_height: u32,

    /// Drawing of the action panel.
    pub actions: ActionPlotConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            actions_per_log: 1000,
            actions_to_plot: 400,
            plot_to_file_line: None,
            running_reward_ylim: None,
            extra_str: String::new(),
            width: 700,
            panel_height: 220,
            actions: ActionPlotConfig::default(),
        }
    }
}

impl PlotConfig {
    /// Sets the number of actions between two log rows.
    pub fn actions_per_log(mut self, v: usize) -> Self {
        self.actions_per_log = v;
        self
    }

    /// Sets the number of last actions shown.
    pub fn actions_to_plot(mut self, v: usize) -> Self {
        self.actions_to_plot = v;
        self
    }

    /// Draws logs up to a given row.
    pub fn plot_to_file_line(mut self, v: Option<usize>) -> Self {
        self.plot_to_file_line = v;
        self
    }

    /// Sets the range of the running reward axis.
    pub fn running_reward_ylim(mut self, v: Option<(f64, f64)>) -> Self {
        self.running_reward_ylim = v;
        self
    }

    /// Sets the suffix of the file name.
    pub fn extra_str(mut self, v: impl Into<String>) -> Self {
        self.extra_str = v.into();
        self
    }

    /// Sets the drawing of the action panel.
    pub fn actions(mut self, v: ActionPlotConfig) -> Self {
        self.actions = v;
        self
    }

    /// Constructs [`PlotConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`PlotConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

/// Configuration of [`animate_logs`](crate::animate_logs).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct AnimationConfig {
    /// Drawing of every frame. `plot_to_file_line` is ignored.
    pub plot: PlotConfig,

    /// Delay between frames in milliseconds.
    pub ms_delay: u32,

    /// Fraction of the run where the animation starts.
    pub start_percentage: f64,

    /// Fraction of the run where the animation ends.
    pub end_percentage: f64,

    /// Log rows between two frames.
    pub skip_lines: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            plot: PlotConfig::default()
                .actions_per_log(6000)
                .actions_to_plot(800),
            ms_delay: 200,
            start_percentage: 0.0,
            end_percentage: 1.0,
            skip_lines: 5,
        }
    }
}

impl AnimationConfig {
    /// Sets the drawing of every frame.
    pub fn plot(mut self, v: PlotConfig) -> Self {
        self.plot = v;
        self
    }

    /// Sets the delay between frames.
    pub fn ms_delay(mut self, v: u32) -> Self {
        self.ms_delay = v;
        self
    }

    /// Sets the part of the run to animate.
    pub fn range(mut self, start_percentage: f64, end_percentage: f64) -> Self {
        self.start_percentage = start_percentage;
        self.end_percentage = end_percentage;
        self
    }

    /// Sets the number of rows between frames.
    pub fn skip_lines(mut self, v: usize) -> Self {
        self.skip_lines = v;
        self
    }

    /// Constructs [`AnimationConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`AnimationConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

/// Configuration of [`paper_plot`](crate::paper_plot).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct PaperPlotConfig {
    /// Action log of the deterministic policy, relative to the log directory.
    pub det_policy_sublocation: String,

    /// Steps around which the three middle panels zoom into the actions.
    pub zoom_steps: [usize; 3],

    /// Number of actions in the bottom panel.
    pub actions_to_plot_large: usize,

    /// Number of actions in each middle panel.
    pub actions_to_plot_small: usize,

    /// Number of actions taken between two rows of the reward log.
    pub actions_per_log: usize,

    /// Colors of the discrete actions.
    pub custom_colors: Option<Vec<String>>,

    /// Width of the action lines.
    pub prot_line_width: u32,

    /// Range of the y axis of the middle panels.
    pub small_action_ylim: Option<(f64, f64)>,

    /// Range of the y axis of the bottom panel.
    pub large_action_ylim: Option<(f64, f64)>,

    /// Range of the y axis of the reward panel.
    pub reward_ylim: Option<(f64, f64)>,

    /// Label of the y axis of the reward panel.
    pub reward_ylabel: Option<String>,

    /// Cycles drawn over the bottom panel.
    pub extra_cycles: Vec<OttoCycle>,

    /// Width of the cycle lines.
    pub extra_cycles_line_width: u32,

    /// File name of the figure inside the plot directory.
    pub plot_file_name: String,

    /// Width of the figure in pixels.
    pub width: u32,

    /// Height of the figure in pixels.
    pub height: u32,
}

impl Default for PaperPlotConfig {
    fn default() -> Self {
        Self {
            det_policy_sublocation: "det_policy/actions.txt".to_string(),
            zoom_steps: [0, 0, 0],
            actions_to_plot_large: 10,
            actions_to_plot_small: 100,
            actions_per_log: 6000,
            custom_colors: None,
            prot_line_width: 3,
            small_action_ylim: None,
            large_action_ylim: None,
            reward_ylim: None,
            reward_ylabel: None,
            extra_cycles: vec![],
            extra_cycles_line_width: 2,
            plot_file_name: "paper.png".to_string(),
            width: 600,
            height: 500,
        }
    }
}

impl PaperPlotConfig {
    /// Sets the location of the deterministic policy's action log.
    pub fn det_policy_sublocation(mut self, v: impl Into<String>) -> Self {
        self.det_policy_sublocation = v.into();
        self
    }

    /// Sets the steps of the three zoomed panels.
    pub fn zoom_steps(mut self, v: [usize; 3]) -> Self {
        self.zoom_steps = v;
        self
    }

    /// Sets the number of actions between two reward rows.
    pub fn actions_per_log(mut self, v: usize) -> Self {
        self.actions_per_log = v;
        self
    }

    /// Sets the colors of the discrete actions.
    pub fn custom_colors(mut self, v: Vec<String>) -> Self {
        self.custom_colors = Some(v);
        self
    }

    /// Adds a cycle over the bottom panel.
    pub fn extra_cycle(mut self, v: OttoCycle) -> Self {
        self.extra_cycles.push(v);
        self
    }

    /// Sets the file name of the figure.
    pub fn plot_file_name(mut self, v: impl Into<String>) -> Self {
        self.plot_file_name = v.into();
        self
    }

    /// Constructs [`PaperPlotConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`PaperPlotConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

/// Configuration of [`plot_state_diagnostics`](crate::plot_state_diagnostics).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Number of last states shown.
    pub states_to_plot: usize,

    /// Draws states up to this row. All rows if `None`.
    pub plot_to_file_line: Option<usize>,

    /// Component of the Bloch vector shown against time, `0` to `2`.
    pub bloch_component: usize,

    /// Reindexes the time axis from zero.
    pub count_from_zero: bool,

    /// Rescales the time axis to a uniform time step.
    pub dt: Option<f64>,

    /// Colors of the discrete actions.
    pub custom_colors: Option<Vec<String>>,

    /// Radius of points in pixels.
    pub marker_size: u32,

    /// Opacity of the points of the Bloch scatter.
    pub alpha: f64,

    /// File name of the figure inside the plot directory.
    pub plot_file_name: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            states_to_plot: 1200,
            plot_to_file_line: None,
            bloch_component: 2,
            count_from_zero: false,
            dt: None,
            custom_colors: None,
            marker_size: 3,
            alpha: 0.1,
            plot_file_name: "state_diagnostics.png".to_string(),
        }
    }
}

impl DiagnosticsConfig {
    /// Sets the number of last states shown.
    pub fn states_to_plot(mut self, v: usize) -> Self {
        self.states_to_plot = v;
        self
    }

    /// Sets the Bloch component shown against time.
    pub fn bloch_component(mut self, v: usize) -> Self {
        self.bloch_component = v;
        self
    }

    /// Reindexes the time axis from zero.
    pub fn count_from_zero(mut self, v: bool) -> Self {
        self.count_from_zero = v;
        self
    }

    /// Constructs [`DiagnosticsConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`DiagnosticsConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_plot_config() -> Result<()> {
        let config = PlotConfig::default()
            .actions_to_plot(1200)
            .plot_to_file_line(Some(30))
            .actions(
                ActionPlotConfig::default()
                    .line_style("scatter_plot")
                    .custom_colors(vec!["#1f77b4".to_string(), "orange".to_string()]),
            );

        let dir = TempDir::new("plot_config")?;
        let path = dir.path().join("plot_config.yaml");
        config.save(&path)?;
        let config_ = PlotConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_serde_animation_config() -> Result<()> {
        let config = AnimationConfig::default().range(0.2, 0.8).skip_lines(1);
        let dir = TempDir::new("animation_config")?;
        let path = dir.path().join("animation_config.yaml");
        config.save(&path)?;
        assert_eq!(config, AnimationConfig::load(&path)?);
        assert_eq!(config.plot.actions_per_log, 6000);
        Ok(())
    }

    #[test]
    fn test_missing_fields_take_defaults() -> Result<()> {
        let config: PaperPlotConfig =
            serde_yaml::from_str("zoom_steps: [6000, 120000, 480000]\n")?;
        assert_eq!(config.zoom_steps, [6000, 120000, 480000]);
        assert_eq!(config.actions_to_plot_small, 100);
        Ok(())
    }
}
