//! Multi-panel figures of the logs of a run.
use crate::{
    actions::{action_trace, bounds, LineStyle, Shape},
    chart::{self, range_of, Axes},
    config::PlotConfig,
    error::{drawing, RenderError},
    layout::{Panel, PanelKind, PanelLayout},
    palette::Palette,
};
use anyhow::Result;
use log::info;
use plotters::{coord::Shift, prelude::*};
use sactrace_core::logs::{LogFiles, LogSchema, LogTable, WindowSpec};
use std::{
    fs,
    path::{Path, PathBuf},
};

const CURVE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// What a panel shows.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelData {
    /// A curve.
    Series(Vec<(f64, f64)>),

    /// An action trace.
    Actions(Vec<Shape>),
}

fn load_optional(path: Option<&Path>) -> Result<Option<LogTable>> {
    path.map(|p| LogTable::load(p)).transpose()
}

/// The logs of a run, loaded once and drawn for any cutoff line.
#[derive(Clone, Debug)]
pub struct LogFigure {
    layout: PanelLayout,
    running_reward: Option<LogTable>,
    running_loss: Option<LogTable>,
    running_multi_obj: Option<LogTable>,
    actions: Option<LogTable>,
    hybrid: bool,
}

impl LogFigure {
    /// Loads the logs that exist among `files`.
    pub fn load(files: &LogFiles, hybrid: bool) -> Result<Self> {
        Ok(Self {
            layout: PanelLayout::from_files(files, hybrid)?,
            running_reward: load_optional(files.existing_running_reward())?,
            running_loss: load_optional(files.existing_running_loss())?,
            running_multi_obj: load_optional(files.existing_running_multi_obj())?,
            actions: load_optional(files.existing_actions())?,
            hybrid,
        })
    }

    /// The panels of the figure.
    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// Number of rows of the reward log, or of the loss log without it.
    pub fn n_lines(&self) -> usize {
        self.running_reward
            .as_ref()
            .or(self.running_loss.as_ref())
            .map_or(0, |t| t.n_rows())
    }

    /// Window of the action log ending at `up_to_line` of the reward log.
    pub fn actions_window(&self, config: &PlotConfig, up_to_line: Option<usize>) -> LogTable {
        let actions = match &self.actions {
            Some(actions) => actions,
            None => return LogTable::empty(),
        };
        let mut spec = WindowSpec::default()
            .last(config.actions_to_plot)
            .up_to(up_to_line.map(|l| l * config.actions_per_log))
            .count_from_zero(config.actions.count_from_zero);
        spec.dt = config.actions.dt;
        actions.window(&spec)
    }

    /// Data of a panel, up to row `up_to_line` of the reward and loss logs.
    pub fn panel_data(
        &self,
        panel: &Panel,
        config: &PlotConfig,
        up_to_line: Option<usize>,
    ) -> PanelData {
        let spec = WindowSpec::default().up_to(up_to_line);
        let series = |table: &Option<LogTable>| {
            table
                .as_ref()
                .map(|t| t.window(&spec).series(panel.column()))
                .unwrap_or_default()
        };
        let points = match panel.kind {
            PanelKind::RunningReward => series(&self.running_reward),
            PanelKind::MultiObjective(_) => series(&self.running_multi_obj),
            PanelKind::Loss(_) => series(&self.running_loss),
            PanelKind::Actions => {
                let window = self.actions_window(config, up_to_line);
                let style = LineStyle::resolve(
                    config.actions.line_style.as_deref(),
                    config.actions.constant_steps,
                );
                return PanelData::Actions(match style {
                    Some(style) => action_trace(&window, self.hybrid, style, &config.actions),
                    None => vec![],
                });
            }
        };
        if panel.log_scale {
            PanelData::Series(
                points
                    .into_iter()
                    .filter(|(_, v)| *v > 0.0)
                    .map(|(s, v)| (s, v.log10()))
                    .collect(),
            )
        } else {
            PanelData::Series(points)
        }
    }

    /// Draws the panels stacked on `root`.
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &PlotConfig,
        up_to_line: Option<usize>,
    ) -> Result<(), RenderError> {
        let palette = Palette::from_names(config.actions.custom_colors.as_deref())?;
        let areas = root.split_evenly((self.layout.len(), 1));
        for (panel, area) in self.layout.panels().iter().zip(areas.iter()) {
            let ylabel = if panel.log_scale {
                format!("log10 {}", panel.label)
            } else {
                panel.label.clone()
            };
            match self.panel_data(panel, config, up_to_line) {
                PanelData::Series(points) => {
                    let x = range_of(points.iter().map(|p| p.0));
                    let y = match (panel.kind, config.running_reward_ylim) {
                        (PanelKind::RunningReward, Some(ylim)) => ylim,
                        _ => range_of(points.iter().map(|p| p.1)),
                    };
                    let mut chart = Axes::new(ylabel, x, y).build(area)?;
                    chart::draw_line(&mut chart, points, CURVE_COLOR, 1)?;
                }
                PanelData::Actions(shapes) => {
                    let a = &config.actions;
                    let (x, y) = match bounds(&shapes) {
                        Some((x, y)) => (chart::padded(x.0, x.1), chart::padded(y.0, y.1)),
                        None => ((-1.0, 1.0), (-1.0, 1.0)),
                    };
                    let ylabel = a.ylabel.clone().unwrap_or(ylabel);
                    let axes = Axes::new(ylabel, x, a.ylim.unwrap_or(y))
                        .xlabel(a.xlabel.clone().unwrap_or_default())
                        .k_notation(a.k_notation && a.dt.is_none())
                        .two_xticks(a.two_xticks);
                    let mut chart = axes.build(area)?;
                    chart::draw_shapes(
                        &mut chart,
                        &shapes,
                        &palette,
                        a.line_width,
                        a.marker_size,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Size of the figure in pixels.
    pub fn size(&self, config: &PlotConfig) -> (u32, u32) {
        (config.width, config.panel_height * self.layout.len().max(1) as u32)
    }
}

/// Creates `<log_dir>/<sub>` and returns the path of `file_name` inside it.
pub(crate) fn output_path(log_dir: &Path, sub: &str, file_name: &str) -> Result<PathBuf> {
    let dir = log_dir.join(sub);
    fs::create_dir_all(&dir)?;
    Ok(dir.join(file_name))
}

/// Draws the logs in `files` into the PNG file `path`.
pub fn plot_log_files(
    files: &LogFiles,
    hybrid: bool,
    config: &PlotConfig,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let figure = LogFigure::load(files, hybrid)?;
    if figure.layout().is_empty() {
        return Err(RenderError::NothingToDraw(path.to_path_buf()).into());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, figure.size(config)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;
    figure.draw(&root, config, config.plot_to_file_line)?;
    root.present().map_err(drawing)?;
    info!("Saved {:?}", path);
    Ok(())
}

/// Draws the logs of a run into `<log_dir>/plots/plt{extra_str}.png`.
///
/// Log locations default to those of `schema` inside `log_dir`; the ones set in `files`
/// take precedence. Reward and losses are drawn up to `plot_to_file_line`, and the action
/// panel shows the last `actions_to_plot` actions before the matching action row.
pub fn plot_logs(
    log_dir: impl AsRef<Path>,
    schema: &LogSchema,
    files: &LogFiles,
    config: &PlotConfig,
) -> Result<PathBuf> {
    let log_dir = log_dir.as_ref();
    let files = LogFiles::resolve(log_dir, schema).with_overrides(files);
    if PanelLayout::from_files(&files, schema.hybrid)?.is_empty() {
        return Err(RenderError::NothingToDraw(log_dir.to_path_buf()).into());
    }
    let path = output_path(log_dir, "plots", &format!("plt{}.png", config.extra_str))?;
    plot_log_files(&files, schema.hybrid, config, &path)?;
    Ok(path)
}
