//! Summary figure of a training run.
//!
//! The figure has three rows:
//!
//! 1. the running reward, with the lines of the three zoomed steps marked;
//! 2. three constant-style zooms into the actions chosen during training;
//! 3. the last actions of the deterministic policy, counted from zero, optionally over
//!    reference [`OttoCycle`](crate::OttoCycle)s.
use crate::{
    actions::{action_trace, bounds, LineStyle},
    chart::{self, padded, range_of, Axes},
    config::{ActionPlotConfig, PaperPlotConfig},
    error::{drawing, RenderError},
    palette::Palette,
    render::output_path,
};
use anyhow::{Context, Result};
use log::{info, warn};
use plotters::{coord::Shift, prelude::*};
use sactrace_core::{
    logs::{LogSchema, LogTable, WindowSpec},
    util::nearest_int,
};
use std::path::{Path, PathBuf};

const HEIGHT_RATIOS: [f64; 3] = [1.0, 0.7, 1.0];

/// Points of the reward log at the lines of the zoomed steps. Lines past the end of the log
/// are skipped.
pub fn reward_marks(
    reward: &LogTable,
    zoom_steps: &[usize],
    actions_per_log: usize,
) -> Vec<(f64, f64)> {
    zoom_steps
        .iter()
        .filter_map(|step| {
            let line = nearest_int(*step as f64 / actions_per_log.max(1) as f64).max(0) as usize;
            let row = reward.row(line);
            if row.is_none() {
                warn!("Line {} is past the end of the reward log", line);
            }
            row.and_then(|r| Some((*r.first()?, *r.get(1)?)))
        })
        .collect()
}

/// The logs drawn in a summary figure.
#[derive(Clone, Debug)]
pub struct PaperFigure {
    reward: LogTable,
    actions: LogTable,
    det_actions: LogTable,
    hybrid: bool,
}

impl PaperFigure {
    /// Loads the reward and action logs of `log_dir` and the deterministic policy's actions.
    pub fn load(log_dir: &Path, schema: &LogSchema, config: &PaperPlotConfig) -> Result<Self> {
        let det_path = log_dir.join(&config.det_policy_sublocation);
        Ok(Self {
            reward: LogTable::load(log_dir.join(&schema.running_reward_file))?,
            actions: LogTable::load(log_dir.join(&schema.actions_file))?,
            det_actions: LogTable::load(&det_path)
                .with_context(|| format!("No deterministic policy actions at {:?}", det_path))?,
            hybrid: schema.hybrid,
        })
    }

    /// Action windows of the three middle panels.
    pub fn zoom_windows(&self, config: &PaperPlotConfig) -> Vec<LogTable> {
        config
            .zoom_steps
            .iter()
            .map(|step| {
                let spec = WindowSpec::default()
                    .last(config.actions_to_plot_small)
                    .up_to_line(*step);
                self.actions.window(&spec)
            })
            .collect()
    }

    /// Action window of the bottom panel.
    pub fn final_window(&self, config: &PaperPlotConfig) -> LogTable {
        let spec = WindowSpec::default()
            .last(config.actions_to_plot_large)
            .count_from_zero(true);
        self.det_actions.window(&spec)
    }

    fn draw_actions<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        window: &LogTable,
        plot_config: &ActionPlotConfig,
        palette: &Palette,
        cycles: Option<&PaperPlotConfig>,
    ) -> Result<(), RenderError> {
        let shapes = action_trace(window, self.hybrid, LineStyle::Constant, plot_config);
        let (x, y) = match bounds(&shapes) {
            Some((x, y)) => (x, padded(y.0, y.1)),
            None => ((-1.0, 1.0), (-1.0, 1.0)),
        };
        let ylabel = plot_config.ylabel.clone().unwrap_or_default();
        let axes = Axes::new(ylabel, x, plot_config.ylim.unwrap_or(y))
            .xlabel(plot_config.xlabel.clone().unwrap_or_default())
            .k_notation(plot_config.k_notation)
            .two_xticks(plot_config.two_xticks);
        let mut chart = axes.build(area)?;
        chart::draw_shapes(
            &mut chart,
            &shapes,
            palette,
            plot_config.line_width,
            plot_config.marker_size,
        )?;
        if let Some(config) = cycles {
            for cycle in config.extra_cycles.iter() {
                for stroke in cycle.overlay() {
                    chart::draw_line(
                        &mut chart,
                        cycle.sample(&stroke),
                        stroke.color,
                        config.extra_cycles_line_width,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Draws the figure on `root`.
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        config: &PaperPlotConfig,
    ) -> Result<(), RenderError> {
        let palette = Palette::from_names(config.custom_colors.as_deref())?;
        let total: f64 = HEIGHT_RATIOS.iter().sum();
        let (_, height) = root.dim_in_pixel();
        let h0 = (height as f64 * HEIGHT_RATIOS[0] / total) as u32;
        let h1 = (height as f64 * HEIGHT_RATIOS[1] / total) as u32;
        let (top, rest) = root.split_vertically(h0);
        let (middle, bottom) = rest.split_vertically(h1);

        // running reward
        let points = self.reward.series(1);
        let marks = reward_marks(&self.reward, &config.zoom_steps, config.actions_per_log);
        let x = range_of(points.iter().map(|p| p.0));
        let y = config
            .reward_ylim
            .unwrap_or_else(|| range_of(points.iter().map(|p| p.1)));
        let ylabel = config.reward_ylabel.clone().unwrap_or_else(|| "G".to_string());
        let axes = Axes::new(ylabel, x, y)
            .xlabel("step")
            .k_notation(true);
        let mut chart = axes.build(&top)?;
        chart::draw_line(&mut chart, points, BLACK, 1)?;
        chart::draw_markers(&mut chart, &marks, BLACK, 4, 1.0)?;

        // zooms
        let zoom_config = ActionPlotConfig::default()
            .constant_steps(true)
            .line_width(config.prot_line_width)
            .two_xticks(true)
            .ylim(config.small_action_ylim);
        let zoom_areas = middle.split_evenly((1, 3));
        for (i, (window, area)) in self
            .zoom_windows(config)
            .iter()
            .zip(zoom_areas.iter())
            .enumerate()
        {
            let mut plot_config = zoom_config.clone();
            if i == 0 {
                plot_config.ylabel = Some("u".to_string());
            }
            self.draw_actions(area, window, &plot_config, &palette, None)?;
        }

        // deterministic policy
        let final_config = ActionPlotConfig::default()
            .constant_steps(true)
            .line_width(config.prot_line_width)
            .count_from_zero(true)
            .k_notation(false)
            .xlabel("t[dt]")
            .ylim(config.large_action_ylim);
        let final_config = ActionPlotConfig {
            ylabel: Some("u".to_string()),
            ..final_config
        };
        self.draw_actions(
            &bottom,
            &self.final_window(config),
            &final_config,
            &palette,
            Some(config),
        )?;
        Ok(())
    }
}

/// Draws the summary figure of a run into `<log_dir>/plots/<plot_file_name>`.
pub fn paper_plot(
    log_dir: impl AsRef<Path>,
    schema: &LogSchema,
    config: &PaperPlotConfig,
) -> Result<PathBuf> {
    let log_dir = log_dir.as_ref();
    let figure = PaperFigure::load(log_dir, schema, config)?;
    let path = output_path(log_dir, "plots", &config.plot_file_name)?;
    {
        let root = BitMapBackend::new(&path, (config.width, config.height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;
        figure.draw(&root, config)?;
        root.present().map_err(drawing)?;
    }
    info!("Saved {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    fn write_run(dir: &Path) -> Result<()> {
        let reward: String = (0..20)
            .map(|i| format!("{} {}\n", i * 100, i as f64))
            .collect();
        fs::write(dir.join("running_reward.txt"), reward)?;
        let actions: String = (0..2000)
            .map(|i| format!("{} {} {}\n", i, (i / 7) % 3, i as f64 * 1e-3))
            .collect();
        fs::write(dir.join("actions.txt"), actions)?;
        fs::create_dir_all(dir.join("det_policy"))?;
        let det: String = (0..30)
            .map(|i| format!("{} {} {}\n", 5000 + i, i % 2, 0.5))
            .collect();
        fs::write(dir.join("det_policy").join("actions.txt"), det)?;
        Ok(())
    }

    #[test]
    fn test_reward_marks() {
        let reward =
            LogTable::from_rows((0..5).map(|i| vec![i as f64 * 10.0, -(i as f64)]).collect())
                .unwrap();
        let marks = reward_marks(&reward, &[0, 250, 1000], 100);
        // 250 / 100 rounds to the even line 2, line 10 does not exist
        assert_eq!(marks, vec![(0.0, 0.0), (20.0, -2.0)]);
    }

    #[test]
    fn test_windows() -> Result<()> {
        let dir = TempDir::new("paper")?;
        write_run(dir.path())?;
        let config = PaperPlotConfig::default().zoom_steps([50, 1000, 5000]);
        let figure = PaperFigure::load(dir.path(), &LogSchema::hybrid(), &config)?;

        let zooms = figure.zoom_windows(&config);
        assert_eq!(zooms[0].n_rows(), 51);
        assert_eq!(zooms[1].row(99).unwrap()[0], 1000.0);
        assert_eq!(zooms[2].row(99).unwrap()[0], 1999.0);

        let last = figure.final_window(&config);
        assert_eq!(last.n_rows(), 10);
        assert_eq!(last.column(0), (0..10).map(|i| i as f64).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_missing_det_policy() -> Result<()> {
        let dir = TempDir::new("paper")?;
        write_run(dir.path())?;
        let config = PaperPlotConfig::default().det_policy_sublocation("nowhere/actions.txt");
        assert!(paper_plot(dir.path(), &LogSchema::hybrid(), &config).is_err());
        Ok(())
    }
}
