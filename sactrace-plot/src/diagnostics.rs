//! Panels of quantities derived from logged states.
//!
//! A state log has the step in its first column and the state vector in the others, one
//! row per action of the matching action log. States are converted by a
//! [`StateDiagnostics`] of the environment the run was trained on, and points are colored
//! by the discrete action chosen at the same row.
use crate::{
    chart::{self, range_of, Axes},
    config::DiagnosticsConfig,
    error::{drawing, RenderError},
    palette::{Palette, LIGHT_GRAY},
    render::output_path,
};
use anyhow::Result;
use log::info;
use plotters::{coord::Shift, prelude::*};
use sactrace_core::{
    logs::{LogTable, WindowSpec},
    util::nearest_int,
    StateDiagnostics,
};
use std::{
    f64::consts::PI,
    path::{Path, PathBuf},
};

const CIRCLE_POINTS: usize = 200;

/// A point tagged with the discrete action chosen at its row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaggedPoint {
    /// Discrete action, `0` without discrete actions.
    pub category: usize,

    /// Location.
    pub at: (f64, f64),
}

/// Windows of a state log and of the matching action log.
#[derive(Clone, Debug)]
pub struct StateWindow {
    times: Vec<f64>,
    states: Vec<Vec<f64>>,
    categories: Vec<usize>,
}

impl StateWindow {
    /// Cuts the logs at `plot_to_file_line` and keeps the last `states_to_plot` rows.
    pub fn new(
        states: &LogTable,
        actions: &LogTable,
        hybrid: bool,
        config: &DiagnosticsConfig,
    ) -> Self {
        let mut spec = WindowSpec::default()
            .last(config.states_to_plot)
            .up_to(config.plot_to_file_line)
            .count_from_zero(config.count_from_zero);
        spec.dt = config.dt;
        let range = states.window_range(&spec);
        let window = states.window(&spec);

        let categories = if hybrid {
            range
                .map(|i| {
                    actions
                        .row(i)
                        .and_then(|r| r.get(1))
                        .map_or(0, |d| nearest_int(*d).max(0) as usize)
                })
                .collect()
        } else {
            vec![0; window.n_rows()]
        };
        Self {
            times: window.column(0),
            states: window.rows().iter().map(|r| r[1..].to_vec()).collect(),
            categories,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn tagged<F>(&self, f: F) -> Vec<TaggedPoint>
    where
        F: Fn(f64, &[f64]) -> Option<(f64, f64)>,
    {
        self.times
            .iter()
            .zip(self.states.iter())
            .zip(self.categories.iter())
            .filter_map(|((t, s), c)| {
                f(*t, s).map(|at| TaggedPoint {
                    category: *c,
                    at,
                })
            })
            .collect()
    }

    /// Concurrence against time. States without a concurrence are skipped.
    pub fn concurrence(&self, diagnostics: &dyn StateDiagnostics) -> Vec<TaggedPoint> {
        self.tagged(|t, s| diagnostics.concurrence(s).map(|c| (t, c)))
    }

    /// A component of the Bloch vector against time.
    pub fn bloch_component(
        &self,
        diagnostics: &dyn StateDiagnostics,
        component: usize,
    ) -> Vec<TaggedPoint> {
        self.tagged(|t, s| {
            diagnostics
                .bloch_vector(s)
                .and_then(|v| v.get(component).map(|b| (t, *b)))
        })
    }

    /// The `(x, z)` projection of the Bloch vector.
    pub fn bloch_xz(&self, diagnostics: &dyn StateDiagnostics) -> Vec<TaggedPoint> {
        self.tagged(|_, s| diagnostics.bloch_vector(s).map(|v| (v[0], v[2])))
    }
}

fn circle(radius: f64) -> Vec<(f64, f64)> {
    (0..=CIRCLE_POINTS)
        .map(|i| {
            let a = 2.0 * PI * i as f64 / CIRCLE_POINTS as f64;
            (radius * a.cos(), radius * a.sin())
        })
        .collect()
}

fn draw_tagged<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    axes: Axes,
    points: &[TaggedPoint],
    palette: &Palette,
    config: &DiagnosticsConfig,
    alpha: f64,
    circles: bool,
) -> Result<(), RenderError> {
    let mut chart = axes.build(area)?;
    if circles {
        chart::draw_line(&mut chart, circle(1.0), BLACK, 1)?;
        for r in [0.2, 0.4, 0.6, 0.8].iter() {
            chart::draw_line(&mut chart, circle(*r), LIGHT_GRAY, 1)?;
        }
    }
    // higher actions below lower ones
    let mut points = points.to_vec();
    points.sort_by(|a, b| b.category.cmp(&a.category));
    for p in points.iter() {
        chart::draw_markers(
            &mut chart,
            &[p.at],
            palette.color(p.category),
            config.marker_size,
            alpha,
        )?;
    }
    Ok(())
}

/// Draws concurrence, a Bloch component and the Bloch `x`-`z` scatter of a state log into
/// `<log_dir>/plots/<plot_file_name>`.
pub fn plot_state_diagnostics(
    log_dir: impl AsRef<Path>,
    states_file: impl AsRef<Path>,
    actions_file: impl AsRef<Path>,
    hybrid: bool,
    diagnostics: &dyn StateDiagnostics,
    config: &DiagnosticsConfig,
) -> Result<PathBuf> {
    let states = LogTable::load(states_file)?;
    let actions = LogTable::load(actions_file)?;
    let window = StateWindow::new(&states, &actions, hybrid, config);
    let palette = Palette::from_names(config.custom_colors.as_deref())?;

    let concurrence = window.concurrence(diagnostics);
    let component = window.bloch_component(diagnostics, config.bloch_component);
    let xz = window.bloch_xz(diagnostics);
    let time_axes = |ylabel: &str, points: &[TaggedPoint]| {
        Axes::new(
            ylabel,
            range_of(points.iter().map(|p| p.at.0)),
            range_of(points.iter().map(|p| p.at.1)),
        )
        .xlabel(if config.dt.is_some() { "t" } else { "step" })
        .k_notation(config.dt.is_none() && !config.count_from_zero)
    };
    let bloch_label = ["rho_x", "rho_y", "rho_z"]
        .get(config.bloch_component)
        .copied()
        .unwrap_or("rho");

    let path = output_path(log_dir.as_ref(), "plots", &config.plot_file_name)?;
    {
        let root = BitMapBackend::new(&path, (1200, 400)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;
        let areas = root.split_evenly((1, 3));
        draw_tagged(
            &areas[0],
            time_axes("C", &concurrence),
            &concurrence,
            &palette,
            config,
            1.0,
            false,
        )?;
        draw_tagged(
            &areas[1],
            time_axes(bloch_label, &component),
            &component,
            &palette,
            config,
            1.0,
            false,
        )?;
        draw_tagged(
            &areas[2],
            Axes::new("rho_z", (-1.0, 1.0), (-1.0, 1.0)).xlabel("rho_x"),
            &xz,
            &palette,
            config,
            config.alpha,
            true,
        )?;
        root.present().map_err(drawing)?;
    }
    info!("Saved {:?}", path);
    Ok(path)
}
