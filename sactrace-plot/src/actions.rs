//! Geometry of action traces.
//!
//! An action window is turned into a list of [`Shape`]s, independent of the drawing backend.
//! Four styles are available:
//!
//! * `constant`: piecewise-constant steps, joined by gray guide lines.
//! * `scatter`: one point per action and component. Discrete actions listed in
//!   [`ActionPlotConfig::vertical_line_indices`] become full-height vertical markers.
//! * `plot`: lines, broken wherever the discrete action changes.
//! * `scatter_plot`: points joined by gray guide lines.
//!
//! With discrete actions, shapes are colored by discrete action. Without, by component.
use crate::{config::ActionPlotConfig, error::RenderError};
use itertools::Itertools;
use log::warn;
use sactrace_core::{logs::LogTable, util::nearest_int};
use std::str::FromStr;

/// Style of an action trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// Piecewise-constant steps.
    Constant,

    /// Points.
    Scatter,

    /// Lines split by discrete action.
    Plot,

    /// Points with guide lines.
    ScatterPlot,
}

impl FromStr for LineStyle {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(Self::Constant),
            "scatter" => Ok(Self::Scatter),
            "plot" => Ok(Self::Plot),
            "scatter_plot" => Ok(Self::ScatterPlot),
            _ => Err(RenderError::InvalidLineStyle(s.to_string())),
        }
    }
}

impl LineStyle {
    /// Picks the style of a trace. Without an explicit style, `constant_steps` chooses
    /// between `constant` and `scatter`. An invalid style is reported and gives `None`.
    pub fn resolve(line_style: Option<&str>, constant_steps: bool) -> Option<Self> {
        match line_style {
            None if constant_steps => Some(Self::Constant),
            None => Some(Self::Scatter),
            Some(s) => match s.parse() {
                Ok(style) => Some(style),
                Err(e) => {
                    warn!("{}, no action is drawn", e);
                    None
                }
            },
        }
    }
}

/// A maximal run of rows with the same discrete action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Discrete action of the run.
    pub category: usize,

    /// First row.
    pub start: usize,

    /// Number of rows.
    pub len: usize,
}

impl Segment {
    /// Row after the last one.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Splits a sequence of discrete actions into maximal runs of equal values.
pub fn segments(discrete: &[usize]) -> Vec<Segment> {
    let mut segs: Vec<Segment> = vec![];
    for (i, &d) in discrete.iter().enumerate() {
        match segs.last_mut() {
            Some(seg) if seg.category == d => seg.len += 1,
            _ => segs.push(Segment {
                category: d,
                start: i,
                len: 1,
            }),
        }
    }
    segs
}

/// A primitive of an action trace. `color` indexes the palette.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Straight line between two points.
    Segment {
        /// Start point.
        from: (f64, f64),
        /// End point.
        to: (f64, f64),
        /// Palette index.
        color: usize,
    },

    /// Line through points.
    Polyline {
        /// Points.
        points: Vec<(f64, f64)>,
        /// Palette index.
        color: usize,
    },

    /// A marker.
    Point {
        /// Location.
        at: (f64, f64),
        /// Palette index.
        color: usize,
    },

    /// Light gray line through points, drawn below the colored shapes.
    Guide {
        /// Points.
        points: Vec<(f64, f64)>,
    },

    /// Vertical marker.
    VLine {
        /// Location on the x axis.
        x: f64,
        /// Span on the y axis.
        y: (f64, f64),
        /// Palette index.
        color: usize,
    },
}

impl Shape {
    fn points(&self) -> Vec<(f64, f64)> {
        match self {
            Shape::Segment { from, to, .. } => vec![*from, *to],
            Shape::Polyline { points, .. } | Shape::Guide { points } => points.clone(),
            Shape::Point { at, .. } => vec![*at],
            Shape::VLine { x, y, .. } => vec![(*x, y.0), (*x, y.1)],
        }
    }
}

/// Ranges of the x and y axes covering the shapes, `None` if there are no shapes.
pub fn bounds(shapes: &[Shape]) -> Option<((f64, f64), (f64, f64))> {
    let points: Vec<(f64, f64)> = shapes.iter().flat_map(|s| s.points()).collect();
    let x = points.iter().map(|p| p.0).minmax().into_option()?;
    let y = points.iter().map(|p| p.1).minmax().into_option()?;
    Some((x, y))
}

struct Trace {
    x: Vec<f64>,
    discrete: Option<Vec<usize>>,
    components: Vec<Vec<f64>>,
}

impl Trace {
    fn new(window: &LogTable, hybrid: bool) -> Self {
        let first = if hybrid { 2 } else { 1 };
        let discrete = if hybrid {
            Some(
                window
                    .column(1)
                    .into_iter()
                    .map(|d| nearest_int(d).max(0) as usize)
                    .collect(),
            )
        } else {
            None
        };
        Self {
            x: window.column(0),
            discrete,
            components: (first..window.n_cols()).map(|j| window.column(j)).collect(),
        }
    }

    /// Palette index of row `i` of component `j`.
    fn color(&self, i: usize, j: usize) -> usize {
        self.discrete.as_ref().map_or(j, |d| d[i])
    }

    fn points(&self, j: usize) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .copied()
            .zip(self.components[j].iter().copied())
            .collect()
    }

    /// End of the step of the last row, one previous spacing after it.
    fn last_step_end(&self) -> f64 {
        let n = self.x.len();
        match n {
            0 => 0.0,
            1 => self.x[0] + 1.0,
            _ => self.x[n - 1] + (self.x[n - 1] - self.x[n - 2]),
        }
    }

    fn step_end(&self, i: usize) -> f64 {
        self.x.get(i + 1).copied().unwrap_or_else(|| self.last_step_end())
    }

    fn y_span(&self, ylim: Option<(f64, f64)>) -> (f64, f64) {
        if let Some(ylim) = ylim {
            return ylim;
        }
        self.components
            .iter()
            .flatten()
            .copied()
            .minmax()
            .into_option()
            .unwrap_or((0.0, 1.0))
    }

    fn constant(&self, config: &ActionPlotConfig) -> Vec<Shape> {
        let mut shapes = vec![];
        if !config.hide_gray_vertical_line {
            for j in 0..self.components.len() {
                let mut points = vec![];
                for (i, &u) in self.components[j].iter().enumerate() {
                    points.push((self.x[i], u));
                    points.push((self.step_end(i), u));
                }
                shapes.push(Shape::Guide { points });
            }
        }
        for (j, component) in self.components.iter().enumerate() {
            for (i, &u) in component.iter().enumerate() {
                shapes.push(Shape::Segment {
                    from: (self.x[i], u),
                    to: (self.step_end(i), u),
                    color: self.color(i, j),
                });
            }
        }
        shapes
    }

    fn scatter(&self, config: &ActionPlotConfig) -> Vec<Shape> {
        let mut shapes = vec![];
        let y = self.y_span(config.ylim);
        for (j, component) in self.components.iter().enumerate() {
            for (i, &u) in component.iter().enumerate() {
                let color = self.color(i, j);
                let vertical = self.discrete.is_some()
                    && config.vertical_line_indices.contains(&color);
                if !vertical {
                    shapes.push(Shape::Point {
                        at: (self.x[i], u),
                        color,
                    });
                } else if j == 0 {
                    shapes.push(Shape::VLine {
                        x: self.x[i],
                        y,
                        color,
                    });
                }
            }
        }
        shapes
    }

    fn plot(&self) -> Vec<Shape> {
        let mut shapes = vec![];
        for j in 0..self.components.len() {
            let points = self.points(j);
            match &self.discrete {
                Some(discrete) => {
                    for seg in segments(discrete) {
                        if seg.len == 1 {
                            shapes.push(Shape::Point {
                                at: points[seg.start],
                                color: seg.category,
                            });
                        } else {
                            shapes.push(Shape::Polyline {
                                points: points[seg.start..seg.end()].to_vec(),
                                color: seg.category,
                            });
                        }
                    }
                }
                None => shapes.push(Shape::Polyline { points, color: j }),
            }
        }
        shapes
    }

    fn scatter_plot(&self) -> Vec<Shape> {
        let guides = (0..self.components.len()).map(|j| Shape::Guide {
            points: self.points(j),
        });
        let points = self.components.iter().enumerate().flat_map(|(j, c)| {
            c.iter().enumerate().map(move |(i, &u)| Shape::Point {
                at: (self.x[i], u),
                color: self.color(i, j),
            })
        });
        guides.chain(points).collect()
    }
}

/// Shapes of an action window in the given style.
///
/// `window` is an action log slice: step, then the discrete action if `hybrid`, then the
/// continuous components.
pub fn action_trace(
    window: &LogTable,
    hybrid: bool,
    style: LineStyle,
    config: &ActionPlotConfig,
) -> Vec<Shape> {
    if window.is_empty() {
        return vec![];
    }
    let trace = Trace::new(window, hybrid);
    match style {
        LineStyle::Constant => trace.constant(config),
        LineStyle::Scatter => trace.scatter(config),
        LineStyle::Plot => trace.plot(),
        LineStyle::ScatterPlot => trace.scatter_plot(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hybrid_window() -> LogTable {
        LogTable::from_rows(vec![
            vec![10.0, 0.0, 0.1],
            vec![11.0, 0.0, 0.2],
            vec![12.0, 1.0, 0.3],
            vec![13.0, 1.0, 0.4],
            vec![14.0, 1.0, 0.5],
            vec![15.0, 0.0, 0.6],
        ])
        .unwrap()
    }

    fn count<F: Fn(&Shape) -> bool>(shapes: &[Shape], f: F) -> usize {
        shapes.iter().filter(|s| f(s)).count()
    }

    #[test]
    fn test_segments_are_maximal_runs() {
        let segs = segments(&[0, 0, 1, 1, 1, 0]);
        let runs: Vec<(usize, usize)> = segs.iter().map(|s| (s.category, s.len)).collect();
        assert_eq!(runs, vec![(0, 2), (1, 3), (0, 1)]);
        assert_eq!(segs[2].start, 5);
        assert!(segments(&[]).is_empty());
    }

    #[test]
    fn test_resolve_line_style() {
        assert_eq!(LineStyle::resolve(None, true), Some(LineStyle::Constant));
        assert_eq!(LineStyle::resolve(None, false), Some(LineStyle::Scatter));
        assert_eq!(
            LineStyle::resolve(Some("scatter_plot"), true),
            Some(LineStyle::ScatterPlot)
        );
        assert_eq!(LineStyle::resolve(Some("dashed"), false), None);
    }

    #[test]
    fn test_constant_extends_last_step() {
        let config = ActionPlotConfig::default();
        let shapes = action_trace(&hybrid_window(), true, LineStyle::Constant, &config);
        assert_eq!(count(&shapes, |s| matches!(s, Shape::Guide { .. })), 1);
        assert_eq!(
            shapes.last(),
            Some(&Shape::Segment {
                from: (15.0, 0.6),
                to: (16.0, 0.6),
                color: 0
            })
        );
        assert_eq!(
            shapes[3],
            Shape::Segment {
                from: (12.0, 0.3),
                to: (13.0, 0.3),
                color: 1
            }
        );

        let config = config.hide_gray_vertical_line(true);
        let shapes = action_trace(&hybrid_window(), true, LineStyle::Constant, &config);
        assert_eq!(count(&shapes, |s| matches!(s, Shape::Guide { .. })), 0);

        let single = LogTable::from_rows(vec![vec![3.0, 0.5]]).unwrap();
        let shapes = action_trace(&single, false, LineStyle::Constant, &config);
        assert_eq!(
            shapes,
            vec![Shape::Segment {
                from: (3.0, 0.5),
                to: (4.0, 0.5),
                color: 0
            }]
        );
    }

    #[test]
    fn test_scatter_vertical_markers() {
        let config = ActionPlotConfig::default()
            .vertical_line_indices(vec![1])
            .ylim(Some((-1.0, 1.0)));
        let shapes = action_trace(&hybrid_window(), true, LineStyle::Scatter, &config);
        assert_eq!(count(&shapes, |s| matches!(s, Shape::Point { .. })), 3);
        assert_eq!(count(&shapes, |s| matches!(s, Shape::VLine { .. })), 3);
        assert!(shapes.contains(&Shape::VLine {
            x: 12.0,
            y: (-1.0, 1.0),
            color: 1
        }));
    }

    #[test]
    fn test_plot_breaks_at_category_changes() {
        let config = ActionPlotConfig::default();
        let shapes = action_trace(&hybrid_window(), true, LineStyle::Plot, &config);
        assert_eq!(shapes.len(), 3);
        assert_eq!(
            shapes[1],
            Shape::Polyline {
                points: vec![(12.0, 0.3), (13.0, 0.4), (14.0, 0.5)],
                color: 1
            }
        );
        assert_eq!(
            shapes[2],
            Shape::Point {
                at: (15.0, 0.6),
                color: 0
            }
        );
    }

    #[test]
    fn test_continuous_colors_by_component() {
        let window = LogTable::from_rows(vec![vec![0.0, 0.1, -0.1], vec![1.0, 0.2, -0.2]])
            .unwrap();
        let config = ActionPlotConfig::default();
        let shapes = action_trace(&window, false, LineStyle::ScatterPlot, &config);
        assert_eq!(count(&shapes, |s| matches!(s, Shape::Guide { .. })), 2);
        assert!(shapes.contains(&Shape::Point {
            at: (1.0, -0.2),
            color: 1
        }));
        assert_eq!(bounds(&shapes), Some(((0.0, 1.0), (-0.2, 0.2))));
        assert_eq!(bounds(&[]), None);
    }
}
