//! Drawing primitives shared by the figures.
use crate::{
    actions::Shape,
    error::{drawing, RenderError},
    palette::{Palette, LIGHT_GRAY},
    ticks,
};
use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
};
use std::iter::once;

pub(crate) type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Axis range covering `values`, widened when empty or degenerate.
pub(crate) fn range_of(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    padded(lo, hi)
}

pub(crate) fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        (-1.0, 1.0)
    } else if (hi - lo).abs() < 1e-12 {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = 0.05 * (hi - lo);
        (lo - pad, hi + pad)
    }
}

/// Axes of a panel.
#[derive(Clone, Debug)]
pub(crate) struct Axes {
    pub caption: Option<String>,
    pub xlabel: String,
    pub ylabel: String,
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub k_notation: bool,
    pub two_xticks: bool,
}

impl Axes {
    pub fn new(ylabel: impl Into<String>, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            caption: None,
            xlabel: String::new(),
            ylabel: ylabel.into(),
            x,
            y,
            k_notation: false,
            two_xticks: false,
        }
    }

    pub fn caption(mut self, v: Option<String>) -> Self {
        self.caption = v;
        self
    }

    pub fn xlabel(mut self, v: impl Into<String>) -> Self {
        self.xlabel = v.into();
        self
    }

    pub fn k_notation(mut self, v: bool) -> Self {
        self.k_notation = v;
        self
    }

    pub fn two_xticks(mut self, v: bool) -> Self {
        self.two_xticks = v;
        self
    }

    /// Builds the chart and draws its mesh.
    pub fn build<'a, DB: DrawingBackend>(
        &self,
        area: &'a DrawingArea<DB, Shift>,
    ) -> Result<Chart<'a, DB>, RenderError> {
        let mut builder = ChartBuilder::on(area);
        if let Some(caption) = &self.caption {
            builder.caption(caption, ("sans-serif", 16));
        }
        let mut chart = builder
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(self.x.0..self.x.1, self.y.0..self.y.1)
            .map_err(drawing)?;

        let x_fmt = |x: &f64| {
            if self.k_notation {
                ticks::k_notation(*x)
            } else {
                ticks::plain(*x)
            }
        };
        let y_fmt = |y: &f64| ticks::plain(*y);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(if self.two_xticks { 2 } else { 6 })
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_desc(self.xlabel.as_str())
            .y_desc(self.ylabel.as_str())
            .draw()
            .map_err(drawing)?;
        Ok(chart)
    }
}

pub(crate) fn draw_line<DB: DrawingBackend>(
    chart: &mut Chart<DB>,
    points: Vec<(f64, f64)>,
    color: RGBColor,
    width: u32,
) -> Result<(), RenderError> {
    chart
        .draw_series(once(PathElement::new(points, color.stroke_width(width))))
        .map_err(drawing)?;
    Ok(())
}

pub(crate) fn draw_markers<DB: DrawingBackend>(
    chart: &mut Chart<DB>,
    points: &[(f64, f64)],
    color: RGBColor,
    size: u32,
    alpha: f64,
) -> Result<(), RenderError> {
    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new(*p, size, color.mix(alpha).filled())),
        )
        .map_err(drawing)?;
    Ok(())
}

/// Draws an action trace, guide lines first.
pub(crate) fn draw_shapes<DB: DrawingBackend>(
    chart: &mut Chart<DB>,
    shapes: &[Shape],
    palette: &Palette,
    line_width: u32,
    marker_size: u32,
) -> Result<(), RenderError> {
    let (guides, shapes): (Vec<&Shape>, Vec<&Shape>) = shapes
        .iter()
        .partition(|s| matches!(s, Shape::Guide { .. }));
    for shape in guides.into_iter().chain(shapes) {
        match shape {
            Shape::Guide { points } => draw_line(chart, points.clone(), LIGHT_GRAY, 1)?,
            Shape::Segment { from, to, color } => {
                draw_line(chart, vec![*from, *to], palette.color(*color), line_width)?
            }
            Shape::Polyline { points, color } => {
                draw_line(chart, points.clone(), palette.color(*color), line_width)?
            }
            Shape::Point { at, color } => {
                draw_markers(chart, &[*at], palette.color(*color), marker_size, 1.0)?
            }
            Shape::VLine { x, y, color } => {
                draw_line(chart, vec![(*x, y.0), (*x, y.1)], palette.color(*color), 1)?
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_ranges_are_widened() {
        assert_eq!(range_of(vec![].into_iter()), (-1.0, 1.0));
        assert_eq!(range_of(vec![2.0, 2.0].into_iter()), (1.0, 3.0));
        assert_eq!(range_of(vec![0.0, f64::NAN, 10.0].into_iter()), (-0.5, 10.5));
    }
}
