//! Reference Otto cycles drawn over action traces.
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

const STROKE_COLORS: [RGBColor; 4] = [
    RGBColor(100, 149, 237),
    RGBColor(50, 205, 50),
    RGBColor(255, 165, 0),
    RGBColor(50, 205, 50),
];

/// Points sampled per stroke.
pub const SAMPLES_PER_STROKE: usize = 250;

/// A trapezoidal control cycle: hold `u_min` for `t1`, ramp up during `t2`, hold `u_max`
/// for `t3`, ramp down during `t4`. Durations and the time range are in physical time and
/// are converted to steps by `dt`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OttoCycle {
    /// Lower control value.
    pub u_min: f64,

    /// Upper control value.
    pub u_max: f64,

    /// Durations of the four strokes.
    pub strokes: [f64; 4],

    /// Duration of a step.
    pub dt: f64,

    /// Time interval covered by the overlay.
    pub t_range: (f64, f64),
}

/// One stroke of an [`OttoCycle`] overlay, in steps.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleStroke {
    /// Start of the stroke.
    pub start: f64,

    /// End of the stroke.
    pub end: f64,

    /// Color of the stroke.
    pub color: RGBColor,
}

impl OttoCycle {
    /// Constructs a cycle.
    pub fn new(u_min: f64, u_max: f64, strokes: [f64; 4], dt: f64, t_range: (f64, f64)) -> Self {
        Self {
            u_min,
            u_max,
            strokes,
            dt,
            t_range,
        }
    }

    fn strokes_in_steps(&self) -> [f64; 4] {
        let mut s = self.strokes;
        s.iter_mut().for_each(|t| *t /= self.dt);
        s
    }

    /// Control value at `t`, in steps. The cycle is periodic.
    pub fn value(&self, t: f64) -> f64 {
        let [t1, t2, t3, t4] = self.strokes_in_steps();
        let t = t.rem_euclid(t1 + t2 + t3 + t4);
        if t < t1 {
            self.u_min
        } else if t < t1 + t2 {
            self.u_min + (self.u_max - self.u_min) * (t - t1) / t2
        } else if t < t1 + t2 + t3 {
            self.u_max
        } else {
            self.u_max + (self.u_min - self.u_max) * (t - t1 - t2 - t3) / t4
        }
    }

    /// The strokes covering the time range, each clipped to it.
    pub fn overlay(&self) -> Vec<CycleStroke> {
        let durations = self.strokes_in_steps();
        if durations.iter().any(|d| !(*d > 0.0)) {
            return vec![];
        }
        let (mut t, t_fin) = (self.t_range.0 / self.dt, self.t_range.1 / self.dt);
        let mut stroke = 0;
        let mut strokes = vec![];
        while t < t_fin {
            let end = (t + durations[stroke]).min(t_fin);
            strokes.push(CycleStroke {
                start: t,
                end,
                color: STROKE_COLORS[stroke],
            });
            t = end;
            stroke = (stroke + 1) % 4;
        }
        strokes
    }

    /// Evenly spaced points of the cycle over a stroke.
    pub fn sample(&self, stroke: &CycleStroke) -> Vec<(f64, f64)> {
        let n = SAMPLES_PER_STROKE;
        (0..n)
            .map(|i| {
                let t = stroke.start + (stroke.end - stroke.start) * i as f64 / (n - 1) as f64;
                (t, self.value(t))
            })
            .collect()
    }
}
