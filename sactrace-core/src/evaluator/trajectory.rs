use crate::Projection;
use anyhow::Result;
use csv::WriterBuilder;
use std::{fs::File, path::Path};

/// What happened at one evaluation step.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryStep {
    /// Discrete action, if the action space has one.
    pub discrete: Option<usize>,

    /// Continuous action.
    pub continuous: Vec<f64>,

    /// Reward received.
    pub reward: f64,

    /// Projection of the state reached.
    pub projection: Projection,
}

/// Diagnostic record of an evaluation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    /// Projection of the state before the first step.
    pub initial: Projection,

    /// One entry per step.
    pub steps: Vec<TrajectoryStep>,
}

impl Trajectory {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no step was taken.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Discrete actions, one per step. Empty if the action space has no discrete part.
    pub fn discrete_actions(&self) -> Vec<usize> {
        self.steps.iter().filter_map(|s| s.discrete).collect()
    }

    /// Continuous actions, one per step.
    pub fn continuous_actions(&self) -> Vec<Vec<f64>> {
        self.steps.iter().map(|s| s.continuous.clone()).collect()
    }

    /// Rewards, one per step.
    pub fn rewards(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.reward).collect()
    }

    /// The x projections, starting with the initial state, so one longer than the steps.
    pub fn x(&self) -> Vec<f64> {
        std::iter::once(self.initial.x)
            .chain(self.steps.iter().map(|s| s.projection.x))
            .collect()
    }

    /// The z projections, starting with the initial state.
    pub fn z(&self) -> Vec<f64> {
        std::iter::once(self.initial.z)
            .chain(self.steps.iter().map(|s| s.projection.z))
            .collect()
    }

    /// Writes the trajectory as CSV with a header row.
    ///
    /// Row 0 holds the initial projection only. Row `i + 1` holds the action taken at step
    /// `i`, its reward and the projection of the state reached.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let n_cont = self.steps.first().map_or(0, |s| s.continuous.len());
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .from_writer(File::create(path)?);

        let mut header: Vec<String> = ["step", "discrete", "reward", "x", "z"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend((0..n_cont).map(|i| format!("u_{}", i)));
        wtr.write_record(&header)?;

        let mut row = vec![
            "0".to_string(),
            String::new(),
            String::new(),
            self.initial.x.to_string(),
            self.initial.z.to_string(),
        ];
        row.extend((0..n_cont).map(|_| String::new()));
        wtr.write_record(&row)?;

        for (i, s) in self.steps.iter().enumerate() {
            let mut row = vec![
                (i + 1).to_string(),
                s.discrete.map_or(String::new(), |d| d.to_string()),
                s.reward.to_string(),
                s.projection.x.to_string(),
                s.projection.z.to_string(),
            ];
            row.extend(s.continuous.iter().map(|u| u.to_string()));
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
