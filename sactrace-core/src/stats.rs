//! Bias-corrected exponential moving averages.
//!
//! A running statistic with decay `gamma` keeps a debiasing accumulator `o_n`, starting at
//! zero, and applies for every sample `x`
//!
//! ```text
//! o_n     += (1 - gamma) * (1 - o_n)
//! running += (1 - gamma) / o_n * (x - running)
//! ```
//!
//! The first update has weight exactly one, so the running value starts unbiased at the first
//! sample and converges to an average over roughly the last `1 / (1 - gamma)` samples.
use crate::error::SactraceError;
use serde::{Deserialize, Serialize};

/// One application of the debiased recurrence on the tuple `(o_n, running)`.
///
/// Returns the updated `(o_n, running)`.
pub fn ema_update(o_n: f64, running: f64, x: f64, gamma: f64) -> (f64, f64) {
    let o_n = o_n + (1.0 - gamma) * (1.0 - o_n);
    let running = running + (1.0 - gamma) / o_n * (x - running);
    (o_n, running)
}

/// The debiasing accumulator `o_n`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Debias {
    gamma: f64,
    o_n: f64,
}

impl Debias {
    /// Constructs an accumulator for the decay `gamma`, which must lie in `[0, 1)`.
    pub fn new(gamma: f64) -> Result<Self, SactraceError> {
        if !(0.0..1.0).contains(&gamma) {
            return Err(SactraceError::InvalidGamma(gamma));
        }
        Ok(Self { gamma, o_n: 0.0 })
    }

    /// The decay rate.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Current value of the accumulator. Zero before the first update.
    pub fn o_n(&self) -> f64 {
        self.o_n
    }

    /// Advances the accumulator and returns the blending weight `(1 - gamma) / o_n`.
    pub fn advance(&mut self) -> f64 {
        self.o_n += (1.0 - self.gamma) * (1.0 - self.o_n);
        (1.0 - self.gamma) / self.o_n
    }
}

fn blend(running: f64, x: f64, weight: f64) -> f64 {
    running + weight * (x - running)
}

/// A scalar running statistic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunningStat {
    debias: Debias,
    value: Option<f64>,
}

impl RunningStat {
    /// Constructs a running statistic with decay `gamma`.
    pub fn new(gamma: f64) -> Result<Self, SactraceError> {
        Ok(Self {
            debias: Debias::new(gamma)?,
            value: None,
        })
    }

    /// Folds a sample in and returns the new running value.
    pub fn update(&mut self, x: f64) -> f64 {
        let weight = self.debias.advance();
        let value = blend(self.value.unwrap_or(0.0), x, weight);
        self.value = Some(value);
        value
    }

    /// The running value, `None` before the first update.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// The debiasing accumulator.
    pub fn debias(&self) -> &Debias {
        &self.debias
    }
}

/// Running return of a trajectory, with an optional running multi-objective vector.
///
/// Both share the same accumulator. The multi-objective vector is allocated, filled with
/// zeros, the first time a signal is seen and then blended with the current weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunningReturn {
    debias: Debias,
    reward: Option<f64>,
    multi_obj: Option<Vec<f64>>,
}

impl RunningReturn {
    /// Constructs a running return with decay `gamma`.
    pub fn new(gamma: f64) -> Result<Self, SactraceError> {
        Ok(Self {
            debias: Debias::new(gamma)?,
            reward: None,
            multi_obj: None,
        })
    }

    /// Folds the reward of a step, and its multi-objective signal if any, in.
    ///
    /// Returns the new running return.
    pub fn update(&mut self, reward: f64, multi_obj: Option<&[f64]>) -> Result<f64, SactraceError> {
        if let (Some(running), Some(obj)) = (&self.multi_obj, multi_obj) {
            if running.len() != obj.len() {
                return Err(SactraceError::MultiObjectiveLength {
                    expected: running.len(),
                    found: obj.len(),
                });
            }
        }

        let weight = self.debias.advance();
        let value = blend(self.reward.unwrap_or(0.0), reward, weight);
        self.reward = Some(value);

        if let Some(obj) = multi_obj {
            let running = self
                .multi_obj
                .get_or_insert_with(|| vec![0.0; obj.len()]);
            for (r, x) in running.iter_mut().zip(obj) {
                *r = blend(*r, *x, weight);
            }
        }

        Ok(value)
    }

    /// The running return, `None` before the first update.
    pub fn value(&self) -> Option<f64> {
        self.reward
    }

    /// The running multi-objective vector, `None` until a signal was seen.
    pub fn multi_obj(&self) -> Option<&[f64]> {
        self.multi_obj.as_deref()
    }

    /// The debiasing accumulator.
    pub fn debias(&self) -> &Debias {
        &self.debias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recurrence(xs: &[f64], gamma: f64) -> Vec<f64> {
        let (mut o_n, mut running) = (0.0, 0.0);
        xs.iter()
            .map(|&x| {
                let (o, r) = ema_update(o_n, running, x, gamma);
                o_n = o;
                running = r;
                r
            })
            .collect()
    }

    #[test]
    fn test_first_update_is_unbiased() -> Result<(), SactraceError> {
        let mut stat = RunningStat::new(0.9)?;
        assert_eq!(stat.value(), None);
        assert_eq!(stat.update(1.0), 1.0);
        assert!((stat.update(0.0) - (1.0 - 0.1 / 0.19)).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_running_stat_matches_recurrence() -> Result<(), SactraceError> {
        let gamma = 0.9;
        let rewards = [1.0, 0.0, 0.0];
        let expected = recurrence(&rewards, gamma);

        let mut stat = RunningStat::new(gamma)?;
        let got: Vec<f64> = rewards.iter().map(|&r| stat.update(r)).collect();
        assert_eq!(got, expected);
        assert_eq!(got[0], 1.0);

        let o_1 = (1.0 - gamma) + gamma * (1.0 - gamma);
        assert!((o_1 - 0.19).abs() < 1e-15);
        Ok(())
    }

    #[test]
    fn test_o_n_increases_towards_one() -> Result<(), SactraceError> {
        let mut debias = Debias::new(0.95)?;
        let mut prev = debias.o_n();
        for _ in 0..500 {
            debias.advance();
            assert!(debias.o_n() > prev || debias.o_n() == 1.0);
            assert!(debias.o_n() <= 1.0);
            prev = debias.o_n();
        }
        assert!((1.0 - debias.o_n()) < 1e-10);
        Ok(())
    }

    #[test]
    fn test_constant_signal_stays_constant() -> Result<(), SactraceError> {
        let mut stat = RunningStat::new(0.99)?;
        for _ in 0..100 {
            assert!((stat.update(-2.5) + 2.5).abs() < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_invalid_gamma() {
        assert!(RunningStat::new(1.0).is_err());
        assert!(RunningStat::new(-0.1).is_err());
        assert!(RunningStat::new(0.0).is_ok());
    }

    #[test]
    fn test_multi_obj_per_component() -> Result<(), SactraceError> {
        let gamma = 0.8;
        let rewards = [0.5, 1.0, -1.0];
        let objs = [[1.0, 0.0], [0.0, 2.0], [3.0, -1.0]];

        let mut ret = RunningReturn::new(gamma)?;
        assert_eq!(ret.multi_obj(), None);
        for (r, o) in rewards.iter().zip(objs.iter()) {
            ret.update(*r, Some(o))?;
        }

        let expected_reward = recurrence(&rewards, gamma);
        let expected_0 = recurrence(&[1.0, 0.0, 3.0], gamma);
        let expected_1 = recurrence(&[0.0, 2.0, -1.0], gamma);
        assert_eq!(ret.value(), Some(expected_reward[2]));
        assert_eq!(ret.multi_obj(), Some(&[expected_0[2], expected_1[2]][..]));
        Ok(())
    }

    #[test]
    fn test_late_multi_obj_starts_from_zero() -> Result<(), SactraceError> {
        let gamma = 0.5;
        let mut ret = RunningReturn::new(gamma)?;
        ret.update(1.0, None)?;
        ret.update(1.0, Some(&[4.0]))?;

        // o_n after two steps is 0.75, so the weight is 0.5 / 0.75.
        let weight = (1.0 - gamma) / 0.75;
        assert_eq!(ret.multi_obj(), Some(&[weight * 4.0][..]));
        Ok(())
    }

    #[test]
    fn test_multi_obj_length_change_is_an_error() -> Result<(), SactraceError> {
        let mut ret = RunningReturn::new(0.9)?;
        ret.update(0.0, Some(&[1.0, 2.0]))?;
        assert!(matches!(
            ret.update(0.0, Some(&[1.0])),
            Err(SactraceError::MultiObjectiveLength {
                expected: 2,
                found: 1
            })
        ));
        Ok(())
    }
}
