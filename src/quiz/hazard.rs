//! Nelson–Aalen cumulative hazard with Epanechnikov kernel smoothing.
//!
//! A batting innings is a survival time measured in runs: the innings
//! "dies" at its score when the batter is out and is censored there
//! otherwise.

use crate::error::{Result, StatsError};
use std::collections::BTreeMap;

/// One step of the estimator at a distinct observed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardStep {
    pub time: f64,
    pub at_risk: usize,
    pub events: usize,
    /// `events / at_risk`
    pub increment: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NelsonAalen {
    label: String,
    steps: Vec<HazardStep>,
}

/// Epanechnikov kernel scaled to `bandwidth`, zero outside `(-1, 1)`.
pub fn epanechnikov(t: f64, centre: f64, bandwidth: f64) -> f64 {
    let u = (t - centre) / bandwidth;
    if u.abs() < 1.0 {
        0.75 * (1.0 - u * u)
    } else {
        0.0
    }
}

impl NelsonAalen {
    /// Fits the estimator to paired durations and event indicators.
    ///
    /// The timeline starts at zero and then visits each distinct duration
    /// in ascending order. Durations must be finite.
    pub fn fit(label: impl Into<String>, durations: &[f64], observed: &[bool]) -> Result<Self> {
        if durations.len() != observed.len() {
            return Err(StatsError::DataProcessing(format!(
                "{} durations but {} event flags",
                durations.len(),
                observed.len()
            )));
        }
        if let Some(bad) = durations.iter().find(|d| !d.is_finite()) {
            return Err(StatsError::DataProcessing(format!(
                "Duration {bad} is not finite"
            )));
        }

        let mut table: BTreeMap<OrderedTime, (usize, usize)> = BTreeMap::new();
        table.entry(OrderedTime(0.0)).or_default();
        for (&time, &died) in durations.iter().zip(observed) {
            let entry = table.entry(OrderedTime(time)).or_default();
            entry.0 += 1;
            if died {
                entry.1 += 1;
            }
        }

        let mut at_risk = durations.len();
        let mut steps = Vec::with_capacity(table.len());
        for (OrderedTime(time), (leaving, events)) in table {
            let increment = if at_risk == 0 {
                0.0
            } else {
                events as f64 / at_risk as f64
            };
            steps.push(HazardStep {
                time,
                at_risk,
                events,
                increment,
            });
            at_risk -= leaving;
        }

        Ok(Self {
            label: label.into(),
            steps,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn steps(&self) -> &[HazardStep] {
        &self.steps
    }

    pub fn timeline(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.time).collect()
    }

    /// Running sum of the increments at each timeline point.
    pub fn cumulative_hazard(&self) -> Vec<[f64; 2]> {
        let mut total = 0.0;
        self.steps
            .iter()
            .map(|s| {
                total += s.increment;
                [s.time, total]
            })
            .collect()
    }

    /// Kernel-smoothed hazard rate evaluated at each timeline point.
    pub fn smoothed_hazard(&self, bandwidth: f64) -> Result<Vec<[f64; 2]>> {
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Err(StatsError::Config(format!(
                "Hazard bandwidth must be positive, got {bandwidth}"
            )));
        }
        let jumps: Vec<&HazardStep> = self.steps.iter().filter(|s| s.increment != 0.0).collect();
        Ok(self
            .steps
            .iter()
            .map(|s| {
                let rate: f64 = jumps
                    .iter()
                    .map(|j| epanechnikov(s.time, j.time, bandwidth) * j.increment)
                    .sum();
                [s.time, rate / bandwidth]
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedTime(f64);

impl Eq for OrderedTime {}

impl PartialOrd for OrderedTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, clippy::indexing_slicing)]
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_increments_follow_risk_set() {
        let naf = NelsonAalen::fit("x", &[1.0, 2.0, 3.0], &[true, true, true]).unwrap();
        let increments: Vec<f64> = naf.steps().iter().map(|s| s.increment).collect();
        assert_eq!(naf.timeline(), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(close(increments[0], 0.0));
        assert!(close(increments[1], 1.0 / 3.0));
        assert!(close(increments[2], 0.5));
        assert!(close(increments[3], 1.0));

        let cumulative = naf.cumulative_hazard();
        assert!(close(cumulative[3][1], 1.0 / 3.0 + 0.5 + 1.0));
    }

    #[test]
    fn test_censored_innings_leave_without_event() {
        let naf = NelsonAalen::fit("x", &[5.0, 5.0, 8.0], &[false, true, false]).unwrap();
        let at_five = naf.steps()[1];
        assert_eq!(at_five.at_risk, 3);
        assert_eq!(at_five.events, 1);
        let at_eight = naf.steps()[2];
        assert_eq!(at_eight.at_risk, 1);
        assert_eq!(at_eight.events, 0);
        assert!(close(at_eight.increment, 0.0));
    }

    #[test]
    fn test_single_event_peaks_at_kernel_height() {
        let naf = NelsonAalen::fit("x", &[10.0], &[true]).unwrap();
        let smoothed = naf.smoothed_hazard(5.0).unwrap();
        assert_eq!(smoothed.len(), 2);
        assert!(close(smoothed[0][1], 0.0), "t=0 is outside the kernel");
        assert!(close(smoothed[1][0], 10.0));
        assert!(close(smoothed[1][1], 0.15));
    }

    #[test]
    fn test_smoothing_spreads_nearby_events() {
        let naf = NelsonAalen::fit("x", &[2.0, 4.0], &[true, true]).unwrap();
        let smoothed = naf.smoothed_hazard(5.0).unwrap();
        // At t=2: own jump 0.5 at u=0, jump 1.0 at u=-0.4.
        let expected = (0.75 * 0.5 + 0.75 * (1.0 - 0.16) * 1.0) / 5.0;
        assert!(close(smoothed[1][1], expected));
    }

    #[test]
    fn test_zero_score_ducks_count_at_origin() {
        let naf = NelsonAalen::fit("x", &[0.0, 0.0, 7.0], &[true, false, true]).unwrap();
        assert_eq!(naf.timeline(), vec![0.0, 7.0]);
        assert!(close(naf.steps()[0].increment, 1.0 / 3.0));
    }

    #[test]
    fn test_mismatched_inputs_are_rejected() {
        assert!(NelsonAalen::fit("x", &[1.0, 2.0], &[true]).is_err());
        assert!(NelsonAalen::fit("x", &[f64::NAN], &[true]).is_err());
        let naf = NelsonAalen::fit("x", &[1.0], &[true]).unwrap();
        assert!(naf.smoothed_hazard(0.0).is_err());
    }

    #[test]
    fn test_empty_sample_is_flat() {
        let naf = NelsonAalen::fit("nobody", &[], &[]).unwrap();
        assert_eq!(naf.label(), "nobody");
        assert_eq!(naf.smoothed_hazard(5.0).unwrap(), vec![[0.0, 0.0]]);
    }
}
