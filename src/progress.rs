use crate::stats::TestResultRecord;
use crate::util::{mean, round_to, std_dev};
use serde::Serialize;

/// Trend of the latest result against a user's history, in units of
/// standard deviations times 100. Positive means improvement. Values are
/// not bounded to ±100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProgressMetrics {
    pub speed_progress: f64,
    pub accuracy_progress: f64,
    pub time_progress: f64,
}

/// Which way a dimension improves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Better {
    Higher,
    Lower,
}

pub struct ProgressScorer;

impl ProgressScorer {
    /// Score a chronological history (last element = most recent).
    /// The history is not re-sorted here.
    pub fn score(history: &[TestResultRecord]) -> ProgressMetrics {
        if history.len() < 2 {
            return ProgressMetrics::default();
        }

        let speeds: Vec<f64> = history.iter().map(|r| r.chars_per_minute).collect();
        let accuracies: Vec<f64> = history.iter().map(|r| r.accuracy).collect();
        let times: Vec<f64> = history.iter().map(|r| r.time_seconds).collect();

        ProgressMetrics {
            speed_progress: Self::dimension(&speeds, Better::Higher),
            accuracy_progress: Self::dimension(&accuracies, Better::Higher),
            time_progress: Self::dimension(&times, Better::Lower),
        }
    }

    fn dimension(values: &[f64], better: Better) -> f64 {
        let z = Self::latest_z_score(values);
        let signed = match better {
            Better::Higher => z,
            Better::Lower => -z,
        };
        round_to(signed, 3) * 100.0
    }

    /// Zero when there is no spread to measure against
    fn latest_z_score(values: &[f64]) -> f64 {
        let (Some(avg), Some(sd), Some(last)) = (mean(values), std_dev(values), values.last())
        else {
            return 0.0;
        };
        if sd == 0.0 {
            return 0.0;
        }
        (last - avg) / sd
    }
}

/// Convenience entry point for the serving layer
pub fn compute_progress(history: &[TestResultRecord]) -> ProgressMetrics {
    ProgressScorer::score(history)
}
