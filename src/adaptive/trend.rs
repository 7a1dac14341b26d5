use crate::adaptive::config::AdaptiveConfig;
use crate::adaptive::types::{ExerciseOutcome, TrendSignal, TrendState};
use crate::adaptive::validation::{validate_outcome, ValidationError};

/// Builds the sliding window of recent performances and classifies its direction.
///
/// The window is the last `window` history entries (oldest first) followed by the
/// current attempt. Nothing outside the window is read.
#[derive(Debug, Clone, Copy)]
pub struct TrendAnalyzer {
    window: usize,
    tolerance: f64,
}

impl TrendAnalyzer {
    pub fn new(window: usize, tolerance: f64) -> Self {
        Self { window, tolerance }
    }

    pub fn from_config(config: &AdaptiveConfig) -> Self {
        Self::new(config.history_window, config.tolerance)
    }

    pub fn analyze(
        &self,
        history: &[ExerciseOutcome],
        current: f64,
    ) -> Result<TrendSignal, ValidationError> {
        let windowed = self.window_entries(history);

        let mut values = Vec::with_capacity(windowed.len() + 1);
        for (index, outcome) in windowed {
            validate_outcome(index, outcome)?;
            values.push(outcome.performance);
        }
        values.push(current);

        Ok(self.summarize(&values))
    }

    pub fn summarize(&self, values: &[f64]) -> TrendSignal {
        let samples = values.len();
        let average = if samples == 0 {
            0.0
        } else {
            values.iter().sum::<f64>() / samples as f64
        };
        let net_change = match (values.first(), values.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };

        TrendSignal {
            state: classify(values, self.tolerance),
            average,
            samples,
            net_change,
        }
    }

    /// Entries paired with their position in the caller's history, oldest first. When
    /// every entry carries a timestamp the window follows timestamp order, otherwise
    /// sequence order.
    pub fn window_entries<'a>(&self, history: &'a [ExerciseOutcome]) -> Vec<(usize, &'a ExerciseOutcome)> {
        let timestamped = !history.is_empty() && history.iter().all(|o| o.recorded_at.is_some());

        if timestamped {
            let mut indexed: Vec<_> = history.iter().enumerate().collect();
            indexed.sort_by_key(|(_, o)| o.recorded_at);
            let skip = indexed.len().saturating_sub(self.window);
            indexed.split_off(skip)
        } else {
            let skip = history.len().saturating_sub(self.window);
            history.iter().enumerate().skip(skip).collect()
        }
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::from_config(&AdaptiveConfig::default())
    }
}

pub fn classify(values: &[f64], tolerance: f64) -> TrendState {
    if values.len() < 2 {
        return TrendState::Insufficient;
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    if deltas.iter().all(|d| d.abs() < tolerance || *d == 0.0) {
        TrendState::Stable
    } else if deltas.iter().all(|d| *d >= tolerance) {
        TrendState::Rising
    } else if deltas.iter().all(|d| *d <= -tolerance) {
        TrendState::Falling
    } else {
        TrendState::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptive::types::DifficultyLevel;
    use chrono::{TimeZone, Utc};

    fn outcomes(values: &[f64]) -> Vec<ExerciseOutcome> {
        values
            .iter()
            .map(|v| ExerciseOutcome::new("memory-match", DifficultyLevel::Medium, *v))
            .collect()
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let signal = TrendAnalyzer::default().analyze(&[], 70.0).unwrap();
        assert_eq!(signal.state, TrendState::Insufficient);
        assert_eq!(signal.samples, 1);
        assert_eq!(signal.average, 70.0);
    }

    #[test]
    fn test_rising_and_falling() {
        assert_eq!(classify(&[40.0, 50.0, 60.0], 5.0), TrendState::Rising);
        assert_eq!(classify(&[80.0, 75.0, 30.0], 5.0), TrendState::Falling);
    }

    #[test]
    fn test_tolerance_boundary_counts_as_movement() {
        assert_eq!(classify(&[60.0, 65.0], 5.0), TrendState::Rising);
        assert_eq!(classify(&[60.0, 64.9], 5.0), TrendState::Stable);
    }

    #[test]
    fn test_mixed_window() {
        assert_eq!(classify(&[60.0, 70.0, 65.0], 5.0), TrendState::Mixed);
    }

    #[test]
    fn test_noise_is_stable() {
        assert_eq!(classify(&[61.0, 63.0, 60.0, 62.0], 5.0), TrendState::Stable);
    }

    #[test]
    fn test_zero_tolerance_flat_is_stable() {
        assert_eq!(classify(&[50.0, 50.0], 0.0), TrendState::Stable);
    }

    #[test]
    fn test_window_keeps_latest_entries() {
        let history = outcomes(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]);
        let signal = TrendAnalyzer::new(3, 5.0).analyze(&history, 80.0).unwrap();
        assert_eq!(signal.samples, 4);
        assert_eq!(signal.average, 65.0);
        assert_eq!(signal.net_change, 30.0);
        assert_eq!(signal.state, TrendState::Rising);
    }

    #[test]
    fn test_entries_outside_window_are_not_validated() {
        let history = outcomes(&[500.0, 60.0, 61.0]);
        let signal = TrendAnalyzer::new(2, 5.0).analyze(&history, 62.0);
        assert!(signal.is_ok());
    }

    #[test]
    fn test_invalid_windowed_entry_reports_original_index() {
        let history = outcomes(&[60.0, -3.0, 61.0]);
        let err = TrendAnalyzer::new(5, 5.0).analyze(&history, 62.0).unwrap_err();
        assert_eq!(err.field, "recentHistory[1].performance");
    }

    #[test]
    fn test_timestamps_reorder_window() {
        let mut history = outcomes(&[90.0, 50.0, 70.0]);
        history[0].recorded_at = Some(Utc.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap());
        history[1].recorded_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        history[2].recorded_at = Some(Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap());

        let signal = TrendAnalyzer::new(5, 5.0).analyze(&history, 95.0).unwrap();
        assert_eq!(signal.state, TrendState::Rising);
        assert_eq!(signal.net_change, 45.0);
    }

    #[test]
    fn test_partial_timestamps_keep_sequence_order() {
        let mut history = outcomes(&[90.0, 50.0, 70.0]);
        history[0].recorded_at = Some(Utc.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap());
        history[2].recorded_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());

        let analyzer = TrendAnalyzer::new(5, 5.0);
        let order: Vec<usize> = analyzer
            .window_entries(&history)
            .into_iter()
            .map(|(index, _)| index)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);

        let signal = analyzer.analyze(&history, 95.0).unwrap();
        assert_eq!(signal.state, TrendState::Mixed);
        assert_eq!(signal.net_change, 5.0);
    }
}
