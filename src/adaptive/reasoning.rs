use crate::adaptive::rules::{RuleEvaluator, RuleOutcome};
use crate::adaptive::types::{DifficultyLevel, RuleId, TrendSignal, TrendState};

pub fn explain(
    outcome: &RuleOutcome,
    current: DifficultyLevel,
    performance: f64,
    trend: &TrendSignal,
    rules: &RuleEvaluator,
) -> String {
    let evidence = evidence(performance, trend);

    match outcome.rule {
        RuleId::Escalate if outcome.capped => format!(
            "{evidence} High performance above the {:.0}% threshold would escalate, \
             but {current} is already at maximum difficulty; staying at {current}.",
            rules.escalate_above(),
        ),
        RuleId::Escalate => format!(
            "{evidence} High performance above the {:.0}% threshold without a falling trend; \
             escalate from {current} to {}.",
            rules.escalate_above(),
            outcome.new_difficulty,
        ),
        RuleId::DeEscalate if outcome.capped => format!(
            "{evidence} Low performance below the {:.0}% threshold would de-escalate, \
             but {current} is already at minimum difficulty; staying at {current}.",
            rules.deescalate_below(),
        ),
        RuleId::DeEscalate => format!(
            "{evidence} Low performance below the {:.0}% threshold without a rising trend; \
             de-escalate from {current} to {}.",
            rules.deescalate_below(),
            outcome.new_difficulty,
        ),
        RuleId::HoldErratic if trend.state == TrendState::Insufficient => format!(
            "{evidence} Insufficient history to establish a trend; holding at {current}."
        ),
        RuleId::HoldErratic => format!(
            "{evidence} Results are erratic with no consistent direction; holding at {current}."
        ),
        RuleId::HoldSteady if performance > rules.escalate_above() => format!(
            "{evidence} Performance is above the {:.0}% threshold, but a falling trend blocks \
             escalation; holding at {current}.",
            rules.escalate_above(),
        ),
        RuleId::HoldSteady if performance < rules.deescalate_below() => format!(
            "{evidence} Performance is below the {:.0}% threshold, but a rising trend blocks \
             de-escalation; holding at {current}.",
            rules.deescalate_below(),
        ),
        RuleId::HoldSteady => format!(
            "{evidence} Steady performance with no threshold crossed in a consistent direction; \
             holding at {current}."
        ),
    }
}

fn evidence(performance: f64, trend: &TrendSignal) -> String {
    format!(
        "Performance {performance:.1}% with {} {} trend (average {:.1}% over {} attempt{}).",
        if trend.state == TrendState::Insufficient { "an" } else { "a" },
        trend.state,
        trend.average,
        trend.samples,
        if trend.samples == 1 { "" } else { "s" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(state: TrendState, samples: usize) -> TrendSignal {
        TrendSignal {
            state,
            average: 72.5,
            samples,
            net_change: 0.0,
        }
    }

    #[test]
    fn test_escalation_text() {
        let rules = RuleEvaluator::default();
        let outcome = rules.evaluate(DifficultyLevel::Easy, 95.0, TrendState::Insufficient);
        let text = explain(&outcome, DifficultyLevel::Easy, 95.0, &signal(TrendState::Insufficient, 1), &rules);
        assert_eq!(
            text,
            "Performance 95.0% with an insufficient trend (average 72.5% over 1 attempt). \
             High performance above the 80% threshold without a falling trend; \
             escalate from easy to medium."
        );
    }

    #[test]
    fn test_capped_texts_mention_bounds() {
        let rules = RuleEvaluator::default();

        let high = rules.evaluate(DifficultyLevel::Hard, 95.0, TrendState::Stable);
        let text = explain(&high, DifficultyLevel::Hard, 95.0, &signal(TrendState::Stable, 3), &rules);
        assert!(text.contains("already at maximum"));

        let low = rules.evaluate(DifficultyLevel::Easy, 20.0, TrendState::Stable);
        let text = explain(&low, DifficultyLevel::Easy, 20.0, &signal(TrendState::Stable, 3), &rules);
        assert!(text.contains("already at minimum"));
    }

    #[test]
    fn test_hold_texts() {
        let rules = RuleEvaluator::default();
        let outcome = rules.evaluate(DifficultyLevel::Medium, 65.0, TrendState::Mixed);
        let text = explain(&outcome, DifficultyLevel::Medium, 65.0, &signal(TrendState::Mixed, 3), &rules);
        assert!(text.contains("erratic"));

        let outcome = rules.evaluate(DifficultyLevel::Medium, 65.0, TrendState::Stable);
        let text = explain(&outcome, DifficultyLevel::Medium, 65.0, &signal(TrendState::Stable, 3), &rules);
        assert!(text.contains("Steady performance"));
    }

    #[test]
    fn test_falling_trend_blocking_escalation() {
        let rules = RuleEvaluator::default();
        let outcome = rules.evaluate(DifficultyLevel::Medium, 85.0, TrendState::Falling);
        assert_eq!(outcome.rule, RuleId::HoldSteady);

        let text = explain(&outcome, DifficultyLevel::Medium, 85.0, &signal(TrendState::Falling, 3), &rules);
        assert!(text.contains("above the 80% threshold, but a falling trend blocks escalation"));
        assert!(!text.contains("Steady performance"));
    }

    #[test]
    fn test_rising_trend_blocking_deescalation() {
        let rules = RuleEvaluator::default();
        let outcome = rules.evaluate(DifficultyLevel::Medium, 40.0, TrendState::Rising);
        assert_eq!(outcome.rule, RuleId::HoldSteady);

        let text = explain(&outcome, DifficultyLevel::Medium, 40.0, &signal(TrendState::Rising, 3), &rules);
        assert!(text.contains("below the 50% threshold, but a rising trend blocks de-escalation"));
        assert!(text.ends_with("holding at medium."));
    }
}
