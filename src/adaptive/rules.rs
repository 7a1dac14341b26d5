use crate::adaptive::config::AdaptiveConfig;
use crate::adaptive::types::{DifficultyLevel, RuleId, TrendState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: RuleId,
    pub new_difficulty: DifficultyLevel,
    /// The rule asked for a move but the level was already at the end of the scale.
    pub capped: bool,
}

/// Threshold rules applied in fixed priority order; the first match wins.
#[derive(Debug, Clone, Copy)]
pub struct RuleEvaluator {
    escalate_above: f64,
    deescalate_below: f64,
}

impl RuleEvaluator {
    pub fn new(escalate_above: f64, deescalate_below: f64) -> Self {
        Self {
            escalate_above,
            deescalate_below,
        }
    }

    pub fn from_config(config: &AdaptiveConfig) -> Self {
        Self::new(config.escalate_above, config.deescalate_below)
    }

    pub fn escalate_above(&self) -> f64 {
        self.escalate_above
    }

    pub fn deescalate_below(&self) -> f64 {
        self.deescalate_below
    }

    pub fn evaluate(
        &self,
        current: DifficultyLevel,
        performance: f64,
        trend: TrendState,
    ) -> RuleOutcome {
        if performance > self.escalate_above && trend != TrendState::Falling {
            return RuleOutcome {
                rule: RuleId::Escalate,
                new_difficulty: current.harder(),
                capped: current.is_max(),
            };
        }

        if performance < self.deescalate_below && trend != TrendState::Rising {
            return RuleOutcome {
                rule: RuleId::DeEscalate,
                new_difficulty: current.easier(),
                capped: current.is_min(),
            };
        }

        let rule = if trend.is_weak() {
            RuleId::HoldErratic
        } else {
            RuleId::HoldSteady
        };

        RuleOutcome {
            rule,
            new_difficulty: current,
            capped: false,
        }
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::from_config(&AdaptiveConfig::default())
    }
}
