use crate::adaptive::config::{AdaptiveConfig, ConfigError};
use crate::adaptive::reasoning;
use crate::adaptive::DECISION_LOG_TARGET;
use crate::adaptive::rules::RuleEvaluator;
use crate::adaptive::trend::TrendAnalyzer;
use crate::adaptive::types::*;
use crate::adaptive::validation::{validate_exercise_type, validate_performance, ValidationError};

/// Deterministic difficulty policy.
///
/// Holds only configuration, so a single instance can be shared across sessions
/// and called concurrently. The caller owns `currentDifficulty` and threads it
/// through successive calls.
#[derive(Debug, Clone)]
pub struct AdaptiveEngine {
    config: AdaptiveConfig,
    trend: TrendAnalyzer,
    rules: RuleEvaluator,
}

impl AdaptiveEngine {
    pub fn new(config: AdaptiveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            trend: TrendAnalyzer::from_config(&config),
            rules: RuleEvaluator::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn decide(&self, snapshot: &PerformanceSnapshot) -> Result<AdaptationDecision, ValidationError> {
        self.decide_with_history(
            &snapshot.exercise_type,
            snapshot.current_difficulty,
            snapshot.user_performance,
            &snapshot.recent_history,
        )
    }

    /// Threads the difficulty through a sequence of attempts, each earlier attempt
    /// becoming history for the next decision.
    pub fn replay(
        &self,
        exercise_type: &str,
        start: DifficultyLevel,
        performances: &[f64],
    ) -> Result<ReplayReport, ValidationError> {
        validate_exercise_type(exercise_type)?;

        let mut history: Vec<ExerciseOutcome> = Vec::with_capacity(performances.len());
        let mut steps = Vec::with_capacity(performances.len());
        let mut current = start;

        for (attempt, &performance) in performances.iter().enumerate() {
            validate_performance(&format!("performances[{attempt}]"), performance)?;

            let decision = self.decide_with_history(exercise_type, current, performance, &history)?;
            history.push(ExerciseOutcome::new(exercise_type, current, performance));

            let from = current;
            current = decision.new_difficulty;
            steps.push(ReplayStep {
                attempt,
                performance,
                from,
                decision,
            });
        }

        Ok(ReplayReport {
            final_difficulty: current,
            steps,
        })
    }

    fn decide_with_history(
        &self,
        exercise_type: &str,
        current: DifficultyLevel,
        performance: f64,
        history: &[ExerciseOutcome],
    ) -> Result<AdaptationDecision, ValidationError> {
        validate_exercise_type(exercise_type)?;
        validate_performance("userPerformance", performance)?;

        let signal = self.trend.analyze(history, performance)?;
        let outcome = self.rules.evaluate(current, performance, signal.state);
        let reasoning = reasoning::explain(&outcome, current, performance, &signal, &self.rules);

        tracing::debug!(
            target: DECISION_LOG_TARGET,
            exercise_type,
            performance,
            trend = signal.state.as_str(),
            rule = outcome.rule.as_str(),
            from = current.as_str(),
            to = outcome.new_difficulty.as_str(),
            "difficulty decided"
        );

        Ok(AdaptationDecision {
            new_difficulty: outcome.new_difficulty,
            reasoning,
            rule: outcome.rule,
            trend: signal,
            source: DecisionSource::Rules,
        })
    }
}

impl Default for AdaptiveEngine {
    fn default() -> Self {
        let config = AdaptiveConfig::default();
        Self {
            trend: TrendAnalyzer::from_config(&config),
            rules: RuleEvaluator::from_config(&config),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AdaptiveConfig {
            history_window: 0,
            ..Default::default()
        };
        assert!(AdaptiveEngine::new(config).is_err());
    }

    #[test]
    fn test_replay_moves_one_step_at_a_time() {
        let engine = AdaptiveEngine::default();
        let report = engine
            .replay("bubble-pop", DifficultyLevel::Easy, &[90.0, 95.0, 98.0, 99.0])
            .unwrap();

        assert_eq!(report.steps.len(), 4);
        for step in &report.steps {
            assert!(step.from.steps_to(step.decision.new_difficulty).abs() <= 1);
        }
        assert_eq!(report.steps[0].decision.new_difficulty, DifficultyLevel::Medium);
        assert_eq!(report.final_difficulty, DifficultyLevel::Hard);
    }

    #[test]
    fn test_replay_reports_bad_attempt_index() {
        let err = AdaptiveEngine::default()
            .replay("color-quest", DifficultyLevel::Medium, &[70.0, 120.0])
            .unwrap_err();
        assert_eq!(err.field, "performances[1]");
    }
}
