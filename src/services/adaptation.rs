use serde::Deserialize;
use tracing::warn;

use crate::adaptive::trend::TrendAnalyzer;
use crate::adaptive::{
    AdaptationDecision, AdaptiveEngine, DecisionSource, DecisionStrategy, DifficultyLevel,
    PerformanceSnapshot, ReplayReport, RuleId, ValidationError, DECISION_LOG_TARGET,
};
use crate::services::llm_provider::{LLMError, LLMProvider};

const SYSTEM_PROMPT: &str = "You tune the difficulty of cognitive-skill exercises for children. \
Difficulty levels are easy, medium and hard, and you may move at most one level per decision. \
Reply with a single JSON object: {\"newDifficulty\": \"easy|medium|hard\", \"reasoning\": \"one or two sentences\"}.";

/// Front door for difficulty decisions. Validation and the rule decision always run;
/// the model strategy only replaces the rule outcome when it produces a usable reply.
pub struct AdaptationService {
    engine: AdaptiveEngine,
    llm: Option<LLMProvider>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelReply {
    new_difficulty: String,
    reasoning: String,
}

impl AdaptationService {
    pub fn new(engine: AdaptiveEngine, llm: Option<LLMProvider>) -> Self {
        Self { engine, llm }
    }

    pub fn rules_only(engine: AdaptiveEngine) -> Self {
        Self::new(engine, None)
    }

    pub fn engine(&self) -> &AdaptiveEngine {
        &self.engine
    }

    pub fn strategy(&self) -> DecisionStrategy {
        self.engine.config().strategy
    }

    pub async fn decide(
        &self,
        snapshot: &PerformanceSnapshot,
    ) -> Result<AdaptationDecision, ValidationError> {
        let baseline = self.engine.decide(snapshot)?;

        if self.strategy() == DecisionStrategy::Rules {
            return Ok(baseline);
        }

        let Some(provider) = self.llm.as_ref() else {
            warn!("model strategy selected but no provider configured, using rule decision");
            return Ok(fallback(baseline));
        };

        match self.ask_model(provider, snapshot, &baseline).await {
            Ok(decision) => Ok(decision),
            Err(e) => {
                warn!(error = %e, exercise_type = %snapshot.exercise_type, "model strategy failed, using rule decision");
                Ok(fallback(baseline))
            }
        }
    }

    pub fn replay(
        &self,
        exercise_type: &str,
        start: DifficultyLevel,
        performances: &[f64],
    ) -> Result<ReplayReport, ValidationError> {
        self.engine.replay(exercise_type, start, performances)
    }

    async fn ask_model(
        &self,
        provider: &LLMProvider,
        snapshot: &PerformanceSnapshot,
        baseline: &AdaptationDecision,
    ) -> Result<AdaptationDecision, LLMError> {
        if !provider.is_available() {
            return Err(LLMError::NotConfigured("LLM_API_KEY"));
        }

        let prompt = self.build_prompt(snapshot, baseline);
        let reply = provider.complete_with_system(SYSTEM_PROMPT, &prompt).await?;
        let (proposed, reasoning) = parse_model_reply(&reply)?;

        let current = snapshot.current_difficulty;
        let new_difficulty = current.step_toward(proposed);
        let reasoning = if new_difficulty == proposed {
            reasoning
        } else {
            format!("{reasoning} (model proposed {proposed}; limited to one step from {current}.)")
        };

        tracing::debug!(
            target: DECISION_LOG_TARGET,
            exercise_type = %snapshot.exercise_type,
            model = provider.model(),
            from = current.as_str(),
            to = new_difficulty.as_str(),
            "difficulty decided by model"
        );

        Ok(AdaptationDecision {
            new_difficulty,
            reasoning,
            rule: model_rule(current, new_difficulty, baseline),
            trend: baseline.trend,
            source: DecisionSource::Model,
        })
    }

    fn build_prompt(&self, snapshot: &PerformanceSnapshot, baseline: &AdaptationDecision) -> String {
        let config = self.engine.config();
        let recent: Vec<String> = TrendAnalyzer::from_config(config)
            .window_entries(&snapshot.recent_history)
            .into_iter()
            .map(|(_, o)| format!("{:.1}% at {}", o.performance, o.difficulty))
            .collect();

        format!(
            "Exercise: {exercise}\n\
             Current difficulty: {current}\n\
             Latest performance: {performance:.1}%\n\
             Recent attempts (oldest first): {recent}\n\
             Trend: {trend} (average {average:.1}% over {samples} attempts)\n\
             Guidance: above {high:.0}% suggests escalating, below {low:.0}% suggests de-escalating, \
             erratic results suggest holding.",
            exercise = snapshot.exercise_type,
            current = snapshot.current_difficulty,
            performance = snapshot.user_performance,
            recent = if recent.is_empty() { "none".to_string() } else { recent.join(", ") },
            trend = baseline.trend.state,
            average = baseline.trend.average,
            samples = baseline.trend.samples,
            high = config.escalate_above,
            low = config.deescalate_below,
        )
    }
}

/// Rule matching the direction the model actually took. A hold keeps the rule
/// decision's hold (or its capped move, which also held).
fn model_rule(
    current: DifficultyLevel,
    chosen: DifficultyLevel,
    baseline: &AdaptationDecision,
) -> RuleId {
    match current.steps_to(chosen) {
        n if n > 0 => RuleId::Escalate,
        n if n < 0 => RuleId::DeEscalate,
        _ if baseline.new_difficulty == current => baseline.rule,
        _ if baseline.trend.state.is_weak() => RuleId::HoldErratic,
        _ => RuleId::HoldSteady,
    }
}

fn fallback(mut decision: AdaptationDecision) -> AdaptationDecision {
    decision.source = DecisionSource::RulesFallback;
    decision
}

/// Pulls the first JSON object out of a model reply, tolerating prose or code fences
/// around it.
pub fn parse_model_reply(reply: &str) -> Result<(DifficultyLevel, String), LLMError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &reply[s..=e],
        _ => return Err(LLMError::Unparsable("no JSON object in reply".to_string())),
    };

    let parsed: ModelReply = serde_json::from_str(json)?;
    let level = DifficultyLevel::parse(&parsed.new_difficulty).ok_or_else(|| {
        LLMError::Unparsable(format!("unknown difficulty '{}'", parsed.new_difficulty))
    })?;
    let reasoning = parsed.reasoning.trim();
    if reasoning.is_empty() {
        return Err(LLMError::Unparsable("empty reasoning".to_string()));
    }

    Ok((level, reasoning.to_string()))
}
