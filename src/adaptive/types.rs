use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[serde(alias = "Easy", alias = "EASY")]
    Easy,
    #[default]
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Hard", alias = "HARD")]
    Hard,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn harder(&self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            _ => Self::Hard,
        }
    }

    pub fn easier(&self) -> Self {
        match self {
            Self::Hard => Self::Medium,
            _ => Self::Easy,
        }
    }

    pub fn is_max(&self) -> bool {
        *self == Self::Hard
    }

    pub fn is_min(&self) -> bool {
        *self == Self::Easy
    }

    /// Signed number of steps from `self` to `other`.
    pub fn steps_to(&self, other: DifficultyLevel) -> i32 {
        other.rank() - self.rank()
    }

    /// Moves at most one step from `self` in the direction of `target`.
    pub fn step_toward(&self, target: DifficultyLevel) -> Self {
        match self.steps_to(target) {
            0 => *self,
            n if n > 0 => self.harder(),
            _ => self.easier(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" | "mid" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    fn rank(&self) -> i32 {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOutcome {
    #[serde(default)]
    pub exercise_type: String,
    #[serde(default)]
    pub difficulty: DifficultyLevel,
    pub performance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl ExerciseOutcome {
    pub fn new(exercise_type: impl Into<String>, difficulty: DifficultyLevel, performance: f64) -> Self {
        Self {
            exercise_type: exercise_type.into(),
            difficulty,
            performance,
            recorded_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    pub exercise_type: String,
    pub current_difficulty: DifficultyLevel,
    pub user_performance: f64,
    #[serde(default)]
    pub recent_history: Vec<ExerciseOutcome>,
}

impl PerformanceSnapshot {
    pub fn new(
        exercise_type: impl Into<String>,
        current_difficulty: DifficultyLevel,
        user_performance: f64,
    ) -> Self {
        Self {
            exercise_type: exercise_type.into(),
            current_difficulty,
            user_performance,
            recent_history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<ExerciseOutcome>) -> Self {
        self.recent_history = history;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendState {
    Rising,
    Falling,
    Stable,
    Mixed,
    Insufficient,
}

impl TrendState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Stable => "stable",
            Self::Mixed => "mixed",
            Self::Insufficient => "insufficient",
        }
    }

    /// Mixed and insufficient windows carry no usable direction.
    pub fn is_weak(&self) -> bool {
        matches!(self, Self::Mixed | Self::Insufficient)
    }
}

impl std::fmt::Display for TrendState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSignal {
    pub state: TrendState,
    pub average: f64,
    pub samples: usize,
    pub net_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Escalate,
    DeEscalate,
    HoldErratic,
    HoldSteady,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Escalate => "escalate",
            Self::DeEscalate => "de_escalate",
            Self::HoldErratic => "hold_erratic",
            Self::HoldSteady => "hold_steady",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    #[default]
    Rules,
    Model,
    RulesFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationDecision {
    pub new_difficulty: DifficultyLevel,
    pub reasoning: String,
    pub rule: RuleId,
    pub trend: TrendSignal,
    #[serde(default)]
    pub source: DecisionSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayStep {
    pub attempt: usize,
    pub performance: f64,
    pub from: DifficultyLevel,
    pub decision: AdaptationDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub final_difficulty: DifficultyLevel,
    pub steps: Vec<ReplayStep>,
}
