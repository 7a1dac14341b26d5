use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_HISTORY_WINDOW: usize = 5;
pub const DEFAULT_TOLERANCE: f64 = 5.0;
pub const DEFAULT_ESCALATE_ABOVE: f64 = 80.0;
pub const DEFAULT_DEESCALATE_BELOW: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStrategy {
    #[default]
    Rules,
    Llm,
}

impl DecisionStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" | "rule" | "deterministic" => Some(Self::Rules),
            "llm" | "model" => Some(Self::Llm),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("history window must be at least 1")]
    EmptyWindow,
    #[error("tolerance must be a finite, non-negative number (got {0})")]
    InvalidTolerance(f64),
    #[error("{name} must lie within [0, 100] (got {value})")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("de-escalation threshold {low} is above escalation threshold {high}")]
    InvertedThresholds { low: f64, high: f64 },
}

/// Tunable inputs of the adaptation policy.
///
/// `history_window` bounds how many past outcomes are read per decision;
/// `tolerance` is the minimum step (in percentage points) that counts as
/// movement when classifying a trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveConfig {
    pub history_window: usize,
    pub tolerance: f64,
    pub escalate_above: f64,
    pub deescalate_below: f64,
    pub strategy: DecisionStrategy,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            tolerance: DEFAULT_TOLERANCE,
            escalate_above: DEFAULT_ESCALATE_ABOVE,
            deescalate_below: DEFAULT_DEESCALATE_BELOW,
            strategy: DecisionStrategy::Rules,
        }
    }
}

impl AdaptiveConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_parsed::<usize>("ADAPT_HISTORY_WINDOW") {
            config.history_window = val;
        }
        if let Some(val) = env_parsed::<f64>("ADAPT_TOLERANCE") {
            config.tolerance = val;
        }
        if let Some(val) = env_parsed::<f64>("ADAPT_ESCALATE_ABOVE") {
            config.escalate_above = val;
        }
        if let Some(val) = env_parsed::<f64>("ADAPT_DEESCALATE_BELOW") {
            config.deescalate_below = val;
        }
        if let Ok(val) = std::env::var("ADAPT_STRATEGY") {
            match DecisionStrategy::parse(&val) {
                Some(strategy) => config.strategy = strategy,
                None => tracing::warn!(value = %val, "unknown ADAPT_STRATEGY, keeping rules"),
            }
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_window == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        check_threshold("escalateAbove", self.escalate_above)?;
        check_threshold("deescalateBelow", self.deescalate_below)?;
        if self.deescalate_below > self.escalate_above {
            return Err(ConfigError::InvertedThresholds {
                low: self.deescalate_below,
                high: self.escalate_above,
            });
        }
        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable adaptive setting");
            None
        }
    }
}
