pub mod config;
pub mod engine;
pub mod reasoning;
pub mod rules;
pub mod trend;
pub mod types;
pub mod validation;

/// Tracing target for difficulty decisions, routed to the decision audit log.
pub const DECISION_LOG_TARGET: &str = "cogplay::decision";

pub use config::{AdaptiveConfig, ConfigError, DecisionStrategy};
pub use engine::AdaptiveEngine;
pub use types::*;
pub use validation::ValidationError;
