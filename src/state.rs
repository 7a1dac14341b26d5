use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::adaptive::{AdaptiveConfig, AdaptiveEngine, ConfigError, DecisionStrategy};
use crate::services::llm_provider::LLMProvider;
use crate::services::AdaptationService;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    adaptation: Arc<AdaptationService>,
}

impl AppState {
    pub fn new(adaptation: Arc<AdaptationService>) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            adaptation,
        }
    }

    /// The provider is only built when the model strategy is selected.
    pub fn create_adaptation_service(config: AdaptiveConfig) -> Result<Arc<AdaptationService>, ConfigError> {
        let llm = match config.strategy {
            DecisionStrategy::Llm => Some(LLMProvider::from_env()),
            DecisionStrategy::Rules => None,
        };
        let engine = AdaptiveEngine::new(config)?;
        Ok(Arc::new(AdaptationService::new(engine, llm)))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn adaptation(&self) -> Arc<AdaptationService> {
        Arc::clone(&self.adaptation)
    }
}
