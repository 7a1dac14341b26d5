pub mod adaptation;
pub mod llm_provider;

pub use adaptation::AdaptationService;
pub use llm_provider::LLMProvider;
