pub mod paths;
pub mod service;
pub mod settings;
pub mod validation;

pub use paths::AppPaths;
pub use service::{ConfigService, KeyStatus};
pub use settings::{AppConfig, AssistantConfig, KnowledgeConfig, LoggingConfig};
