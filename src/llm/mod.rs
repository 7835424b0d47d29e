pub mod assistant;
pub mod provider;
pub mod types;

pub use assistant::Assistant;
pub use provider::ChatBackend;
pub use types::ChatMessage;
