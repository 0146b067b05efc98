pub mod ai;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod error;
pub mod prompt;
pub mod state;

// Re-export main types for convenience
pub use ai::gemini::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use ai::GeminiClient;
pub use chat::ChatSession;
pub use config::Config;
pub use credentials::ApiKeyStore;
pub use error::SubmitError;
pub use state::{ChatMessage, ChatRole};
