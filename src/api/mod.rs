pub mod client;
pub mod discovery;
pub mod models;
pub mod response;

use crate::error::GenerationError;
use async_trait::async_trait;

pub use client::GeminiClient;
pub use discovery::{default_model_index, discover_models, fallback_models};
pub use models::{ChatRequest, ModelInfo, ProviderTurn, Speaker};

/// The remote generative-language service.
#[async_trait]
pub trait ModelApi: Send + Sync {
    /// Continue the chat in `request.history` with `request.message` and
    /// return the reply text.
    async fn generate(&self, request: &ChatRequest) -> Result<String, GenerationError>;

    /// List every model visible to the account.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError>;
}
