mod google;
mod prompt;

pub use google::GeminiProvider;
pub use prompt::{build_nutrition_prompt, NUTRITION_PROMPT};

use async_trait::async_trait;

use crate::error::TrackerError;

/// Unified trait for nutrition lookup backends
#[async_trait]
pub trait NutritionProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Ask the model about `food` and return its raw answer text
    async fn lookup(&self, food: &str, api_key: &str) -> Result<String, TrackerError>;
}
