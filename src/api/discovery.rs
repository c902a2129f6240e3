use super::ModelApi;
use crate::config::defaults::{DEFAULT_MODEL, FALLBACK_MODELS};

const TEXT_GENERATION_METHOD: &str = "generateContent";

pub fn fallback_models() -> Vec<String> {
    FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
}

/// Models that can generate text, or the fallback list when the listing
/// fails or is empty. Never returns an empty list.
pub async fn discover_models(api: &dyn ModelApi) -> Vec<String> {
    match api.list_models().await {
        Ok(models) => {
            let available: Vec<String> = models
                .iter()
                .filter(|m| m.supports(TEXT_GENERATION_METHOD))
                .map(|m| m.id().to_string())
                .collect();

            if available.is_empty() {
                log::warn!("No text generation models listed, using fallback list");
                fallback_models()
            } else {
                available
            }
        }
        Err(e) => {
            log::warn!("Model listing failed ({}), using fallback list", e);
            fallback_models()
        }
    }
}

/// Preferred default selection: `gemini-pro` when offered, else the first entry.
pub fn default_model_index(models: &[String]) -> usize {
    models.iter().position(|m| m == DEFAULT_MODEL).unwrap_or(0)
}
