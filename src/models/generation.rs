use crate::config::defaults::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, MAX_OUTPUT_TOKENS_RANGE,
    TEMPERATURE_RANGE,
};
use crate::error::{GemchatError, Result};
use serde::Serialize;

/// Per-request generation parameters, taken from the current UI control values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GenerationConfig {
    pub fn new(model: impl Into<String>, temperature: f32, max_output_tokens: u32) -> Result<Self> {
        let mut config = Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        };
        config.set_model(model)?;
        config.set_temperature(temperature)?;
        config.set_max_output_tokens(max_output_tokens)?;
        Ok(config)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    pub fn set_model(&mut self, model: impl Into<String>) -> Result<()> {
        let model = model.into();
        let model = model.trim();
        if model.is_empty() {
            return Err(GemchatError::InvalidParameter(
                "model name must not be empty".to_string(),
            ));
        }
        self.model = model.to_string();
        Ok(())
    }

    pub fn set_temperature(&mut self, temperature: f32) -> Result<()> {
        if !temperature.is_finite() || !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(GemchatError::InvalidParameter(format!(
                "temperature must be between {} and {}, got {}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end(),
                temperature
            )));
        }
        self.temperature = temperature;
        Ok(())
    }

    pub fn set_max_output_tokens(&mut self, max_output_tokens: u32) -> Result<()> {
        if !MAX_OUTPUT_TOKENS_RANGE.contains(&max_output_tokens) {
            return Err(GemchatError::InvalidParameter(format!(
                "max output tokens must be between {} and {}, got {}",
                MAX_OUTPUT_TOKENS_RANGE.start(),
                MAX_OUTPUT_TOKENS_RANGE.end(),
                max_output_tokens
            )));
        }
        self.max_output_tokens = max_output_tokens;
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(GenerationConfig::new("gemini-pro", 0.0, 100).is_ok());
        assert!(GenerationConfig::new("gemini-pro", 2.0, 8192).is_ok());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(GenerationConfig::new("gemini-pro", 2.1, 2048).is_err());
        assert!(GenerationConfig::new("gemini-pro", -0.1, 2048).is_err());
        assert!(GenerationConfig::new("gemini-pro", f32::NAN, 2048).is_err());
        assert!(GenerationConfig::new("gemini-pro", 0.7, 99).is_err());
        assert!(GenerationConfig::new("gemini-pro", 0.7, 8193).is_err());
        assert!(GenerationConfig::new("  ", 0.7, 2048).is_err());
    }

    #[test]
    fn test_failed_setter_keeps_previous_value() {
        let mut config = GenerationConfig::default();
        assert!(config.set_temperature(5.0).is_err());
        assert_eq!(config.temperature(), DEFAULT_TEMPERATURE);
    }
}
