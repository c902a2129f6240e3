use std::ops::RangeInclusive;

pub const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const MAX_OUTPUT_TOKENS_RANGE: RangeInclusive<u32> = 100..=8192;

/// Models offered when the account listing is unavailable.
pub const FALLBACK_MODELS: [&str; 3] = [
    "gemini-pro",
    "gemini-1.5-pro-latest",
    "gemini-1.5-flash-latest",
];

pub fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
