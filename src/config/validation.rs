use regex::Regex;
use std::env;
use std::sync::OnceLock;

fn env_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env reference pattern"))
}

/// Expand `${VAR_NAME}` references from the process environment. Unknown
/// variables are left in place.
pub fn expand_env_var_in_string(value: &str) -> String {
    env_ref_pattern()
        .replace_all(value, |caps: &regex::Captures| {
            env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Parse the boolean spellings accepted in environment variables.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
