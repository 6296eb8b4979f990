use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DEFAULT_PLACEHOLDER: &str = "Enter some rich text...";

/// Deployment settings read once at startup from `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnvConfig {
    pub log_level: Option<String>,
    pub placeholder: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl EnvConfig {
    pub fn from_window() -> Self {
        let mut config = Self::default();

        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return config;
        };

        if let Some(level) = env_string(&env, "LOG_LEVEL", "log_level") {
            config.log_level = Some(level);
        }
        if let Some(placeholder) = env_string(&env, "PLACEHOLDER", "placeholder") {
            config.placeholder = placeholder;
        }
        config
    }

    /// Configured level, or DEBUG in debug builds and INFO otherwise.
    pub fn max_level(&self) -> tracing::Level {
        self.log_level
            .as_deref()
            .and_then(parse_level)
            .unwrap_or(if cfg!(debug_assertions) {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            })
    }
}

// Both `window.ENV.LOG_LEVEL` and `window.ENV.log_level` are accepted.
fn env_string(env: &js_sys::Object, upper: &str, lower: &str) -> Option<String> {
    [upper, lower].into_iter().find_map(|name| {
        js_sys::Reflect::get(env, &name.into())
            .ok()
            .and_then(|v| v.as_string())
            .filter(|s| !s.trim().is_empty())
    })
}

pub(crate) fn parse_level(raw: &str) -> Option<tracing::Level> {
    tracing::Level::from_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_accepts_any_case() {
        assert_eq!(parse_level("warn"), Some(tracing::Level::WARN));
        assert_eq!(parse_level(" TRACE "), Some(tracing::Level::TRACE));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_configured_level_wins() {
        let config = EnvConfig {
            log_level: Some("error".to_string()),
            ..EnvConfig::default()
        };
        assert_eq!(config.max_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_bad_level_falls_back_to_build_default() {
        let config = EnvConfig {
            log_level: Some("nope".to_string()),
            ..EnvConfig::default()
        };
        let expected = if cfg!(debug_assertions) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        assert_eq!(config.max_level(), expected);
        assert_eq!(EnvConfig::default().placeholder, DEFAULT_PLACEHOLDER);
    }
}
