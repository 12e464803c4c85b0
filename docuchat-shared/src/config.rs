//! # Configuration
//!
//! Widget settings resolved from defaults, an optional JSON override (the
//! mount element's `data-config` attribute in the browser) and compile-time
//! environment variables.

use serde::{Deserialize, Serialize};

const KNOWN_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// The main configuration structure for the widget
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetConfig {
    /// Base URL of the chat/PDF backend. Empty means same origin.
    pub api_base_url: String,

    /// Storage key holding the conversation id
    pub conversation_storage_key: String,

    /// Storage key holding the theme preference
    pub theme_storage_key: String,

    /// Number of chunks retrieved per PDF question
    pub ask_top_k: u32,

    /// Number of chunks retrieved for a PDF summary
    pub summarize_top_k: u32,

    /// Logging level
    pub log_level: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl WidgetConfig {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: String::new(),
            conversation_storage_key: "conversation_id".to_string(),
            theme_storage_key: "theme".to_string(),
            ask_top_k: 12,
            summarize_top_k: 40,
            log_level: "info".to_string(),
        }
    }

    /// Resolves the configuration from defaults, a JSON override and the
    /// build environment.
    ///
    /// # Arguments
    /// * `json_override` - Optional partial JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns every problem found if the override is malformed or the
    /// resolved values fail [`WidgetConfig::validate`].
    pub fn load(json_override: Option<&str>) -> Result<Self, Vec<String>> {
        let mut config = match json_override.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => serde_json::from_str::<Self>(raw)
                .map_err(|err| vec![format!("Invalid widget configuration: {err}")])?,
            None => Self::with_defaults(),
        };

        // Build-time values only fill in what the override left at default
        config.apply_env_overrides(
            option_env!("DOCUCHAT_API_BASE_URL"),
            option_env!("DOCUCHAT_LOG_LEVEL"),
        );

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, api_base_url: Option<&str>, log_level: Option<&str>) {
        let defaults = Self::with_defaults();
        if self.api_base_url == defaults.api_base_url
            && let Some(url) = api_base_url
        {
            self.api_base_url = url.to_string();
        }
        if self.log_level == defaults.log_level
            && let Some(level) = log_level
        {
            self.log_level = level.to_string();
        }
    }

    /// Validate the configuration, collecting every problem found.
    ///
    /// # Errors
    /// Returns the list of human-readable problems when any check fails.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.ask_top_k == 0 {
            errors.push("Invalid ask_top_k. Must be greater than 0.".to_string());
        }
        if self.summarize_top_k == 0 {
            errors.push("Invalid summarize_top_k. Must be greater than 0.".to_string());
        }
        if self.conversation_storage_key.trim().is_empty() {
            errors.push("conversation_storage_key must not be empty.".to_string());
        }
        if self.theme_storage_key.trim().is_empty() {
            errors.push("theme_storage_key must not be empty.".to_string());
        }
        if !KNOWN_LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!("Unknown log_level: {}", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Base URL made absolute against the page origin.
    ///
    /// reqwest only accepts absolute URLs, while the widget is usually served
    /// from the same origin as its backend.
    #[must_use]
    pub fn absolute_base_url(&self, origin: &str) -> String {
        let base = self.api_base_url.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            return base.trim_end_matches('/').to_string();
        }
        let origin = origin.trim_end_matches('/');
        let path = base.trim_matches('/');
        if path.is_empty() {
            origin.to_string()
        } else {
            format!("{origin}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with_defaults() {
        let config = WidgetConfig::with_defaults();
        assert_eq!(config.api_base_url, "");
        assert_eq!(config.conversation_storage_key, "conversation_id");
        assert_eq!(config.theme_storage_key, "theme");
        assert_eq!(config.ask_top_k, 12);
        assert_eq!(config.summarize_top_k, 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_merges_partial_json() {
        let config = WidgetConfig::load(Some(r#"{"ask_top_k": 5, "api_base_url": "https://api.example.com"}"#))
            .unwrap();
        assert_eq!(config.ask_top_k, 5);
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.summarize_top_k, 40);
        assert_eq!(config.theme_storage_key, "theme");
    }

    #[test]
    fn test_load_blank_override_uses_defaults() {
        let config = WidgetConfig::load(Some("   ")).unwrap();
        assert_eq!(config.ask_top_k, 12);
    }

    #[test]
    fn test_load_malformed_json() {
        let errors = WidgetConfig::load(Some("{ask_top_k:")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Invalid widget configuration"));
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let config = WidgetConfig {
            ask_top_k: 0,
            summarize_top_k: 0,
            theme_storage_key: " ".to_string(),
            log_level: "loud".to_string(),
            ..WidgetConfig::with_defaults()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("ask_top_k")));
        assert!(errors.iter().any(|e| e.contains("loud")));
    }

    #[test]
    fn test_env_overrides_only_fill_defaults() {
        let mut config = WidgetConfig::with_defaults();
        config.apply_env_overrides(Some("https://env.example.com"), Some("debug"));
        assert_eq!(config.api_base_url, "https://env.example.com");
        assert_eq!(config.log_level, "debug");

        let mut explicit = WidgetConfig {
            api_base_url: "https://file.example.com".to_string(),
            ..WidgetConfig::with_defaults()
        };
        explicit.apply_env_overrides(Some("https://env.example.com"), None);
        assert_eq!(explicit.api_base_url, "https://file.example.com");
        assert_eq!(explicit.log_level, "info");
    }

    #[test]
    fn test_absolute_base_url() {
        let same_origin = WidgetConfig::with_defaults();
        assert_eq!(same_origin.absolute_base_url("http://localhost:5000/"), "http://localhost:5000");

        let prefixed = WidgetConfig {
            api_base_url: "/api/".to_string(),
            ..WidgetConfig::with_defaults()
        };
        assert_eq!(prefixed.absolute_base_url("https://chat.example.com"), "https://chat.example.com/api");

        let absolute = WidgetConfig {
            api_base_url: "https://backend.example.com/".to_string(),
            ..WidgetConfig::with_defaults()
        };
        assert_eq!(absolute.absolute_base_url("http://ignored"), "https://backend.example.com");
    }
}
