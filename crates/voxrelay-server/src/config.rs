//! Relay Configuration
//!
//! Secrets and settings are read once at startup from a key lookup
//! (Shuttle secrets, then process environment).

use voxrelay::DEFAULT_TTS_MODEL;

pub const ELEVENLABS_API_KEY: &str = "ELEVENLABS_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_ASSISTANT_ID: &str = "OPENAI_ASSISTANT_ID";
pub const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
pub const ELEVENLABS_BASE_URL: &str = "ELEVENLABS_BASE_URL";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const DEFAULT_TTS_MODEL_KEY: &str = "DEFAULT_TTS_MODEL";

const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

/// Relay settings. Secrets stay `None` when unset so handlers can fail closed.
#[derive(Clone)]
pub struct RelayConfig {
    pub elevenlabs_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub assistant_id: Option<String>,
    pub allowed_origins: Vec<String>,
    pub elevenlabs_base_url: String,
    pub openai_base_url: String,
    pub default_tts_model: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl RelayConfig {
    /// Build the config from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let allowed_origins = get(ALLOWED_ORIGINS)
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect());

        Self {
            elevenlabs_api_key: get(ELEVENLABS_API_KEY),
            openai_api_key: get(OPENAI_API_KEY),
            assistant_id: get(OPENAI_ASSISTANT_ID),
            allowed_origins,
            elevenlabs_base_url: base_url(get(ELEVENLABS_BASE_URL), DEFAULT_ELEVENLABS_BASE_URL),
            openai_base_url: base_url(get(OPENAI_BASE_URL), DEFAULT_OPENAI_BASE_URL),
            default_tts_model: get(DEFAULT_TTS_MODEL_KEY)
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
        }
    }
}

// Secrets must never reach the logs
impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("elevenlabs_api_key", &self.elevenlabs_api_key.as_ref().map(|_| "<set>"))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("assistant_id", &self.assistant_id)
            .field("allowed_origins", &self.allowed_origins)
            .field("elevenlabs_base_url", &self.elevenlabs_base_url)
            .field("openai_base_url", &self.openai_base_url)
            .field("default_tts_model", &self.default_tts_model)
            .finish()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn base_url(value: Option<String>, fallback: &str) -> String {
    value
        .unwrap_or_else(|| fallback.to_string())
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = RelayConfig::default();
        assert!(config.elevenlabs_api_key.is_none());
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.elevenlabs_base_url, "https://api.elevenlabs.io");
        assert_eq!(config.openai_base_url, "https://api.openai.com");
        assert_eq!(config.default_tts_model, DEFAULT_TTS_MODEL);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_origins_are_split_and_trimmed() {
        let config = RelayConfig::from_lookup(lookup(&[(
            ALLOWED_ORIGINS,
            " https://a.example , https://b.example/ ,,",
        )]));
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let config = RelayConfig::from_lookup(lookup(&[(OPENAI_API_KEY, "   ")]));
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = RelayConfig::from_lookup(lookup(&[(ELEVENLABS_API_KEY, "sk-very-secret")]));
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("<set>"));
    }
}
