use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    pub tables: TableSettings,
    pub matching: MatchingSettings,
    pub scoring: ScoringSettings,
    pub ai: AiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_personas_table")]
    pub personas: String,
    #[serde(default = "default_contacts_table")]
    pub contacts: String,
}

fn default_personas_table() -> String {
    "customer_personas".to_string()
}
fn default_contacts_table() -> String {
    "contacts".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Default minimum match score when the request omits one.
    pub min_match_score: Option<u8>,
    /// Upper bound on the best-effort AI scoring call.
    pub remote_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_base_weight")]
    pub base: f64,
    #[serde(default = "default_age_overlap_weight")]
    pub age_overlap: f64,
    #[serde(default = "default_age_exact_weight")]
    pub age_exact: f64,
    #[serde(default = "default_keyword_floor")]
    pub keyword_floor: f64,
    #[serde(default = "default_keyword_step")]
    pub keyword_step: f64,
    #[serde(default = "default_keyword_cap")]
    pub keyword_cap: f64,
    #[serde(default = "default_channel_weight")]
    pub channel: f64,
    #[serde(default = "default_industry_weight")]
    pub industry: f64,
    #[serde(default = "default_pain_point_weight")]
    pub pain_point: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            base: default_base_weight(),
            age_overlap: default_age_overlap_weight(),
            age_exact: default_age_exact_weight(),
            keyword_floor: default_keyword_floor(),
            keyword_step: default_keyword_step(),
            keyword_cap: default_keyword_cap(),
            channel: default_channel_weight(),
            industry: default_industry_weight(),
            pain_point: default_pain_point_weight(),
        }
    }
}

fn default_base_weight() -> f64 { 10.0 }
fn default_age_overlap_weight() -> f64 { 30.0 }
fn default_age_exact_weight() -> f64 { 28.0 }
fn default_keyword_floor() -> f64 { 25.0 }
fn default_keyword_step() -> f64 { 5.0 }
fn default_keyword_cap() -> f64 { 40.0 }
fn default_channel_weight() -> f64 { 10.0 }
fn default_industry_weight() -> f64 { 12.0 }
fn default_pain_point_weight() -> f64 { 8.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    pub max_tokens: Option<u32>,
}

fn default_ai_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with PERSONA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with PERSONA_)
            // e.g., PERSONA_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PERSONA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PERSONA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Allow the conventional Supabase/OpenAI environment variables to override
/// the prefixed config keys, so deployments can reuse the secrets they
/// already provision for the rest of the platform.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let supabase_url = env::var("SUPABASE_URL")
        .or_else(|_| env::var("PERSONA_SUPABASE__URL"))
        .ok();
    let supabase_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
        .or_else(|_| env::var("PERSONA_SUPABASE__API_KEY"))
        .ok();
    let openai_key = env::var("OPENAI_API_KEY")
        .or_else(|_| env::var("PERSONA_AI__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = supabase_url {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Some(key) = supabase_key {
        builder = builder.set_override("supabase.api_key", key)?;
    }
    if let Some(key) = openai_key {
        builder = builder.set_override("ai.api_key", key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_heuristic_constants() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.base, 10.0);
        assert_eq!(weights.age_overlap, 30.0);
        assert_eq!(weights.age_exact, 28.0);
        assert_eq!(weights.keyword_floor, 25.0);
        assert_eq!(weights.keyword_step, 5.0);
        assert_eq!(weights.keyword_cap, 40.0);
        assert_eq!(weights.channel, 10.0);
        assert_eq!(weights.industry, 12.0);
        assert_eq!(weights.pain_point, 8.0);
    }

    #[test]
    fn test_default_tables() {
        assert_eq!(default_personas_table(), "customer_personas");
        assert_eq!(default_contacts_table(), "contacts");
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }
}
