use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{domain::DEFAULT_SKILL_VOCABULARY, ScoringRules};
use crate::services::{ActivityMode, SupabaseTables};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub supabase: Option<SupabaseSettings>,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub github: GithubSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which record store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Supabase,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_key: String,
    #[serde(default)]
    pub tables: TableSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_jobs_table")]
    pub jobs: String,
    #[serde(default = "default_applications_table")]
    pub applications: String,
    #[serde(default = "default_resume_analysis_table")]
    pub resume_analysis: String,
    #[serde(default = "default_external_profiles_table")]
    pub external_profiles: String,
    #[serde(default = "default_attrition_risk_table")]
    pub attrition_risk: String,
    #[serde(default = "default_submit_function")]
    pub submit_function: String,
    #[serde(default = "default_update_status_function")]
    pub update_status_function: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            jobs: default_jobs_table(),
            applications: default_applications_table(),
            resume_analysis: default_resume_analysis_table(),
            external_profiles: default_external_profiles_table(),
            attrition_risk: default_attrition_risk_table(),
            submit_function: default_submit_function(),
            update_status_function: default_update_status_function(),
        }
    }
}

impl From<TableSettings> for SupabaseTables {
    fn from(t: TableSettings) -> Self {
        Self {
            jobs: t.jobs,
            applications: t.applications,
            resume_analysis: t.resume_analysis,
            external_profiles: t.external_profiles,
            attrition_risk: t.attrition_risk,
            submit_function: t.submit_function,
            update_status_function: t.update_status_function,
        }
    }
}

fn default_jobs_table() -> String { "jobs".to_string() }
fn default_applications_table() -> String { "applications".to_string() }
fn default_resume_analysis_table() -> String { "resume_analysis".to_string() }
fn default_external_profiles_table() -> String { "external_profiles".to_string() }
fn default_attrition_risk_table() -> String { "attrition_risk".to_string() }
fn default_submit_function() -> String { "submit_application".to_string() }
fn default_update_status_function() -> String { "update_application_status".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubSettings {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub activity: ActivityMode,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_github_timeout(),
            activity: ActivityMode::default(),
        }
    }
}

fn default_github_api_url() -> String { "https://api.github.com".to_string() }
fn default_user_agent() -> String { format!("talent-ai/{}", env!("CARGO_PKG_VERSION")) }
fn default_github_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_audience() -> String { "authenticated".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_skill_vocabulary")]
    pub skill_vocabulary: Vec<String>,
    #[serde(default = "default_experience_years")]
    pub default_experience_years: u32,
    #[serde(default = "default_highlight_min_chars")]
    pub highlight_min_chars: usize,
    #[serde(default = "default_max_highlights")]
    pub max_highlights: usize,
    #[serde(default = "default_base_match_score")]
    pub base_match_score: u32,
    #[serde(default = "default_requirement_bonus")]
    pub requirement_bonus: u32,
    #[serde(default = "default_max_match_score")]
    pub max_match_score: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            skill_vocabulary: default_skill_vocabulary(),
            default_experience_years: default_experience_years(),
            highlight_min_chars: default_highlight_min_chars(),
            max_highlights: default_max_highlights(),
            base_match_score: default_base_match_score(),
            requirement_bonus: default_requirement_bonus(),
            max_match_score: default_max_match_score(),
        }
    }
}

impl From<ScoringSettings> for ScoringRules {
    fn from(s: ScoringSettings) -> Self {
        Self {
            skill_vocabulary: s.skill_vocabulary,
            default_experience_years: s.default_experience_years,
            highlight_min_chars: s.highlight_min_chars,
            max_highlights: s.max_highlights,
            base_match_score: s.base_match_score,
            requirement_bonus: s.requirement_bonus,
            max_match_score: s.max_match_score,
        }
    }
}

fn default_skill_vocabulary() -> Vec<String> {
    DEFAULT_SKILL_VOCABULARY.iter().map(|s| s.to_string()).collect()
}
fn default_experience_years() -> u32 { 2 }
fn default_highlight_min_chars() -> usize { 20 }
fn default_max_highlights() -> usize { 5 }
fn default_base_match_score() -> u32 { 50 }
fn default_requirement_bonus() -> u32 { 10 }
fn default_max_match_score() -> u32 { 95 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TALENT__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TALENT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("TALENT")
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
                Environment::with_prefix("TALENT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional Supabase and PostgreSQL variables on top of the
/// layered configuration
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("database.url", env::var("DATABASE_URL").ok()),
        ("supabase.url", env::var("SUPABASE_URL").ok()),
        ("supabase.service_key", env::var("SUPABASE_SERVICE_ROLE_KEY").ok()),
        ("auth.jwt_secret", env::var("SUPABASE_JWT_SECRET").ok()),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (key, value) in overrides {
        if let Some(value) = value {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
