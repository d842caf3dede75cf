//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.coach/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::profile::{ActivityLevel, FitnessGoal, SkinType, UserProfile};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

/// Initial profile selections, as wire values (`"oily"`, `"weightLoss"`, ...).
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ProfileConfig {
    pub skin_type: Option<String>,
    pub fitness_goal: Option<String>,
    pub activity_level: Option<String>,
    #[serde(default)]
    pub skin_concerns: Vec<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` leaves the model choice to the endpoint.
    pub model: Option<String>,
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub log_level: LevelFilter,
    pub profile: UserProfile,
}

impl ResolvedConfig {
    /// Model name for display; endpoints without a model show "default".
    pub fn display_model(&self) -> &str {
        self.model.as_deref().unwrap_or("default")
    }
}

/// Values given on the command line. `None` = flag not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub skin_type: Option<String>,
    pub fitness_goal: Option<String>,
    pub activity_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.coach/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".coach").join("config.toml"))
}

/// Load config from `~/.coach/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CoachConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<CoachConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(CoachConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path (generating a default if missing).
pub fn load_config_from(path: &Path) -> Result<CoachConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(CoachConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: CoachConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Coach Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [general]
# model = "gpt-4o-mini"              # Or set COACH_MODEL; omit to let the endpoint choose
# request_timeout_secs = 60          # Bound on waiting for headers and for each body chunk
# log_level = "info"                 # "error", "warn", "info", "debug", "trace"

# [endpoint]
# base_url = "https://api.openai.com/v1"   # Or set COACH_BASE_URL
# api_key = "sk-..."                       # Or set COACH_API_KEY

# [profile]
# skin_type = "combination"          # oily, dry, combination, sensitive, normal
# fitness_goal = "endurance"         # weightLoss, muscleGain, endurance, flexibility, general
# activity_level = "light"           # sedentary, light, moderate, very, extreme
# skin_concerns = ["acne"]           # Kept with the profile, not sent to the model
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &CoachConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Model: CLI → env → config → endpoint default
    let model = cli
        .model
        .clone()
        .or_else(|| std::env::var("COACH_MODEL").ok())
        .or_else(|| config.general.model.clone())
        .filter(|m| !m.trim().is_empty());

    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("COACH_BASE_URL").ok())
        .or_else(|| config.endpoint.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // API key: env → config
    let api_key = std::env::var("COACH_API_KEY")
        .ok()
        .or_else(|| config.endpoint.api_key.clone())
        .filter(|k| !k.is_empty());

    let timeout_secs = cli
        .timeout_secs
        .or(config.general.request_timeout_secs)
        .filter(|&s| s > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    let log_level = config
        .general
        .log_level
        .as_deref()
        .and_then(|level| match level.parse::<LevelFilter>() {
            Ok(level) => Some(level),
            Err(_) => {
                warn!("Unknown log level '{}', using {}", level, DEFAULT_LOG_LEVEL);
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        model,
        base_url,
        api_key,
        request_timeout: Duration::from_secs(timeout_secs),
        log_level,
        profile: resolve_profile(&config.profile, cli),
    }
}

/// Builds the initial profile. Unknown values degrade to unset.
fn resolve_profile(config: &ProfileConfig, cli: &CliOverrides) -> UserProfile {
    fn pick<T>(
        name: &str,
        cli: Option<&String>,
        file: Option<&String>,
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = cli.or(file)?;
        let parsed = parse(raw);
        if parsed.is_none() && !raw.is_empty() {
            warn!("Ignoring unknown {} '{}'", name, raw);
        }
        parsed
    }

    UserProfile {
        skin_type: pick(
            "skin type",
            cli.skin_type.as_ref(),
            config.skin_type.as_ref(),
            SkinType::from_value,
        ),
        fitness_goal: pick(
            "fitness goal",
            cli.fitness_goal.as_ref(),
            config.fitness_goal.as_ref(),
            FitnessGoal::from_value,
        ),
        activity_level: pick(
            "activity level",
            cli.activity_level.as_ref(),
            config.activity_level.as_ref(),
            ActivityLevel::from_value,
        ),
        skin_concerns: config.skin_concerns.clone(),
    }
}
