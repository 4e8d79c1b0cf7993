//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.courier/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Endpoint defaults are baked in at build time: set `COURIER_AUTH_URL` /
//! `COURIER_CHATS_URL` when compiling to point a build at another deployment.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub state_dir: Option<String>,
    pub log_level: Option<String>,
    pub persist_session: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub auth_url: Option<String>,
    pub chats_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_AUTH_URL: Option<&str> = match option_env!("COURIER_AUTH_URL") {
    Some(url) => Some(url),
    None => Some("https://functions.poehali.dev/8104c0dc-fc79-4690-9944-640da8a2a82a"),
};
pub const DEFAULT_CHATS_URL: Option<&str> = option_env!("COURIER_CHATS_URL");
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
const STATE_DIR_NAME: &str = ".courier";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub auth_url: String,
    pub chats_url: String,
    /// Holds the session store and the log file.
    pub state_dir: PathBuf,
    pub log_level: LevelFilter,
    /// When false the session lives in memory only.
    pub persist_session: bool,
}

impl ResolvedConfig {
    pub fn store_dir(&self) -> PathBuf {
        self.state_dir.join("store")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("courier.log")
    }
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub auth_url: Option<String>,
    pub chats_url: Option<String>,
    pub state_dir: Option<String>,
    pub no_persist: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// A required setting has no value at any level of the hierarchy.
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Missing(key) => write!(
                f,
                "no value for `{key}`: set it in the config file, the environment, or on the command line"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.courier`, or `./.courier` if there is no home directory.
pub fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(STATE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(STATE_DIR_NAME))
}

/// Returns the path to `~/.courier/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(STATE_DIR_NAME).join("config.toml"))
}

/// Load config from `~/.courier/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CourierConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<CourierConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(CourierConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<CourierConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(CourierConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: CourierConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Courier Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# state_dir = "~/.courier"           # Session store and log file
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"
# persist_session = true             # false = sign in again on every start

# [backend]
# auth_url = "https://..."           # Or set COURIER_AUTH_URL
# chats_url = "https://..."          # Or set COURIER_CHATS_URL
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &CourierConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &CourierConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    // Endpoints: CLI → env → config → build-time default
    let auth_url = cli
        .auth_url
        .clone()
        .or_else(|| env("COURIER_AUTH_URL"))
        .or_else(|| config.backend.auth_url.clone())
        .or_else(|| DEFAULT_AUTH_URL.map(str::to_string))
        .ok_or(ConfigError::Missing("auth_url"))?;

    let chats_url = cli
        .chats_url
        .clone()
        .or_else(|| env("COURIER_CHATS_URL"))
        .or_else(|| config.backend.chats_url.clone())
        .or_else(|| DEFAULT_CHATS_URL.map(str::to_string))
        .ok_or(ConfigError::Missing("chats_url"))?;

    // State dir: CLI → env → config → ~/.courier
    let state_dir = cli
        .state_dir
        .clone()
        .or_else(|| env("COURIER_STATE_DIR"))
        .or_else(|| config.general.state_dir.clone())
        .map(|dir| expand_home(&dir))
        .unwrap_or_else(default_state_dir);

    let log_level = match config.general.log_level.as_deref() {
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level {:?}, using {}", level, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    let persist_session = !cli.no_persist && config.general.persist_session.unwrap_or(true);

    Ok(ResolvedConfig {
        auth_url,
        chats_url,
        state_dir,
        log_level,
        persist_session,
    })
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
