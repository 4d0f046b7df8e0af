//! TOML-backed settings document

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use dwell_core::{ConfigError, EngineConfig, TargetPredicate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Environment variable naming a settings file
pub const CONFIG_ENV_VAR: &str = "DWELL_CLICK_CONFIG";

/// Errors while loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid engine settings: {0}")]
    Invalid(#[from] ConfigError),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Tick source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickSettings {
    /// Milliseconds between ticks when the host has no frame callback of its own
    pub interval_ms: u64,
    /// Mirror pointer x coordinates before hit testing
    pub mirror_x: bool,
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            interval_ms: 33,
            mirror_x: false,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Complete settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub targets: TargetPredicate,
    pub tick: TickSettings,
    pub logging: LoggingSettings,
}

/// Where loaded settings came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Environment(PathBuf),
    UserConfig(PathBuf),
    Defaults,
}

impl Settings {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Read, parse, and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&content, path)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Resolve settings using the standard lookup order
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        Self::discover_from(
            explicit,
            std::env::var_os(CONFIG_ENV_VAR),
            default_config_path(),
        )
    }

    fn discover_from(
        explicit: Option<&Path>,
        env_path: Option<OsString>,
        user_path: Option<PathBuf>,
    ) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ConfigSource::Explicit(path.to_path_buf())));
        }

        if let Some(path) = env_path.filter(|p| !p.is_empty()).map(PathBuf::from) {
            let settings = Self::load(&path)?;
            return Ok((settings, ConfigSource::Environment(path)));
        }

        if let Some(path) = user_path {
            if path.is_file() {
                let settings = Self::load(&path)?;
                return Ok((settings, ConfigSource::UserConfig(path)));
            }
            debug!("No settings file at {}, using defaults", path.display());
        }

        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Render as TOML, e.g. to show the effective settings
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        Ok(())
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let settings: Settings = toml::from_str(content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }
}

/// `config.toml` inside the platform configuration directory
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "dwell-click", "dwell-click")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
