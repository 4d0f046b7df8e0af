//! Configuration management for the dwell-click engine
//!
//! Settings live in a TOML document:
//!
//! ```toml
//! [engine]
//! hover_time_ms = 1500.0
//! acquire_radius_px = 15.0
//! grace_radius_px = 30.0
//! cooldown_ms = 1000.0
//!
//! [targets]
//! tags = ["button", "input"]
//! attributes = ["onclick", "data-hover-click"]
//! classes = ["clickable"]
//! bound_activation = true
//!
//! [tick]
//! interval_ms = 33
//! mirror_x = false
//!
//! [logging]
//! filter = "info"
//! ```
//!
//! Every section and key is optional. Lookup order is an explicit path, then
//! the `DWELL_CLICK_CONFIG` environment variable, then `config.toml` in the
//! platform config directory, then built-in defaults.

pub mod settings;

pub use settings::{
    default_config_path, ConfigSource, LoggingSettings, Settings, SettingsError, TickSettings,
    CONFIG_ENV_VAR,
};
