//! dwell-click: activate on-screen controls by resting a pointer on them
//!
//! Facade over the workspace crates. See [`dwell_core`] for the engine and
//! [`dwell_config`] for TOML settings.

pub use dwell_config as settings;
pub use dwell_config::Settings;
pub use dwell_core::*;
