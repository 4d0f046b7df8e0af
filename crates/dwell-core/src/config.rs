//! Engine tunables

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Immutable tunables snapshot consumed once per tick.
///
/// Replaced wholesale through [`DwellEngine::configure`](crate::DwellEngine::configure);
/// never edited field by field while the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Milliseconds of continuous dwell required to activate a region
    pub hover_time_ms: f64,
    /// Tolerance used when selecting a new target
    pub acquire_radius_px: f64,
    /// Wider tolerance used to keep an already acquired target
    pub grace_radius_px: f64,
    /// Per-region suppression window after an activation
    pub cooldown_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hover_time_ms: 1500.0,
            acquire_radius_px: 15.0,
            grace_radius_px: 30.0,
            cooldown_ms: 1000.0,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hover_time(mut self, hover_time_ms: f64) -> Self {
        self.hover_time_ms = hover_time_ms;
        self
    }

    pub fn with_acquire_radius(mut self, radius_px: f64) -> Self {
        self.acquire_radius_px = radius_px;
        self
    }

    pub fn with_grace_radius(mut self, radius_px: f64) -> Self {
        self.grace_radius_px = radius_px;
        self
    }

    pub fn with_cooldown(mut self, cooldown_ms: f64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    /// Check every constraint, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        if !(self.hover_time_ms.is_finite() && self.hover_time_ms > 0.0) {
            return Err(ConfigError::HoverTime(self.hover_time_ms));
        }
        if !(self.acquire_radius_px.is_finite() && self.acquire_radius_px >= 0.0) {
            return Err(ConfigError::AcquireRadius(self.acquire_radius_px));
        }
        if !(self.grace_radius_px.is_finite() && self.grace_radius_px >= 0.0) {
            return Err(ConfigError::GraceRadius(self.grace_radius_px));
        }
        if self.grace_radius_px < self.acquire_radius_px {
            return Err(ConfigError::GraceNarrowerThanAcquire {
                acquire: self.acquire_radius_px,
                grace: self.grace_radius_px,
            });
        }
        if !(self.cooldown_ms.is_finite() && self.cooldown_ms >= 0.0) {
            return Err(ConfigError::Cooldown(self.cooldown_ms));
        }
        Ok(())
    }

    /// Radius used to retain a target that is already dwelling
    pub fn retain_radius_px(&self) -> f64 {
        self.acquire_radius_px.max(self.grace_radius_px)
    }
}
