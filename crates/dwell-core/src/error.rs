//! Error types for the dwell engine

use crate::registry::RegionId;

/// Rejected engine configuration.
///
/// Invalid tunables are refused at `configure()` time rather than clamped, so
/// a running engine only ever ticks with a validated snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("hover time must be a positive number of milliseconds, got {0}")]
    HoverTime(f64),

    #[error("acquire radius must be a non-negative pixel count, got {0}")]
    AcquireRadius(f64),

    #[error("grace radius must be a non-negative pixel count, got {0}")]
    GraceRadius(f64),

    #[error("grace radius {grace} is narrower than acquire radius {acquire}")]
    GraceNarrowerThanAcquire { acquire: f64, grace: f64 },

    #[error("cooldown must be a non-negative number of milliseconds, got {0}")]
    Cooldown(f64),
}

/// Failure raised while running a region's activation behavior.
///
/// Never escapes the dispatcher; it is logged and surfaced to the feedback
/// port as an outcome only.
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error("activation of region {region} failed: {source}")]
    Failed {
        region: RegionId,
        #[source]
        source: anyhow::Error,
    },

    #[error("activation of region {region} panicked: {message}")]
    Panicked { region: RegionId, message: String },
}

impl ActivationError {
    /// The region whose activation failed
    pub fn region(&self) -> &RegionId {
        match self {
            ActivationError::Failed { region, .. } | ActivationError::Panicked { region, .. } => {
                region
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
