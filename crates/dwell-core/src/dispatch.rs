//! Activation dispatch
//!
//! Runs a region's bound behavior exactly once per completed dwell. Errors and
//! panics are contained here: they are logged and reported as an outcome, and
//! the state machine treats them as a completed activation.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::ActivationError;
use crate::registry::InteractiveRegion;

/// Behavior fired when a dwell completes
pub trait Activate: Send + Sync {
    fn activate(&self) -> anyhow::Result<()>;
}

impl<F> Activate for F
where
    F: Fn() -> anyhow::Result<()> + Send + Sync,
{
    fn activate(&self) -> anyhow::Result<()> {
        self()
    }
}

/// Opaque, shareable handle to an activation behavior
#[derive(Clone)]
pub struct ActivationHandle(Arc<dyn Activate>);

impl ActivationHandle {
    pub fn new(behavior: impl Activate + 'static) -> Self {
        Self(Arc::new(behavior))
    }

    /// Wrap an infallible closure
    pub fn from_fn(behavior: impl Fn() + Send + Sync + 'static) -> Self {
        Self::new(move || -> anyhow::Result<()> {
            behavior();
            Ok(())
        })
    }

    fn invoke(&self) -> anyhow::Result<()> {
        self.0.activate()
    }
}

impl fmt::Debug for ActivationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActivationHandle(..)")
    }
}

/// How a dispatched activation ended.
///
/// Every variant counts as a completed activation for the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The behavior ran and returned normally
    Completed,
    /// The region had no behavior bound; nothing ran
    Unbound,
    /// The behavior returned an error or panicked
    Failed { message: String },
}

impl ActivationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ActivationOutcome::Failed { .. })
    }
}

/// Invokes activation behaviors and isolates their failures
#[derive(Debug, Default)]
pub struct ActivationDispatcher {
    dispatched: u64,
    failed: u64,
}

impl ActivationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the region's behavior. Never panics and never returns an error.
    pub fn activate(&mut self, region: &InteractiveRegion) -> ActivationOutcome {
        self.dispatched += 1;

        let Some(handle) = region.activation.as_ref() else {
            debug!("Region {} has no activation bound", region.id);
            return ActivationOutcome::Unbound;
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| handle.invoke()));
        let error = match result {
            Ok(Ok(())) => {
                info!("Activated region {}", region.id);
                return ActivationOutcome::Completed;
            }
            Ok(Err(source)) => ActivationError::Failed {
                region: region.id.clone(),
                source,
            },
            Err(payload) => ActivationError::Panicked {
                region: region.id.clone(),
                message: panic_message(payload.as_ref()),
            },
        };

        self.failed += 1;
        warn!(region = %error.region(), "{}", error);
        ActivationOutcome::Failed {
            message: error.to_string(),
        }
    }

    /// Total activations attempted
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Activations that errored or panicked
    pub fn failed(&self) -> u64 {
        self.failed
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
