//! Post-activation suppression per region

use std::collections::HashMap;

use tracing::debug;

use crate::registry::RegionId;

/// Per-region re-acquisition cooldown.
///
/// Expired entries are ignored by `is_suppressed` and dropped lazily by
/// `prune`.
#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    cooldown_ms: f64,
    suppressed_until: HashMap<RegionId, f64>,
}

impl CooldownTracker {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            suppressed_until: HashMap::new(),
        }
    }

    /// Window length used by future calls to `suppress`
    pub fn set_cooldown(&mut self, cooldown_ms: f64) {
        self.cooldown_ms = cooldown_ms;
    }

    pub fn cooldown_ms(&self) -> f64 {
        self.cooldown_ms
    }

    /// True while `now_ms` is before the region's suppression deadline
    pub fn is_suppressed(&self, id: &RegionId, now_ms: f64) -> bool {
        self.suppressed_until
            .get(id)
            .is_some_and(|&until| now_ms < until)
    }

    /// Start (or extend) the window after an activation of `id`.
    ///
    /// The deadline never moves backwards, even if the cooldown was shortened
    /// since the previous activation.
    pub fn suppress(&mut self, id: &RegionId, now_ms: f64) {
        let until = now_ms + self.cooldown_ms;
        let entry = self.suppressed_until.entry(id.clone()).or_insert(until);
        *entry = entry.max(until);
        debug!("Region {} suppressed until {:.0}ms", id, *entry);
    }

    /// Deadline for `id`, expired or not
    pub fn suppressed_until(&self, id: &RegionId) -> Option<f64> {
        self.suppressed_until.get(id).copied()
    }

    /// Drop every entry whose window has passed
    pub fn prune(&mut self, now_ms: f64) {
        self.suppressed_until.retain(|_, until| now_ms < *until);
    }

    pub fn len(&self) -> usize {
        self.suppressed_until.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppressed_until.is_empty()
    }

    pub fn clear(&mut self) {
        self.suppressed_until.clear();
    }
}
