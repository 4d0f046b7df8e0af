//! Region registry
//!
//! Maintains the set of elements that may currently be acquired, in document
//! order. The set is rebuilt from scratch on refresh; entries are replaced,
//! never edited, when the underlying element changes or disappears.

use std::collections::HashSet;

use tracing::debug;

use crate::dispatch::ActivationHandle;
use crate::environment::{ChangeNotifier, Element, ElementId, Environment, EnvironmentId};
use crate::predicate::TargetPredicate;
use crate::spatial::Rect;

/// Regions are identified by the id of the element they were built from
pub type RegionId = ElementId;

/// Snapshot of an element that was eligible at the last refresh.
///
/// Ineligible elements never become regions, so every region is a candidate.
#[derive(Debug, Clone)]
pub struct InteractiveRegion {
    pub id: RegionId,
    pub bounds: Rect,
    pub activation: Option<ActivationHandle>,
}

impl InteractiveRegion {
    fn from_element(element: &Element) -> Self {
        Self {
            id: element.id.clone(),
            bounds: element.bounds,
            activation: element.activation.clone(),
        }
    }
}

/// Registry of eligible interactive regions
#[derive(Debug)]
pub struct RegionRegistry {
    predicate: TargetPredicate,
    notifier: ChangeNotifier,
    /// Environment and revision the current set was built from
    seen: Option<(EnvironmentId, u64)>,
    regions: Vec<InteractiveRegion>,
    rebuilds: u64,
}

impl RegionRegistry {
    pub fn new(predicate: TargetPredicate) -> Self {
        Self {
            predicate,
            notifier: ChangeNotifier::new(),
            seen: None,
            regions: Vec::new(),
            rebuilds: 0,
        }
    }

    /// Notifier to hand to the environment's change channel
    pub fn notifier(&self) -> ChangeNotifier {
        self.notifier.clone()
    }

    pub fn predicate(&self) -> &TargetPredicate {
        &self.predicate
    }

    /// Swap the target predicate; the next refresh rebuilds unconditionally
    pub fn set_predicate(&mut self, predicate: TargetPredicate) {
        self.predicate = predicate;
        self.notifier.notify();
    }

    /// Re-scan the environment if anything changed since the last scan.
    ///
    /// A different environment than last time always forces a rebuild, even
    /// at the same revision.
    ///
    /// Cheap when nothing changed, so it is safe to call on every tick and on
    /// every notification. Returns whether the set was rebuilt.
    pub fn refresh<E>(&mut self, env: &E) -> bool
    where
        E: Environment + ?Sized,
    {
        let notified = self.notifier.take();
        let key = (env.id(), env.revision());
        if !notified && self.seen == Some(key) {
            return false;
        }

        self.regions = env
            .elements()
            .into_iter()
            .filter(|element| self.predicate.matches(element) && is_eligible(env, element))
            .map(InteractiveRegion::from_element)
            .collect();
        self.seen = Some(key);
        self.rebuilds += 1;

        debug!(
            "Region registry rebuilt at revision {}: {} eligible",
            key.1,
            self.regions.len()
        );
        true
    }

    /// Current eligible regions in document order
    pub fn regions(&self) -> &[InteractiveRegion] {
        &self.regions
    }

    pub fn get(&self, id: &RegionId) -> Option<&InteractiveRegion> {
        self.regions.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// How many times the set has been rebuilt
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

/// Visible, sized, enabled, and not blocked by any ancestor.
///
/// An element whose parent is missing from the environment is treated as
/// detached and therefore ineligible.
fn is_eligible<E>(env: &E, element: &Element) -> bool
where
    E: Environment + ?Sized,
{
    if element.bounds.is_empty() {
        return false;
    }

    let mut visited: HashSet<&ElementId> = HashSet::new();
    let mut current = element;
    loop {
        if current.disabled || current.style.blocks_interaction() {
            return false;
        }
        if !visited.insert(&current.id) {
            // Parent cycle; the tree is malformed
            return false;
        }
        match &current.parent {
            None => return true,
            Some(parent_id) => match env.get(parent_id) {
                Some(parent) => current = parent,
                None => return false,
            },
        }
    }
}
