//! Document-like environment observed by the region registry
//!
//! The engine never owns on-screen elements. It reads them through the
//! [`Environment`] trait and learns about structural changes through a
//! [`ChangeNotifier`]. [`Document`] is an in-memory implementation used by
//! tests and the terminal demo.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dispatch::ActivationHandle;
use crate::spatial::Rect;

/// Stable identity of an element in the environment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Presentation properties that decide whether an element can be looked at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Removed from layout entirely
    pub display_none: bool,
    /// Laid out but not painted
    pub visibility_hidden: bool,
    /// 0.0 is fully transparent
    pub opacity: f64,
    /// Presentation blocks pointer interaction
    pub pointer_events_none: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            display_none: false,
            visibility_hidden: false,
            opacity: 1.0,
            pointer_events_none: false,
        }
    }
}

impl ElementStyle {
    pub fn hidden() -> Self {
        Self {
            visibility_hidden: true,
            ..Self::default()
        }
    }

    /// Whether this element alone (ignoring ancestors) hides or blocks its subtree
    pub fn blocks_interaction(&self) -> bool {
        self.display_none
            || self.visibility_hidden
            || self.opacity.is_nan()
            || self.opacity <= 0.0
            || self.pointer_events_none
    }
}

/// One node of the environment tree
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub parent: Option<ElementId>,
    /// Lower-case tag name, e.g. `button`
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub bounds: Rect,
    pub style: ElementStyle,
    pub disabled: bool,
    pub activation: Option<ActivationHandle>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            tag: tag.into().to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            bounds: Rect::default(),
            style: ElementStyle::default(),
            disabled: false,
            activation: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<ElementId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_activation(mut self, activation: ActivationHandle) -> Self {
        self.activation = Some(activation);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Read access to the current element tree.
///
/// `elements()` must yield elements in document order; the registry relies on
/// that order for deterministic tie-breaking.
pub trait Environment {
    /// Identity of this environment instance. Two live environments never
    /// share an id, so a registry can tell them apart at equal revisions.
    fn id(&self) -> EnvironmentId;

    /// Counter bumped on every structural or visibility change
    fn revision(&self) -> u64;

    /// All elements in document order
    fn elements(&self) -> Vec<&Element>;

    /// Look up a single element
    fn get(&self, id: &ElementId) -> Option<&Element>;

    /// Register a notifier to be signalled on change.
    ///
    /// Environments without push notifications may ignore this; the registry
    /// still notices changes through `revision()`.
    fn subscribe(&mut self, _notifier: ChangeNotifier) {}
}

/// Cloneable dirty flag shared between an environment and the registry.
///
/// Notifications may arrive from any thread; they are coalesced and consumed
/// by the next `refresh()`.
#[derive(Debug, Clone, Default)]
pub struct ChangeNotifier {
    dirty: Arc<AtomicBool>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the environment as changed
    pub fn notify(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Consume the pending notification, if any
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}

/// Process-unique identity of an [`Environment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentId(u64);

impl EnvironmentId {
    /// Allocate an id not handed out before in this process
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// In-memory element tree
#[derive(Debug)]
pub struct Document {
    id: EnvironmentId,
    elements: Vec<Element>,
    index: HashMap<ElementId, usize>,
    revision: u64,
    listeners: Vec<ChangeNotifier>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            id: EnvironmentId::next(),
            elements: Vec::new(),
            index: HashMap::new(),
            revision: 0,
            listeners: Vec::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append an element, replacing any existing element with the same id in place
    pub fn insert(&mut self, element: Element) {
        match self.index.get(&element.id) {
            Some(&slot) => self.elements[slot] = element,
            None => {
                self.index.insert(element.id.clone(), self.elements.len());
                self.elements.push(element);
            }
        }
        self.changed();
    }

    /// Remove an element together with its whole subtree.
    ///
    /// Returns the number of elements removed.
    pub fn remove(&mut self, id: &ElementId) -> usize {
        if !self.index.contains_key(id) {
            return 0;
        }

        let mut doomed: HashSet<ElementId> = HashSet::new();
        doomed.insert(id.clone());
        // Children always follow their parent in insertion order, but a
        // re-parented element may not; loop until the set stops growing.
        loop {
            let before = doomed.len();
            for element in &self.elements {
                if let Some(parent) = &element.parent {
                    if doomed.contains(parent) {
                        doomed.insert(element.id.clone());
                    }
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        self.elements.retain(|e| !doomed.contains(&e.id));
        self.reindex();
        self.changed();
        doomed.len()
    }

    /// Edit an element in place. Returns false if the id is unknown.
    pub fn update<F>(&mut self, id: &ElementId, edit: F) -> bool
    where
        F: FnOnce(&mut Element),
    {
        let Some(&slot) = self.index.get(id) else {
            return false;
        };
        edit(&mut self.elements[slot]);
        self.changed();
        true
    }

    pub fn set_bounds(&mut self, id: &ElementId, bounds: Rect) -> bool {
        self.update(id, |e| e.bounds = bounds)
    }

    pub fn set_style(&mut self, id: &ElementId, style: ElementStyle) -> bool {
        self.update(id, |e| e.style = style)
    }

    pub fn set_disabled(&mut self, id: &ElementId, disabled: bool) -> bool {
        self.update(id, |e| e.disabled = disabled)
    }

    fn reindex(&mut self) {
        self.index = self
            .elements
            .iter()
            .enumerate()
            .map(|(slot, e)| (e.id.clone(), slot))
            .collect();
    }

    fn changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        for listener in &self.listeners {
            listener.notify();
        }
    }
}

impl Environment for Document {
    fn id(&self) -> EnvironmentId {
        self.id
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn elements(&self) -> Vec<&Element> {
        self.elements.iter().collect()
    }

    fn get(&self, id: &ElementId) -> Option<&Element> {
        self.index.get(id).map(|&slot| &self.elements[slot])
    }

    fn subscribe(&mut self, notifier: ChangeNotifier) {
        self.listeners.push(notifier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(id: &str) -> Element {
        Element::new(id, "button").with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_insert_preserves_order_and_bumps_revision() {
        let mut doc = Document::new();
        doc.insert(button("a"));
        doc.insert(button("b"));

        let ids: Vec<_> = doc.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(doc.revision(), 2);
    }

    #[test]
    fn test_documents_have_distinct_ids() {
        let a = Document::new();
        let b = Document::new();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a.id());
    }

    #[test]
    fn test_nan_opacity_blocks_interaction() {
        let style = ElementStyle {
            opacity: f64::NAN,
            ..ElementStyle::default()
        };
        assert!(style.blocks_interaction());
        assert!(!ElementStyle::default().blocks_interaction());
    }

    #[test]
    fn test_insert_same_id_replaces_in_place() {
        let mut doc = Document::new();
        doc.insert(button("a"));
        doc.insert(button("b"));
        doc.insert(button("a").with_class("clickable"));

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.elements()[0].id.as_str(), "a");
        assert!(doc.elements()[0].has_class("clickable"));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut doc = Document::new();
        doc.insert(Element::new("panel", "div"));
        doc.insert(button("child").with_parent("panel"));
        doc.insert(Element::new("inner", "span").with_parent("child"));
        doc.insert(button("other"));

        assert_eq!(doc.remove(&ElementId::new("panel")), 3);
        assert_eq!(doc.len(), 1);
        assert!(doc.get(&ElementId::new("other")).is_some());
        assert!(doc.get(&ElementId::new("inner")).is_none());
        assert_eq!(doc.remove(&ElementId::new("panel")), 0);
    }

    #[test]
    fn test_subscribers_are_notified() {
        let mut doc = Document::new();
        let notifier = ChangeNotifier::new();
        doc.subscribe(notifier.clone());

        assert!(!notifier.is_pending());
        doc.insert(button("a"));
        doc.set_style(&ElementId::new("a"), ElementStyle::hidden());
        assert!(notifier.take());
        assert!(!notifier.take());
    }

    #[test]
    fn test_update_unknown_id() {
        let mut doc = Document::new();
        let revision = doc.revision();
        assert!(!doc.set_disabled(&ElementId::new("missing"), true));
        assert_eq!(doc.revision(), revision);
    }

    #[test]
    fn test_style_blocks_interaction() {
        assert!(!ElementStyle::default().blocks_interaction());
        assert!(ElementStyle::hidden().blocks_interaction());
        assert!(ElementStyle {
            opacity: 0.0,
            ..ElementStyle::default()
        }
        .blocks_interaction());
        assert!(ElementStyle {
            pointer_events_none: true,
            ..ElementStyle::default()
        }
        .blocks_interaction());
    }
}
