//! Which elements count as dwell targets

use serde::{Deserialize, Serialize};

use crate::environment::Element;

/// Descriptive target set, matched against each element.
///
/// An element matches when any one rule matches. The default set covers
/// explicit widgets (`button`, `input`), elements opted in with a marker
/// (`[onclick]`, `[data-hover-click]`, `.clickable`) and elements carrying a
/// bound activation behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetPredicate {
    /// Tag names, compared case-insensitively
    pub tags: Vec<String>,
    /// Attribute names whose presence opts an element in
    pub attributes: Vec<String>,
    /// Class names that opt an element in
    pub classes: Vec<String>,
    /// Match any element with an activation behavior bound
    pub bound_activation: bool,
}

impl Default for TargetPredicate {
    fn default() -> Self {
        Self {
            tags: vec!["button".to_string(), "input".to_string()],
            attributes: vec!["onclick".to_string(), "data-hover-click".to_string()],
            classes: vec!["clickable".to_string()],
            bound_activation: true,
        }
    }
}

impl TargetPredicate {
    /// A predicate matching nothing; build it up with the `with_*` methods
    pub fn empty() -> Self {
        Self {
            tags: Vec::new(),
            attributes: Vec::new(),
            classes: Vec::new(),
            bound_activation: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_bound_activation(mut self, enabled: bool) -> Self {
        self.bound_activation = enabled;
        self
    }

    /// Whether the element itself is a target candidate.
    ///
    /// Says nothing about visibility; the registry checks that separately.
    pub fn matches(&self, element: &Element) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(&element.tag))
            || self.attributes.iter().any(|a| element.has_attribute(a))
            || self.classes.iter().any(|c| element.has_class(c))
            || (self.bound_activation && element.activation.is_some())
    }
}
