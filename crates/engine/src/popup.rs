//! Overlay elements attached to a cell.
//!
//! A focus-out whose new target lies inside one of these elements is not
//! "leaving the cell": the user moved into the cell's own date picker,
//! color picker or option list.

use std::collections::BTreeSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Opaque handle for a host UI element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

/// Anything that can answer DOM-style `contains` for a focus target.
pub trait PopupElement {
    /// True if `target` is this element or one of its descendants.
    fn contains(&self, target: ElementId) -> bool;
}

/// The popup set owned by one cell's editor.
pub type PopupElements = Vec<Rc<dyn PopupElement>>;

/// A popup described by its root element and known descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupRegion {
    pub root: ElementId,
    #[serde(default)]
    pub descendants: BTreeSet<ElementId>,
}

impl PopupRegion {
    pub fn new(root: ElementId) -> Self {
        Self {
            root,
            descendants: BTreeSet::new(),
        }
    }

    pub fn with_descendant(mut self, id: ElementId) -> Self {
        self.descendants.insert(id);
        self
    }
}

impl PopupElement for PopupRegion {
    fn contains(&self, target: ElementId) -> bool {
        target == self.root || self.descendants.contains(&target)
    }
}

impl<F: Fn(ElementId) -> bool> PopupElement for F {
    fn contains(&self, target: ElementId) -> bool {
        self(target)
    }
}

/// Wrap serializable regions as a popup set.
pub fn popup_set(regions: &[PopupRegion]) -> PopupElements {
    regions
        .iter()
        .cloned()
        .map(|r| Rc::new(r) as Rc<dyn PopupElement>)
        .collect()
}
