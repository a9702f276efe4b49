//! The editable-component abstraction
//!
//! Every piece of user content exists in two forms: a live editing surface
//! wired to event bindings, and any number of final copies that carry no
//! editing affordances and can be serialized as-is.

use crate::dom::{Dom, NodeId, Viewport};

/// Class marking an in-place editable surface
pub const EDITABLE_CLASS: &str = "editable";
/// Class marking a popout trigger container
pub const POPOUT_EDIT_CLASS: &str = "popoutEdit";
/// Class marking the popout trigger of the component bound to the form
pub const POPOUT_FOCUS_CLASS: &str = "popoutEdit--focus";

const EDITING_CLASSES: &[&str] = &[EDITABLE_CLASS, POPOUT_EDIT_CLASS, POPOUT_FOCUS_CLASS];
const EDITING_ATTRS: &[&str] = &["contenteditable"];

/// Which representation of a component is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// The live surface is rendered and bound to events
    Editing,
    /// Only inert copies exist
    #[default]
    Final,
}

/// Named string attributes in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBundle {
    entries: Vec<(String, String)>,
}

impl AttributeBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bundle = Self::new();
        for (k, v) in iter {
            bundle.set(&k.into(), &v.into());
        }
        bundle
    }
}

/// The authoritative value of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text typed into an in-place surface
    Text(String),
    /// Attributes committed through the popout form
    Attributes(AttributeBundle),
    /// Values of a composite's fields in display order
    Composite(Vec<(String, FieldValue)>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_attributes(&self) -> Option<&AttributeBundle> {
        match self {
            FieldValue::Attributes(bundle) => Some(bundle),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Composite(fields) => {
                fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

/// Where the popout form should appear for a focused component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// A UI element with a live editing form and inert final copies
pub trait EditableComponent {
    fn mode(&self) -> Mode;

    /// Produce (or return, if already produced) the live surface. Bindings
    /// are registered once per component, however often this is called.
    fn render_editing(&mut self, dom: &mut Dom) -> NodeId;

    /// Produce a new detached copy with current values baked in and every
    /// editing affordance removed. The live surface is left untouched.
    fn render_final(&self, dom: &mut Dom) -> NodeId;

    fn current_value(&self, dom: &Dom) -> FieldValue;

    /// Show the focus affordance. Components backed by the popout form
    /// return the anchor the form should be shown at.
    fn focus(&mut self, _dom: &mut Dom, _viewport: Viewport) -> Option<Anchor> {
        None
    }

    /// Remove the focus affordance. Idempotent.
    fn unfocus(&mut self, _dom: &mut Dom) {}

    /// Whether a click on `target` lands on this component's own surface
    fn claims(&self, dom: &Dom, target: NodeId) -> bool;
}

/// Remove editing classes and attributes from a subtree in place
pub fn strip_editing(dom: &mut Dom, root: NodeId) {
    for node in dom.descendants(root) {
        for attr in EDITING_ATTRS {
            dom.remove_attr(node, attr);
        }
        for class in EDITING_CLASSES {
            dom.remove_class(node, class);
        }
    }
}

/// Whether any node in the subtree still carries an editing marker
pub fn has_editing_markers(dom: &Dom, root: NodeId) -> bool {
    dom.descendants(root).into_iter().any(|node| {
        EDITING_ATTRS.iter().any(|a| dom.attr(node, a).is_some())
            || EDITING_CLASSES.iter().any(|c| dom.has_class(node, c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_set_keeps_declaration_order() {
        let mut bundle: AttributeBundle = [("URL", "http://x"), ("Title", "T")].into_iter().collect();
        bundle.set("URL", "http://y");
        let entries: Vec<_> = bundle.iter().collect();
        assert_eq!(entries, vec![("URL", "http://y"), ("Title", "T")]);
    }

    #[test]
    fn test_strip_editing_removes_markers() {
        let mut dom = Dom::new();
        let outer = dom.create_element("div");
        let inner = dom.create_element("p");
        dom.append(outer, inner);
        dom.add_class(outer, POPOUT_EDIT_CLASS);
        dom.add_class(inner, EDITABLE_CLASS);
        dom.add_class(inner, "keep");
        dom.set_attr(inner, "contenteditable", "true");
        assert!(has_editing_markers(&dom, outer));

        strip_editing(&mut dom, outer);
        assert!(!has_editing_markers(&dom, outer));
        assert_eq!(dom.attr(inner, "class"), Some("keep"));
        assert_eq!(dom.attr(outer, "class"), None);
    }
}
