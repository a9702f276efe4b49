//! Leaf fields: in-place text and popout form inputs

use crate::component::{
    strip_editing, AttributeBundle, EditableComponent, FieldValue, Mode, EDITABLE_CLASS,
};
use crate::dom::{Dom, NodeId};
use itertools::Itertools;

/// Text edited in place on a `contenteditable` element
///
/// There is no buffering: whatever text the live surface holds is the value.
#[derive(Debug)]
pub struct InlineEditable {
    id: String,
    node: NodeId,
    placeholder: String,
    mode: Mode,
}

impl InlineEditable {
    /// Create the element with its id, placeholder text and inline style.
    /// Editing affordances are added by [`EditableComponent::render_editing`].
    pub fn new(
        dom: &mut Dom,
        tag: &str,
        id: impl Into<String>,
        placeholder: &str,
        style: Option<&str>,
    ) -> Self {
        let id = id.into();
        let node = dom.create_element(tag);
        dom.set_attr(node, "id", &id);
        if let Some(style) = style {
            dom.set_attr(node, "style", style);
        }
        dom.set_text_content(node, placeholder);
        Self {
            id,
            node,
            placeholder: placeholder.to_string(),
            mode: Mode::Final,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The live element
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn text(&self, dom: &Dom) -> String {
        dom.text_content(self.node)
    }

    /// Overwrite the live text, as typing would
    pub fn set_text(&self, dom: &mut Dom, text: &str) {
        dom.set_text_content(self.node, text);
    }
}

impl EditableComponent for InlineEditable {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn render_editing(&mut self, dom: &mut Dom) -> NodeId {
        dom.add_class(self.node, EDITABLE_CLASS);
        dom.set_attr(self.node, "contenteditable", "true");
        self.mode = Mode::Editing;
        self.node
    }

    fn render_final(&self, dom: &mut Dom) -> NodeId {
        match dom.clone_node(self.node, true) {
            Some(copy) => {
                strip_editing(dom, copy);
                copy
            }
            None => {
                log::error!("Live element of {} is missing from the page", self.id);
                dom.create_text("")
            }
        }
    }

    fn current_value(&self, dom: &Dom) -> FieldValue {
        FieldValue::Text(self.text(dom))
    }

    fn claims(&self, dom: &Dom, target: NodeId) -> bool {
        dom.contains(self.node, target)
    }
}

/// One labelled input of a popout-backed component
///
/// The input is itself an in-place editable surface; its text is the
/// uncommitted buffer that the owner's save handler reads on submit.
#[derive(Debug)]
pub struct PopoutField {
    name: String,
    label: NodeId,
    input: InlineEditable,
}

impl PopoutField {
    pub fn new(dom: &mut Dom, owner_id: &str, name: &str) -> Self {
        let input_id = format!("{}-{}", owner_id, slug(name));
        let mut input = InlineEditable::new(dom, "div", input_id.clone(), "", None);
        input.render_editing(dom);

        let label = dom.create_element("label");
        dom.set_attr(label, "for", &input_id);
        dom.set_text_content(label, name);

        Self {
            name: name.to_string(),
            label,
            input,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        self.input.id()
    }

    pub fn label(&self) -> NodeId {
        self.label
    }

    /// The editable input surface
    pub fn input(&self) -> NodeId {
        self.input.node()
    }

    /// Current buffer contents, trimmed
    pub fn value(&self, dom: &Dom) -> String {
        self.input.text(dom).trim().to_string()
    }

    pub fn fill(&self, dom: &mut Dom, text: &str) {
        self.input.set_text(dom, text);
    }
}

/// Values read from the popout form at submit time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    entries: Vec<(String, String)>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(dom: &Dom, fields: &[PopoutField]) -> Self {
        Self {
            entries: fields
                .iter()
                .map(|f| (f.name().to_string(), f.value(dom)))
                .collect(),
        }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.entries.push((name.to_string(), value.to_string()));
        self
    }

    /// A supplied value; empty or blank entries count as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.trim().is_empty())
    }
}

impl From<&AttributeBundle> for FormValues {
    fn from(bundle: &AttributeBundle) -> Self {
        bundle
            .iter()
            .fold(Self::new(), |values, (name, value)| values.with(name, value))
    }
}

fn slug(name: &str) -> String {
    name.split_whitespace().map(str::to_ascii_lowercase).join("-")
}
